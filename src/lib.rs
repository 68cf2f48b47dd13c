//! Decodes CGI requests: query strings, `application/x-www-form-urlencoded`
//! and `multipart/form-data` bodies, and the `Cookie` header.
//!
//! Input is expected to be fully buffered. Decoding is a single synchronous
//! pass that produces immutable collections of [`FormField`]s,
//! [`UploadedFile`]s and [`Cookie`]s.
//!
//! # Examples
//!
//! ```
//! use cgi_form::{CgiEnv, Request};
//!
//! # fn run() -> cgi_form::Result<()> {
//! let body = "--X\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nMy upload\r\n--X\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.txt\"\r\nContent-Type: text/plain\r\n\r\nhello\r\n--X--\r\n";
//!
//! let env = CgiEnv::new()
//!     .var("QUERY_STRING", "album=7")
//!     .var("CONTENT_TYPE", "multipart/form-data; boundary=X")
//!     .body(body);
//!
//! let request = Request::from_env(&env)?;
//!
//! assert_eq!(request.fields().get("album")?.value(), "7");
//! assert_eq!(request.fields().get("title")?.value(), "My upload");
//!
//! let file = request.files().get("f")?;
//! assert_eq!(file.file_name(), "a.txt");
//! assert_eq!(file.as_bytes(), b"hello");
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! ## Optional features
//!
//! * `json`: [`FormField::json`] deserializes a field value with `serde_json`.
//! * `tokio-io`: [`CgiEnv::from_async_read`] reads the body from a tokio reader.
//! * `log`: decode decisions and lenient recoveries are logged with the `log` crate.

pub use bytes;

pub use constraints::Constraints;
pub use cookie::{parse_cookies, Cookie};
pub use entries::{Entries, Named};
pub use env::CgiEnv;
pub use error::Error;
pub use field::FormField;
pub use file::UploadedFile;
pub use multipart::{Multipart, Part};
pub use query::{decode_query, decode_query_into};
pub use request::{Request, RequestDecoder};
pub use size_limit::SizeLimit;

mod buffer;
mod constants;
mod constraints;
mod content_disposition;
mod cookie;
mod entries;
mod env;
mod error;
mod field;
mod file;
mod helpers;
mod multipart;
pub mod percent;
mod query;
mod request;
mod size_limit;
mod state;

/// A Result type often returned from methods that can have `cgi_form` errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses a `multipart/form-data` `Content-Type` value to extract the
/// boundary token.
///
/// Well-formed values are read as MIME parameters, which also unquotes a
/// quoted boundary. Otherwise everything after `boundary=` up to the next `;`
/// is taken as the token.
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> crate::Result<String> {
    let content_type = content_type.as_ref();

    if !helpers::media_type_essence(content_type).eq_ignore_ascii_case(constants::MULTIPART_FORM_DATA) {
        return Err(crate::Error::UnsupportedContentType {
            content_type: content_type.to_owned(),
        });
    }

    let from_mime = content_type
        .parse::<mime::Mime>()
        .ok()
        .and_then(|m| m.get_param(mime::BOUNDARY).map(|name| name.as_str().to_owned()));

    from_mime
        .or_else(|| raw_boundary(content_type))
        .filter(|boundary| !boundary.is_empty())
        .ok_or_else(|| crate::Error::MalformedContentType {
            content_type: content_type.to_owned(),
        })
}

fn raw_boundary(content_type: &str) -> Option<String> {
    let key = "boundary=";
    let start = helpers::find_ignore_ascii_case(content_type.as_bytes(), key.as_bytes())? + key.len();
    let token = content_type[start..].split(';').next().unwrap_or_default().trim();
    Some(token.trim_matches('"').to_owned())
}
