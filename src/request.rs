use bytes::Bytes;

use crate::constants;
use crate::constraints::Constraints;
use crate::cookie::{parse_cookies, Cookie};
use crate::entries::Entries;
use crate::env::CgiEnv;
use crate::field::FormField;
use crate::file::UploadedFile;
use crate::helpers::{self, log_debug, log_warn};
use crate::multipart;
use crate::query::decode_query_into;

/// Everything decoded from one CGI request.
///
/// All collections are immutable once decoding returns. Uploaded file
/// payloads may be cloned out and kept after the request is dropped.
#[derive(Debug, Default)]
pub struct Request {
    fields: Entries<FormField>,
    files: Entries<UploadedFile>,
    cookies: Entries<Cookie>,
    body_error: Option<crate::Error>,
}

impl Request {
    /// Decodes a CGI environment with default [`Constraints`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cgi_form::{CgiEnv, Request};
    ///
    /// let env = CgiEnv::new()
    ///     .var("QUERY_STRING", "lang=en")
    ///     .var("HTTP_COOKIE", "a=1; b=2")
    ///     .body("name=John+Doe&age=30");
    ///
    /// let request = Request::from_env(&env).unwrap();
    ///
    /// assert_eq!(request.fields().get("lang").unwrap().value(), "en");
    /// assert_eq!(request.fields().get("name").unwrap().value(), "John Doe");
    /// assert_eq!(request.cookies().get("b").unwrap().value(), "2");
    /// ```
    pub fn from_env(env: &CgiEnv) -> crate::Result<Request> {
        RequestDecoder::new().decode_env(env)
    }

    /// Decodes only a query string.
    pub fn decode_query(query: &[u8]) -> Request {
        let mut request = Request::default();
        decode_query_into(query, &mut request.fields);
        request
    }

    /// Form fields from the query string and the body, in decode order.
    pub fn fields(&self) -> &Entries<FormField> {
        &self.fields
    }

    /// Files uploaded through a `multipart/form-data` body.
    pub fn files(&self) -> &Entries<UploadedFile> {
        &self.files
    }

    pub fn cookies(&self) -> &Entries<Cookie> {
        &self.cookies
    }

    /// The reason the body was skipped, if it was. Only
    /// [`Error::UnsupportedContentType`](crate::Error::UnsupportedContentType)
    /// ends up here; the query string and cookies are still decoded.
    pub fn body_error(&self) -> Option<&crate::Error> {
        self.body_error.as_ref()
    }

    pub fn into_parts(self) -> (Entries<FormField>, Entries<UploadedFile>, Entries<Cookie>) {
        (self.fields, self.files, self.cookies)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    UrlEncoded,
    Multipart,
    Unsupported,
}

impl BodyKind {
    fn of(content_type: &str) -> BodyKind {
        let essence = helpers::media_type_essence(content_type);

        if essence.eq_ignore_ascii_case(constants::APPLICATION_WWW_FORM_URLENCODED) {
            BodyKind::UrlEncoded
        } else if essence.eq_ignore_ascii_case(constants::MULTIPART_FORM_DATA) {
            BodyKind::Multipart
        } else {
            BodyKind::Unsupported
        }
    }
}

/// Decodes requests under a set of [`Constraints`].
///
/// Each decode call is independent of every other; a single decoder can be
/// shared between threads.
#[derive(Debug, Clone, Default)]
pub struct RequestDecoder {
    constraints: Constraints,
}

impl RequestDecoder {
    pub fn new() -> RequestDecoder {
        RequestDecoder::default()
    }

    pub fn with_constraints(constraints: Constraints) -> RequestDecoder {
        RequestDecoder { constraints }
    }

    /// Decodes the query string, the body and the cookies of a CGI
    /// environment.
    pub fn decode_env(&self, env: &CgiEnv) -> crate::Result<Request> {
        let body = Some(env.post_body().clone()).filter(|body| !body.is_empty());

        let mut request = self.decode(env.query_string().as_bytes(), env.content_type(), body)?;
        request.cookies = parse_cookies(env.cookie_header());

        Ok(request)
    }

    /// Decodes a query string and an optional body.
    ///
    /// The query string is always decoded. A non-empty body is then decoded
    /// according to `content_type`, which defaults to
    /// `application/x-www-form-urlencoded`:
    ///
    /// * urlencoded bodies add their pairs to the same field collection,
    /// * `multipart/form-data` bodies add fields and files,
    /// * any other type leaves the body alone and is reported through
    ///   [`Request::body_error`].
    ///
    /// Malformed multipart input and constraint violations fail the whole
    /// call.
    pub fn decode(&self, query: &[u8], content_type: Option<&str>, body: Option<Bytes>) -> crate::Result<Request> {
        let mut request = Request::decode_query(query);

        let body = match body {
            Some(body) if !body.is_empty() => body,
            _ => return Ok(request),
        };

        let content_type = content_type.unwrap_or(constants::APPLICATION_WWW_FORM_URLENCODED);

        match self.decode_body(content_type, body, &mut request.fields, &mut request.files) {
            Ok(()) => Ok(request),
            Err(err) if !err.is_fatal() => {
                log_warn!("skipping request body: {}", err);
                request.body_error = Some(err);
                Ok(request)
            }
            Err(err) => Err(err),
        }
    }

    /// Decodes a POST body into `fields` and `files`.
    ///
    /// Unlike [`decode`](RequestDecoder::decode), an unsupported content type
    /// is returned as an error.
    pub fn decode_body(
        &self,
        content_type: &str,
        body: Bytes,
        fields: &mut Entries<FormField>,
        files: &mut Entries<UploadedFile>,
    ) -> crate::Result<()> {
        self.constraints.check_body(body.len())?;

        match BodyKind::of(content_type) {
            BodyKind::UrlEncoded => {
                log_debug!("decoding {} byte urlencoded body", body.len());

                let mut decoded = Entries::new();
                decode_query_into(&body, &mut decoded);
                for field in decoded {
                    self.constraints.check_field(field.name(), field.len())?;
                    fields.insert(field);
                }
                Ok(())
            }
            BodyKind::Multipart => {
                let boundary = crate::parse_boundary(content_type)?;
                log_debug!("decoding {} byte multipart body, boundary {:?}", body.len(), boundary);

                multipart::decode_multipart_into(body, &boundary, &self.constraints, fields, files)
            }
            BodyKind::Unsupported => Err(crate::Error::UnsupportedContentType {
                content_type: content_type.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_kind() {
        assert_eq!(BodyKind::of("application/x-www-form-urlencoded"), BodyKind::UrlEncoded);
        assert_eq!(
            BodyKind::of("Application/X-WWW-Form-URLEncoded; charset=UTF-8"),
            BodyKind::UrlEncoded
        );
        assert_eq!(BodyKind::of("multipart/form-data; boundary=X"), BodyKind::Multipart);
        assert_eq!(BodyKind::of("MULTIPART/FORM-DATA;boundary=X"), BodyKind::Multipart);
        assert_eq!(BodyKind::of("text/xml"), BodyKind::Unsupported);
        assert_eq!(BodyKind::of(""), BodyKind::Unsupported);
    }

    #[test]
    fn test_decode_query_and_urlencoded_body() {
        let request = RequestDecoder::new()
            .decode(b"a=1", None, Some(Bytes::from_static(b"b=2&a=3")))
            .unwrap();

        let pairs: Vec<_> = request.fields().iter().map(|f| (f.name(), f.value())).collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2"), ("a", "3")]);
        assert!(request.files().is_empty());
        assert!(request.body_error().is_none());
    }

    #[test]
    fn test_decode_skips_empty_body() {
        let request = RequestDecoder::new()
            .decode(b"a=1", Some("text/xml"), Some(Bytes::new()))
            .unwrap();
        assert_eq!(request.fields().len(), 1);
        assert!(request.body_error().is_none());
    }

    #[test]
    fn test_decode_unsupported_content_type_keeps_query() {
        let request = RequestDecoder::new()
            .decode(b"a=1", Some("application/json"), Some(Bytes::from_static(b"{\"b\":2}")))
            .unwrap();

        assert_eq!(request.fields().len(), 1);
        assert_eq!(request.fields().get("a").unwrap().value(), "1");
        assert_eq!(
            request.body_error(),
            Some(&crate::Error::UnsupportedContentType {
                content_type: "application/json".to_owned()
            })
        );
    }

    #[test]
    fn test_decode_body_reports_unsupported_content_type() {
        let mut fields = Entries::new();
        let mut files = Entries::new();
        let res = RequestDecoder::new().decode_body("text/csv", Bytes::from_static(b"a,b"), &mut fields, &mut files);
        assert!(matches!(res, Err(crate::Error::UnsupportedContentType { .. })));
    }

    #[test]
    fn test_decode_multipart_without_boundary() {
        let res = RequestDecoder::new().decode(
            b"",
            Some("multipart/form-data"),
            Some(Bytes::from_static(b"--X\r\n\r\n")),
        );
        assert_eq!(
            res.unwrap_err(),
            crate::Error::MalformedContentType {
                content_type: "multipart/form-data".to_owned()
            }
        );
    }

    #[test]
    fn test_decode_body_constraints() {
        let decoder = RequestDecoder::with_constraints(
            Constraints::new().size_limit(crate::SizeLimit::new().whole_body(4)),
        );
        let res = decoder.decode(b"q=ignored+by+limits", None, Some(Bytes::from_static(b"a=12345")));
        assert_eq!(res.unwrap_err(), crate::Error::BodySizeExceeded { limit: 4 });

        let decoder = RequestDecoder::with_constraints(Constraints::new().allowed_fields(vec!["a"]));
        let request = decoder
            .decode(b"other=1", None, Some(Bytes::from_static(b"a=1")))
            .unwrap();
        assert_eq!(request.fields().len(), 2);

        let res = decoder.decode(b"", None, Some(Bytes::from_static(b"a=1&b=2")));
        assert_eq!(
            res.unwrap_err(),
            crate::Error::UnknownField {
                field_name: Some("b".to_owned())
            }
        );
    }

    #[test]
    fn test_decode_env_parses_cookies() {
        let env = CgiEnv::new().var("HTTP_COOKIE", "a=1; b=2;c=3");
        let request = RequestDecoder::new().decode_env(&env).unwrap();

        assert_eq!(request.cookies().len(), 3);
        assert!(request.fields().is_empty());

        let (fields, files, cookies) = request.into_parts();
        assert!(fields.is_empty() && files.is_empty());
        assert_eq!(cookies.get("c").unwrap().value(), "3");
    }
}
