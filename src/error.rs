use std::fmt::{self, Debug, Display, Formatter};

use derive_more::Display;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while decoding a request and while looking
/// up the decoded values.
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// The `Content-Type` claims `multipart/form-data` but carries no usable
    /// boundary token.
    #[display(fmt = "malformed multipart Content-Type, no boundary found: {:?}", content_type)]
    MalformedContentType { content_type: String },

    /// A multipart part has no blank line separating its headers from its
    /// payload.
    #[display(fmt = "malformed multipart part #{}: end-of-header marker not found", index)]
    MalformedPart { index: usize },

    /// The request body has a `Content-Type` that can't be decoded into form
    /// fields.
    #[display(fmt = "unsupported Content-Type: {:?}", content_type)]
    UnsupportedContentType { content_type: String },

    /// No value was submitted under the requested name.
    #[display(fmt = "entry '{}' not found", name)]
    NotFound { name: String },

    /// A single value was requested but several were submitted under the
    /// name.
    #[display(fmt = "entry '{}' is a list of {} values", name, count)]
    IsList { name: String, count: usize },

    /// An unknown field is detected when
    /// [`allowed_fields`](crate::Constraints::allowed_fields) are configured.
    #[display(fmt = "unknown field received: {}", "field_name.as_deref().unwrap_or(\"<unknown>\")")]
    UnknownField { field_name: Option<String> },

    /// A field or file payload exceeded its size limit.
    #[display(
        fmt = "field '{}' exceeded the maximum size limit: {} bytes",
        "field_name.as_deref().unwrap_or(\"<unknown>\")",
        limit
    )]
    FieldSizeExceeded { limit: u64, field_name: Option<String> },

    /// The request body exceeded the maximum size limit.
    #[display(fmt = "request body exceeded the maximum size limit: {} bytes", limit)]
    BodySizeExceeded { limit: u64 },

    /// Reading the request body from its source failed.
    #[display(fmt = "failed to read request body: {}", _0)]
    ReadBodyFailed(BoxError),

    /// Failed to decode a field value as `JSON` in
    /// [`field.json()`](crate::FormField::json) method.
    #[cfg(feature = "json")]
    #[display(fmt = "failed to decode field value as JSON: {}", _0)]
    DecodeJson(serde_json::Error),
}

impl Error {
    /// Returns `true` if the error aborts the whole decode call rather than
    /// just skipping the request body or describing a failed lookup.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::UnsupportedContentType { .. } | Error::NotFound { .. } | Error::IsList { .. }
        )
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ReadBodyFailed(err.into())
    }
}
