use crate::constants;
use crate::size_limit::SizeLimit;

/// Represents some rules to be applied while decoding a request body.
///
/// The query string and the cookies are always decoded unrestricted; the
/// constraints only govern the POST body.
///
/// # Examples
///
/// ```
/// use cgi_form::{Constraints, RequestDecoder, SizeLimit};
///
/// let constraints = Constraints::new()
///     .allowed_fields(vec!["name", "avatar"])
///     .size_limit(SizeLimit::new().whole_body(1024 * 1024).per_field(64).for_field("avatar", 512 * 1024));
///
/// let decoder = RequestDecoder::with_constraints(constraints);
/// # drop(decoder);
/// ```
#[derive(Debug, Clone)]
pub struct Constraints {
    pub(crate) size_limit: SizeLimit,
    pub(crate) allowed_fields: Option<Vec<String>>,
    pub(crate) default_charset: String,
}

impl Constraints {
    /// Creates a set of rules with default behaviour.
    pub fn new() -> Constraints {
        Constraints::default()
    }

    /// Applies rules on size limits.
    pub fn size_limit(self, size_limit: SizeLimit) -> Constraints {
        Constraints {
            size_limit,
            allowed_fields: self.allowed_fields,
            default_charset: self.default_charset,
        }
    }

    /// Specify which fields are allowed in the body. Any other field causes
    /// [`Error::UnknownField`](crate::Error::UnknownField).
    pub fn allowed_fields<N: Into<String>>(self, allowed_fields: Vec<N>) -> Constraints {
        let allowed_fields = allowed_fields.into_iter().map(|item| item.into()).collect();

        Constraints {
            size_limit: self.size_limit,
            allowed_fields: Some(allowed_fields),
            default_charset: self.default_charset,
        }
    }

    /// Sets the charset used to turn multipart text parts into strings when
    /// the part doesn't name one. Unknown labels fall back to UTF-8.
    pub fn default_charset<C: Into<String>>(self, label: C) -> Constraints {
        Constraints {
            size_limit: self.size_limit,
            allowed_fields: self.allowed_fields,
            default_charset: label.into(),
        }
    }

    pub(crate) fn is_it_allowed(&self, field: &str) -> bool {
        match self.allowed_fields {
            Some(ref allowed_fields) => allowed_fields.iter().any(|item| item == field),
            None => true,
        }
    }

    /// Checks a body field's name and payload size against the rules.
    pub(crate) fn check_field(&self, field: &str, size: usize) -> crate::Result<()> {
        if !self.is_it_allowed(field) {
            return Err(crate::Error::UnknownField {
                field_name: Some(field.to_owned()),
            });
        }

        let limit = self.size_limit.extract_size_limit_for(field);
        if size as u64 > limit {
            return Err(crate::Error::FieldSizeExceeded {
                limit,
                field_name: Some(field.to_owned()),
            });
        }

        Ok(())
    }

    pub(crate) fn check_body(&self, size: usize) -> crate::Result<()> {
        let limit = self.size_limit.whole_body;
        if size as u64 > limit {
            return Err(crate::Error::BodySizeExceeded { limit });
        }
        Ok(())
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            size_limit: SizeLimit::default(),
            allowed_fields: None,
            default_charset: constants::DEFAULT_CHARSET.to_owned(),
        }
    }
}
