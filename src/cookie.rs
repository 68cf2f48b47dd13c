use crate::entries::{Entries, Named};

/// An HTTP cookie.
///
/// Cookies decoded from a request carry only a name and a value, plus the
/// value exactly as it was received (see [`raw_value`](Cookie::raw_value)).
/// The remaining attributes are only set on cookies built for a response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cookie {
    name: String,
    value: String,
    raw_value: Option<String>,
    comment: Option<String>,
    domain: Option<String>,
    path: Option<String>,
    max_age: Option<u64>,
    secure: bool,
    http_only: bool,
    removed: bool,
}

impl Cookie {
    /// Builds an outgoing cookie.
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Cookie {
        Cookie {
            name: name.into(),
            value: value.into(),
            ..Cookie::default()
        }
    }

    /// Builds an outgoing cookie that tells the client to delete `name`.
    pub fn removal<N: Into<String>>(name: N) -> Cookie {
        Cookie {
            name: name.into(),
            max_age: Some(0),
            removed: true,
            ..Cookie::default()
        }
    }

    fn received(name: &str, value: &str) -> Cookie {
        Cookie {
            name: name.to_owned(),
            value: value.to_owned(),
            raw_value: Some(value.to_owned()),
            ..Cookie::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value as sent by the client. `None` for cookies built with
    /// [`Cookie::new`].
    pub fn raw_value(&self) -> Option<&str> {
        self.raw_value.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn max_age(&self) -> Option<u64> {
        self.max_age
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn with_comment<C: Into<String>>(mut self, comment: C) -> Cookie {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_domain<D: Into<String>>(mut self, domain: D) -> Cookie {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_path<P: Into<String>>(mut self, path: P) -> Cookie {
        self.path = Some(path.into());
        self
    }

    /// Sets the lifetime in seconds.
    pub fn with_max_age(mut self, seconds: u64) -> Cookie {
        self.max_age = Some(seconds);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Cookie {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Cookie {
        self.http_only = http_only;
        self
    }
}

impl Named for Cookie {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Parses the value of a `Cookie` request header, i.e. `HTTP_COOKIE`.
///
/// The header is split on `;`. Leading whitespace of each segment is skipped
/// and the segment is split on its first `=`; segments without `=` are
/// dropped. Values are kept as received, without percent-decoding.
///
/// # Examples
///
/// ```
/// let cookies = cgi_form::parse_cookies("a=1; b=2;c=3");
///
/// assert_eq!(cookies.len(), 3);
/// assert_eq!(cookies.get("c").unwrap().value(), "3");
/// ```
pub fn parse_cookies(header: &str) -> Entries<Cookie> {
    let mut cookies = Entries::new();

    for segment in header.split(';') {
        let segment = segment.trim_start();

        let (name, value) = match segment.find('=') {
            Some(pos) => (&segment[..pos], &segment[pos + 1..]),
            None => continue,
        };

        cookies.insert(Cookie::received(name, value));
    }

    cookies
}
