use std::collections::HashMap;
use std::convert::TryFrom;
use std::io::{self, Read};

use bytes::Bytes;
use http::header;
#[cfg(feature = "tokio-io")]
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::constants;

/// The CGI environment of one request: environment-style variables such as
/// `QUERY_STRING`, `CONTENT_TYPE` and `HTTP_COOKIE`, plus the POST body.
///
/// # Examples
///
/// ```
/// use cgi_form::CgiEnv;
///
/// let env = CgiEnv::new()
///     .var("QUERY_STRING", "page=2")
///     .var("HTTP_COOKIE", "session=abc")
///     .var("CONTENT_TYPE", "application/x-www-form-urlencoded")
///     .body("name=John+Doe");
///
/// assert_eq!(env.query_string(), "page=2");
/// assert_eq!(env.cookie_header(), "session=abc");
/// assert_eq!(env.post_body().len(), 13);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CgiEnv {
    vars: HashMap<String, String>,
    body: Bytes,
}

impl CgiEnv {
    pub fn new() -> CgiEnv {
        CgiEnv::default()
    }

    /// Creates an environment from variables and a body, e.g. as handed over
    /// by a FastCGI session.
    pub fn from_parts<I, K, V>(vars: I, body: Bytes) -> CgiEnv
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        CgiEnv {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            body,
        }
    }

    /// Reads the environment of the running CGI process: its environment
    /// variables, and `CONTENT_LENGTH` bytes of standard input as the body.
    pub fn from_process() -> crate::Result<CgiEnv> {
        let stdin = std::io::stdin();
        CgiEnv::from_reader(std::env::vars(), stdin.lock())
    }

    /// Creates an environment from variables, reading the body from `reader`.
    ///
    /// When `CONTENT_LENGTH` is set, exactly that many bytes are read and a
    /// shorter input is an error; otherwise the reader is drained.
    pub fn from_reader<I, K, V, R>(vars: I, mut reader: R) -> crate::Result<CgiEnv>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
        R: Read,
    {
        let mut env = CgiEnv::from_parts(vars, Bytes::new());

        let mut body = Vec::new();
        match env.content_length() {
            Some(len) => {
                reader.by_ref().take(len as u64).read_to_end(&mut body)?;
                ensure_full_body(body.len(), len)?;
            }
            None => {
                reader.read_to_end(&mut body)?;
            }
        }

        env.body = Bytes::from(body);
        Ok(env)
    }

    /// Creates an environment from variables, reading the body from an
    /// [`AsyncRead`](https://docs.rs/tokio/1/tokio/io/trait.AsyncRead.html) reader.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    #[cfg(feature = "tokio-io")]
    pub async fn from_async_read<I, K, V, R>(vars: I, mut reader: R) -> crate::Result<CgiEnv>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
        R: AsyncRead + Unpin,
    {
        let mut env = CgiEnv::from_parts(vars, Bytes::new());

        let mut body = Vec::new();
        match env.content_length() {
            Some(len) => {
                (&mut reader).take(len as u64).read_to_end(&mut body).await?;
                ensure_full_body(body.len(), len)?;
            }
            None => {
                reader.read_to_end(&mut body).await?;
            }
        }

        env.body = Bytes::from(body);
        Ok(env)
    }

    /// Maps an [`http::Request`] onto CGI variables: the URI query becomes
    /// `QUERY_STRING`, and the `Content-Type` and `Cookie` headers become
    /// `CONTENT_TYPE` and `HTTP_COOKIE`. Multiple `Cookie` headers are joined
    /// with `; `.
    pub fn from_http_request(req: &http::Request<Bytes>) -> CgiEnv {
        let mut env = CgiEnv::new().body(req.body().clone());

        if let Some(query) = req.uri().query() {
            env = env.var(constants::QUERY_STRING, query);
        }

        if let Some(content_type) = req.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            env = env.var(constants::CONTENT_TYPE, content_type);
        }

        let cookies: Vec<&str> = req
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if !cookies.is_empty() {
            env = env.var(constants::HTTP_COOKIE, cookies.join("; "));
        }

        if req.uri().scheme() == Some(&http::uri::Scheme::HTTPS) {
            env = env.var(constants::HTTPS, "on");
        }

        env.var(constants::CONTENT_LENGTH, req.body().len().to_string())
    }

    /// Sets a variable.
    pub fn var<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> CgiEnv {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Sets the POST body.
    pub fn body<B: Into<Bytes>>(mut self, body: B) -> CgiEnv {
        self.body = body.into();
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn query_string(&self) -> &str {
        self.get(constants::QUERY_STRING).unwrap_or_default()
    }

    /// The `CONTENT_TYPE` variable, or `None` when it's unset or empty.
    pub fn content_type(&self) -> Option<&str> {
        self.get(constants::CONTENT_TYPE).filter(|ct| !ct.trim().is_empty())
    }

    /// The `CONTENT_LENGTH` variable, if it's a valid length.
    pub fn content_length(&self) -> Option<usize> {
        self.get(constants::CONTENT_LENGTH)
            .and_then(|len| len.trim().parse::<u64>().ok())
            .and_then(|len| usize::try_from(len).ok())
    }

    pub fn cookie_header(&self) -> &str {
        self.get(constants::HTTP_COOKIE).unwrap_or_default()
    }

    /// Returns `true` if the request came in over TLS, i.e. `HTTPS` is `on`
    /// or `1`.
    pub fn is_https(&self) -> bool {
        self.get(constants::HTTPS)
            .map(|v| v.eq_ignore_ascii_case("on") || v == "1")
            .unwrap_or(false)
    }

    /// The POST body. Cloning the returned handle doesn't copy the bytes.
    pub fn post_body(&self) -> &Bytes {
        &self.body
    }
}

// The body grows as bytes arrive, so a bogus `CONTENT_LENGTH` can't force a
// huge allocation up front.
fn ensure_full_body(read: usize, expected: usize) -> io::Result<()> {
    if read < expected {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("request body ended after {} of {} bytes", read, expected),
        ));
    }
    Ok(())
}
