use std::borrow::Cow;
use std::io;

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};

use crate::constants;
use crate::entries::Named;

/// A file uploaded through a `multipart/form-data` form.
///
/// The payload is a [`Bytes`] handle: cloning the file, or the handle returned
/// by [`data`](UploadedFile::data), shares the same buffer instead of copying
/// it, so the payload outlives the decoded request for as long as any holder
/// keeps it. Nothing is written to disk; use
/// [`write_to`](UploadedFile::write_to) to persist it.
///
/// ```html
/// <form method="post" action="/cgi-bin/upload.cgi" enctype="multipart/form-data">
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    file_name: String,
    content_type: String,
    data: Bytes,
}

impl UploadedFile {
    /// Creates a file record. An empty `content_type` defaults to
    /// `text/plain`.
    pub fn new<N, F, C>(name: N, file_name: F, content_type: C, data: Bytes) -> UploadedFile
    where
        N: Into<String>,
        F: Into<String>,
        C: Into<String>,
    {
        let mut content_type = content_type.into();
        if content_type.is_empty() {
            content_type = constants::DEFAULT_FILE_CONTENT_TYPE.to_owned();
        }

        UploadedFile {
            name: name.into(),
            file_name: file_name.into(),
            content_type,
            data,
        }
    }

    /// The name of the form input the file was submitted through.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file name on the client machine. It may be empty.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The content type parsed as a [`mime::Mime`], or `None` if the client
    /// sent something unparsable.
    pub fn mime(&self) -> Option<mime::Mime> {
        self.content_type.parse().ok()
    }

    /// A shared handle to the payload.
    pub fn data(&self) -> Bytes {
        self.data.clone()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Writes the payload to `out`, e.g. to save the upload to disk.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(&self.data)
    }

    /// Decodes the payload as text using the `charset` parameter of the
    /// content type, falling back to UTF-8. Malformed sequences are replaced.
    pub fn text(&self) -> String {
        let encoding = self
            .mime()
            .and_then(|m| m.get_param(mime::CHARSET).map(|charset| charset.as_str().to_owned()))
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);

        let (text, _, _) = encoding.decode(&self.data);

        match text {
            Cow::Owned(s) => s,
            Cow::Borrowed(s) => String::from(s),
        }
    }
}

impl Named for UploadedFile {
    fn name(&self) -> &str {
        &self.name
    }
}
