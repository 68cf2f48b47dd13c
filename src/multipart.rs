use std::borrow::Cow;

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};

use crate::buffer::BodyBuffer;
use crate::constants;
use crate::constraints::Constraints;
use crate::content_disposition::MultipartHeader;
use crate::entries::Entries;
use crate::field::FormField;
use crate::file::UploadedFile;
use crate::helpers::{self, log_debug, log_warn};
use crate::state::ScanningStage;

/// Represents the parts of a fully buffered `multipart/form-data` body.
///
/// This splits the body into [`Part`]s via its [`Iterator`] implementation.
/// Parts are delimited by `--<boundary>\r\n` and the body is closed by
/// `--<boundary>--` followed by CRLF or the end of the body. Scanning is
/// lenient about the framing: bytes before the first delimiter are ignored,
/// and a body that ends without the closing delimiter still yields its last
/// part. A part without a blank line after its headers, on the other hand,
/// is an error that ends the iteration.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use cgi_form::Multipart;
///
/// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
/// let multipart = Multipart::new(Bytes::from(data), "X-BOUNDARY");
///
/// for part in multipart {
///     let part = part.unwrap();
///     assert_eq!(part.name(), "my_text_field");
///     assert_eq!(part.text(), "abcd");
/// }
/// ```
#[derive(Debug)]
pub struct Multipart {
    buffer: BodyBuffer,
    delimiter: Vec<u8>,
    close_delimiter: Vec<u8>,
    stage: ScanningStage,
    next_part_idx: usize,
}

impl Multipart {
    /// Construct a new `Multipart` instance with the given body and the boundary.
    pub fn new<B: Into<String>>(body: Bytes, boundary: B) -> Multipart {
        let boundary = boundary.into();
        let delimiter = format!("{}{}{}", constants::BOUNDARY_EXT, boundary, constants::CRLF);
        let close_delimiter = format!("{}{}{}", constants::BOUNDARY_EXT, boundary, constants::BOUNDARY_EXT);

        Multipart {
            buffer: BodyBuffer::new(body),
            delimiter: delimiter.into_bytes(),
            close_delimiter: close_delimiter.into_bytes(),
            stage: ScanningStage::FindingFirstBoundary,
            next_part_idx: 0,
        }
    }

    fn next_part_bytes(&mut self) -> Option<Bytes> {
        if self.stage == ScanningStage::FindingFirstBoundary {
            if !self.buffer.skip_past(&self.delimiter) {
                log_warn!("multipart body has no opening boundary, no parts decoded");
                self.stage = ScanningStage::Eof;
                return None;
            }
            self.stage = ScanningStage::ReadingParts;
        }

        if self.stage != ScanningStage::ReadingParts {
            return None;
        }

        if let Some(bytes) = self.buffer.read_until(&self.delimiter) {
            return Some(bytes);
        }

        self.stage = ScanningStage::Eof;

        if let Some(bytes) = self.buffer.read_until_closing(&self.close_delimiter, constants::CRLF.as_bytes()) {
            return Some(bytes);
        }

        if self.buffer.remaining() == 0 {
            return None;
        }

        let rest = self.buffer.read_to_end();

        log_warn!("multipart body is missing its closing boundary, keeping the trailing {} bytes as the last part", rest.len());
        Some(rest)
    }
}

impl Iterator for Multipart {
    type Item = crate::Result<Part>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.next_part_bytes()?;

        let idx = self.next_part_idx;
        self.next_part_idx += 1;

        let part = Part::parse(idx, bytes);
        if part.is_err() {
            self.stage = ScanningStage::Eof;
        }

        Some(part)
    }
}

/// One part of a `multipart/form-data` body: a plain form value, or a file
/// when its `Content-Disposition` carries a `filename` parameter.
#[derive(Debug, Clone)]
pub struct Part {
    header: MultipartHeader,
    data: Bytes,
    idx: usize,
}

impl Part {
    fn parse(idx: usize, bytes: Bytes) -> crate::Result<Part> {
        let bytes = strip_trailing_crlf(bytes);

        let header_end = helpers::find_from(&bytes, constants::CRLF_CRLF.as_bytes(), 0)
            .ok_or(crate::Error::MalformedPart { index: idx })?;

        Ok(Part {
            header: MultipartHeader::parse(&bytes[..header_end]),
            data: bytes.slice(header_end + constants::CRLF_CRLF.len()..),
            idx,
        })
    }

    /// The `name` parameter of the `Content-Disposition` header, or an empty
    /// string when there is none.
    pub fn name(&self) -> &str {
        &self.header.field_name
    }

    /// The `filename` parameter of the `Content-Disposition` header, if
    /// present. `Some("")` means the parameter was sent with an empty value.
    pub fn file_name(&self) -> Option<&str> {
        self.header.file_name.as_deref()
    }

    /// The disposition type, normally `form-data`.
    pub fn disposition(&self) -> &str {
        &self.header.disposition
    }

    /// The `Content-Type` header of the part, or an empty string.
    pub fn content_type(&self) -> &str {
        &self.header.content_type
    }

    /// The part's payload, sharing the request body's buffer.
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// The position of the part in the body, starting at zero.
    pub fn index(&self) -> usize {
        self.idx
    }

    /// Returns `true` if the part is a file upload.
    pub fn is_file(&self) -> bool {
        self.header.file_name.is_some()
    }

    /// Decodes the payload as UTF-8 text unless the part names another
    /// charset.
    pub fn text(&self) -> String {
        self.text_with_charset(constants::DEFAULT_CHARSET)
    }

    /// Decodes the payload as text using the part's `charset` parameter, or
    /// `default_encoding` when it has none. Malformed sequences are replaced.
    pub fn text_with_charset(&self, default_encoding: &str) -> String {
        let mime = self.header.content_type.parse::<mime::Mime>().ok();
        let encoding_name = mime
            .as_ref()
            .and_then(|mime| mime.get_param(mime::CHARSET))
            .map(|charset| charset.as_str())
            .unwrap_or(default_encoding);

        let encoding = Encoding::for_label(encoding_name.as_bytes()).unwrap_or(UTF_8);

        let (text, _, _) = encoding.decode(&self.data);

        match text {
            Cow::Owned(s) => s,
            Cow::Borrowed(s) => String::from(s),
        }
    }
}

/// Decodes a `multipart/form-data` body, storing plain parts in `fields` and
/// file parts in `files`. The first malformed part aborts the decode.
pub(crate) fn decode_multipart_into(
    body: Bytes,
    boundary: &str,
    constraints: &Constraints,
    fields: &mut Entries<FormField>,
    files: &mut Entries<UploadedFile>,
) -> crate::Result<()> {
    for part in Multipart::new(body, boundary) {
        store_part(part?, constraints, fields, files)?;
    }
    Ok(())
}

fn store_part(
    part: Part,
    constraints: &Constraints,
    fields: &mut Entries<FormField>,
    files: &mut Entries<UploadedFile>,
) -> crate::Result<()> {
    constraints.check_field(part.name(), part.data.len())?;

    match part.header.file_name {
        Some(ref file_name) => {
            log_debug!(
                "multipart part #{}: file '{}' ({}, {} bytes) for field '{}'",
                part.idx,
                file_name,
                part.header.content_type,
                part.data.len(),
                part.header.field_name
            );
            files.insert(UploadedFile::new(
                part.header.field_name.as_str(),
                file_name.as_str(),
                part.header.content_type.as_str(),
                part.data.clone(),
            ));
        }
        None => {
            let value = part.text_with_charset(&constraints.default_charset);
            log_debug!(
                "multipart part #{}: field '{}' ({} bytes)",
                part.idx,
                part.header.field_name,
                value.len()
            );
            fields.insert(FormField::new(part.header.field_name, value));
        }
    }

    Ok(())
}

fn strip_trailing_crlf(bytes: Bytes) -> Bytes {
    if bytes.ends_with(constants::CRLF.as_bytes()) {
        bytes.slice(..bytes.len() - constants::CRLF.len())
    } else {
        bytes
    }
}
