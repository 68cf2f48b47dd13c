use crate::constants;
use crate::helpers;
use crate::percent;

/// The headers of one `multipart/form-data` part that matter for sorting it
/// into a field or a file.
///
/// Extraction is a lenient substring search: absent headers and parameters
/// produce empty values, never errors. Only the file name keeps track of
/// whether its parameter was present at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct MultipartHeader {
    pub(crate) disposition: String,
    pub(crate) field_name: String,
    pub(crate) file_name: Option<String>,
    pub(crate) content_type: String,
}

impl MultipartHeader {
    /// Parses a part's header block, i.e. the bytes before the blank line.
    pub fn parse(block: &[u8]) -> MultipartHeader {
        let disposition_line = header_value(block, constants::CONTENT_DISPOSITION_PREFIX);

        let disposition = disposition_line
            .map(|line| line.split(|b| *b == b';').next().unwrap_or_default())
            .map(|kind| text(helpers::trim_ascii(kind)))
            .unwrap_or_default();

        let field_name = disposition_line
            .and_then(|line| param_value(line, constants::NAME_PARAM))
            .map(text)
            .unwrap_or_default();

        let file_name = disposition_line
            .and_then(|line| param_value(line, constants::FILE_NAME_PARAM))
            .map(|raw| text(&percent::decode(raw)));

        let content_type = header_value(block, constants::CONTENT_TYPE_PREFIX)
            .map(|value| text(helpers::trim_ascii(value)))
            .unwrap_or_default();

        MultipartHeader {
            disposition,
            field_name,
            file_name,
            content_type,
        }
    }
}

/// Returns the rest of the line following a `prefix` header name.
fn header_value<'a>(block: &'a [u8], prefix: &str) -> Option<&'a [u8]> {
    let start = helpers::find_ignore_ascii_case(block, prefix.as_bytes())? + prefix.len();
    let rest = &block[start..];
    let end = helpers::find_from(rest, constants::CRLF.as_bytes(), 0).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Returns the quoted value of a `key="` parameter. The key must start a
/// parameter, so looking up `name="` doesn't match inside `filename="`.
fn param_value<'a>(line: &'a [u8], key: &str) -> Option<&'a [u8]> {
    let key = key.as_bytes();
    let mut from = 0;

    while let Some(idx) = helpers::find_from(line, key, from) {
        let starts_param = idx == 0 || matches!(line[idx - 1], b';' | b' ' | b'\t');
        if starts_param {
            return helpers::extract_between(&line[idx..], key, b"\"");
        }
        from = idx + 1;
    }

    None
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
