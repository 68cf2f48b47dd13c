use memchr::memmem;

macro_rules! log_debug {
    ($($arg:tt)+) => {{
        #[cfg(feature = "log")]
        {
            ::log::debug!($($arg)+);
        }
        #[cfg(not(feature = "log"))]
        {
            if false {
                let _ = ::std::format!($($arg)+);
            }
        }
    }};
}

macro_rules! log_warn {
    ($($arg:tt)+) => {{
        #[cfg(feature = "log")]
        {
            ::log::warn!($($arg)+);
        }
        #[cfg(not(feature = "log"))]
        {
            if false {
                let _ = ::std::format!($($arg)+);
            }
        }
    }};
}

pub(crate) use log_debug;
pub(crate) use log_warn;

/// Finds the first occurrence of `needle` in `haystack` at or after `from`,
/// returning its absolute position.
pub(crate) fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    memmem::find(&haystack[from..], needle).map(|idx| idx + from)
}

/// Finds the first occurrence of `needle` in `haystack`, comparing ASCII
/// letters case-insensitively.
pub(crate) fn find_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Returns the bytes after `start` up to the next `end`, or up to the end of
/// `haystack` when `end` never occurs. `None` means `start` is absent.
pub(crate) fn extract_between<'a>(haystack: &'a [u8], start: &[u8], end: &[u8]) -> Option<&'a [u8]> {
    let from = memmem::find(haystack, start)? + start.len();
    let rest = &haystack[from..];
    Some(memmem::find(rest, end).map_or(rest, |idx| &rest[..idx]))
}

/// Strips leading and trailing ASCII whitespace.
pub(crate) fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if first.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = bytes {
        if last.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}

/// Returns the media type essence of a `Content-Type` value: the text before
/// any `;`, trimmed.
pub(crate) fn media_type_essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_from() {
        assert_eq!(find_from(b"a--b--c", b"--", 0), Some(1));
        assert_eq!(find_from(b"a--b--c", b"--", 2), Some(4));
        assert_eq!(find_from(b"a--b--c", b"--", 5), None);
        assert_eq!(find_from(b"abc", b"c", 9), None);
    }

    #[test]
    fn test_find_ignore_ascii_case() {
        assert_eq!(find_ignore_ascii_case(b"x\r\ncontent-type: a", b"Content-Type:"), Some(3));
        assert_eq!(find_ignore_ascii_case(b"abc", b"abcd"), None);
    }

    #[test]
    fn test_extract_between() {
        let data = br#"form-data; name="my field"; filename="a.txt""#;
        assert_eq!(extract_between(data, b"name=\"", b"\""), Some(&b"my field"[..]));
        assert_eq!(extract_between(data, b"size=\"", b"\""), None);
        assert_eq!(extract_between(b"name=\"open", b"name=\"", b"\""), Some(&b"open"[..]));
    }

    #[test]
    fn test_trim_ascii() {
        assert_eq!(trim_ascii(b"  text/plain \r\n"), b"text/plain");
        assert_eq!(trim_ascii(b" \t "), b"");
    }

    #[test]
    fn test_media_type_essence() {
        assert_eq!(media_type_essence("multipart/form-data; boundary=X"), "multipart/form-data");
        assert_eq!(media_type_essence(" text/plain "), "text/plain");
        assert_eq!(media_type_essence(""), "");
    }
}
