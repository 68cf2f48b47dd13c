//! Percent-encoding in its `application/x-www-form-urlencoded` flavor, where
//! a space travels as `+`.
//!
//! Decoding never fails: a `%` that isn't followed by two hex digits is kept
//! as a literal `%`.

use percent_encoding::{percent_decode, percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped by [`encode`]: everything except ASCII alphanumerics and the
/// marks `-_.!~*'()`.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Decodes percent-escaped bytes.
///
/// `+` becomes a space and `%XX` becomes the byte `0xXX`. Every other byte
/// passes through unchanged.
///
/// # Examples
///
/// ```
/// assert_eq!(cgi_form::percent::decode(b"John+Doe%21"), b"John Doe!");
/// assert_eq!(cgi_form::percent::decode(b"100%"), b"100%");
/// ```
pub fn decode(input: &[u8]) -> Vec<u8> {
    let unplussed: Vec<u8> = input
        .iter()
        .map(|&byte| if byte == b'+' { b' ' } else { byte })
        .collect();

    percent_decode(&unplussed).collect()
}

/// Decodes percent-escaped text, replacing byte sequences that aren't valid
/// UTF-8 once decoded.
pub fn decode_str(input: &str) -> String {
    String::from_utf8_lossy(&decode(input.as_bytes())).into_owned()
}

/// Encodes bytes for use in a query string or urlencoded body.
///
/// ASCII alphanumerics and the marks `-_.!~*'()` are kept, a space becomes
/// `+`, and every other byte becomes `%` followed by two uppercase hex digits.
///
/// # Examples
///
/// ```
/// assert_eq!(cgi_form::percent::encode("a b&c=d"), "a+b%26c%3Dd");
/// ```
pub fn encode<T: AsRef<[u8]>>(input: T) -> String {
    let input = input.as_ref();
    let mut out = String::with_capacity(input.len());

    // Each escaped byte comes out as its own `%XX` chunk.
    for chunk in percent_encode(input, FORM_ENCODE_SET) {
        if chunk == "%20" {
            out.push('+');
        } else {
            out.push_str(chunk);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(decode(b"name=John+Doe"), b"name=John Doe");
        assert_eq!(decode(b"%41%62%2b"), b"Ab+");
        assert_eq!(decode(b"%e4%bd%a0%E5%A5%BD"), "你好".as_bytes());
        assert_eq!(decode(b""), b"");
    }

    #[test]
    fn test_decode_malformed_escapes() {
        assert_eq!(decode(b"100%"), b"100%");
        assert_eq!(decode(b"%4"), b"%4");
        assert_eq!(decode(b"%zz1"), b"%zz1");
        assert_eq!(decode(b"%%41"), b"%A");
        assert_eq!(decode(b"a%4g"), b"a%4g");
        assert_eq!(decode(b"%2B+%20"), b"+  ");
    }

    #[test]
    fn test_decode_is_idempotent_without_escapes() {
        let plain = b"plain text, with: punctuation! (and) ~marks~";
        assert_eq!(decode(plain), plain.to_vec());
        assert_eq!(decode(&decode(plain)), plain.to_vec());
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("John Doe"), "John+Doe");
        assert_eq!(encode("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode("a/b?c"), "a%2Fb%3Fc");
        assert_eq!(encode("100% +"), "100%25+%2B");
        assert_eq!(encode("é"), "%C3%A9");
        assert_eq!(encode([0x00u8, 0x7F, 0xFF]), "%00%7F%FF");
    }

    #[test]
    fn test_encode_escapes_every_reserved_byte() {
        assert_eq!(encode("a&b&c"), "a%26b%26c");
        assert_eq!(encode("x=1;y=2"), "x%3D1%3By%3D2");
    }

    #[test]
    fn test_decode_inverts_encode_over_printable_ascii() {
        let printable: String = (0x20u8..0x7F).map(|b| b as char).collect();
        assert_eq!(decode(encode(&printable).as_bytes()), printable.as_bytes());

        for byte in 0x20u8..0x7F {
            let s = (byte as char).to_string();
            assert_eq!(decode_str(&encode(&s)), s);
        }
    }
}
