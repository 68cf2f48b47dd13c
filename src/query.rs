use memchr::memchr;

use crate::entries::Entries;
use crate::field::FormField;
use crate::helpers::log_warn;
use crate::percent;

/// Decodes an `application/x-www-form-urlencoded` byte sequence (a query
/// string or a POST body) into `fields`, in encounter order.
///
/// Each `name=value` pair is split on its first `=` and runs to the next
/// `&`. Both halves are percent-decoded and widened to text, replacing
/// invalid UTF-8. Decoding stops at the first fragment that has no `=`, so a
/// trailing key-only fragment contributes nothing.
///
/// # Examples
///
/// ```
/// use cgi_form::{decode_query_into, Entries};
///
/// let mut fields = Entries::new();
/// decode_query_into(b"name=John+Doe&age=30", &mut fields);
///
/// assert_eq!(fields.get("name").unwrap().value(), "John Doe");
/// assert_eq!(fields.get("age").unwrap().value(), "30");
/// ```
pub fn decode_query_into(input: &[u8], fields: &mut Entries<FormField>) {
    let mut rest = input;

    while !rest.is_empty() {
        let eq = match memchr(b'=', rest) {
            Some(eq) => eq,
            None => {
                log_warn!("dropping query fragment without '=': {} bytes", rest.len());
                break;
            }
        };

        let name = decode_text(&rest[..eq]);
        rest = &rest[eq + 1..];

        let amp = memchr(b'&', rest);
        let value = decode_text(&rest[..amp.unwrap_or(rest.len())]);

        fields.insert(FormField::new(name, value));

        match amp {
            Some(amp) => rest = &rest[amp + 1..],
            None => break,
        }
    }
}

/// Decodes an `application/x-www-form-urlencoded` byte sequence into a new
/// field collection. See [`decode_query_into`].
pub fn decode_query(input: &[u8]) -> Entries<FormField> {
    let mut fields = Entries::new();
    decode_query_into(input, &mut fields);
    fields
}

fn decode_text(segment: &[u8]) -> String {
    String::from_utf8_lossy(&percent::decode(segment)).into_owned()
}
