use crate::entries::Named;
#[cfg(feature = "json")]
use serde::de::DeserializeOwned;

/// A single decoded form value, such as a text input, a checked checkbox or a
/// selected option.
///
/// If a query string contained the fragment `cgi=yes`, the corresponding
/// field has the name `cgi` and the value `yes`.
///
/// Besides the raw value, two line-break-normalized renditions are computed
/// once at construction:
///
/// * [`value_normalized`](FormField::value_normalized): every run of `\r`/`\n`
///   characters is replaced by as many `\n` as the larger of its `\r` and `\n`
///   counts, so `\r\n`, `\n` and `\r` all become a single `\n`.
/// * [`value_stripped`](FormField::value_stripped): the normalized value with
///   all line breaks removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    name: String,
    value: String,
    value_normalized: String,
    value_stripped: String,
}

impl FormField {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> FormField {
        let value = value.into();
        let value_normalized = collapse_line_breaks(&value, true);
        let value_stripped = collapse_line_breaks(&value_normalized, false);

        FormField {
            name: name.into(),
            value,
            value_normalized,
            value_stripped,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value exactly as decoded. It may contain line breaks.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn value_normalized(&self) -> &str {
        &self.value_normalized
    }

    pub fn value_stripped(&self) -> &str {
        &self.value_stripped
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Deserializes the raw value as JSON.
    ///
    /// # Optional
    ///
    /// This requires the optional `json` feature to be enabled.
    #[cfg(feature = "json")]
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        serde_json::from_str(&self.value).map_err(crate::Error::DecodeJson)
    }
}

impl Named for FormField {
    fn name(&self) -> &str {
        &self.name
    }
}

fn collapse_line_breaks(src: &str, keep_newlines: bool) -> String {
    let mut dst = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\r' && ch != '\n' {
            dst.push(ch);
            continue;
        }

        let (mut cr_count, mut lf_count) = (0usize, 0usize);
        let mut brk = ch;
        loop {
            if brk == '\r' {
                cr_count += 1;
            } else {
                lf_count += 1;
            }
            match chars.peek() {
                Some(&c) if c == '\r' || c == '\n' => {
                    brk = c;
                    chars.next();
                }
                _ => break,
            }
        }

        if keep_newlines {
            dst.extend(std::iter::repeat('\n').take(cr_count.max(lf_count)));
        }
    }

    dst
}
