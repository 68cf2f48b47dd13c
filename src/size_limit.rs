use crate::constants;
use std::collections::HashMap;

/// Represents size limits on the request body to keep a client from running
/// the decoder out of memory.
///
/// Please refer [`Constraints`](./struct.Constraints.html) for more info.
#[derive(Debug, Clone)]
pub struct SizeLimit {
    pub(crate) whole_body: u64,
    pub(crate) per_field: u64,
    pub(crate) field_map: HashMap<String, u64>,
}

impl SizeLimit {
    /// Creates a default size limit which is [`u64::MAX`](https://doc.rust-lang.org/stable/std/primitive.u64.html#associatedconstant.MAX) for the whole body
    /// and for each field.
    pub fn new() -> SizeLimit {
        SizeLimit::default()
    }

    /// Sets size limit for the whole request body.
    pub fn whole_body(mut self, limit: u64) -> SizeLimit {
        self.whole_body = limit;
        self
    }

    /// Sets size limit for each field and file.
    pub fn per_field(mut self, limit: u64) -> SizeLimit {
        self.per_field = limit;
        self
    }

    /// Sets size limit for a specific field, it overrides the `per_field` value for this field.
    ///
    /// It is useful when you want to set a size limit on a textual field which will be stored in memory
    /// while still accepting large uploads under another name.
    pub fn for_field<N: Into<String>>(mut self, field_name: N, limit: u64) -> SizeLimit {
        self.field_map.insert(field_name.into(), limit);
        self
    }

    pub(crate) fn extract_size_limit_for(&self, field: &str) -> u64 {
        self.field_map.get(field).copied().unwrap_or(self.per_field)
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        SizeLimit {
            whole_body: constants::DEFAULT_WHOLE_BODY_SIZE_LIMIT,
            per_field: constants::DEFAULT_PER_FIELD_SIZE_LIMIT,
            field_map: HashMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_size_limit_for() {
        let limit = SizeLimit::new().per_field(30).for_field("a", 10);
        assert_eq!(limit.extract_size_limit_for("a"), 10);
        assert_eq!(limit.extract_size_limit_for("b"), 30);

        let limit = SizeLimit::default();
        assert_eq!(limit.extract_size_limit_for("a"), u64::MAX);
        assert_eq!(limit.whole_body, u64::MAX);
    }
}
