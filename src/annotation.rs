//! # Field Annotations
//!
//! A field's annotation is one string of `;`-separated entries, each either
//! a bare flag (`not_null`) or `key:value`. Everything after the first `:`
//! is the value, so values may contain colons themselves.
//!
//! ```text
//! "prop:created;type:datetime;default:datetime();index:idx_created,priority:1"
//! ```
//!
//! Keys are trimmed and lower-cased. Unknown keys are kept but nothing reads
//! them.

use hashbrown::HashMap;

pub const COL: &str = "col";
pub const VERTEX_ID: &str = "vertex_id";
pub const EDGE_SRC_ID: &str = "edge_src_id";
pub const EDGE_DST_ID: &str = "edge_dst_id";
pub const EDGE_RANK: &str = "edge_rank";
pub const PROP: &str = "prop";
pub const TYPE: &str = "type";
pub const NOT_NULL: &str = "not_null";
pub const DEFAULT: &str = "default";
pub const COMMENT: &str = "comment";
pub const TTL: &str = "ttl";
pub const INDEX: &str = "index";
pub const IGNORE: &str = "-";
pub const FLATTEN: &str = "flatten";

/// Parsed annotation: lower-cased key → raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    entries: HashMap<String, String>,
}

impl Annotation {
    pub fn parse(raw: &str) -> Self {
        let mut entries = HashMap::new();
        for entry in raw.split(';') {
            let (key, value) = match entry.split_once(':') {
                Some((key, value)) => (key.trim().to_lowercase(), Some(value)),
                None => (entry.trim().to_lowercase(), None),
            };
            if key.is_empty() {
                continue;
            }
            let value = value.map_or_else(|| key.clone(), str::to_owned);
            entries.insert(key, value);
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value of `key`, treating an empty value as absent.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn is_ignored(&self) -> bool {
        self.has(IGNORE)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `UserName` → `user_name`. The first character is only lower-cased; every
/// later uppercase character gets an underscore in front.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i > 0 && ch.is_uppercase() {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse() {
        let a = Annotation::parse("a:1:2:3;b");
        assert_eq!(a.get("a"), Some("1:2:3"));
        assert_eq!(a.get("b"), Some("b"));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_parse_trims_and_lowercases_keys() {
        let a = Annotation::parse(" Prop :Name; NOT_NULL ;;");
        assert_eq!(a.get("prop"), Some("Name"));
        assert!(a.has(NOT_NULL));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_parse_empty_value() {
        let a = Annotation::parse("index:;col:");
        assert_eq!(a.get(INDEX), Some(""));
        assert_eq!(a.value(INDEX), None);
        assert!(Annotation::parse("").is_empty());
    }

    #[test]
    fn test_later_entry_wins() {
        assert_eq!(Annotation::parse("ttl:1;ttl:2").get(TTL), Some("2"));
    }

    #[test]
    fn test_ignore() {
        assert!(Annotation::parse("-").is_ignored());
        assert!(!Annotation::parse("prop:-").is_ignored());
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("name"), "name");
        assert_eq!(to_snake_case("UserName"), "user_name");
        assert_eq!(to_snake_case("ABC"), "a_b_c");
        assert_eq!(to_snake_case("user_id"), "user_id");
        assert_eq!(to_snake_case(""), "");
    }

    proptest! {
        #[test]
        fn prop_snake_case_has_no_uppercase(name in "[A-Za-z][A-Za-z0-9]{0,20}") {
            let snake = to_snake_case(&name);
            prop_assert!(!snake.chars().any(char::is_uppercase));
            prop_assert_eq!(snake.replace('_', ""), name.to_lowercase());
        }

        #[test]
        fn prop_value_keeps_everything_after_first_colon(
            key in "[a-z_]{1,10}",
            value in "[a-z0-9:,()]{0,20}",
        ) {
            let a = Annotation::parse(&format!("{key}:{value}"));
            prop_assert_eq!(a.get(&key), Some(value.as_str()));
        }

        #[test]
        fn prop_bare_flags_map_to_themselves(keys in prop::collection::vec("[a-z_]{1,8}", 1..6)) {
            let a = Annotation::parse(&keys.join(";"));
            for key in &keys {
                prop_assert_eq!(a.get(key), Some(key.as_str()));
            }
        }
    }
}
