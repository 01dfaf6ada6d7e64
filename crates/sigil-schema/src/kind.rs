//! Runtime category classification of dynamic values.
//!
//! Every `serde_json::Value` falls into exactly one kind. Kind names are
//! the vocabulary of `kind` constraints and of rendered reason phrases
//! ("must be a number (foo is a string)").

use serde_json::Value;

/// The runtime category name of a value.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a value for inclusion in a reason phrase.
///
/// Strings are shown bare (`foo`, not `"foo"`), everything else in its
/// JSON form. Containers would bloat a message, so they render as their
/// kind name instead.
pub fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            let kind = kind_of(value);
            format!("{} {kind}", article(kind))
        }
        other => other.to_string(),
    }
}

/// The indefinite article for a kind name ("a number", "an object").
pub fn article(noun: &str) -> &'static str {
    match noun.as_bytes().first() {
        Some(b'a' | b'e' | b'i' | b'o' | b'u') => "an",
        _ => "a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_cover_every_value_shape() {
        assert_eq!(kind_of(&Value::Null), "null");
        assert_eq!(kind_of(&json!(true)), "boolean");
        assert_eq!(kind_of(&json!(10)), "number");
        assert_eq!(kind_of(&json!("foo")), "string");
        assert_eq!(kind_of(&json!([1, 2])), "array");
        assert_eq!(kind_of(&json!({"a": 1})), "object");
    }

    #[test]
    fn describe_shows_strings_bare() {
        assert_eq!(describe(&json!("foo")), "foo");
        assert_eq!(describe(&json!(10)), "10");
        assert_eq!(describe(&json!(false)), "false");
        assert_eq!(describe(&Value::Null), "null");
        assert_eq!(describe(&json!({"a": 1})), "an object");
        assert_eq!(describe(&json!([])), "an array");
    }

    #[test]
    fn articles() {
        assert_eq!(article("number"), "a");
        assert_eq!(article("object"), "an");
        assert_eq!(article("array"), "an");
        assert_eq!(article("string"), "a");
    }
}
