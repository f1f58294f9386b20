// src/core/marshaller.rs

use crate::{
    core::text::replace_all,
    models::{ConfigValue, TypedValue, ValueKind},
};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value to convert to a build-language value: {value}")]
pub struct InvalidValueError {
    /// The offending value, rendered as JSON.
    pub value: String,
}

impl InvalidValueError {
    fn new(value: &Value) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

impl TryFrom<&Value> for ConfigValue {
    type Error = InvalidValueError;

    /// Accepts booleans, numbers, strings, arrays of strings, and objects that
    /// already carry a `type` and a `value`.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => Ok(Self::Number(n.clone())),
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::List)
                .ok_or_else(|| InvalidValueError::new(value)),
            Value::Object(map) => {
                let kind = map.get("type").and_then(Value::as_str);
                let text = map.get("value").and_then(Value::as_str);
                match (kind, text) {
                    (Some(kind), Some(text)) => {
                        let kind = kind
                            .parse::<ValueKind>()
                            .map_err(|_| InvalidValueError::new(value))?;
                        Ok(Self::Typed(TypedValue::new(kind, text)))
                    }
                    _ => Err(InvalidValueError::new(value)),
                }
            }
            Value::Null => Err(InvalidValueError::new(value)),
        }
    }
}

/// Converts a native value into its tagged build-language form.
///
/// Strings get every `;` escaped so they stay a single list element; lists
/// are joined with bare `;`, which is how the build language spells a list.
pub fn marshal(value: &ConfigValue) -> TypedValue {
    match value {
        ConfigValue::Bool(b) => TypedValue::new(ValueKind::Bool, if *b { "TRUE" } else { "FALSE" }),
        ConfigValue::String(s) => TypedValue::new(ValueKind::String, replace_all(s, ";", "\\;")),
        ConfigValue::Number(n) => TypedValue::new(ValueKind::String, render_number(n)),
        ConfigValue::List(items) => TypedValue::new(ValueKind::String, items.join(";")),
        ConfigValue::Typed(typed) => typed.clone(),
    }
}

/// Marshals a raw JSON configuration value, rejecting shapes with no
/// build-language counterpart.
pub fn marshal_json(value: &Value) -> Result<TypedValue, InvalidValueError> {
    let native = ConfigValue::try_from(value)?;
    Ok(marshal(&native))
}

/// Splits a list string on unescaped `;`, unescaping `\;` inside elements.
///
/// The empty string is the empty list.
pub fn split_list(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&';') => {
                chars.next();
                current.push(';');
            }
            ';' => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);
    items
}

fn render_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    // f64's Display is plain decimal with no exponent and drops a zero fraction.
    match n.as_f64() {
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_marshal_bools() {
        assert_eq!(marshal(&true.into()), TypedValue::new(ValueKind::Bool, "TRUE"));
        assert_eq!(marshal(&false.into()), TypedValue::new(ValueKind::Bool, "FALSE"));
    }

    #[test]
    fn test_marshal_string_escapes_semicolons() {
        let typed = marshal(&"a;b;c".into());
        assert_eq!(typed.kind, ValueKind::String);
        assert_eq!(typed.text, r"a\;b\;c");
    }

    #[test]
    fn test_marshal_numbers() {
        assert_eq!(marshal_json(&json!(42)).unwrap().text, "42");
        assert_eq!(marshal_json(&json!(-7)).unwrap().text, "-7");
        assert_eq!(marshal_json(&json!(1.5)).unwrap().text, "1.5");
        assert_eq!(marshal_json(&json!(2.0)).unwrap().text, "2");
        assert_eq!(marshal_json(&json!(2.0)).unwrap().kind, ValueKind::String);
    }

    #[test]
    fn test_marshal_list_joins_with_bare_semicolons() {
        let typed = marshal_json(&json!(["a", "b", "c"])).unwrap();
        assert_eq!(typed, TypedValue::new(ValueKind::String, "a;b;c"));
        assert_eq!(split_list(&typed.text), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_marshal_typed_passthrough() {
        let typed = marshal_json(&json!({"type": "FILEPATH", "value": "/usr/bin/cc"})).unwrap();
        assert_eq!(typed, TypedValue::new(ValueKind::FilePath, "/usr/bin/cc"));
    }

    #[test]
    fn test_marshal_rejects_unsupported_shapes() {
        for bad in [
            json!(null),
            json!({"name": "x"}),
            json!([1, 2]),
            json!({"type": "NOPE", "value": "x"}),
        ] {
            let err = marshal_json(&bad).unwrap_err();
            assert_eq!(err.value, bad.to_string());
        }
    }

    #[test]
    fn test_split_list_keeps_escaped_semicolons() {
        assert_eq!(split_list(r"a\;b;c"), vec!["a;b", "c"]);
        assert_eq!(split_list("a;;b"), vec!["a", "", "b"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_to_definition() {
        let typed = marshal(&"Release".into());
        assert_eq!(typed.to_definition("CMAKE_BUILD_TYPE"), "-DCMAKE_BUILD_TYPE:STRING=Release");
        assert_eq!(marshal(&true.into()).to_definition("BUILD_TESTING"), "-DBUILD_TESTING:BOOL=TRUE");
    }
}
