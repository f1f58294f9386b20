// src/core/truthiness.rs

use crate::models::ConfigValue;

/// Constants the build language reads as false in a conditional.
///
/// Matching is exact: `off` and `False` are *not* false constants here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FalseConstant {
    False,
    Off,
    Zero,
    NotFound,
    No,
    N,
    Ignore,
}

impl FalseConstant {
    fn from_literal(text: &str) -> Option<Self> {
        match text {
            "FALSE" => Some(Self::False),
            "OFF" => Some(Self::Off),
            "0" => Some(Self::Zero),
            "NOTFOUND" => Some(Self::NotFound),
            "NO" => Some(Self::No),
            "N" => Some(Self::N),
            "IGNORE" => Some(Self::Ignore),
            _ => None,
        }
    }
}

const NOTFOUND_SUFFIX: &str = "-NOTFOUND";

/// Applies the build language's string coercion.
pub fn is_truthy_str(text: &str) -> bool {
    !(text.is_empty()
        || FalseConstant::from_literal(text).is_some()
        || text.ends_with(NOTFOUND_SUFFIX))
}

impl ConfigValue {
    /// Coerces the value to a boolean the way a build-language `if()` would.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::String(s) => is_truthy_str(s),
            Self::Typed(typed) => is_truthy_str(&typed.text),
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Self::List(items) => !items.is_empty(),
        }
    }
}

/// Truthiness of a possibly absent value. Absent is false.
pub fn is_truthy(value: Option<&ConfigValue>) -> bool {
    value.is_some_and(ConfigValue::is_truthy)
}
