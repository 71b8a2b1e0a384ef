//! Declarative shape definitions for metadata, and the validator that checks
//! parsed JSON against them.
//!
//! Validation never fails loudly. A value either matches its definition or it
//! does not, and callers treat a mismatch as "no metadata".

use serde_json::Value;
use smol_str::SmolStr;

/// Numbers within this distance of a definition's exact value match it.
const NUMBER_EPSILON: f64 = 1e-3;

#[derive(Clone, Debug, PartialEq)]
pub enum DefinitionKind {
    String {
        value: Option<String>,
    },
    Number {
        value: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
    },
    Boolean {
        value: Option<bool>,
    },
    Array {
        item: Box<Definition>,
        min_length: Option<usize>,
        max_length: Option<usize>,
    },
    /// Only the listed properties are checked. Extra properties are ignored.
    Object {
        properties: Vec<(SmolStr, Definition)>,
    },
}

/// A node of a metadata shape definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    pub kind: DefinitionKind,
    /// An absent value is accepted.
    pub is_optional: bool,
    /// An explicit JSON `null` is accepted.
    pub allow_null: bool,
}

impl Definition {
    fn new(kind: DefinitionKind) -> Self {
        Self {
            kind,
            is_optional: false,
            allow_null: false,
        }
    }

    pub fn string() -> Self {
        Self::new(DefinitionKind::String { value: None })
    }

    pub fn string_value(value: impl Into<String>) -> Self {
        Self::new(DefinitionKind::String {
            value: Some(value.into()),
        })
    }

    pub fn number() -> Self {
        Self::new(DefinitionKind::Number {
            value: None,
            min: None,
            max: None,
        })
    }

    pub fn number_value(value: f64) -> Self {
        Self::new(DefinitionKind::Number {
            value: Some(value),
            min: None,
            max: None,
        })
    }

    pub fn number_range(min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(DefinitionKind::Number {
            value: None,
            min,
            max,
        })
    }

    pub fn boolean() -> Self {
        Self::new(DefinitionKind::Boolean { value: None })
    }

    pub fn boolean_value(value: bool) -> Self {
        Self::new(DefinitionKind::Boolean { value: Some(value) })
    }

    pub fn array(item: Definition) -> Self {
        Self::new(DefinitionKind::Array {
            item: Box::new(item),
            min_length: None,
            max_length: None,
        })
    }

    pub fn array_bounded(
        item: Definition,
        min_length: Option<usize>,
        max_length: Option<usize>,
    ) -> Self {
        Self::new(DefinitionKind::Array {
            item: Box::new(item),
            min_length,
            max_length,
        })
    }

    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, Definition)>,
        K: Into<SmolStr>,
    {
        Self::new(DefinitionKind::Object {
            properties: properties
                .into_iter()
                .map(|(name, def)| (name.into(), def))
                .collect(),
        })
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.allow_null = true;
        self
    }
}

/// Check a parsed JSON value against a definition.
///
/// `None` stands for an absent value (a missing object property).
pub fn validate(input: Option<&Value>, definition: &Definition) -> bool {
    let input = match input {
        None => return definition.is_optional,
        Some(Value::Null) => return definition.allow_null,
        Some(value) => value,
    };

    match &definition.kind {
        DefinitionKind::String { value } => match input {
            Value::String(s) => value.as_ref().is_none_or(|expected| expected == s),
            _ => false,
        },
        DefinitionKind::Number { value, min, max } => {
            let Some(n) = input.as_f64() else {
                return false;
            };
            value.is_none_or(|expected| (expected - n).abs() < NUMBER_EPSILON)
                && min.is_none_or(|min| n >= min)
                && max.is_none_or(|max| n <= max)
        }
        DefinitionKind::Boolean { value } => match input {
            Value::Bool(b) => value.is_none_or(|expected| expected == *b),
            _ => false,
        },
        DefinitionKind::Array {
            item,
            min_length,
            max_length,
        } => {
            let Value::Array(items) = input else {
                return false;
            };
            min_length.is_none_or(|min| items.len() >= min)
                && max_length.is_none_or(|max| items.len() <= max)
                && items.iter().all(|v| validate(Some(v), item))
        }
        DefinitionKind::Object { properties } => {
            let Value::Object(map) = input else {
                return false;
            };
            properties
                .iter()
                .all(|(name, def)| validate(map.get(name.as_str()), def))
        }
    }
}
