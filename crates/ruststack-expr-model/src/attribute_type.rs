//! Attribute type descriptors used by the `attribute_type` function.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;

/// The data type of a DynamoDB attribute.
///
/// Serializes to (and displays as) the short descriptor the service expects,
/// e.g. `"SS"` for a string set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// String.
    #[serde(rename = "S")]
    String,
    /// String set.
    #[serde(rename = "SS")]
    StringSet,
    /// Number.
    #[serde(rename = "N")]
    Number,
    /// Number set.
    #[serde(rename = "NS")]
    NumberSet,
    /// Binary.
    #[serde(rename = "B")]
    Binary,
    /// Binary set.
    #[serde(rename = "BS")]
    BinarySet,
    /// Boolean.
    #[serde(rename = "BOOL")]
    Boolean,
    /// Null.
    #[serde(rename = "NULL")]
    Null,
    /// List.
    #[serde(rename = "L")]
    List,
    /// Map.
    #[serde(rename = "M")]
    Map,
}

impl AttributeType {
    /// Returns the short type descriptor (e.g. `"S"`, `"BOOL"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "S",
            Self::StringSet => "SS",
            Self::Number => "N",
            Self::NumberSet => "NS",
            Self::Binary => "B",
            Self::BinarySet => "BS",
            Self::Boolean => "BOOL",
            Self::Null => "NULL",
            Self::List => "L",
            Self::Map => "M",
        }
    }

    /// Returns the type of the given value.
    #[must_use]
    pub fn of(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::S(_) => Self::String,
            AttributeValue::N(_) => Self::Number,
            AttributeValue::B(_) => Self::Binary,
            AttributeValue::Ss(_) => Self::StringSet,
            AttributeValue::Ns(_) => Self::NumberSet,
            AttributeValue::Bs(_) => Self::BinarySet,
            AttributeValue::Bool(_) => Self::Boolean,
            AttributeValue::Null(_) => Self::Null,
            AttributeValue::L(_) => Self::List,
            AttributeValue::M(_) => Self::Map,
        }
    }

    /// Returns `true` for the three set types.
    #[must_use]
    pub fn is_set(self) -> bool {
        matches!(self, Self::StringSet | Self::NumberSet | Self::BinarySet)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AttributeType> for AttributeValue {
    /// The `attribute_type` function takes its type operand as a string value.
    fn from(ty: AttributeType) -> Self {
        Self::S(ty.as_str().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_describe_value_types() {
        assert_eq!(AttributeType::of(&AttributeValue::from("x")), AttributeType::String);
        assert_eq!(AttributeType::of(&AttributeValue::from(7)), AttributeType::Number);
        assert_eq!(
            AttributeType::of(&AttributeValue::string_set(["a"])),
            AttributeType::StringSet
        );
        assert_eq!(AttributeType::of(&AttributeValue::Null(true)), AttributeType::Null);
    }

    #[test]
    fn test_should_convert_into_string_value() {
        assert_eq!(
            AttributeValue::from(AttributeType::Boolean),
            AttributeValue::S("BOOL".to_owned())
        );
        assert!(AttributeType::NumberSet.is_set());
        assert!(!AttributeType::List.is_set());
    }

    #[test]
    fn test_should_serialize_as_descriptor() {
        let json = serde_json::to_string(&AttributeType::BinarySet).unwrap();
        assert_eq!(json, r#""BS""#);
    }
}
