//! Operands: the leaves of every expression tree.

use ruststack_expr_model::AttributeValue;
use serde::Serialize;

use super::finite::check_finite;
use super::path::AttributePath;
use crate::error::{ExpressionError, ExpressionResult};

/// An operand in an expression (a value producer).
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A document path reference.
    Name(NameOperand),
    /// A literal value.
    Value(ValueOperand),
    /// `size(path)`.
    Size(SizeOperand),
    /// A list literal. Every member must be a literal value; the whole list
    /// is aliased as a single `L` value.
    List(Vec<Operand>),
}

impl Operand {
    /// Build a list literal from other operands.
    #[must_use]
    pub fn list<I>(members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Self::List(members.into_iter().map(Into::into).collect())
    }
}

/// A reference to an item attribute, possibly nested (`info.rating`) or
/// list-indexed (`tags[0]`).
///
/// A malformed path is kept as-is and reported by `build()`; use
/// [`NameOperand::try_new`] to surface it immediately instead.
#[derive(Debug, Clone, PartialEq)]
pub struct NameOperand {
    path: ExpressionResult<AttributePath>,
}

impl NameOperand {
    /// Parse `path`, failing on malformed syntax.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the path cannot be parsed.
    pub fn try_new(path: &str) -> ExpressionResult<Self> {
        AttributePath::parse(path).map(Self::from)
    }

    /// The parsed path, or the error the path failed with.
    ///
    /// # Errors
    ///
    /// Returns the `InvalidParameter` error recorded at construction.
    pub fn path(&self) -> ExpressionResult<&AttributePath> {
        self.path.as_ref().map_err(Clone::clone)
    }

    /// A top-level attribute named verbatim, without path parsing.
    pub(crate) fn from_top_level(name: &str) -> Self {
        Self {
            path: AttributePath::top_level(name),
        }
    }

    /// `size(self)`.
    #[must_use]
    pub fn size(self) -> SizeOperand {
        SizeOperand { name: self }
    }
}

impl From<AttributePath> for NameOperand {
    fn from(path: AttributePath) -> Self {
        Self { path: Ok(path) }
    }
}

/// A literal value, aliased into `ExpressionAttributeValues`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueOperand {
    value: AttributeValue,
}

impl ValueOperand {
    /// The wrapped value.
    #[must_use]
    pub fn value(&self) -> &AttributeValue {
        &self.value
    }
}

impl From<AttributeValue> for ValueOperand {
    fn from(value: AttributeValue) -> Self {
        Self { value }
    }
}

/// The `size()` function applied to a path. Only a [`NameOperand`] can be
/// sized.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeOperand {
    name: NameOperand,
}

impl SizeOperand {
    /// The sized path.
    #[must_use]
    pub fn name(&self) -> &NameOperand {
        &self.name
    }
}

impl From<NameOperand> for Operand {
    fn from(name: NameOperand) -> Self {
        Self::Name(name)
    }
}

impl From<ValueOperand> for Operand {
    fn from(value: ValueOperand) -> Self {
        Self::Value(value)
    }
}

impl From<SizeOperand> for Operand {
    fn from(size: SizeOperand) -> Self {
        Self::Size(size)
    }
}

/// Reference an attribute by path, e.g. `name("info.ratings[0]")`.
#[must_use]
pub fn name(path: &str) -> NameOperand {
    NameOperand {
        path: AttributePath::parse(path),
    }
}

/// Wrap a literal value.
#[must_use]
pub fn value(value: impl Into<AttributeValue>) -> ValueOperand {
    ValueOperand {
        value: value.into(),
    }
}

/// Wrap any serializable value, converting it through its JSON form.
///
/// # Errors
///
/// Returns `InvalidParameter` if `value` contains a NaN or infinite number,
/// or cannot be represented as JSON (for example a map with non-string keys).
pub fn try_value<T: Serialize + ?Sized>(value: &T) -> ExpressionResult<ValueOperand> {
    check_finite(value)?;
    serde_json::to_value(value)
        .map(|json| ValueOperand::from(AttributeValue::from(json)))
        .map_err(|e| ExpressionError::invalid_parameter(format!("unsupported value: {e}")))
}

/// `size(name)`.
#[must_use]
pub fn size(name: NameOperand) -> SizeOperand {
    name.size()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_should_defer_malformed_name_errors() {
        let bad = name("a..b");
        assert!(bad.path().unwrap_err().is_invalid_parameter());
        assert!(NameOperand::try_new("a..b").is_err());
        assert!(NameOperand::try_new("a.b").is_ok());
    }

    #[test]
    fn test_should_compare_names_structurally() {
        assert_eq!(name("a.b[1]"), name("a.b[1]"));
        assert_ne!(name("a.b[1]"), name("a.b[2]"));
    }

    #[test]
    fn test_should_convert_serializable_values() {
        #[derive(Serialize)]
        struct Album {
            title: &'static str,
            year: u16,
        }

        let operand = try_value(&Album {
            title: "Songs About Life",
            year: 2016,
        })
        .unwrap();
        let AttributeValue::M(fields) = operand.value() else {
            panic!("expected map value, got {:?}", operand.value());
        };
        assert_eq!(fields["title"], AttributeValue::from("Songs About Life"));
        assert_eq!(fields["year"], AttributeValue::from(2016));
    }

    #[test]
    fn test_should_reject_unsupported_values() {
        let mut map = BTreeMap::new();
        map.insert(vec![1_u8], 1);
        let err = try_value(&map).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_should_reject_non_finite_serialized_numbers() {
        #[derive(Serialize)]
        struct Reading {
            sensor: &'static str,
            level: f64,
        }

        let err = try_value(&f64::NAN).unwrap_err();
        assert!(err.is_invalid_parameter());
        let err = try_value(&Reading {
            sensor: "t1",
            level: f64::INFINITY,
        })
        .unwrap_err();
        assert!(err.is_invalid_parameter());
        assert_eq!(
            try_value(&None::<f64>).unwrap().value(),
            &AttributeValue::Null(true)
        );
    }

    #[test]
    fn test_should_size_only_names() {
        let sized = size(name("tags"));
        assert_eq!(sized.name(), &name("tags"));
        assert_eq!(Operand::from(name("tags").size()), Operand::Size(sized));
    }
}
