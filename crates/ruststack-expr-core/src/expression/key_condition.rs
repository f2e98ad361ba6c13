//! Key-condition expressions (the restricted grammar accepted by `Query`).
//!
//! The grammar is enforced by types, not by inspecting trees:
//!
//! - [`key`] names a key attribute and only offers `=`, `<`, `<=`, `>`, `>=`,
//!   `BETWEEN` and `begins_with`, each taking a literal value.
//! - `=` yields a [`KeyEquality`], the only form a partition key condition can
//!   take. Everything else yields a [`SortKeyCondition`].
//! - [`KeyEquality::and`] joins a partition key equality with one sort key
//!   condition into a [`KeyCondition`]. A lone `KeyEquality` also converts
//!   into one.
//!
//! There is no `OR`, `NOT`, `<>`, `IN`, and no way to turn a
//! [`Condition`](super::condition::Condition) into any of these types:
//!
//! ```compile_fail
//! use ruststack_expr_core::{Comparable, ExpressionBuilder, name, value};
//!
//! let _ = ExpressionBuilder::new().with_key_condition(name("pk").equal(value(1)));
//! ```

use ruststack_expr_model::AttributeValue;

use super::ast::{CompareOp, Expr, FunctionName, LogicalOp};
use super::operand::{NameOperand, Operand, ValueOperand};

/// A key attribute, the left-hand side of every key condition.
///
/// Key attributes are top-level, so the name is taken verbatim: `key("a.b")`
/// names the attribute called `a.b`, it does not descend into a map.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyName {
    name: NameOperand,
}

/// Name a key attribute.
#[must_use]
pub fn key(name: &str) -> KeyName {
    KeyName {
        name: NameOperand::from_top_level(name),
    }
}

impl KeyName {
    fn compare(self, op: CompareOp, value: ValueOperand) -> Expr {
        Expr::compare(self.name.into(), op, value.into())
    }

    /// `key = :value`.
    #[must_use]
    pub fn equal(self, value: ValueOperand) -> KeyEquality {
        KeyEquality {
            expr: self.compare(CompareOp::Eq, value),
        }
    }

    /// `key < :value`.
    #[must_use]
    pub fn less_than(self, value: ValueOperand) -> SortKeyCondition {
        SortKeyCondition::new(self.compare(CompareOp::Lt, value))
    }

    /// `key <= :value`.
    #[must_use]
    pub fn less_than_equal(self, value: ValueOperand) -> SortKeyCondition {
        SortKeyCondition::new(self.compare(CompareOp::Le, value))
    }

    /// `key > :value`.
    #[must_use]
    pub fn greater_than(self, value: ValueOperand) -> SortKeyCondition {
        SortKeyCondition::new(self.compare(CompareOp::Gt, value))
    }

    /// `key >= :value`.
    #[must_use]
    pub fn greater_than_equal(self, value: ValueOperand) -> SortKeyCondition {
        SortKeyCondition::new(self.compare(CompareOp::Ge, value))
    }

    /// `key BETWEEN :low AND :high`.
    #[must_use]
    pub fn between(self, low: ValueOperand, high: ValueOperand) -> SortKeyCondition {
        SortKeyCondition::new(Expr::between(self.name.into(), low.into(), high.into()))
    }

    /// `begins_with(key, :prefix)`.
    #[must_use]
    pub fn begins_with(self, prefix: impl Into<String>) -> SortKeyCondition {
        let prefix = ValueOperand::from(AttributeValue::S(prefix.into()));
        SortKeyCondition::new(Expr::function(
            FunctionName::BeginsWith,
            vec![self.name.into(), Operand::from(prefix)],
        ))
    }
}

/// `key = :value`: valid on a partition key or a sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEquality {
    expr: Expr,
}

impl KeyEquality {
    /// `partition = :v AND <sort key condition>`.
    #[must_use]
    pub fn and(self, sort: impl Into<SortKeyCondition>) -> KeyCondition {
        KeyCondition {
            expr: Expr::logical(LogicalOp::And, self.expr, sort.into().expr),
        }
    }
}

/// A condition on the sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKeyCondition {
    expr: Expr,
}

impl SortKeyCondition {
    fn new(expr: Expr) -> Self {
        Self { expr }
    }
}

impl From<KeyEquality> for SortKeyCondition {
    fn from(eq: KeyEquality) -> Self {
        Self::new(eq.expr)
    }
}

/// A complete key condition: a partition key equality, optionally joined with
/// one sort key condition.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    expr: Expr,
}

impl KeyCondition {
    pub(crate) fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl From<KeyEquality> for KeyCondition {
    fn from(eq: KeyEquality) -> Self {
        Self { expr: eq.expr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::operand::value;

    #[test]
    fn test_should_build_partition_only_condition() {
        let cond = KeyCondition::from(key("id").equal(value(1)));
        assert!(matches!(
            cond.expr(),
            Expr::Compare {
                op: CompareOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn test_should_join_partition_and_sort_conditions() {
        let cond = key("Artist")
            .equal(value("No One You Know"))
            .and(key("SongTitle").begins_with("Call"));
        let Expr::Logical { op, left, right } = cond.expr() else {
            panic!("expected Logical, got {:?}", cond.expr());
        };
        assert_eq!(*op, LogicalOp::And);
        assert!(matches!(left.as_ref(), Expr::Compare { .. }));
        assert!(matches!(
            right.as_ref(),
            Expr::Function {
                name: FunctionName::BeginsWith,
                ..
            }
        ));
    }

    #[test]
    fn test_should_accept_equality_on_sort_key() {
        let cond = key("pk").equal(value("a")).and(key("sk").equal(value("b")));
        assert!(matches!(cond.expr(), Expr::Logical { .. }));
    }

    #[test]
    fn test_should_defer_empty_key_name_error() {
        let KeyName { name } = key("");
        assert!(name.path().unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_should_take_key_names_verbatim() {
        let KeyName { name } = key("order.id");
        assert_eq!(name.path().unwrap().to_string(), "order.id");
        assert_eq!(name.path().unwrap().elements().len(), 1);
    }
}
