//! Condition and filter expressions (the full condition grammar).

use std::ops;

use ruststack_expr_model::{AttributeType, AttributeValue};

use super::ast::{CompareOp, Expr, FunctionName, LogicalOp};
use super::operand::{NameOperand, Operand, SizeOperand, ValueOperand, value};

/// A boolean condition, usable as a condition or filter expression.
///
/// Conditions are immutable; every combinator consumes its inputs and returns
/// a new tree. A `Condition` cannot be used as a key condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    expr: Expr,
}

impl Condition {
    fn new(expr: Expr) -> Self {
        Self { expr }
    }

    pub(crate) fn expr(&self) -> &Expr {
        &self.expr
    }

    /// `self AND right`.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        Self::new(Expr::logical(LogicalOp::And, self.expr, right.expr))
    }

    /// `self OR right`.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        Self::new(Expr::logical(LogicalOp::Or, self.expr, right.expr))
    }
}

impl ops::Not for Condition {
    type Output = Self;

    fn not(self) -> Self {
        Self::new(Expr::Not(Box::new(self.expr)))
    }
}

/// `left AND right`.
#[must_use]
pub fn and(left: Condition, right: Condition) -> Condition {
    left.and(right)
}

/// `left OR right`.
#[must_use]
pub fn or(left: Condition, right: Condition) -> Condition {
    left.or(right)
}

/// `NOT (condition)`.
#[must_use]
pub fn not(condition: Condition) -> Condition {
    !condition
}

/// Comparisons available on every operand kind.
pub trait Comparable: Into<Operand> + Sized {
    /// `self = right`.
    #[must_use]
    fn equal(self, right: impl Into<Operand>) -> Condition {
        compare(self, CompareOp::Eq, right)
    }

    /// `self <> right`.
    #[must_use]
    fn not_equal(self, right: impl Into<Operand>) -> Condition {
        compare(self, CompareOp::Ne, right)
    }

    /// `self < right`.
    #[must_use]
    fn less_than(self, right: impl Into<Operand>) -> Condition {
        compare(self, CompareOp::Lt, right)
    }

    /// `self <= right`.
    #[must_use]
    fn less_than_equal(self, right: impl Into<Operand>) -> Condition {
        compare(self, CompareOp::Le, right)
    }

    /// `self > right`.
    #[must_use]
    fn greater_than(self, right: impl Into<Operand>) -> Condition {
        compare(self, CompareOp::Gt, right)
    }

    /// `self >= right`.
    #[must_use]
    fn greater_than_equal(self, right: impl Into<Operand>) -> Condition {
        compare(self, CompareOp::Ge, right)
    }

    /// `self BETWEEN low AND high`.
    #[must_use]
    fn between(self, low: impl Into<Operand>, high: impl Into<Operand>) -> Condition {
        Condition::new(Expr::between(self.into(), low.into(), high.into()))
    }

    /// `self IN (candidates...)`.
    ///
    /// At least one candidate is required; an empty list fails at `build()`.
    #[must_use]
    fn in_list<I>(self, candidates: I) -> Condition
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Condition::new(Expr::In {
            value: Box::new(self.into()),
            list: candidates.into_iter().map(Into::into).collect(),
        })
    }
}

fn compare(left: impl Into<Operand>, op: CompareOp, right: impl Into<Operand>) -> Condition {
    Condition::new(Expr::compare(left.into(), op, right.into()))
}

impl Comparable for Operand {}
impl Comparable for NameOperand {}
impl Comparable for ValueOperand {}
impl Comparable for SizeOperand {}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

impl NameOperand {
    /// `attribute_exists(self)`.
    #[must_use]
    pub fn attribute_exists(self) -> Condition {
        call(FunctionName::AttributeExists, vec![self.into()])
    }

    /// `attribute_not_exists(self)`.
    #[must_use]
    pub fn attribute_not_exists(self) -> Condition {
        call(FunctionName::AttributeNotExists, vec![self.into()])
    }

    /// `attribute_type(self, :type)`.
    #[must_use]
    pub fn attribute_type(self, ty: AttributeType) -> Condition {
        call(
            FunctionName::AttributeType,
            vec![self.into(), ValueOperand::from(AttributeValue::from(ty)).into()],
        )
    }

    /// `begins_with(self, :prefix)`.
    #[must_use]
    pub fn begins_with(self, prefix: impl Into<String>) -> Condition {
        let prefix = ValueOperand::from(AttributeValue::S(prefix.into()));
        call(FunctionName::BeginsWith, vec![self.into(), prefix.into()])
    }

    /// `contains(self, :operand)`; a substring for strings, an element for sets.
    #[must_use]
    pub fn contains(self, operand: impl Into<AttributeValue>) -> Condition {
        call(
            FunctionName::Contains,
            vec![self.into(), value(operand).into()],
        )
    }
}

fn call(name: FunctionName, args: Vec<Operand>) -> Condition {
    Condition::new(Expr::function(name, args))
}

/// `attribute_exists(name)`.
#[must_use]
pub fn attribute_exists(name: NameOperand) -> Condition {
    name.attribute_exists()
}

/// `attribute_not_exists(name)`.
#[must_use]
pub fn attribute_not_exists(name: NameOperand) -> Condition {
    name.attribute_not_exists()
}

/// `attribute_type(name, :type)`.
#[must_use]
pub fn attribute_type(name: NameOperand, ty: AttributeType) -> Condition {
    name.attribute_type(ty)
}

/// `begins_with(name, :prefix)`.
#[must_use]
pub fn begins_with(name: NameOperand, prefix: impl Into<String>) -> Condition {
    name.begins_with(prefix)
}

/// `contains(name, :operand)`.
#[must_use]
pub fn contains(name: NameOperand, operand: impl Into<AttributeValue>) -> Condition {
    name.contains(operand)
}
