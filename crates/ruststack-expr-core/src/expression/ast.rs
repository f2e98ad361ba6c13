//! Internal node representation shared by every expression kind.
//!
//! `Condition` and `KeyCondition` both wrap an [`Expr`]; what differs between
//! them is which constructors can produce one. Nothing outside this crate can
//! build an `Expr` directly, so the key-condition grammar cannot be bypassed.

use std::fmt;

use super::operand::{NameOperand, Operand, ValueOperand};

/// Expression node for condition, filter, and key-condition expressions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    /// Comparison expression: `left op right`.
    Compare {
        left: Box<Operand>,
        op: CompareOp,
        right: Box<Operand>,
    },
    /// Between expression: `value BETWEEN low AND high`.
    Between {
        value: Box<Operand>,
        low: Box<Operand>,
        high: Box<Operand>,
    },
    /// In expression: `value IN (list...)`.
    In {
        value: Box<Operand>,
        list: Vec<Operand>,
    },
    /// Logical combination: `left AND right` or `left OR right`.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Logical negation: `NOT (expr)`.
    Not(Box<Expr>),
    /// Function call: `function_name(args...)`.
    Function {
        name: FunctionName,
        args: Vec<Operand>,
    },
}

impl Expr {
    pub(crate) fn compare(left: Operand, op: CompareOp, right: Operand) -> Self {
        Self::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub(crate) fn between(value: Operand, low: Operand, high: Operand) -> Self {
        Self::Between {
            value: Box::new(value),
            low: Box::new(low),
            high: Box::new(high),
        }
    }

    pub(crate) fn logical(op: LogicalOp, left: Self, right: Self) -> Self {
        Self::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub(crate) fn function(name: FunctionName, args: Vec<Operand>) -> Self {
        Self::Function { name, args }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (`=`).
    Eq,
    /// Not equal (`<>`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        })
    }
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "AND",
            Self::Or => "OR",
        })
    }
}

/// Built-in DynamoDB condition function names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    /// `attribute_exists(path)` - true if the attribute exists.
    AttributeExists,
    /// `attribute_not_exists(path)` - true if the attribute does not exist.
    AttributeNotExists,
    /// `attribute_type(path, type)` - true if the attribute is of the given type.
    AttributeType,
    /// `begins_with(path, substr)` - true if the string begins with the prefix.
    BeginsWith,
    /// `contains(path, operand)` - true if string contains substring or set contains element.
    Contains,
}

impl FunctionName {
    /// Number of arguments the function takes.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::AttributeExists | Self::AttributeNotExists => 1,
            Self::AttributeType | Self::BeginsWith | Self::Contains => 2,
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AttributeExists => "attribute_exists",
            Self::AttributeNotExists => "attribute_not_exists",
            Self::AttributeType => "attribute_type",
            Self::BeginsWith => "begins_with",
            Self::Contains => "contains",
        })
    }
}

// ---------------------------------------------------------------------------
// Update actions
// ---------------------------------------------------------------------------

/// The right-hand side of a SET action.
#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    /// Simple operand assignment.
    Operand(Operand),
    /// Addition: `left + right`.
    Plus(Box<SetValue>, Box<SetValue>),
    /// Subtraction: `left - right`.
    Minus(Box<SetValue>, Box<SetValue>),
    /// `list_append(left, right)` - concatenate two lists.
    ListAppend(Box<SetValue>, Box<SetValue>),
    /// `if_not_exists(path, value)` - use `value` if `path` does not exist.
    IfNotExists(NameOperand, Box<SetValue>),
}

/// Update actions grouped by clause, in construction order within each clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct UpdateExpr {
    pub(crate) set_actions: Vec<(NameOperand, SetValue)>,
    pub(crate) remove_paths: Vec<NameOperand>,
    pub(crate) add_actions: Vec<(NameOperand, ValueOperand)>,
    pub(crate) delete_actions: Vec<(NameOperand, ValueOperand)>,
}

impl UpdateExpr {
    pub(crate) fn is_empty(&self) -> bool {
        self.set_actions.is_empty()
            && self.remove_paths.is_empty()
            && self.add_actions.is_empty()
            && self.delete_actions.is_empty()
    }
}
