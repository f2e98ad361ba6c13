//! Update expressions: SET, REMOVE, ADD and DELETE actions.

use super::ast::{SetValue, UpdateExpr};
use super::operand::{NameOperand, Operand, SizeOperand, ValueOperand};

/// A set of update actions.
///
/// Actions are kept in the order they were added within each clause; clauses
/// are always emitted as SET, REMOVE, ADD, DELETE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    expr: UpdateExpr,
}

impl Update {
    /// An update with no actions. At least one action must be added before
    /// it can be built.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `SET target = value`.
    #[must_use]
    pub fn set(mut self, target: NameOperand, value: impl Into<SetValue>) -> Self {
        self.expr.set_actions.push((target, value.into()));
        self
    }

    /// `REMOVE target`.
    #[must_use]
    pub fn remove(mut self, target: NameOperand) -> Self {
        self.expr.remove_paths.push(target);
        self
    }

    /// `ADD target :value`; adds to a number or unions into a set.
    #[must_use]
    pub fn add(mut self, target: NameOperand, value: ValueOperand) -> Self {
        self.expr.add_actions.push((target, value));
        self
    }

    /// `DELETE target :value`; removes elements from a set.
    #[must_use]
    pub fn delete(mut self, target: NameOperand, value: ValueOperand) -> Self {
        self.expr.delete_actions.push((target, value));
        self
    }

    pub(crate) fn expr(&self) -> &UpdateExpr {
        &self.expr
    }
}

/// `SET target = value`.
#[must_use]
pub fn set(target: NameOperand, value: impl Into<SetValue>) -> Update {
    Update::new().set(target, value)
}

/// `REMOVE target`.
#[must_use]
pub fn remove(target: NameOperand) -> Update {
    Update::new().remove(target)
}

/// `ADD target :value`.
#[must_use]
pub fn add(target: NameOperand, value: ValueOperand) -> Update {
    Update::new().add(target, value)
}

/// `DELETE target :value`.
#[must_use]
pub fn delete(target: NameOperand, value: ValueOperand) -> Update {
    Update::new().delete(target, value)
}

// ---------------------------------------------------------------------------
// SET values
// ---------------------------------------------------------------------------

impl From<Operand> for SetValue {
    fn from(operand: Operand) -> Self {
        Self::Operand(operand)
    }
}

impl From<NameOperand> for SetValue {
    fn from(name: NameOperand) -> Self {
        Self::Operand(name.into())
    }
}

impl From<ValueOperand> for SetValue {
    fn from(value: ValueOperand) -> Self {
        Self::Operand(value.into())
    }
}

impl From<SizeOperand> for SetValue {
    fn from(size: SizeOperand) -> Self {
        Self::Operand(size.into())
    }
}

impl SetValue {
    /// `self + right`.
    #[must_use]
    pub fn plus(self, right: impl Into<SetValue>) -> Self {
        Self::Plus(Box::new(self), Box::new(right.into()))
    }

    /// `self - right`.
    #[must_use]
    pub fn minus(self, right: impl Into<SetValue>) -> Self {
        Self::Minus(Box::new(self), Box::new(right.into()))
    }
}

/// `left + right`.
#[must_use]
pub fn plus(left: impl Into<SetValue>, right: impl Into<SetValue>) -> SetValue {
    left.into().plus(right)
}

/// `left - right`.
#[must_use]
pub fn minus(left: impl Into<SetValue>, right: impl Into<SetValue>) -> SetValue {
    left.into().minus(right)
}

/// `list_append(left, right)`.
#[must_use]
pub fn list_append(left: impl Into<SetValue>, right: impl Into<SetValue>) -> SetValue {
    SetValue::ListAppend(Box::new(left.into()), Box::new(right.into()))
}

/// `if_not_exists(path, value)`.
#[must_use]
pub fn if_not_exists(path: NameOperand, value: impl Into<SetValue>) -> SetValue {
    SetValue::IfNotExists(path, Box::new(value.into()))
}

#[cfg(test)]
mod tests {
    use ruststack_expr_model::AttributeValue;

    use super::*;
    use crate::expression::operand::{name, value};

    #[test]
    fn test_should_group_actions_by_clause() {
        let update = add(name("count"), value(1))
            .remove(name("old"))
            .set(name("a"), value("x"))
            .delete(name("tags"), value(AttributeValue::string_set(["t"])))
            .set(name("b"), name("a"));
        let expr = update.expr();
        assert_eq!(expr.set_actions.len(), 2);
        assert_eq!(expr.set_actions[0].0, name("a"));
        assert_eq!(expr.set_actions[1].0, name("b"));
        assert_eq!(expr.remove_paths, vec![name("old")]);
        assert_eq!(expr.add_actions.len(), 1);
        assert_eq!(expr.delete_actions.len(), 1);
    }

    #[test]
    fn test_should_nest_set_values() {
        let counter = if_not_exists(name("count"), value(0)).plus(value(1));
        let SetValue::Plus(left, right) = counter else {
            panic!("expected Plus");
        };
        assert!(matches!(*left, SetValue::IfNotExists(..)));
        assert!(matches!(*right, SetValue::Operand(Operand::Value(_))));
    }

    #[test]
    fn test_should_start_empty() {
        assert!(Update::new().expr().is_empty());
    }
}
