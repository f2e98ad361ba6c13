//! DynamoDB expression trees and their compiler.
//!
//! Trees are built from operands ([`name`], [`value`], [`size`]) with the
//! [`Comparable`] methods and the function constructors, then handed to the
//! [`ExpressionBuilder`](crate::ExpressionBuilder). The pipeline is:
//!
//! 1. **Construction**: typed builders produce immutable trees. Key conditions
//!    have their own types, so an illegal key condition does not type-check.
//! 2. **Compilation**: one recursive-descent pass per tree emits the
//!    expression string, aliasing names and values as it goes.
//! 3. **Assembly**: the alias table becomes the two request maps.

mod alias;
mod ast;
pub(crate) mod compiler;
pub mod condition;
mod finite;
pub mod key_condition;
pub mod operand;
pub mod path;
pub mod projection;
pub mod update;

pub use alias::{NAME_ALIAS_PREFIX, VALUE_ALIAS_PREFIX};
pub use ast::SetValue;
pub use condition::{
    Comparable, Condition, and, attribute_exists, attribute_not_exists, attribute_type,
    begins_with, contains, not, or,
};
pub use key_condition::{KeyCondition, KeyEquality, KeyName, SortKeyCondition, key};
pub use operand::{
    NameOperand, Operand, SizeOperand, ValueOperand, name, size, try_value, value,
};
pub use path::{AttributePath, PathElement};
pub use projection::{Projection, names_list};
pub use update::{
    Update, add, delete, if_not_exists, list_append, minus, plus, remove, set,
};
