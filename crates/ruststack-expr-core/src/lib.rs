//! Typed DynamoDB expression builders for RustStack.
//!
//! Condition, filter, key-condition, projection and update expressions are
//! built as typed trees and compiled into the strings DynamoDB accepts, plus
//! the `ExpressionAttributeNames` and `ExpressionAttributeValues` maps their
//! aliases refer to. Every name segment and literal is aliased (`#0`, `:0`),
//! so reserved words and special characters never reach the expression text.
//!
//! The crate only emits expressions. It never parses or evaluates them and
//! performs no I/O.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

mod builder;
pub mod config;
pub mod error;
pub mod expression;

pub use builder::{Expression, ExpressionBuilder, ExpressionKind};
pub use config::ExpressionConfig;
pub use error::{ExpressionError, ExpressionResult};
pub use expression::*;
pub use ruststack_expr_model::{AttributeType, AttributeValue};
