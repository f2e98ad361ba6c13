//! DynamoDB value types for the RustStack expression compiler.
//!
//! The compiler aliases every literal it meets into the `ExpressionAttributeValues`
//! map of a request. This crate holds the value type that map carries, in the
//! JSON wire format of the `awsJson1_0` protocol, along with the attribute type
//! descriptors accepted by the `attribute_type` condition function.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_type;
pub mod attribute_value;

pub use attribute_type::AttributeType;
pub use attribute_value::AttributeValue;
