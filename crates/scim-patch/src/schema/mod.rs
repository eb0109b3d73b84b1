//! SCIM schemas, the attributes every resource shares, and path resolution.

mod common;
mod resolve;
mod types;

pub use common::common_attributes;
pub use resolve::{AttributeScope, ResolvedAttribute};
pub use types::{Attribute, AttributeType, Mutability, Returned, Schema, Uniqueness};
