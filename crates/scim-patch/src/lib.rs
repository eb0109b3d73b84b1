//! Schema-aware SCIM PATCH for JSON resources.
//!
//! A [`Patch`] names an attribute by a SCIM attribute path (parsed by
//! [`scim_path`]), which is resolved against a [`Schema`] and its extensions
//! before the targeted part of a [`Resource`] is mutated in place.
//!
//! # Example
//!
//! ```
//! use scim_patch::{apply_patch, Attribute, AttributeType, Patch, Resource, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new(
//!     "urn:ietf:params:scim:schemas:core:2.0:User",
//!     vec![
//!         Attribute::new("userName", AttributeType::String),
//!         Attribute::complex(
//!             "emails",
//!             vec![
//!                 Attribute::new("value", AttributeType::String),
//!                 Attribute::new("type", AttributeType::String),
//!             ],
//!         )
//!         .multi_valued(),
//!     ],
//! );
//!
//! let mut user = Resource::try_from(json!({
//!     "userName": "bjensen",
//!     "emails": [
//!         {"value": "bjensen@example.com", "type": "work"},
//!         {"value": "babs@jensen.org", "type": "home"}
//!     ]
//! }))
//! .unwrap();
//!
//! apply_patch(&Patch::remove(r#"emails[type eq "work"]"#), &mut user, &schema).unwrap();
//! apply_patch(&Patch::replace("UserName", json!("babs")), &mut user, &schema).unwrap();
//!
//! assert_eq!(
//!     serde_json::Value::from(user),
//!     json!({
//!         "userName": "babs",
//!         "emails": [{"value": "babs@jensen.org", "type": "home"}]
//!     })
//! );
//! ```

pub mod error;
pub mod patch;
pub mod predicate;
pub mod resource;
pub mod schema;

pub use error::{PatchError, ValidationError};
pub use patch::{
    apply_patch, apply_patch_with, validate_modification, Modification, OpKind, Patch, PatchOptions,
    PATCH_OP_URN,
};
pub use predicate::{evaluate, Predicate};
pub use resource::{Container, Containers, MultiValued, Resource};
pub use schema::{
    common_attributes, Attribute, AttributeScope, AttributeType, Mutability, ResolvedAttribute,
    Returned, Schema, Uniqueness,
};
