//! SCIM PATCH (RFC 7644 section 3.5.2).
//!
//! # Operations
//!
//! `add`, `remove` and `replace`, addressed by attribute path. A path may
//! select elements of a multi-valued attribute with a filter, in which case
//! the operation applies to every matching element.
//!
//! Two compatibility rewrites run before dispatch, both on by default
//! (see [`PatchOptions`]): remove-by-value and value unwrapping.

pub mod apply;
pub mod normalize;
pub mod types;
pub mod validate;

pub use apply::{apply_patch, apply_patch_with};
pub use normalize::{normalize_value, remove_by_value};
pub use types::{Modification, OpKind, Patch, PatchOptions, PATCH_OP_URN};
pub use validate::{validate_modification, validate_patch};
