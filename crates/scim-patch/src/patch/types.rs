//! PATCH request types (RFC 7644 section 3.5.2).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::apply::apply_patch_with;
use super::validate::validate_modification;
use crate::error::{PatchError, ValidationError};
use crate::resource::Resource;
use crate::schema::Schema;

/// The message URN every PATCH request must declare.
pub const PATCH_OP_URN: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// The three PATCH operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Add,
    Remove,
    Replace,
}

impl OpKind {
    /// Case-insensitive parse of an `op` token.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("add") {
            Some(OpKind::Add)
        } else if token.eq_ignore_ascii_case("remove") {
            Some(OpKind::Remove)
        } else if token.eq_ignore_ascii_case("replace") {
            Some(OpKind::Replace)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One PATCH operation as it appears on the wire. `op` is kept as text so
/// unknown tokens survive decoding and are reported by validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub op: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Patch {
    pub fn new(op: OpKind, path: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            op: op.as_str().to_string(),
            path: path.into(),
            value,
        }
    }

    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self::new(OpKind::Add, path, Some(value))
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self::new(OpKind::Remove, path, None)
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self::new(OpKind::Replace, path, Some(value))
    }

    /// Attach a payload, e.g. to a remove-by-value request.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn kind(&self) -> Option<OpKind> {
        OpKind::parse(&self.op)
    }
}

/// The PATCH request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    #[serde(default)]
    pub schemas: Vec<String>,
    #[serde(rename = "Operations", default)]
    pub operations: Vec<Patch>,
}

impl Modification {
    pub fn new(operations: Vec<Patch>) -> Self {
        Self {
            schemas: vec![PATCH_OP_URN.to_string()],
            operations,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_modification(self)
    }

    /// Validate, then apply each operation in order. Stops at the first
    /// failure; operations before it stay applied.
    pub fn apply(
        &self,
        resource: &mut Resource,
        schema: &Schema,
        options: &PatchOptions,
    ) -> Result<(), PatchError> {
        self.validate()?;
        for patch in &self.operations {
            apply_patch_with(patch, resource, schema, options)?;
        }
        Ok(())
    }
}

/// Switches for the compatibility behaviour applied before each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOptions {
    /// Rewrite `remove` on a multi-valued attribute carrying a `value`
    /// payload into a filtered remove of the matching element.
    pub remove_by_value: bool,
    /// Unwrap `{"value": x}` / `[{"value": x}]` payloads for single-valued
    /// string and boolean attributes, coercing an unwrapped `"True"`/`"False"`.
    pub normalize_values: bool,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            remove_by_value: true,
            normalize_values: true,
        }
    }
}
