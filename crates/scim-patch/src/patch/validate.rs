//! Structural checks on a PATCH envelope, run before anything is applied.

use serde_json::Value;

use super::types::{Modification, OpKind, Patch, PATCH_OP_URN};
use crate::error::ValidationError;

/// Validate a whole request. The first failing check wins.
pub fn validate_modification(modification: &Modification) -> Result<(), ValidationError> {
    match modification.schemas.as_slice() {
        [urn] if urn.eq_ignore_ascii_case(PATCH_OP_URN) => {}
        found => {
            return Err(ValidationError::UnsupportedSchemas {
                expected: PATCH_OP_URN,
                found: found.to_vec(),
            })
        }
    }
    if modification.operations.is_empty() {
        return Err(ValidationError::NoOperations);
    }
    for (index, patch) in modification.operations.iter().enumerate() {
        validate_patch(index, patch)?;
    }
    Ok(())
}

/// Validate one operation at position `index` of its request.
pub fn validate_patch(index: usize, patch: &Patch) -> Result<(), ValidationError> {
    let kind = patch.kind().ok_or_else(|| ValidationError::InvalidOperation {
        index,
        op: patch.op.clone(),
    })?;
    let value = patch.value.as_ref().filter(|v| !v.is_null());

    match kind {
        OpKind::Add => {
            let value = value.ok_or(ValidationError::MissingValue { index })?;
            if patch.path.is_empty() && !matches!(value, Value::Object(_)) {
                return Err(ValidationError::ImplicitAddNotMapping { index });
            }
        }
        OpKind::Replace => {
            if value.is_none() {
                return Err(ValidationError::MissingValue { index });
            }
            if patch.path.is_empty() {
                return Err(ValidationError::MissingPath { index });
            }
        }
        OpKind::Remove => {
            if patch.path.is_empty() {
                return Err(ValidationError::MissingPath { index });
            }
        }
    }
    Ok(())
}
