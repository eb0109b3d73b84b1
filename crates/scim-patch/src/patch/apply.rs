//! PATCH apply logic: add, remove and replace against a schema-described
//! resource.

use scim_path::{Filter, Path, PathParser, Segment};
use serde_json::{Map, Value};
use tracing::debug;

use super::normalize::{normalize_value, remove_by_value};
use super::types::{OpKind, Patch, PatchOptions};
use crate::error::PatchError;
use crate::resource::{existing_key, Container, MultiValued, Resource};
use crate::schema::{Attribute, Schema};

// ── Public API ─────────────────────────────────────────────────────────────

/// Apply one operation with the default compatibility options.
pub fn apply_patch(patch: &Patch, resource: &mut Resource, schema: &Schema) -> Result<(), PatchError> {
    apply_patch_with(patch, resource, schema, &PatchOptions::default())
}

/// Apply one operation. On error the resource may hold part of this
/// operation's changes; earlier operations are never undone.
pub fn apply_patch_with(
    patch: &Patch,
    resource: &mut Resource,
    schema: &Schema,
    options: &PatchOptions,
) -> Result<(), PatchError> {
    let kind = patch
        .kind()
        .ok_or_else(|| PatchError::InvalidOperation(patch.op.clone()))?;

    if patch.path.is_empty() {
        return match kind {
            OpKind::Add => apply_implicit_add(patch.value.as_ref(), resource, schema, options),
            other => Err(PatchError::MissingPath(other.as_str())),
        };
    }

    let mut path = PathParser::parse_path(&patch.path)?;
    let attr = schema
        .resolve(&mut path)
        .ok_or_else(|| PatchError::NoAttribute(patch.path.clone()))?;
    debug!(op = %kind, path = %patch.path, full_path = %attr.full_path, "applying patch operation");

    if options.remove_by_value {
        if let Some(rewritten) = remove_by_value(patch, &path, &attr)? {
            debug!(from = %patch.path, to = %rewritten.path, "remove with value payload rewritten as filter");
            return apply_patch_with(&rewritten, resource, schema, options);
        }
    }

    let target = Target { path: &path, attr: attr.attribute };
    match kind {
        OpKind::Add => {
            let value = prepare_value(patch, &target, options)?;
            apply_add(resource, schema, &target, value)
        }
        OpKind::Replace => {
            let value = prepare_value(patch, &target, options)?;
            apply_replace(resource, schema, &target, value)
        }
        OpKind::Remove => apply_remove(resource, schema, &target),
    }
}

// ── Targeting ──────────────────────────────────────────────────────────────

/// A resolved, case-corrected path and the attribute it names.
struct Target<'p, 's> {
    path: &'p Path,
    attr: &'s Attribute,
}

impl Target<'_, '_> {
    fn split(&self) -> Result<(Path, &Segment), PatchError> {
        self.path
            .split_last()
            .ok_or_else(|| PatchError::NoAttribute(self.path.to_string()))
    }

    /// Filter on the terminal segment of a multi-valued attribute.
    fn element_filter<'a>(&self, last: &'a Segment) -> Option<&'a Filter> {
        last.filter.as_ref().filter(|_| self.attr.multi_valued)
    }
}

fn prepare_value(patch: &Patch, target: &Target<'_, '_>, options: &PatchOptions) -> Result<Value, PatchError> {
    let kind = patch.kind().map(|k| k.as_str()).unwrap_or("patch");
    let value = patch.value.clone().ok_or(PatchError::MissingValue(kind))?;
    if options.normalize_values {
        normalize_value(target.attr, &patch.path, value)
    } else {
        Ok(value)
    }
}

/// Run `f` on every mapping that holds the terminal attribute.
fn for_each_mapping(
    container: Container<'_>,
    path: &Path,
    mut f: impl FnMut(&mut Map<String, Value>),
) -> Result<(), PatchError> {
    match container {
        Container::Mapping(map) => f(map),
        Container::Sequence(items) => {
            for item in items.iter_mut() {
                match item {
                    Value::Object(map) => f(map),
                    Value::Null => {}
                    _ => return Err(PatchError::NonMappingElement(path.to_string())),
                }
            }
        }
        Container::Scalar(_) => return Err(PatchError::InvalidBase(path.to_string())),
    }
    Ok(())
}

fn key_for(map: &Map<String, Value>, name: &str) -> String {
    existing_key(map, name).unwrap_or_else(|| name.to_string())
}

/// Overwrite the terminal field, whatever it held.
fn set_field(map: &mut Map<String, Value>, name: &str, value: Value) {
    let key = key_for(map, name);
    map.insert(key, value);
}

// ── Add ────────────────────────────────────────────────────────────────────

/// An add without a path: each top-level key becomes its own add. A schema
/// URN key carrying an object adds each of its fields under that URN.
fn apply_implicit_add(
    value: Option<&Value>,
    resource: &mut Resource,
    schema: &Schema,
    options: &PatchOptions,
) -> Result<(), PatchError> {
    let fields = match value {
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err(PatchError::ImplicitAddNotMapping),
        None => return Err(PatchError::MissingValue("add")),
    };

    for (key, value) in fields {
        match (schema.schema_for(key), value) {
            (Some(owner), Value::Object(owned_fields)) => {
                for (name, value) in owned_fields {
                    let patch = Patch::add(format!("{}:{}", owner.id, name), value.clone());
                    apply_patch_with(&patch, resource, schema, options)?;
                }
            }
            _ => apply_patch_with(&Patch::add(key.clone(), value.clone()), resource, schema, options)?,
        }
    }
    Ok(())
}

fn apply_add(
    resource: &mut Resource,
    schema: &Schema,
    target: &Target<'_, '_>,
    value: Value,
) -> Result<(), PatchError> {
    let (base, last) = target.split()?;
    for container in resource.containers(&base, schema, true)? {
        match container {
            Container::Mapping(map) => add_field(map, &last.name, target.attr, value.clone()),
            // Elements selected by the base get the field set, never appended.
            other => for_each_mapping(other, target.path, |map| set_field(map, &last.name, value.clone()))?,
        }
    }
    Ok(())
}

fn add_field(map: &mut Map<String, Value>, name: &str, attr: &Attribute, value: Value) {
    let key = key_for(map, name);
    if !attr.multi_valued {
        map.insert(key, value);
        return;
    }

    match map.get_mut(&key) {
        Some(Value::Array(items)) => {
            let mut collection = MultiValued::new(std::mem::take(items));
            collection.add(value);
            *items = collection.into_vec();
        }
        Some(single) if !single.is_null() => {
            let mut collection = MultiValued::new(vec![std::mem::take(single)]);
            collection.add(value);
            *single = collection.into();
        }
        _ => {
            let initial = match value {
                Value::Array(_) => value,
                other => Value::Array(vec![other]),
            };
            map.insert(key, initial);
        }
    }
}

// ── Replace ────────────────────────────────────────────────────────────────

/// Overwrites the terminal field in every container. A filter on the last
/// segment does not narrow the write: the whole field takes the value.
fn apply_replace(
    resource: &mut Resource,
    schema: &Schema,
    target: &Target<'_, '_>,
    value: Value,
) -> Result<(), PatchError> {
    let (base, last) = target.split()?;
    for container in resource.containers(&base, schema, true)? {
        for_each_mapping(container, target.path, |map| set_field(map, &last.name, value.clone()))?;
    }
    Ok(())
}

// ── Remove ─────────────────────────────────────────────────────────────────

fn apply_remove(resource: &mut Resource, schema: &Schema, target: &Target<'_, '_>) -> Result<(), PatchError> {
    let (base, last) = target.split()?;
    for container in resource.containers(&base, schema, false)? {
        for_each_mapping(container, target.path, |map| {
            remove_field(map, &last.name, target.element_filter(last), target.attr)
        })?;
    }
    Ok(())
}

/// Delete `name`, or with a filter keep only the elements it does not
/// match. A collection left empty is deleted.
fn remove_field(map: &mut Map<String, Value>, name: &str, filter: Option<&Filter>, attr: &Attribute) {
    let Some(key) = existing_key(map, name) else { return };
    let Some(filter) = filter else {
        map.shift_remove(&key);
        return;
    };
    let Some(slot) = map.get_mut(&key) else { return };

    let items = match std::mem::take(slot) {
        Value::Array(items) => items,
        Value::Null => return,
        single => vec![single],
    };
    let survivors = MultiValued::new(items).filter(&filter.clone().negate(), attr);
    if survivors.is_empty() {
        map.shift_remove(&key);
    } else {
        *slot = survivors.into();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
