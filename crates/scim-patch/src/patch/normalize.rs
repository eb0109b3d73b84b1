//! Rewrites for payload shapes some provisioning clients send that do not
//! follow RFC 7644 to the letter.

use scim_path::{Ast, Path};
use serde_json::Value;
use tracing::trace;

use super::types::{OpKind, Patch};
use crate::error::PatchError;
use crate::resource::existing_key;
use crate::schema::{Attribute, AttributeType};

/// Turn `remove` of a multi-valued attribute with a `{"value": x}` payload
/// into `remove attr[value eq x]`. `path` must already be resolved.
///
/// Returns `None` when the operation does not have that shape.
pub fn remove_by_value(
    patch: &Patch,
    path: &Path,
    attr: &Attribute,
) -> Result<Option<Patch>, PatchError> {
    let payload = match &patch.value {
        Some(value) if !value.is_null() => value,
        _ => return Ok(None),
    };
    if patch.kind() != Some(OpKind::Remove) || !attr.multi_valued {
        return Ok(None);
    }

    let needle = payload_value(payload)
        .filter(|v| matches!(v, Value::String(_) | Value::Number(_) | Value::Bool(_)))
        .ok_or_else(|| PatchError::InvalidValue {
            path: patch.path.clone(),
            reason: "remove payload carries no scalar `value`".to_string(),
        })?;

    let mut rewritten = path.clone();
    let Some(last) = rewritten.last_mut() else {
        return Ok(None);
    };
    let by_value = Ast::eq("value", needle.clone());
    last.filter = Some(match last.filter.take() {
        Some(existing) => existing.and(by_value),
        None => by_value,
    });

    Ok(Some(Patch::remove(rewritten.to_string())))
}

/// `x` out of `{"value": x}` or `[{"value": x}, ...]`; bare scalars as-is.
fn payload_value(payload: &Value) -> Option<&Value> {
    match payload {
        Value::Object(map) => existing_key(map, "value").and_then(|key| map.get(&key)),
        Value::Array(items) => match items.first()? {
            Value::Array(_) => None,
            first => payload_value(first),
        },
        scalar => Some(scalar),
    }
}

/// Unwrap object/array payloads aimed at single-valued string or boolean
/// attributes; an unwrapped `"True"`/`"False"` becomes a boolean for boolean
/// attributes. Bare scalars and every other attribute pass through untouched.
pub fn normalize_value(attr: &Attribute, path: &str, value: Value) -> Result<Value, PatchError> {
    let is_boolean = attr.attr_type == AttributeType::Boolean;
    if attr.multi_valued || !(is_boolean || attr.attr_type == AttributeType::String) {
        return Ok(value);
    }

    let wrapped = match value {
        wrapped @ (Value::Object(_) | Value::Array(_)) => wrapped,
        scalar => return Ok(scalar),
    };
    let inner = payload_value(&wrapped)
        .cloned()
        .ok_or_else(|| PatchError::InvalidValue {
            path: path.to_string(),
            reason: format!("expected a scalar or an object with `value`, got {wrapped}"),
        })?;
    trace!(path, from = %wrapped, to = %inner, "unwrapped value payload");

    let flag = match inner.as_str() {
        Some("True") if is_boolean => true,
        Some("False") if is_boolean => false,
        _ => return Ok(inner),
    };
    trace!(path, to = flag, "coerced boolean string");
    Ok(Value::Bool(flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scim_path::PathParser;
    use serde_json::json;

    fn members() -> Attribute {
        Attribute::complex(
            "members",
            vec![
                Attribute::new("value", AttributeType::String),
                Attribute::new("display", AttributeType::String),
            ],
        )
        .multi_valued()
    }

    fn rewrite(path: &str, value: Value) -> Result<Option<Patch>, PatchError> {
        let parsed = PathParser::parse_path(path).unwrap();
        remove_by_value(&Patch::remove(path).with_value(value), &parsed, &members())
    }

    #[test]
    fn payload_becomes_filter() {
        let patch = rewrite("members", json!({"value": "G1"})).unwrap().unwrap();
        assert_eq!(patch.path, "members[value eq \"G1\"]");
        assert_eq!(patch.value, None);

        let patch = rewrite("members", json!([{"value": "G2"}, {"value": "G3"}])).unwrap().unwrap();
        assert_eq!(patch.path, "members[value eq \"G2\"]");
    }

    #[test]
    fn existing_filter_is_narrowed() {
        let patch = rewrite("members[display sw \"A\"]", json!({"value": "G1"}))
            .unwrap()
            .unwrap();
        assert_eq!(patch.path, "members[display sw \"A\" and value eq \"G1\"]");
    }

    #[test]
    fn other_shapes_are_left_alone() {
        let path = PathParser::parse_path("members").unwrap();
        assert_eq!(remove_by_value(&Patch::remove("members"), &path, &members()).unwrap(), None);

        let title = Attribute::new("title", AttributeType::String);
        let patch = Patch::remove("title").with_value(json!("x"));
        let path = PathParser::parse_path("title").unwrap();
        assert_eq!(remove_by_value(&patch, &path, &title).unwrap(), None);

        let add = Patch::add("members", json!({"value": "G1"}));
        assert_eq!(remove_by_value(&add, &path, &members()).unwrap(), None);
    }

    #[test]
    fn payload_without_value_is_rejected() {
        assert!(matches!(
            rewrite("members", json!({"display": "x"})),
            Err(PatchError::InvalidValue { .. })
        ));
        assert!(rewrite("members", json!([])).is_err());
    }

    #[test]
    fn unwraps_and_coerces() {
        let active = Attribute::new("active", AttributeType::Boolean);
        assert_eq!(normalize_value(&active, "active", json!([{"value": "True"}])).unwrap(), json!(true));
        assert_eq!(normalize_value(&active, "active", json!({"value": "False"})).unwrap(), json!(false));
        assert_eq!(normalize_value(&active, "active", json!(true)).unwrap(), json!(true));

        let title = Attribute::new("title", AttributeType::String);
        assert_eq!(normalize_value(&title, "title", json!({"value": "Boss"})).unwrap(), json!("Boss"));
        assert_eq!(normalize_value(&title, "title", json!("True")).unwrap(), json!("True"));
        assert!(normalize_value(&title, "title", json!({"other": 1})).is_err());
    }

    #[test]
    fn only_exact_pascal_case_literals_coerce() {
        let active = Attribute::new("active", AttributeType::Boolean);
        for literal in ["TRUE", "false", "tRuE"] {
            let wrapped = json!({"value": literal});
            assert_eq!(normalize_value(&active, "active", wrapped).unwrap(), json!(literal));
        }
        assert_eq!(normalize_value(&active, "active", json!("True")).unwrap(), json!("True"));
    }

    #[test]
    fn structured_attributes_pass_through() {
        let name = Attribute::complex("name", vec![Attribute::new("givenName", AttributeType::String)]);
        let value = json!({"value": "kept"});
        assert_eq!(normalize_value(&name, "name", value.clone()).unwrap(), value);

        let schemas = Attribute::new("schemas", AttributeType::Reference).multi_valued();
        assert_eq!(normalize_value(&schemas, "schemas", json!(["a"])).unwrap(), json!(["a"]));

        let tags = Attribute::new("tags", AttributeType::String).multi_valued();
        assert_eq!(normalize_value(&tags, "tags", json!([{"value": "a"}])).unwrap(), json!([{"value": "a"}]));
    }
}
