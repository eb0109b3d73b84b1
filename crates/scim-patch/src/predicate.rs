//! Filter evaluation against JSON fragments.
//!
//! Comparison semantics follow RFC 7644 section 3.4.2.2: strings compare
//! case-insensitively unless the attribute is `caseExact`, `dateTime` values
//! order lexically, numbers order numerically, and a missing attribute makes
//! every comparison false.

use std::borrow::Cow;
use std::cmp::Ordering;

use scim_path::{CompareOp, Filter, LogicalOp, Path};
use serde_json::Value;

use crate::schema::{Attribute, AttributeScope, AttributeType};

/// A filter bound to the scope its attribute paths resolve in.
pub struct Predicate<'a> {
    filter: &'a Filter,
    scope: &'a dyn AttributeScope,
}

impl<'a> Predicate<'a> {
    pub fn new(filter: &'a Filter, scope: &'a dyn AttributeScope) -> Self {
        Self { filter, scope }
    }

    pub fn evaluate(&self, fragment: &Value) -> bool {
        evaluate(self.filter, self.scope, fragment)
    }
}

/// Evaluate `filter` against `fragment`, typing attributes through `scope`.
pub fn evaluate(filter: &Filter, scope: &dyn AttributeScope, fragment: &Value) -> bool {
    match filter {
        Filter::Comparison { path, op, value } => {
            let attr = scope.find_attribute(path);
            let candidates = select(fragment, path);
            match op {
                CompareOp::Present => !candidates.is_empty(),
                _ => candidates
                    .into_iter()
                    .any(|actual| compare(*op, actual, value, attr)),
            }
        }
        Filter::Logical { op: LogicalOp::And, left, right } => {
            evaluate(left, scope, fragment) && evaluate(right, scope, fragment)
        }
        Filter::Logical { op: LogicalOp::Or, left, right } => {
            evaluate(left, scope, fragment) || evaluate(right, scope, fragment)
        }
        Filter::Not(inner) => !evaluate(inner, scope, fragment),
    }
}

/// Collect the non-null values `path` reaches in `fragment`. Arrays met on
/// the way, or at the end, contribute each of their elements.
fn select<'v>(fragment: &'v Value, path: &Path) -> Vec<&'v Value> {
    let start = match (&path.schema, fragment) {
        (Some(urn), Value::Object(map)) => get_ignore_case(map, urn).unwrap_or(fragment),
        _ => fragment,
    };

    let mut current = vec![start];
    for segment in &path.segments {
        let mut next = Vec::new();
        for value in current {
            step(value, &segment.name, &mut next);
        }
        current = next;
    }

    let mut out = Vec::with_capacity(current.len());
    for value in current {
        match value {
            Value::Null => {}
            Value::Array(items) => out.extend(items.iter().filter(|v| !v.is_null())),
            other => out.push(other),
        }
    }
    out
}

fn step<'v>(value: &'v Value, name: &str, out: &mut Vec<&'v Value>) {
    match value {
        Value::Object(map) => {
            if let Some(child) = get_ignore_case(map, name) {
                out.push(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                step(item, name, out);
            }
        }
        Value::Null => {}
        // `value` on a primitive element of a multi-valued attribute is the element.
        primitive => {
            if name.eq_ignore_ascii_case("value") {
                out.push(primitive);
            }
        }
    }
}

fn get_ignore_case<'v>(map: &'v serde_json::Map<String, Value>, key: &str) -> Option<&'v Value> {
    map.get(key).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn compare(op: CompareOp, actual: &Value, expected: &Value, attr: Option<&Attribute>) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(b)) => {
            let fold = attr
                .map(|def| !def.case_exact && def.attr_type != AttributeType::DateTime)
                .unwrap_or(true);
            let (a, b) = if fold {
                (Cow::Owned(a.to_lowercase()), Cow::Owned(b.to_lowercase()))
            } else {
                (Cow::Borrowed(a.as_str()), Cow::Borrowed(b.as_str()))
            };
            match op {
                CompareOp::Contains => a.contains(b.as_ref()),
                CompareOp::StartsWith => a.starts_with(b.as_ref()),
                CompareOp::EndsWith => a.ends_with(b.as_ref()),
                _ => ordered(op, Some(a.cmp(&b))),
            }
        }
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => ordered(op, a.partial_cmp(&b)),
            _ => false,
        },
        (Value::Bool(a), Value::Bool(b)) => match op {
            CompareOp::Equal => a == b,
            CompareOp::NotEqual => a != b,
            _ => false,
        },
        _ => op == CompareOp::NotEqual,
    }
}

fn ordered(op: CompareOp, ord: Option<Ordering>) -> bool {
    let Some(ord) = ord else {
        return op == CompareOp::NotEqual;
    };
    match op {
        CompareOp::Equal => ord == Ordering::Equal,
        CompareOp::NotEqual => ord != Ordering::Equal,
        CompareOp::Greater => ord == Ordering::Greater,
        CompareOp::GreaterEqual => ord != Ordering::Less,
        CompareOp::Less => ord == Ordering::Less,
        CompareOp::LessEqual => ord != Ordering::Greater,
        CompareOp::Contains | CompareOp::StartsWith | CompareOp::EndsWith | CompareOp::Present => {
            false
        }
    }
}
