//! Resource documents and navigation to the containers a patch mutates.

use scim_path::{Filter, Path};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PatchError;
use crate::predicate::evaluate;
use crate::schema::{Attribute, AttributeScope, Schema};

/// A SCIM resource: a top-level JSON object, mutated in place by patches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource {
    data: Map<String, Value>,
}

impl Resource {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.data
    }

    /// Top-level value by exact key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// The containers that directly hold the attribute after `base`.
    ///
    /// An empty `base` yields the resource root (or, for an extension-qualified
    /// path, the extension object). A filter on a segment of `base` yields one
    /// container per matching element. With `create`, missing single-valued
    /// complex attributes along the way are created as empty objects.
    pub fn containers(
        &mut self,
        base: &Path,
        schema: &Schema,
        create: bool,
    ) -> Result<Containers<'_>, PatchError> {
        let extension = base.schema.as_deref().and_then(|urn| schema.extension(urn));
        let root = match extension {
            Some(ext) => match child_slot(&mut self.data, &ext.id, create) {
                Some(Value::Object(map)) => map,
                Some(Value::Null) | None => return Ok(Containers::default()),
                Some(_) => return Err(PatchError::InvalidBase(ext.id.clone())),
            },
            None => &mut self.data,
        };

        if base.is_empty() {
            return Ok(Containers::from(vec![Container::Mapping(root)]));
        }

        let chain = schema
            .lookup(base)
            .map(|found| found.chain)
            .ok_or_else(|| PatchError::NoAttribute(base.to_string()))?;

        let mut parents = vec![root];
        let mut reached = Vec::new();
        for (i, (segment, attr)) in base.segments.iter().zip(chain).enumerate() {
            let creatable = create && attr.is_complex() && !attr.multi_valued;
            reached = std::mem::take(&mut parents)
                .into_iter()
                .filter_map(|parent| child_slot(parent, &segment.name, creatable))
                .collect();

            if let Some(filter) = &segment.filter {
                reached = select_elements(reached, filter, attr);
            }
            if i + 1 == base.len() {
                break;
            }

            for value in std::mem::take(&mut reached) {
                match value {
                    Value::Object(map) => parents.push(map),
                    Value::Array(items) => {
                        for item in items.iter_mut() {
                            match item {
                                Value::Object(map) => parents.push(map),
                                Value::Null => {}
                                _ => return Err(PatchError::NonMappingElement(base.to_string())),
                            }
                        }
                    }
                    Value::Null => {}
                    _ => return Err(PatchError::InvalidBase(base.to_string())),
                }
            }
        }

        Ok(reached
            .into_iter()
            .filter(|value| !value.is_null())
            .map(Container::from)
            .collect::<Vec<_>>()
            .into())
    }
}

impl From<Map<String, Value>> for Resource {
    fn from(data: Map<String, Value>) -> Self {
        Self::new(data)
    }
}

impl TryFrom<Value> for Resource {
    type Error = PatchError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(data) => Ok(Self::new(data)),
            other => Err(PatchError::InvalidValue {
                path: String::new(),
                reason: format!("resource must be an object, got {other}"),
            }),
        }
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        Value::Object(resource.data)
    }
}

/// A mutable location inside a resource that holds the patch target.
#[derive(Debug)]
pub enum Container<'a> {
    Mapping(&'a mut Map<String, Value>),
    /// Every element receives the mutation.
    Sequence(&'a mut Vec<Value>),
    /// Anything else; mutating it is an error.
    Scalar(&'a mut Value),
}

impl<'a> From<&'a mut Value> for Container<'a> {
    fn from(value: &'a mut Value) -> Self {
        match value {
            Value::Object(map) => Container::Mapping(map),
            Value::Array(items) => Container::Sequence(items),
            other => Container::Scalar(other),
        }
    }
}

/// Containers reached by one navigation, consumed in document order.
#[derive(Debug, Default)]
pub struct Containers<'a> {
    inner: std::vec::IntoIter<Container<'a>>,
}

impl<'a> From<Vec<Container<'a>>> for Containers<'a> {
    fn from(containers: Vec<Container<'a>>) -> Self {
        Self { inner: containers.into_iter() }
    }
}

impl<'a> Iterator for Containers<'a> {
    type Item = Container<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// The value of a multi-valued attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiValued(Vec<Value>);

impl MultiValued {
    pub fn new(items: Vec<Value>) -> Self {
        Self(items)
    }

    /// Append to the end. An array appends each of its elements in order.
    pub fn add(&mut self, item: Value) {
        match item {
            Value::Array(items) => self.0.extend(items),
            item => self.0.push(item),
        }
    }

    /// The elements matching `filter`, in their original order.
    pub fn filter(self, filter: &Filter, scope: &dyn AttributeScope) -> MultiValued {
        Self(
            self.0
                .into_iter()
                .filter(|item| evaluate(filter, scope, item))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for MultiValued {
    fn from(items: Vec<Value>) -> Self {
        Self(items)
    }
}

impl From<MultiValued> for Value {
    fn from(items: MultiValued) -> Self {
        Value::Array(items.0)
    }
}

/// The key in `map` matching `name`, exactly or else ignoring ASCII case.
pub(crate) fn existing_key(map: &Map<String, Value>, name: &str) -> Option<String> {
    if map.contains_key(name) {
        return Some(name.to_string());
    }
    map.keys().find(|k| k.eq_ignore_ascii_case(name)).cloned()
}

fn child_slot<'a>(
    map: &'a mut Map<String, Value>,
    name: &str,
    create: bool,
) -> Option<&'a mut Value> {
    let key = existing_key(map, name).unwrap_or_else(|| name.to_string());
    if !create {
        return map.get_mut(&key);
    }
    let slot = map.entry(key).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Object(Map::new());
    }
    Some(slot)
}

fn select_elements<'a>(
    values: Vec<&'a mut Value>,
    filter: &Filter,
    scope: &Attribute,
) -> Vec<&'a mut Value> {
    let mut selected = Vec::new();
    for value in values {
        match value {
            Value::Array(items) => {
                selected.extend(items.iter_mut().filter(|item| evaluate(filter, scope, item)))
            }
            // A lone object stands in for a one-element collection.
            other => {
                if evaluate(filter, scope, other) {
                    selected.push(other);
                }
            }
        }
    }
    selected
}
