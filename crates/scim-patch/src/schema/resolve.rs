//! Resolution of attribute paths against a schema and its extensions.

use std::ops::Deref;

use scim_path::{Filter, Path};

use super::common::common_attributes;
use super::types::{find_by_name, Attribute, Schema};

/// An attribute definition together with its fully qualified name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute<'s> {
    pub attribute: &'s Attribute,
    /// `urn:name.sub`, or bare `name.sub` for common attributes.
    pub full_path: String,
    /// URN of the owning schema; `None` for common attributes.
    pub schema: Option<&'s str>,
}

impl Deref for ResolvedAttribute<'_> {
    type Target = Attribute;

    fn deref(&self) -> &Attribute {
        self.attribute
    }
}

/// A place attributes can be looked up in: the schema root, or the
/// sub-attributes of a complex attribute.
pub trait AttributeScope {
    /// Case-insensitive lookup of a path relative to this scope.
    fn find_attribute(&self, path: &Path) -> Option<&Attribute>;
}

impl AttributeScope for Schema {
    fn find_attribute(&self, path: &Path) -> Option<&Attribute> {
        self.lookup(path).and_then(|found| found.chain.last().copied())
    }
}

impl AttributeScope for Attribute {
    fn find_attribute(&self, path: &Path) -> Option<&Attribute> {
        // `value` on a multi-valued primitive names the element itself.
        if self.sub_attributes.is_empty()
            && path.len() == 1
            && path.segments[0].name.eq_ignore_ascii_case("value")
        {
            return Some(self);
        }
        walk(&self.sub_attributes, path).and_then(|chain| chain.last().copied())
    }
}

/// Result of walking a path through a schema.
pub(crate) struct Resolution<'s> {
    /// Definition matched by each segment, in order.
    pub chain: Vec<&'s Attribute>,
    /// Owning schema; `None` for common attributes.
    pub owner: Option<&'s Schema>,
}

impl<'s> Resolution<'s> {
    fn full_path(&self) -> String {
        let dotted = self
            .chain
            .iter()
            .map(|attr| attr.name.as_str())
            .collect::<Vec<_>>()
            .join(".");
        match self.owner {
            Some(schema) => format!("{}:{}", schema.id, dotted),
            None => dotted,
        }
    }

    fn into_resolved(self) -> Option<ResolvedAttribute<'s>> {
        let full_path = self.full_path();
        let attribute = *self.chain.last()?;
        Some(ResolvedAttribute {
            attribute,
            full_path,
            schema: self.owner.map(|s| s.id.as_str()),
        })
    }
}

impl Schema {
    /// Look up the attribute a path refers to, without touching the path.
    pub fn get_attribute(&self, path: &Path) -> Option<ResolvedAttribute<'_>> {
        self.lookup(path)?.into_resolved()
    }

    /// Rewrite a path's segment names, schema qualifier and filter attribute
    /// names to their canonical casing. Returns `false`, leaving the path
    /// untouched, when the path does not resolve.
    pub fn correct_case(&self, path: &mut Path) -> bool {
        match self.lookup(path) {
            Some(found) => {
                self.apply_casing(path, &found);
                true
            }
            None => false,
        }
    }

    /// Case-correct the path and return the attribute it refers to.
    pub fn resolve(&self, path: &mut Path) -> Option<ResolvedAttribute<'_>> {
        let found = self.lookup(path)?;
        self.apply_casing(path, &found);
        found.into_resolved()
    }

    pub(crate) fn lookup(&self, path: &Path) -> Option<Resolution<'_>> {
        if path.is_empty() {
            return None;
        }

        if let Some(urn) = &path.schema {
            let owner = self.schema_for(urn)?;
            if let Some(chain) = walk(&owner.attributes, path) {
                return Some(Resolution { chain, owner: Some(owner) });
            }
            if std::ptr::eq(owner, self) {
                let chain = walk(common_attributes(), path)?;
                return Some(Resolution { chain, owner: None });
            }
            return None;
        }

        if let Some(chain) = walk(common_attributes(), path) {
            return Some(Resolution { chain, owner: None });
        }
        if let Some(chain) = walk(&self.attributes, path) {
            return Some(Resolution { chain, owner: Some(self) });
        }

        // Unqualified extension attributes must be unambiguous.
        let mut matches = self
            .extensions
            .iter()
            .filter_map(|ext| walk(&ext.attributes, path).map(|chain| (ext, chain)));
        let (owner, chain) = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(Resolution { chain, owner: Some(owner) })
    }

    fn apply_casing(&self, path: &mut Path, found: &Resolution<'_>) {
        for (segment, attr) in path.segments.iter_mut().zip(&found.chain) {
            segment.name.clone_from(&attr.name);
            if let Some(filter) = segment.filter.as_mut() {
                correct_filter_case(filter, attr);
            }
        }

        // Extension attributes live under their URN in the document, so the
        // qualifier is kept (or added) for them.
        path.schema = match found.owner {
            Some(owner) if !std::ptr::eq(owner, self) => Some(owner.id.clone()),
            Some(owner) if path.schema.is_some() => Some(owner.id.clone()),
            _ => None,
        };
    }
}

fn correct_filter_case(filter: &mut Filter, scope: &Attribute) {
    filter.for_each_comparison_mut(&mut |cmp_path: &mut Path| {
        if cmp_path.schema.is_some() {
            return;
        }
        if let Some(chain) = walk(&scope.sub_attributes, cmp_path) {
            for (segment, attr) in cmp_path.segments.iter_mut().zip(chain) {
                segment.name.clone_from(&attr.name);
            }
        }
    });
}

/// Match each segment name against the current scope, descending into
/// sub-attributes as it goes.
pub(crate) fn walk<'s>(attributes: &'s [Attribute], path: &Path) -> Option<Vec<&'s Attribute>> {
    let mut scope = attributes;
    let mut chain = Vec::with_capacity(path.len());
    for segment in &path.segments {
        let attr = find_by_name(scope, &segment.name)?;
        chain.push(attr);
        scope = &attr.sub_attributes;
    }
    Some(chain)
}
