//! SCIM attribute path and filter types.

use serde_json::Value;

/// Comparison operators of the SCIM filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `eq`
    Equal,
    /// `ne`
    NotEqual,
    /// `co`
    Contains,
    /// `sw`
    StartsWith,
    /// `ew`
    EndsWith,
    /// `gt`
    Greater,
    /// `ge`
    GreaterEqual,
    /// `lt`
    Less,
    /// `le`
    LessEqual,
    /// `pr`
    Present,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Equal => "eq",
            CompareOp::NotEqual => "ne",
            CompareOp::Contains => "co",
            CompareOp::StartsWith => "sw",
            CompareOp::EndsWith => "ew",
            CompareOp::Greater => "gt",
            CompareOp::GreaterEqual => "ge",
            CompareOp::Less => "lt",
            CompareOp::LessEqual => "le",
            CompareOp::Present => "pr",
        }
    }

    /// Look up an operator token, ignoring ASCII case.
    pub fn from_token(token: &str) -> Option<Self> {
        const ALL: [CompareOp; 10] = [
            CompareOp::Equal,
            CompareOp::NotEqual,
            CompareOp::Contains,
            CompareOp::StartsWith,
            CompareOp::EndsWith,
            CompareOp::Greater,
            CompareOp::GreaterEqual,
            CompareOp::Less,
            CompareOp::LessEqual,
            CompareOp::Present,
        ];
        ALL.into_iter().find(|op| op.as_str().eq_ignore_ascii_case(token))
    }
}

/// Logical combinators joining two filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

/// Filter expression tree.
///
/// `Not` owns exactly one child and `Logical` exactly two; the shape is
/// enforced by the type rather than checked at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Leaf comparison: `userName eq "bjensen"`, `title pr`.
    ///
    /// `value` is `Value::Null` for `pr`.
    Comparison {
        path: Path,
        op: CompareOp,
        value: Value,
    },
    /// `a and b`, `a or b`
    Logical {
        op: LogicalOp,
        left: Box<Filter>,
        right: Box<Filter>,
    },
    /// `not (a)`
    Not(Box<Filter>),
}

impl Filter {
    /// Negate this filter.
    pub fn negate(self) -> Filter {
        Filter::Not(Box::new(self))
    }

    /// Join this filter with another under `and`.
    pub fn and(self, other: Filter) -> Filter {
        Filter::Logical {
            op: LogicalOp::And,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Visit every comparison leaf mutably, left to right.
    pub fn for_each_comparison_mut(&mut self, f: &mut dyn FnMut(&mut Path)) {
        match self {
            Filter::Comparison { path, .. } => f(path),
            Filter::Logical { left, right, .. } => {
                left.for_each_comparison_mut(f);
                right.for_each_comparison_mut(f);
            }
            Filter::Not(inner) => inner.for_each_comparison_mut(f),
        }
    }
}

/// One dotted component of a path, with an optional element filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub filter: Option<Filter>,
}

impl Segment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), filter: None }
    }

    pub fn filtered(name: impl Into<String>, filter: Filter) -> Self {
        Self { name: name.into(), filter: Some(filter) }
    }
}

/// Attribute path: `urn:...:User:emails[type eq "work"].value`.
///
/// An empty path (no segments) denotes the resource root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    /// Schema URN qualifier, when the path was written fully qualified.
    pub schema: Option<String>,
    pub segments: Vec<Segment>,
}

impl Path {
    pub fn new(schema: Option<String>, segments: Vec<Segment>) -> Self {
        Self { schema, segments }
    }

    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Segment> {
        self.segments.last_mut()
    }

    /// Segment names in order, ignoring filters.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.name.as_str())
    }

    /// The first filter attached to any segment.
    pub fn filter(&self) -> Option<&Filter> {
        self.segments.iter().find_map(|s| s.filter.as_ref())
    }

    /// Split into the parent path and the terminal segment.
    ///
    /// The parent keeps the schema qualifier. Returns `None` for the root path.
    pub fn split_last(&self) -> Option<(Path, &Segment)> {
        let (last, base) = self.segments.split_last()?;
        Some((Path::new(self.schema.clone(), base.to_vec()), last))
    }
}
