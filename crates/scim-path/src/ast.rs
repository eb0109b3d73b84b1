//! AST construction helpers.

use crate::types::*;
use serde_json::Value;

/// Helper functions for constructing path and filter nodes.
pub struct Ast;

impl Ast {
    /// Create an unqualified path from segments.
    pub fn path(segments: Vec<Segment>) -> Path {
        Path::new(None, segments)
    }

    /// Create a schema-qualified path.
    pub fn qualified(schema: impl Into<String>, segments: Vec<Segment>) -> Path {
        Path::new(Some(schema.into()), segments)
    }

    /// Create a plain segment.
    pub fn segment(name: impl Into<String>) -> Segment {
        Segment::new(name)
    }

    /// Create a segment carrying an element filter.
    pub fn filtered(name: impl Into<String>, filter: Filter) -> Segment {
        Segment::filtered(name, filter)
    }

    /// Create a dotted attribute path, e.g. `Ast::attr("name.familyName")`.
    pub fn attr(dotted: &str) -> Path {
        Path::new(None, dotted.split('.').map(Segment::new).collect())
    }

    /// Create a comparison leaf.
    pub fn compare(path: Path, op: CompareOp, value: Value) -> Filter {
        Filter::Comparison { path, op, value }
    }

    /// Create an `eq` comparison against a dotted attribute.
    pub fn eq(dotted: &str, value: Value) -> Filter {
        Self::compare(Self::attr(dotted), CompareOp::Equal, value)
    }

    /// Create a `pr` comparison.
    pub fn present(dotted: &str) -> Filter {
        Self::compare(Self::attr(dotted), CompareOp::Present, Value::Null)
    }

    /// Create a logical node.
    pub fn logical(op: LogicalOp, left: Filter, right: Filter) -> Filter {
        Filter::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a negation.
    pub fn not(filter: Filter) -> Filter {
        Filter::Not(Box::new(filter))
    }
}
