//! Path utility helpers.

use std::fmt;

use crate::types::{CompareOp, Filter, Path, Segment};

/// Split a leading schema URN off an attribute reference.
///
/// `urn:ietf:params:scim:schemas:core:2.0:User:name.familyName` splits into
/// the URN and `name.familyName`. Text that does not start with `urn:` is
/// returned unchanged.
pub fn split_urn(text: &str) -> (Option<&str>, &str) {
    let is_urn = text
        .get(..4)
        .map(|prefix| prefix.eq_ignore_ascii_case("urn:"))
        .unwrap_or(false);
    if !is_urn {
        return (None, text);
    }
    match text.rfind(':') {
        Some(idx) if idx >= 4 => (Some(&text[..idx]), &text[idx + 1..]),
        _ => (None, text),
    }
}

/// Render a path back to its textual form.
pub fn path_to_string(path: &Path) -> String {
    path.to_string()
}

/// Render a filter back to its textual form.
pub fn filter_to_string(filter: &Filter) -> String {
    filter.to_string()
}

/// Return the attribute names referenced by a filter's comparisons, dotted.
pub fn get_compared_attributes(filter: &Filter) -> Vec<String> {
    let mut out = Vec::new();
    collect_compared(filter, &mut out);
    out
}

fn collect_compared(filter: &Filter, out: &mut Vec<String>) {
    match filter {
        Filter::Comparison { path, .. } => out.push(path.names().collect::<Vec<_>>().join(".")),
        Filter::Logical { left, right, .. } => {
            collect_compared(left, out);
            collect_compared(right, out);
        }
        Filter::Not(inner) => collect_compared(inner, out),
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}:")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(filter) = &self.filter {
            write!(f, "[{filter}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Comparison { path, op, value } => {
                if *op == CompareOp::Present {
                    write!(f, "{path} pr")
                } else {
                    // serde_json renders string literals quoted and escaped.
                    write!(f, "{path} {} {value}", op.as_str())
                }
            }
            Filter::Logical { op, left, right } => {
                write!(f, "{left} {} ", op.as_str())?;
                // Left association means only a logical right operand needs grouping.
                match right.as_ref() {
                    Filter::Logical { .. } => write!(f, "({right})"),
                    _ => write!(f, "{right}"),
                }
            }
            Filter::Not(inner) => write!(f, "not ({inner})"),
        }
    }
}
