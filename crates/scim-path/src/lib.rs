//! SCIM attribute paths and filters (RFC 7644 section 3.4.2.2).
//!
//! This crate parses the attribute-path and filter grammar used by SCIM
//! PATCH requests into a small tree, and renders trees back to text.
//!
//! # Example
//!
//! ```
//! use scim_path::{CompareOp, Filter, PathParser};
//! use serde_json::json;
//!
//! let path = PathParser::parse_path(r#"emails[type eq "work"].value"#).unwrap();
//! assert_eq!(path.segments.len(), 2);
//!
//! match path.segments[0].filter.as_ref().unwrap() {
//!     Filter::Comparison { op, value, .. } => {
//!         assert_eq!(*op, CompareOp::Equal);
//!         assert_eq!(value, &json!("work"));
//!     }
//!     _ => unreachable!(),
//! }
//!
//! assert_eq!(path.to_string(), r#"emails[type eq "work"].value"#);
//! ```

mod types;
pub use types::*;

mod ast;
pub use ast::Ast;

mod parser;
pub use parser::{ParseError, ParseErrorKind, PathParser};

mod util;
pub use util::{filter_to_string, get_compared_attributes, path_to_string, split_urn};
