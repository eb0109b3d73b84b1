//! Attributes shared by every resource type (RFC 7643 section 3.1).
//!
//! These do not belong to any schema URN, so their fully qualified name is
//! the bare dotted path (`meta.created`).

use std::sync::OnceLock;

use super::types::{Attribute, AttributeType, Mutability};

pub fn common_attributes() -> &'static [Attribute] {
    static COMMON: OnceLock<Vec<Attribute>> = OnceLock::new();
    COMMON.get_or_init(|| {
        vec![
            Attribute::new("id", AttributeType::String)
                .case_exact()
                .mutability(Mutability::ReadOnly),
            Attribute::new("externalId", AttributeType::String).case_exact(),
            Attribute::new("schemas", AttributeType::Reference)
                .multi_valued()
                .case_exact(),
            Attribute::complex(
                "meta",
                vec![
                    Attribute::new("resourceType", AttributeType::String)
                        .case_exact()
                        .mutability(Mutability::ReadOnly),
                    Attribute::new("created", AttributeType::DateTime)
                        .mutability(Mutability::ReadOnly),
                    Attribute::new("lastModified", AttributeType::DateTime)
                        .mutability(Mutability::ReadOnly),
                    Attribute::new("location", AttributeType::Reference)
                        .case_exact()
                        .mutability(Mutability::ReadOnly),
                    Attribute::new("version", AttributeType::String)
                        .case_exact()
                        .mutability(Mutability::ReadOnly),
                ],
            )
            .mutability(Mutability::ReadOnly),
        ]
    })
}
