mod common;

use common::fixtures::{group_schema, user_schema, user_schema_core, ENTERPRISE_URN, USER_URN};
use scim_patch::{AttributeType, Mutability, Schema};
use scim_path::{Path, PathParser, Segment};

fn full_path(schema: &Schema, text: &str) -> Option<String> {
    let path = PathParser::parse_path(text).unwrap_or_else(|e| panic!("'{text}' must parse: {e}"));
    schema.get_attribute(&path).map(|attr| attr.full_path)
}

#[test]
fn full_path_matrix() {
    let schema = user_schema();
    let qualified_user_name = format!("{USER_URN}:userName");
    let qualified_meta = format!("{USER_URN}:meta.version");
    let qualified_manager = format!("{ENTERPRISE_URN}:manager.DISPLAYNAME");
    let cases = [
        ("schemas", "schemas".to_string()),
        ("ID", "id".to_string()),
        ("meta.Created", "meta.created".to_string()),
        ("Name.familyName", format!("{USER_URN}:name.familyName")),
        ("groups[type eq \"direct\"].value", format!("{USER_URN}:groups.value")),
        ("EMAILS", format!("{USER_URN}:emails")),
        (qualified_user_name.as_str(), format!("{USER_URN}:userName")),
        (qualified_meta.as_str(), "meta.version".to_string()),
        ("employeeNumber", format!("{ENTERPRISE_URN}:employeeNumber")),
        (qualified_manager.as_str(), format!("{ENTERPRISE_URN}:manager.displayName")),
    ];
    for (text, expected) in cases {
        assert_eq!(full_path(&schema, text).as_deref(), Some(expected.as_str()), "{text}");
    }
}

#[test]
fn unresolvable_paths() {
    let schema = user_schema();
    let wrong_owner = format!("{ENTERPRISE_URN}:userName");
    for text in [
        "nickname.value",
        "bogus",
        "emails.bogus",
        "urn:example:unknown:userName",
        wrong_owner.as_str(),
    ] {
        assert_eq!(full_path(&schema, text), None, "{text}");
    }

    // Extension attributes are unreachable once the extension is detached.
    assert_eq!(full_path(&user_schema_core(), "employeeNumber"), None);
}

#[test]
fn spelling_variants_resolve_to_one_attribute() {
    let schema = user_schema();
    let canonical = full_path(&schema, "name.familyName");
    for text in ["Name.familyName", "name.FAMILYNAME", "NAME.FamilyName"] {
        assert_eq!(full_path(&schema, text), canonical, "{text}");
    }
}

#[test]
fn resolve_rewrites_path_casing() {
    let schema = user_schema();
    let mut path = PathParser::parse_path("Emails[TYPE eq \"work\" and Primary eq true].VALUE").unwrap();
    let attr = schema.resolve(&mut path).unwrap();
    assert_eq!(attr.attr_type, AttributeType::String);
    assert_eq!(path.to_string(), "emails[type eq \"work\" and primary eq true].value");

    let mut qualified = Path::new(
        Some(ENTERPRISE_URN.to_uppercase()),
        vec![Segment::new("DEPARTMENT")],
    );
    assert!(schema.correct_case(&mut qualified));
    assert_eq!(qualified.to_string(), format!("{ENTERPRISE_URN}:department"));
}

#[test]
fn schema_documents_deserialize_with_metadata() {
    let schema = user_schema();
    let groups = schema.attribute("GROUPS").unwrap();
    assert!(groups.multi_valued);
    assert_eq!(groups.mutability, Mutability::ReadOnly);
    assert_eq!(groups.sub_attribute("type").unwrap().canonical_values, vec!["direct", "indirect"]);

    let members = group_schema().attribute("members").cloned().unwrap();
    assert_eq!(members.sub_attribute("value").unwrap().mutability, Mutability::Immutable);
    assert_eq!(schema.extension(ENTERPRISE_URN).map(|ext| ext.attributes.len()), Some(6));
}
