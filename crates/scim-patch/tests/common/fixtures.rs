#![allow(dead_code)]

use scim_patch::{Resource, Schema};
use serde_json::Value;

pub const USER_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
pub const ENTERPRISE_URN: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";
pub const GROUP_URN: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

const USER_SCHEMA: &str = include_str!("../fixtures/user_schema.json");
const ENTERPRISE_SCHEMA: &str = include_str!("../fixtures/enterprise_user_schema.json");
const GROUP_SCHEMA: &str = include_str!("../fixtures/group_schema.json");
const USER: &str = include_str!("../fixtures/user.json");
const GROUP: &str = include_str!("../fixtures/group.json");

fn parse<T: serde::de::DeserializeOwned>(name: &str, text: &str) -> T {
    serde_json::from_str(text).unwrap_or_else(|e| panic!("fixture {name} must parse: {e}"))
}

/// Core User schema without extensions.
pub fn user_schema_core() -> Schema {
    parse("user_schema.json", USER_SCHEMA)
}

/// Core User schema with the Enterprise User extension attached.
pub fn user_schema() -> Schema {
    user_schema_core().with_extension(parse("enterprise_user_schema.json", ENTERPRISE_SCHEMA))
}

pub fn group_schema() -> Schema {
    parse("group_schema.json", GROUP_SCHEMA)
}

pub fn user_json() -> Value {
    parse("user.json", USER)
}

pub fn user() -> Resource {
    Resource::try_from(user_json()).expect("user fixture is an object")
}

pub fn group() -> Resource {
    Resource::try_from(parse::<Value>("group.json", GROUP)).expect("group fixture is an object")
}
