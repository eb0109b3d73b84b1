mod common;

use common::fixtures::user_schema;
use proptest::prelude::*;
use scim_patch::{apply_patch, Patch, Resource};
use serde_json::{json, Value};

fn email() -> impl Strategy<Value = Value> {
    ("[a-z]{1,8}", prop::sample::select(vec!["work", "home", "other"]))
        .prop_map(|(user, kind)| json!({"value": format!("{user}@example.com"), "type": kind}))
}

fn user_with(emails: Vec<Value>) -> Resource {
    Resource::try_from(json!({"userName": "david", "emails": emails})).unwrap()
}

fn apply(resource: &mut Resource, patch: Patch) {
    apply_patch(&patch, resource, &user_schema()).unwrap();
}

proptest! {
    #[test]
    fn replace_is_idempotent(title in "[A-Za-z ]{0,16}", emails in prop::collection::vec(email(), 0..4)) {
        let mut once = user_with(emails);
        apply(&mut once, Patch::replace("title", json!(title)));
        let mut twice = once.clone();
        apply(&mut twice, Patch::replace("title", json!(title)));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn add_then_remove_restores_absence(nick in "[a-z]{1,12}", emails in prop::collection::vec(email(), 0..4)) {
        let original = user_with(emails);
        let mut resource = original.clone();
        apply(&mut resource, Patch::add("nickName", json!(nick)));
        prop_assert!(resource.get("nickName").is_some());
        apply(&mut resource, Patch::remove("nickName"));
        prop_assert_eq!(resource, original);
    }

    #[test]
    fn multi_valued_add_grows_by_incoming_count(
        existing in prop::collection::vec(email(), 1..5),
        incoming in prop::collection::vec(email(), 1..4),
    ) {
        let len = existing.len();
        let mut single = user_with(existing.clone());
        apply(&mut single, Patch::add("emails", incoming[0].clone()));
        let grown = single.get("emails").and_then(Value::as_array).unwrap();
        prop_assert_eq!(grown.len(), len + 1);
        prop_assert_eq!(grown.last(), Some(&incoming[0]));

        let mut many = user_with(existing);
        apply(&mut many, Patch::add("emails", Value::Array(incoming.clone())));
        let grown = many.get("emails").and_then(Value::as_array).unwrap();
        prop_assert_eq!(grown.len(), len + incoming.len());
        prop_assert_eq!(&grown[len..], incoming.as_slice());
    }

    #[test]
    fn filtered_remove_keeps_complement(emails in prop::collection::vec(email(), 0..6)) {
        let mut resource = user_with(emails.clone());
        apply(&mut resource, Patch::remove("emails[type eq \"work\"]"));

        let expected: Vec<Value> = emails
            .into_iter()
            .filter(|e| e["type"] != json!("work"))
            .collect();
        if expected.is_empty() {
            prop_assert_eq!(resource.get("emails"), None);
        } else {
            prop_assert_eq!(resource.get("emails"), Some(&Value::Array(expected)));
        }
    }

    #[test]
    fn attribute_casing_does_not_matter(mask in prop::collection::vec(any::<bool>(), 15)) {
        let canonical = "name.familyName";
        let varied: String = canonical
            .chars()
            .zip(mask.iter().cycle())
            .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
            .collect();

        let mut expected = user_with(vec![]);
        apply(&mut expected, Patch::add(canonical, json!("Qiu")));
        let mut actual = user_with(vec![]);
        apply(&mut actual, Patch::add(varied, json!("Qiu")));
        prop_assert_eq!(actual, expected);
    }
}
