use scim_path::{Ast, CompareOp, Filter, LogicalOp, ParseErrorKind, PathParser};
use serde_json::json;

fn comparison(text: &str) -> (Vec<String>, CompareOp, serde_json::Value) {
    match PathParser::parse_filter(text).unwrap_or_else(|e| panic!("parse failed for '{text}': {e}")) {
        Filter::Comparison { path, op, value } => {
            (path.names().map(str::to_string).collect(), op, value)
        }
        other => panic!("expected comparison for '{text}', got {other:?}"),
    }
}

#[test]
fn every_operator_token_matrix() {
    let cases = [
        ("eq", CompareOp::Equal),
        ("ne", CompareOp::NotEqual),
        ("co", CompareOp::Contains),
        ("sw", CompareOp::StartsWith),
        ("ew", CompareOp::EndsWith),
        ("gt", CompareOp::Greater),
        ("ge", CompareOp::GreaterEqual),
        ("lt", CompareOp::Less),
        ("le", CompareOp::LessEqual),
    ];
    for (token, expected) in cases {
        let (names, op, value) = comparison(&format!("userName {token} \"x\""));
        assert_eq!(names, vec!["userName"]);
        assert_eq!(op, expected, "{token}");
        assert_eq!(value, json!("x"));
    }

    let (_, op, value) = comparison("title pr");
    assert_eq!(op, CompareOp::Present);
    assert!(value.is_null());
}

#[test]
fn rfc_examples_parse() {
    for text in [
        "userName eq \"bjensen\"",
        "name.familyName co \"O'Malley\"",
        "userName sw \"J\"",
        "urn:ietf:params:scim:schemas:core:2.0:User:userName sw \"J\"",
        "title pr",
        "meta.lastModified gt \"2011-05-13T04:42:34Z\"",
        "title pr and userType eq \"Employee\"",
        "title pr or userType eq \"Intern\"",
        "userType eq \"Employee\" and (emails co \"example.com\" or emails.value co \"example.org\")",
        "userType ne \"Employee\" and not (emails co \"example.com\" or emails.value co \"example.org\")",
    ] {
        PathParser::parse_filter(text).unwrap_or_else(|e| panic!("parse failed for '{text}': {e}"));
    }
}

#[test]
fn qualified_filter_attribute() {
    let filter =
        PathParser::parse_filter("urn:ietf:params:scim:schemas:core:2.0:User:name.givenName pr")
            .unwrap();
    match filter {
        Filter::Comparison { path, .. } => {
            assert_eq!(path.schema.as_deref(), Some("urn:ietf:params:scim:schemas:core:2.0:User"));
            assert_eq!(path.names().collect::<Vec<_>>(), vec!["name", "givenName"]);
        }
        other => panic!("unexpected tree: {other:?}"),
    }
}

#[test]
fn grouping_overrides_left_association() {
    let filter = PathParser::parse_filter("a pr and (b pr or c pr)").unwrap();
    assert_eq!(
        filter,
        Ast::logical(
            LogicalOp::And,
            Ast::present("a"),
            Ast::logical(LogicalOp::Or, Ast::present("b"), Ast::present("c")),
        )
    );
}

#[test]
fn path_segments_keep_caller_casing() {
    let path = PathParser::parse_path("Name.FAMILYNAME").unwrap();
    assert_eq!(path.names().collect::<Vec<_>>(), vec!["Name", "FAMILYNAME"]);
}

#[test]
fn malformed_input_matrix() {
    let cases: [(&str, ParseErrorKind, usize); 8] = [
        ("emails[type eq \"work\"", ParseErrorKind::UnexpectedEnd, 21),
        ("emails[type zz \"work\"]", ParseErrorKind::UnknownOperator("zz".into()), 12),
        ("emails[type eq \"work]", ParseErrorKind::UnclosedString, 15),
        ("emails]", ParseErrorKind::UnexpectedChar(']'), 6),
        ("emails[type eq work]", ParseErrorKind::UnexpectedChar('w'), 15),
        ("emails[type eq \"a\\q\"]", ParseErrorKind::InvalidEscape, 18),
        ("emails[type eq \"\\u+123\"]", ParseErrorKind::InvalidEscape, 18),
        ("emails[type eq \"\\u-0ab\"]", ParseErrorKind::InvalidEscape, 18),
    ];
    for (text, kind, offset) in cases {
        let err = PathParser::parse_path(text).expect_err(text);
        assert_eq!(err.kind, kind, "{text}");
        assert_eq!(err.offset, offset, "{text}");
        assert_eq!(err.input, text);
    }
}

#[test]
fn error_message_names_input_and_offset() {
    let err = PathParser::parse_filter("a eq").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("offset 4"), "{msg}");
    assert!(msg.contains("\"a eq\""), "{msg}");
}
