//! Integration tests for error reporting
//!
//! These tests cover farthest-failure locations, name attribution,
//! fatal error kinds and rendering.

use fro::prelude::*;

fn bracket_list() -> Parser {
    compose([
        regex(r"~\["),
        seq(intp()).separator("~,").build(),
        regex(r"~\]"),
    ])
}

// ============================================================================
// Location Tests
// ============================================================================

#[test]
fn test_farthest_failure_location() {
    let err = bracket_list().parse_one("[1,2,X]").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Failure);
    assert_eq!(err.line(), 1);
    assert_eq!(err.column(), 6);
    assert!(err
        .messages
        .iter()
        .any(|m| m.message == "Expected pattern '-?[0-9]+'"));
}

#[test]
fn test_error_line_across_chunks() {
    let words = seq(regex(r"[a-z]+\n")).build();
    let err = words.parse_str("abc\ndef\n12\n").unwrap_err();
    assert_eq!(err.line(), 3);
    assert_eq!(err.column(), 1);
}

#[test]
fn test_column_counts_characters() {
    let parser = compose([regex("~é+"), regex("x")]);
    let err = parser.parse_one("ééy").unwrap_err();
    assert_eq!(err.column(), 3);
}

#[test]
fn test_nested_error_at_first_unmatched_open() {
    let err = nested(r"\(", r"\)")
        .parse_one("((hey there)(goodbye)")
        .unwrap_err();
    assert_eq!(err.column(), 1);
    assert_eq!(
        err.messages[0].message,
        r"No closing '\)' to match opening '\('"
    );
}

// ============================================================================
// Name Attribution Tests
// ============================================================================

#[test]
fn test_names_attach_to_innermost_named_parser() {
    let p1 = compose(["a", "b", "[0-9]{2}"]).name("p1");
    let parser = alt([p1, regex("a")]);
    let err = parser.parse_one("ab0").unwrap_err();
    assert_eq!(err.column(), 3);
    assert_eq!(err.names().collect::<Vec<_>>(), vec!["p1"]);
}

#[test]
fn test_inner_name_shadows_outer_name() {
    let number = intp().name("number");
    let pair = compose_sep([number.clone(), number], "~,").name("pair");
    let err = pair.parse_one("1,x").unwrap_err();
    assert_eq!(err.names().collect::<Vec<_>>(), vec!["number"]);
}

#[test]
fn test_sequence_builder_name() {
    let list = seq(regex("[a-z]")).separator("~,").name("letters").build();
    assert_eq!(list.label(), Some("letters"));
    let err = compose([list, regex(";")]).parse_one("a,b,").unwrap_err();
    assert!(err.names().any(|n| n == "letters"));
}

#[test]
fn test_renaming_is_idempotent() {
    let once = intp().name("n");
    let twice = intp().name("n").name("n");
    let a = once.parse_one("x").unwrap_err();
    let b = twice.parse_one("x").unwrap_err();
    assert_eq!(a.to_string(), b.to_string());
}

// ============================================================================
// Fatal Error Tests
// ============================================================================

#[test]
fn test_failed_lookahead_is_fatal() {
    let list = seq(intp()).separator("~,").build();
    let err = list.parse(vec!["1,", "x"]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::FailedLookahead);
    assert!(err.messages[0].message.starts_with("Failed lookahead"));
    assert_eq!(err.line(), 2);
    assert_eq!(err.column(), 1);
}

#[test]
fn test_failed_lookahead_is_not_caught_by_alternation() {
    let parser = alt([compose([regex("a"), regex("c")]), regex("ab")]);
    let err = parser.parse(vec!["a", "b"]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::FailedLookahead);
}

#[test]
fn test_application_error_located_at_start() {
    let word = regex("[a-z]+")
        .name("word")
        .try_map(|_v: Value| Err::<Value, _>("rejected"));
    let err = compose([regex("~x"), word]).parse_one("xabc").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Application);
    assert_eq!(err.column(), 2);
    assert_eq!(err.messages[0].message, "rejected");
    assert_eq!(err.names().collect::<Vec<_>>(), vec!["word"]);
}

#[test]
fn test_application_error_is_not_caught_by_maybe() {
    let failing = intp().try_map(|_v: Value| Err::<Value, _>("no"));
    let err = failing.maybe(0i64).parse_one("5").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Application);
}

#[test]
fn test_get_on_wrong_arity_is_application_error() {
    let err = compose(["a", "b"]).get().parse_one("ab").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Application);
    assert_eq!(err.messages[0].message, "expected a single value, found 2");
}

#[test]
fn test_reducer_error() {
    let positive = seq(intp())
        .separator("~,")
        .reduce(|elements: &mut Elements<'_>| {
            let mut total = 0;
            for v in elements {
                match v.as_int() {
                    Some(n) if n > 0 => total += n,
                    _ => return Err(format!("not positive: {}", v)),
                }
            }
            Ok(total)
        })
        .build();
    assert_eq!(positive.parse_one("1,2").unwrap(), Some(Value::int(3)));
    let err = positive.parse_one("1,-2").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Application);
    assert_eq!(err.column(), 1);
}

#[test]
fn test_error_kind_fatality() {
    assert!(!ErrorKind::Failure.is_fatal());
    assert!(ErrorKind::FailedLookahead.is_fatal());
    assert!(ErrorKind::Application.is_fatal());
    assert!(ErrorKind::Misuse.is_fatal());
    assert!(ErrorKind::RecursionLimit.is_fatal());
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_error_display() {
    let err = bracket_list().parse_one("[1,2,X]").unwrap_err();
    let rendered = err.to_string();
    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some("Error at line 1, column 6:"));
    assert_eq!(lines.next(), Some("[1,2,X]"));
    assert_eq!(lines.next(), Some("     ^"));
    assert!(lines.all(|line| line.starts_with("- ")));
}

#[test]
fn test_error_display_includes_name() {
    let err = intp().name("count").parse_one("x").unwrap_err();
    assert!(err
        .to_string()
        .contains("- Expected pattern '-?[0-9]+' (when parsing count)"));
}

#[test]
fn test_error_context_escapes_control_characters() {
    let err = regex("a").parse_one("\tb").unwrap_err();
    assert_eq!(err.context(), "\\tb\n^");
}

#[test]
fn test_error_to_json() {
    let err = bracket_list().parse_one("[1,2,X]").unwrap_err();
    let json: serde_json::Value = serde_json::from_str(&err.to_json().unwrap()).unwrap();
    assert_eq!(json["kind"], "Failure");
    assert_eq!(json["line"], 1);
    assert_eq!(json["column"], 6);
    assert_eq!(json["context"], "[1,2,X]");
    assert!(json["messages"].as_array().map_or(false, |m| !m.is_empty()));
}

#[test]
fn test_parse_error_is_std_error() {
    fn takes_error(_: &dyn std::error::Error) {}
    let err = regex("a").parse_one("b").unwrap_err();
    takes_error(&err);
}
