//! Interpreter integration tests
//!
//! Tests the full pipeline: source → blocks → statements → expressions → output log

use std::path::PathBuf;

use highscore::diagnostics::ErrorKind;
use highscore::{Interpreter, ScriptError};
use pretty_assertions::assert_eq;

/// Helper to run a script and return its output log
fn run(source: &str) -> Result<Vec<String>, ScriptError> {
    highscore::run(source)
}

/// Helper to check the log of a successful run
fn assert_output(source: &str, expected: &[&str]) {
    match run(source) {
        Ok(log) => assert_eq!(log, expected),
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn assert_fails(source: &str, kind: ErrorKind, line: usize) {
    match run(source) {
        Ok(log) => panic!("Expected failure, got log {log:?}"),
        Err(e) => {
            assert_eq!(e.kind(), kind, "wrong kind for {e}");
            assert_eq!(e.line(), Some(line), "wrong line for {e}");
        }
    }
}

// ==================== Output ====================

#[test]
fn test_output_values() {
    assert_output("output 1 + 1\noutput \"hi\"", &["2", "hi"]);
}

#[test]
fn test_output_array_joins_identities() {
    assert_output("output [1,2,3]", &["1,2,3"]);
}

#[test]
fn test_comments_and_blank_lines() {
    assert_output("# heading\n\noutput 1\n   # indented comment\noutput 2\n", &["1", "2"]);
}

// ==================== Variables ====================

#[test]
fn test_assignment() {
    assert_output("$x := 2\n$x := $x * 5\noutput $x", &["10"]);
}

#[test]
fn test_loop_binding_is_local() {
    let source = "\
for $x in [1,2]:
\t$y := $x
output $y";
    assert_fails(source, ErrorKind::Resolution, 3);
}

#[test]
fn test_loop_writes_through_to_outer_binding() {
    let source = "\
$y := 0
for $x in [1,2]:
\t$y := $x
output $y";
    assert_output(source, &["2"]);
}

#[test]
fn test_assignment_to_shadowing_loop_variable_propagates() {
    let source = "\
$x := 0
for $x in [1,2]:
\t$x := 9
output $x";
    assert_output(source, &["9"]);
}

#[test]
fn test_loop_variable_leaves_outer_binding_alone() {
    assert_output("$x := 0\nfor $x in [1,2]:\n\toutput $x\noutput $x", &["1", "2", "0"]);
}

#[test]
fn test_loop_variable_does_not_leak() {
    assert_fails("for $i in 2:\n\toutput $i\noutput $i", ErrorKind::Resolution, 3);
}

#[test]
fn test_predefined_keys() {
    assert_output("output $KEYS[3]\noutput <string>$KEYS[12]", &["C ionian", "A dorian"]);
}

// ==================== Conditionals ====================

#[test]
fn test_if_else_takes_one_branch() {
    let source = "\
if 1 < 2:
    output \"yes\"
else:
    output \"no\"
if 1 > 2:
    output \"yes\"
else:
    output \"no\"";
    assert_output(source, &["yes", "no"]);
}

#[test]
fn test_nested_if_else() {
    let source = "\
for $n in [1, 2, 3]:
  if $n == 2:
    output \"two\"
  else:
    if $n > 2:
      output \"big\"
    else:
      output \"small\"";
    assert_output(source, &["small", "two", "big"]);
}

#[test]
fn test_else_without_if() {
    assert_fails("output 1\nelse:\n\toutput 2", ErrorKind::Syntax, 2);
}

#[test]
fn test_else_after_other_statement() {
    let source = "if 1 == 1:\n\toutput 1\noutput 2\nelse:\n\toutput 3";
    assert_fails(source, ErrorKind::Syntax, 4);
}

#[test]
fn test_condition_must_be_boolean() {
    assert_fails("if 1:\n\toutput 1", ErrorKind::Type, 1);
}

#[test]
fn test_if_body_scope_is_popped() {
    assert_fails("if 1 == 1:\n\t$inner := 1\noutput $inner", ErrorKind::Resolution, 3);
}

// ==================== Loops ====================

#[test]
fn test_for_over_number() {
    assert_output("for $i in 3:\n\toutput $i", &["0", "1", "2"]);
}

#[test]
fn test_for_over_chord() {
    let source = "for $p in <chord>[\"C4\", \"E4\"]:\n\toutput <string>$p";
    assert_output(source, &["C4", "E4"]);
}

#[test]
fn test_for_over_string() {
    assert_output("for $c in \"ab\":\n\toutput $c", &["a", "b"]);
}

#[test]
fn test_for_over_non_array() {
    assert_fails("for $b in <bool>1:\n\toutput $b", ErrorKind::Type, 1);
}

#[test]
fn test_for_over_huge_number() {
    assert_fails("for $i in 100000000000000:\n\toutput $i", ErrorKind::Type, 1);
}

#[test]
fn test_accumulate_in_loop() {
    let source = "\
$total := 0
for $n in [1-4]:
    $total := $total + $n
output $total";
    assert_output(source, &["10"]);
}

// ==================== Structure errors ====================

#[test]
fn test_unrecognised_structure() {
    assert_fails("output 1\nplay 2", ErrorKind::Syntax, 2);
}

#[test]
fn test_malformed_for() {
    assert_fails("for x in 3:\n\toutput 1", ErrorKind::Syntax, 1);
}

#[test]
fn test_error_inside_loop_reports_inner_line() {
    assert_fails("for $i in 2:\n\toutput $nope", ErrorKind::Resolution, 2);
}

#[test]
fn test_expression_error_reports_line() {
    assert_fails("$a := 1\n$b := $a + \"x\"", ErrorKind::Type, 2);
}

// ==================== Render ====================

#[test]
fn test_render_records_request() {
    let source = "\
$song := ||3^4 | {1^4}<pitch>\"C4\" {1^2}<pitch>\"E4\"||
render $song as \"intro\" + \".png\"";
    let mut interpreter = Interpreter::new().unwrap().with_output_dir("out");
    interpreter.run(source).unwrap();

    let requests = interpreter.renderer().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1, PathBuf::from("out/intro.png"));
    assert_eq!(requests[0].0.notes().len(), 2);
    assert_eq!(requests[0].0.time_signature().identity(), "3/4");
}

#[test]
fn test_render_destination_is_stringified() {
    let mut interpreter = Interpreter::new().unwrap();
    interpreter.run("render <notation><pitch>60 as 42").unwrap();
    assert_eq!(interpreter.renderer().requests()[0].1, PathBuf::from("42"));
}

#[test]
fn test_render_requires_notation() {
    assert_fails("render 1 as \"a\"", ErrorKind::Render, 1);
}

#[test]
fn test_render_requires_string_destination() {
    assert_fails("render <notation><pitch>60 as [1]", ErrorKind::Render, 1);
}
