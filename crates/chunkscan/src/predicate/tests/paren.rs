use crate::predicate::remove_redundant_parentheses;

fn assert_normalized(input: &str, expected: &str) {
    let output = remove_redundant_parentheses(input);
    assert_eq!(output, expected, "normalizing {input:?}");
    assert_eq!(
        remove_redundant_parentheses(&output),
        output,
        "not idempotent for {input:?}"
    );
}

#[test]
fn strips_grouping_around_atoms() {
    assert_normalized("((a = 1))", "a = 1");
    assert_normalized("  (a = 1)  ", "a = 1");
    assert_normalized("(a = 1) AND (b = 2)", "a = 1 AND b = 2");
}

#[test]
fn flattens_same_operator_groups() {
    assert_normalized("(a = 1 AND b = 2) AND c = 3", "a = 1 AND b = 2 AND c = 3");
    assert_normalized("a = 1 OR (b = 2 OR (c = 3))", "a = 1 OR b = 2 OR c = 3");
}

#[test]
fn keeps_grouping_required_by_precedence() {
    assert_normalized("(a = 1 OR b = 2) AND c = 3", "(a = 1 OR b = 2) AND c = 3");
    assert_normalized("a = 1 OR (b = 2 AND c = 3)", "a = 1 OR (b = 2 AND c = 3)");
    assert_normalized(
        "((a = 1 OR (b = 2 AND c = 3))) AND ((d = 4))",
        "(a = 1 OR (b = 2 AND c = 3)) AND d = 4",
    );
}

#[test]
fn keywords_are_case_insensitive() {
    assert_normalized("(a = 1) and (b = 2 or c = 3)", "a = 1 AND (b = 2 OR c = 3)");
}

#[test]
fn between_and_is_not_a_connective() {
    assert_normalized(
        "(x BETWEEN 1 AND 5) AND (y = 2)",
        "x BETWEEN 1 AND 5 AND y = 2",
    );
    assert_normalized(
        "x between 1 and 5 OR (y = 2)",
        "x between 1 and 5 OR y = 2",
    );
}

#[test]
fn quoted_text_is_opaque() {
    assert_normalized("name = 'a AND (b' OR id = 1", "name = 'a AND (b' OR id = 1");
    assert_normalized("(note = 'it''s (ok)')", "note = 'it''s (ok)'");
    assert_normalized("(`weird) col` = 1)", "`weird) col` = 1");
    assert_normalized(r#"("x OR y" = 2)"#, r#""x OR y" = 2"#);
}

#[test]
fn function_calls_stay_inside_atoms() {
    assert_normalized(
        "COALESCE(a, 0) > 1 AND (b = 2)",
        "COALESCE(a, 0) > 1 AND b = 2",
    );
    assert_normalized(
        "NOT (a = 1 OR b = 2) AND c = 3",
        "NOT (a = 1 OR b = 2) AND c = 3",
    );
    assert_normalized("id IN (1, 2, 3)", "id IN (1, 2, 3)");
}

#[test]
fn other_connectives_are_never_regrouped() {
    assert_normalized("(a = 1 XOR b = 2)", "a = 1 XOR b = 2");
    assert_normalized("x = 0 AND (a = 1 xor b = 2)", "x = 0 AND (a = 1 xor b = 2)");
    assert_normalized("(x = 0) AND a = 1 XOR (b = 2)", "(x = 0) AND a = 1 XOR (b = 2)");
    assert_normalized("(x = 0) OR (a = 1||b = 2)", "x = 0 OR (a = 1||b = 2)");
    assert_normalized("((a = 1) && (b = 2)) AND c = 3", "((a = 1) && (b = 2)) AND c = 3");
    assert_normalized("name = 'a || b' AND (c = 1)", "name = 'a || b' AND c = 1");
}

#[test]
fn case_expressions_are_bracketed() {
    assert_normalized(
        "x = 0 AND (CASE WHEN a = 1 OR b = 2 THEN 1 ELSE 0 END = 1)",
        "x = 0 AND CASE WHEN a = 1 OR b = 2 THEN 1 ELSE 0 END = 1",
    );
    assert_normalized(
        "(case when (a = 1) then 1 end) = 1 OR (b = 2)",
        "(case when (a = 1) then 1 end) = 1 OR b = 2",
    );
    assert_normalized(
        "CASE WHEN a THEN CASE WHEN b OR c THEN 1 END END = 1 AND (d = 4)",
        "CASE WHEN a THEN CASE WHEN b OR c THEN 1 END END = 1 AND d = 4",
    );
    assert_normalized("(`end` = 1) AND (end = 2)", "`end` = 1 AND end = 2");
}

#[test]
fn malformed_input_is_returned_trimmed() {
    assert_eq!(remove_redundant_parentheses(" (a = 1 "), "(a = 1");
    assert_eq!(remove_redundant_parentheses("a = 1)"), "a = 1)");
    assert_eq!(remove_redundant_parentheses("a = 1 AND"), "a = 1 AND");
    assert_eq!(remove_redundant_parentheses("name = 'open"), "name = 'open");
    assert_eq!(remove_redundant_parentheses("()"), "()");
    assert_eq!(
        remove_redundant_parentheses("(CASE WHEN a = 1 THEN 1) AND b"),
        "(CASE WHEN a = 1 THEN 1) AND b"
    );
    assert_eq!(remove_redundant_parentheses("   "), "");
}
