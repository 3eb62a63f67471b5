use indentpp::config::Config;
use indentpp::translator::translate;
use rstest::rstest;

fn lines(src: &str) -> Vec<String> {
    translate(&Config::default(), src).into_iter().map(|l| l.text).collect()
}

#[rstest]
#[case::greater_than("if x > 0:\n    f()\n", "if (x > 0) {")]
#[case::logical_and("if a && b:\n    f()\n", "if (a && b) {")]
#[case::function_call_condition("if isReady():\n    f()\n", "if (isReady()) {")]
fn bare_condition_gets_parenthesized(#[case] src: &str, #[case] expected_open: &str) {
    let out = lines(src);
    assert_eq!(out[0], expected_open);
}

#[rstest]
#[case::while_loop("while running:\n    tick()\n", "while (running) {")]
#[case::for_loop("for (i = 0; i < n; i++):\n    step()\n", "for (i = 0; i < n; i++) {")]
fn loop_headers_get_braces(#[case] src: &str, #[case] expected_open: &str) {
    let out = lines(src);
    assert_eq!(out[0], expected_open);
}

#[test]
fn nested_blocks_close_in_reverse_order() {
    let src = "if a:\n    if b:\n        f()\n";
    let out = lines(src);
    assert_eq!(out, vec!["if (a) {", "    if (b) {", "        f();", "    }", "}"]);
}

#[test]
fn struct_closes_with_semicolon_like_class() {
    let src = "struct Point:\n    int x\n    int y\n";
    let out = lines(src);
    assert_eq!(out.last().unwrap(), "};");
}

#[test]
fn switch_case_labels_are_left_alone() {
    let src = "switch v:\n    case 1:\n        f()\n        break\n    default:\n        g()\n";
    let out = lines(src);
    assert_eq!(out[0], "switch (v) {");
    assert!(out.contains(&"    case 1:".to_string()));
    assert!(out.contains(&"    default:".to_string()));
    assert_eq!(out.last().unwrap(), "}");
}

#[test]
fn catch_merges_onto_preceding_closing_brace() {
    let src = "try:\n    risky()\ncatch (Error& e):\n    handle(e)\n";
    let out = lines(src);
    assert!(out.contains(&"} catch (Error& e) {".to_string()));
}

#[test]
fn multiline_condition_gets_wrapped_across_its_own_lines_only() {
    let src = "if a &&\n   b:\n    f()\n";
    let out = lines(src);
    assert_eq!(out[0], "if (a &&");
    assert_eq!(out[1], "   b) {");
}

#[test]
fn trailing_line_comment_survives_semicolon_insertion() {
    let src = "int x = 1 // the answer\n";
    let out = lines(src);
    assert_eq!(out[0], "int x = 1; // the answer");
}

#[test]
fn pass_produces_an_empty_block() {
    let src = "if cond:\n    pass\n";
    let out = lines(src);
    assert_eq!(out, vec!["if (cond) {", "}"]);
}

#[test]
fn brace_balance_is_zero() {
    let src = "class A:\n    void m():\n        if x:\n            y()\n        else:\n            z()\n";
    let out = lines(src);
    let opens: i32 = out.iter().map(|l| l.matches('{').count() as i32).sum();
    let closes: i32 = out.iter().map(|l| l.matches('}').count() as i32).sum();
    assert_eq!(opens, closes);
}

#[test]
fn already_braced_statement_is_left_byte_for_byte_identical() {
    let src = "int f() {\n    return 1;\n}\n";
    let out = lines(src);
    assert_eq!(out, vec!["int f() {", "    return 1;", "}"]);
}
