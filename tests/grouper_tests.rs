use indentpp::grouper::group_logical_lines;
use rstest::rstest;

#[rstest]
#[case::call_args_span_three_lines("call(a,\n     b,\n     c)\n", 1, 3)]
#[case::bracket_continuation("int v[] = {1,\n           2}\n", 1, 2)]
#[case::trailing_logical_or("bool ok = a ||\n    b\n", 1, 2)]
#[case::scope_resolution_continuation("auto x = Foo::\n    Bar\n", 1, 2)]
fn fuses_expected_span(#[case] src: &str, #[case] first: usize, #[case] last: usize) {
    let lines = group_logical_lines(src);
    assert_eq!(lines[0].start_line, first);
    assert_eq!(lines[0].end_line(), last);
}

#[test]
fn independent_statements_stay_separate_even_when_adjacent() {
    let src = "int a = 1\nint b = a\n";
    let lines = group_logical_lines(src);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].raw_lines, vec!["int a = 1"]);
    assert_eq!(lines[1].raw_lines, vec!["int b = a"]);
}

#[test]
fn increment_and_decrement_never_fuse_forward() {
    // unlike '+'/'-', trailing '++'/'--' never signals a continuation.
    let src = "i++\nj--\n";
    let lines = group_logical_lines(src);
    assert_eq!(lines.len(), 2);
}

#[test]
fn string_literal_opening_next_line_is_a_continuation() {
    let src = "const char *msg = \"hello \"\n    \"world\"\n";
    let lines = group_logical_lines(src);
    assert_eq!(lines.len(), 1);
}

#[test]
fn for_header_without_parens_fuses_semicolon_separated_clauses() {
    let src = "for i = 0;\n    i < n;\n    i++:\n    step()\n";
    let lines = group_logical_lines(src);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].end_line(), 3);
    assert_eq!(lines[1].raw_lines, vec!["    step()"]);
}

#[test]
fn parenthesized_for_header_does_not_need_the_special_case() {
    let src = "for (i = 0; i < n; i++):\n    step()\n";
    let lines = group_logical_lines(src);
    assert_eq!(lines.len(), 2);
}

#[test]
fn preprocessor_line_never_reaches_forward_despite_trailing_operator() {
    let src = "#define SUM(a, b) (a) +\nint x = 1\n";
    let lines = group_logical_lines(src);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].raw_lines, vec!["int x = 1"]);
}

#[test]
fn blank_lines_between_balanced_statements_are_not_absorbed() {
    let src = "int a = 1\n\nint b = 2\n";
    let lines = group_logical_lines(src);
    assert_eq!(lines.len(), 3);
    assert!(lines[1].is_blank());
}

#[test]
fn comment_only_line_is_its_own_logical_line() {
    let src = "int a = 1\n// a note\nint b = 2\n";
    let lines = group_logical_lines(src);
    assert_eq!(lines.len(), 3);
    assert!(lines[1].is_comment_only());
}
