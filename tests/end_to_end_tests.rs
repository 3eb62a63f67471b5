use std::fs;

use indentpp::config::Config;
use indentpp::translate_file;
use indentpp::translator::translate;
use tempfile::tempdir;

fn translated(src: &str) -> String {
    translate(&Config::default(), src)
        .into_iter()
        .map(|l| l.text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn scenario_1_basic_block_with_condition_wrapping() {
    let src = "int main():\n    if x > 0:\n        return 1\n    return 0\n";
    let expected = "int main() {\n    if (x > 0) {\n        return 1;\n    }\n    return 0;\n}";
    assert_eq!(translated(src), expected);
}

#[test]
fn scenario_2_do_while_fusion() {
    let src = "do:\n    x += 1\nwhile x < 10\n";
    let expected = "do {\n    x += 1;\n} while (x < 10);";
    assert_eq!(translated(src), expected);
}

#[test]
fn scenario_3_class_with_access_specifiers() {
    let src = "class C:\npublic:\n    int f():\n        return 1\nprivate:\n    int x\n";
    let expected =
        "class C {\npublic:\n    int f() {\n        return 1;\n    }\nprivate:\n    int x;\n};";
    assert_eq!(translated(src), expected);
}

#[test]
fn scenario_4_lambda_in_assignment() {
    let src = "auto f = [](int x):\n    return x + 1\n";
    let expected = "auto f = [](int x) {\n    return x + 1;\n};";
    assert_eq!(translated(src), expected);
}

#[test]
fn scenario_5_header_inlining_with_pragma_once_by_convention() {
    let dir = tempdir().unwrap();
    let d = dir.path().to_path_buf();
    fs::write(d.join("a.blh"), "int foo()\n").unwrap();
    fs::write(
        d.join("main.blcpp"),
        "#include \"a.blh\"\n#include \"a.blh\"\nint main():\n    return 0\n",
    )
    .unwrap();

    let cfg = Config {
        source_ext: "blcpp".to_string(),
        header_ext: "blh".to_string(),
        ..Config::default()
    };
    let unit = translate_file(&d.join("main.blcpp"), &cfg).unwrap();

    let occurrences = unit.output.matches("int foo()").count();
    assert_eq!(occurrences, 1);

    let decl_line = unit
        .output
        .lines()
        .position(|l| l.contains("int foo()"))
        .unwrap()
        + 1;
    let loc = unit.mapper.lookup(decl_line);
    assert!(loc.file.ends_with("a.blh"));
    assert_eq!(loc.line, 1);
}

#[test]
fn scenario_6_continuation_inside_call() {
    let src = "int r = f(a,\n          b,\n          c)\n";
    let out = translate(&Config::default(), src);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].text, "int r = f(a,");
    assert_eq!(out[1].text, "          b,");
    assert_eq!(out[2].text, "          c);");
    assert_eq!(out[2].origin, Some(1));

    let expanded_map: Vec<indentpp::includes::SourceRef> = (1..=3)
        .map(|n| indentpp::includes::SourceRef {
            file: "main.icpp".into(),
            line: n,
        })
        .collect();
    let mapper = indentpp::mapper::Mapper::build(&expanded_map, &out);
    assert_eq!(mapper.lookup(3).line, 1);
}

#[test]
fn invariant_already_braced_input_is_identity_modulo_semicolons() {
    let src = "int f() {\n    int x = 1\n    return x;\n}\n";
    let out = translated(src);
    assert_eq!(out, "int f() {\n    int x = 1;\n    return x;\n}");
}

#[test]
fn invariant_brace_balance_is_zero_for_a_deeply_nested_program() {
    let src = "class A:\n    struct B:\n        void m():\n            while cond:\n                if x:\n                    f()\n                else:\n                    g()\n";
    let out = translate(&Config::default(), src);
    let opens: i32 = out.iter().map(|l| l.text.matches('{').count() as i32).sum();
    let closes: i32 = out.iter().map(|l| l.text.matches('}').count() as i32).sum();
    assert_eq!(opens, closes);
}

#[test]
fn invariant_idempotent_on_already_translated_output() {
    let src = "int main():\n    if x > 0:\n        return 1\n    return 0\n";
    let once = translated(src);
    let twice = translated(&(once.clone() + "\n"));
    assert_eq!(once, twice);
}

#[test]
fn invariant_enum_members_never_receive_semicolons() {
    let src = "enum Color:\n    Red,\n    Green,\n    Blue\n";
    let out = translated(src);
    assert!(!out.contains("Red;"));
    assert!(!out.contains("Green;"));
}

#[test]
fn invariant_case_and_default_labels_do_not_open_a_block() {
    let src = "switch v:\n    case 1:\n        f()\n    default:\n        g()\n";
    let out = translate(&Config::default(), src);
    let frames_opened_by_labels = out
        .iter()
        .filter(|l| l.text.trim() == "case 1:" || l.text.trim() == "default:")
        .count();
    assert_eq!(frames_opened_by_labels, 2);
    // neither label line introduces its own closing brace; only the switch does.
    let close_count = out.iter().filter(|l| l.text.trim() == "}").count();
    assert_eq!(close_count, 1);
}
