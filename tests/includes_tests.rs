use std::fs;
use std::path::{Path, PathBuf};

use indentpp::config::Config;
use indentpp::includes::expand_includes;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, content).unwrap();
    p
}

#[test]
fn including_files_own_directory_is_searched_before_configured_dirs() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    let other = dir.path().join("other");
    fs::create_dir(&root).unwrap();
    fs::create_dir(&other).unwrap();
    write(&root, "shared.ih", "int local_wins = 1\n");
    write(&other, "shared.ih", "int other_wins = 1\n");
    let main = write(&root, "main.icpp", "#include \"shared.ih\"\nint main():\n    return local_wins\n");

    let cfg = Config::default().with_search_dirs(vec![other]);
    let (lines, _) = expand_includes(&main, &cfg).unwrap();
    let text = lines.join("\n");
    assert!(text.contains("local_wins"));
    assert!(!text.contains("other_wins"));
}

#[test]
fn configured_search_dir_is_used_when_header_is_not_beside_the_includer() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    let headers = dir.path().join("headers");
    fs::create_dir(&root).unwrap();
    fs::create_dir(&headers).unwrap();
    write(&headers, "far.ih", "int far_away = 9\n");
    let main = write(&root, "main.icpp", "#include \"far.ih\"\nint main():\n    return far_away\n");

    let cfg = Config::default().with_search_dirs(vec![headers]);
    let (lines, _) = expand_includes(&main, &cfg).unwrap();
    assert!(lines.iter().any(|l| l.contains("far_away = 9")));
}

#[test]
fn transitively_included_header_carries_its_own_origin() {
    let dir = tempdir().unwrap();
    let d = dir.path().to_path_buf();
    write(&d, "inner.ih", "int inner_value = 1\n");
    write(&d, "outer.ih", "#include \"inner.ih\"\nint outer_value = 2\n");
    let main = write(&d, "main.icpp", "#include \"outer.ih\"\nint main():\n    return outer_value\n");

    let cfg = Config::default();
    let (lines, map) = expand_includes(&main, &cfg).unwrap();
    assert_eq!(lines.len(), map.len());
    let inner_pos = lines.iter().position(|l| l.contains("inner_value")).unwrap();
    let outer_pos = lines.iter().position(|l| l.contains("outer_value = 2")).unwrap();
    assert!(inner_pos < outer_pos);
    assert!(map[inner_pos].file.ends_with("inner.ih"));
    assert!(map[outer_pos].file.ends_with("outer.ih"));
}

#[test]
fn unquoted_angle_bracket_include_is_never_touched() {
    let dir = tempdir().unwrap();
    let d = dir.path().to_path_buf();
    let main = write(&d, "main.icpp", "#include <vector>\nint main():\n    return 0\n");
    let cfg = Config::default();
    let (lines, _) = expand_includes(&main, &cfg).unwrap();
    assert!(lines[0].contains("#include <vector>"));
}
