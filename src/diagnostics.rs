//! Rewrites a downstream C++ compiler's diagnostics so they cite the original
//! dialect source instead of the generated intermediate file, per the CLI's
//! `--diagnostics` mode. Understands both GNU-style (`file:line:col: kind: msg`)
//! and MSVC-style (`file(line,col): kind msg`) formats.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mapper::Mapper;

static GNU_DIAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<file>[^:\r\n]+):(?P<line>\d+)(:(?P<col>\d+))?:(?P<rest>.*)$").unwrap());

static MSVC_DIAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<file>.+?)\((?P<line>\d+)(,(?P<col>\d+))?\)(?P<rest>\s*:.*)$").unwrap());

/// Rewrites every recognized diagnostic line in `compiler_output` that points at
/// `generated_name` to instead point at the location `mapper` resolves it to.
/// Lines that don't match either format, or point at some other file, pass
/// through unchanged.
pub fn rewrite_diagnostics(compiler_output: &str, generated_name: &str, mapper: &Mapper) -> String {
    compiler_output
        .lines()
        .map(|line| rewrite_line(line, generated_name, mapper))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite_line(line: &str, generated_name: &str, mapper: &Mapper) -> String {
    if let Some(caps) = GNU_DIAG.captures(line) {
        if file_matches(&caps["file"], generated_name) {
            if let Ok(gen_line) = caps["line"].parse::<usize>() {
                let loc = mapper.lookup(gen_line);
                let col = caps.name("col").map(|c| format!(":{}", c.as_str())).unwrap_or_default();
                return format!("{}:{}{}:{}", loc.file.display(), loc.line, col, &caps["rest"]);
            }
        }
    }
    if let Some(caps) = MSVC_DIAG.captures(line) {
        if file_matches(&caps["file"], generated_name) {
            if let Ok(gen_line) = caps["line"].parse::<usize>() {
                let loc = mapper.lookup(gen_line);
                let col = caps.name("col").map(|c| format!(",{}", c.as_str())).unwrap_or_default();
                return format!("{}({}{}){}", loc.file.display(), loc.line, col, &caps["rest"]);
            }
        }
    }
    line.to_string()
}

fn file_matches(candidate: &str, generated_name: &str) -> bool {
    candidate == generated_name
        || Path::new(candidate)
            .file_name()
            .map(|n| n.to_string_lossy() == generated_name)
            .unwrap_or(false)
}
