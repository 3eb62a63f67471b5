//! Component 4 of the pipeline: transcludes `#include "name.<header_ext>"` headers
//! inline. Headers are treated as include-once regardless of whether they carry a
//! literal `#pragma once` — the dialect's include-once behavior is a property of the
//! file extension, not an opt-in directive.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::errors::Result;

static QUOTED_INCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*#\s*include\s*"([^"]+)"\s*$"#).unwrap());

/// Where one expanded line came from: the file and 1-based line number within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub file: PathBuf,
    pub line: usize,
}

/// First directory in `search_dirs` containing `name`: callers that want "look in
/// the including file's own directory first" put that directory at index 0.
pub fn resolve_include(name: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn parse_quoted_include(line: &str) -> Option<String> {
    QUOTED_INCLUDE
        .captures(line)
        .map(|caps| caps[1].to_string())
}

/// Expands every transitively included dialect header into `path`'s text, in
/// place, returning the flattened lines alongside a parallel per-line origin map.
pub fn expand_includes(path: &Path, config: &Config) -> Result<(Vec<String>, Vec<SourceRef>)> {
    let mut included = HashSet::new();
    let mut out_lines = Vec::new();
    let mut out_map = Vec::new();
    expand_file(path, config, &mut included, &mut out_lines, &mut out_map)?;
    Ok((out_lines, out_map))
}

fn expand_file(
    path: &Path,
    config: &Config,
    included: &mut HashSet<PathBuf>,
    out_lines: &mut Vec<String>,
    out_map: &mut Vec<SourceRef>,
) -> Result<()> {
    let canon = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let is_header = config.is_header_name(&name);

    if is_header {
        if included.contains(&canon) {
            return Ok(());
        }
        included.insert(canon.clone());
    }

    let text = fs::read_to_string(path)?;
    let dir = path.parent().map(PathBuf::from).unwrap_or_default();
    let mut search_dirs = vec![dir];
    search_dirs.extend(config.search_dirs.iter().cloned());

    for (i, line) in text.lines().enumerate() {
        let origin_line = i + 1;
        if let Some(included_name) = parse_quoted_include(line) {
            if config.is_header_name(&included_name) {
                match resolve_include(&included_name, &search_dirs) {
                    Some(resolved) => {
                        expand_file(&resolved, config, included, out_lines, out_map)?;
                        continue;
                    }
                    None => {
                        log::warn!(
                            "unresolved include \"{}\" from {} — leaving directive unexpanded",
                            included_name,
                            path.display()
                        );
                    }
                }
            }
        }
        out_lines.push(line.to_string());
        out_map.push(SourceRef {
            file: canon.clone(),
            line: origin_line,
        });
    }
    Ok(())
}
