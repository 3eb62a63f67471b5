//! `indentpp`: translates indentation-structured ("braceless") C++ into
//! standards-conformant braced C++, preserving everything outside the regions it
//! owns byte-for-byte, and produces a generated-line → original-line map for
//! downstream diagnostics.
//!
//! The pipeline is five components, each its own module, run in sequence by
//! [`translate_file`]:
//!
//! 1. [`scanner`] — tokenizes.
//! 2. [`grouper`] — fuses continuation lines into logical lines.
//! 3. [`translator`] — the indentation-to-brace state machine.
//! 4. [`includes`] — inlines `#include "name.ih"` headers before translation.
//! 5. [`mapper`] — composes the include-expansion map and the translator's
//!    per-line origins into one lookup.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod grouper;
pub mod includes;
pub mod mapper;
pub mod scanner;
pub mod translator;

use std::path::Path;

pub use config::Config;
pub use errors::{IndentppError, Result};
pub use mapper::{Mapper, SourceLocation};

/// The result of translating one dialect source file (with its headers inlined).
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    /// The generated, standards-conformant C++ source, newline-terminated.
    pub output: String,
    /// Generated-line → original-source-location lookup.
    pub mapper: Mapper,
    /// Number of lines the header-expansion step flattened into, before
    /// translation — diagnostic tooling that runs the downstream compiler on
    /// `output` keys into `mapper` by generated line number.
    pub generated_line_count: usize,
}

/// Translates `source_path`, inlining any `#include "name.<header_ext>"` headers
/// found via `config.search_dirs`, and returns the generated source plus its
/// location map.
pub fn translate_file(source_path: &Path, config: &Config) -> Result<TranslationUnit> {
    if !source_path.is_file() {
        return Err(IndentppError::SourceNotFound(source_path.to_path_buf()));
    }

    log::debug!("expanding includes for {}", source_path.display());
    let (expanded_lines, expanded_map) = includes::expand_includes(source_path, config)?;
    let expanded_text = expanded_lines.join("\n") + "\n";

    log::debug!("translating {} expanded lines", expanded_lines.len());
    let generated = translator::translate(config, &expanded_text);

    let mapper = Mapper::build(&expanded_map, &generated);
    let output = generated
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
        + "\n";

    Ok(TranslationUnit {
        output,
        generated_line_count: generated.len(),
        mapper,
    })
}
