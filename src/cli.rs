use clap::Parser;
use std::path::PathBuf;

/// Translates indentation-structured C++ into standards-conformant braced C++.
#[derive(Parser)]
#[command(name = "indentpp", version, about)]
pub struct Cli {
    /// Dialect source file to translate.
    pub file: PathBuf,

    /// Optionally provide a filename for the generated output. Defaults to the
    /// input file with its extension replaced by `.cpp`. Use "-" for stdout.
    #[arg(short = 'o', long = "out-file")]
    pub output: Option<String>,

    /// Directory to search for `#include "name.<header-ext>"`, in addition to the
    /// including file's own directory. May be given more than once.
    #[arg(short = 'I', long = "include-dir")]
    pub include_dirs: Vec<PathBuf>,

    /// Visual column width a tab expands to when computing indentation.
    #[arg(long = "tab-width", default_value_t = 4)]
    pub tab_width: usize,

    /// Extension (without the dot) recognized as a dialect source file.
    #[arg(long = "source-ext", default_value = "icpp")]
    pub source_ext: String,

    /// Extension (without the dot) recognized as a dialect header, expanded inline.
    #[arg(long = "header-ext", default_value = "ih")]
    pub header_ext: String,

    /// Write the generated-line -> original-location map as JSON to this path.
    #[cfg(feature = "json-map")]
    #[arg(long = "emit-map")]
    pub emit_map: Option<PathBuf>,

    /// Read a downstream compiler's diagnostics from stdin, rewrite every location
    /// that points into the generated output to point at this file's original
    /// source instead, print the result to stdout, and exit without translating.
    #[arg(long = "rewrite-diagnostics")]
    pub rewrite_diagnostics: bool,
}

pub fn default_output_path(source: &std::path::Path) -> PathBuf {
    let mut out = source.to_path_buf();
    out.set_extension("cpp");
    out
}
