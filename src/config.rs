//! Configuration shared by the library and the CLI shell.
//!
//! Kept separate from argument parsing (see `src/cli.rs`) so the library doesn't
//! pull in `clap`.

/// Dialect file-extension and search-path configuration for a translation job.
#[derive(Debug, Clone)]
pub struct Config {
    /// Extension (without leading dot) recognized as a dialect source file, e.g. `icpp`.
    pub source_ext: String,
    /// Extension (without leading dot) recognized as a dialect header file, e.g. `ih`.
    pub header_ext: String,
    /// Directories searched, in order, for `#include "NAME.<header_ext>"` after the
    /// including file's own directory.
    pub search_dirs: Vec<std::path::PathBuf>,
    /// Visual column width a tab character expands to when computing indent.
    pub tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_ext: "icpp".to_string(),
            header_ext: "ih".to_string(),
            search_dirs: Vec::new(),
            tab_width: 4,
        }
    }
}

impl Config {
    pub fn with_search_dirs(mut self, dirs: Vec<std::path::PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    /// Case-insensitive match of a file name's extension against `header_ext`.
    pub fn is_header_name(&self, name: &str) -> bool {
        name.rsplit('.')
            .next()
            .map(|ext| ext.eq_ignore_ascii_case(&self.header_ext))
            .unwrap_or(false)
    }
}
