//! Error taxonomy for `indentpp`.
//!
//! Only conditions that should abort a translation job are `thiserror` variants here;
//! softer conditions (unresolved includes, malformed lexemes, stack underrun, a
//! dangling `do` at end of file) are in-band policies logged via the `log` facade
//! rather than propagated as errors.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum IndentppError {
    #[error("source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IndentppError>;
