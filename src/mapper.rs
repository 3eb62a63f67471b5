//! Component 5 of the pipeline: composes the header-expansion line map and the
//! block translator's per-line origins into a single generated-line →
//! original-source-location lookup.

use std::path::PathBuf;

use crate::includes::SourceRef;
use crate::translator::OutputLine;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json-map", derive(serde::Serialize))]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
}

/// Maps each 1-based line of the generated output back to the original file and
/// line it came from. Lines the translator synthesized with no single origin (the
/// closing braces emitted at end-of-file) inherit the nearest preceding mapped
/// location, keeping the sequence monotonic non-decreasing by construction.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json-map", derive(serde::Serialize))]
pub struct Mapper {
    entries: Vec<SourceLocation>,
}

const UNKNOWN_FILE: &str = "<unknown>";

impl Mapper {
    pub fn build(expanded_map: &[SourceRef], generated: &[OutputLine]) -> Self {
        let mut entries = Vec::with_capacity(generated.len());
        let mut last: Option<SourceLocation> = None;

        for line in generated {
            let resolved = line
                .origin
                .and_then(|expanded_line| expanded_map.get(expanded_line.checked_sub(1)?))
                .map(|r| SourceLocation {
                    file: r.file.clone(),
                    line: r.line,
                })
                .or_else(|| last.clone())
                .unwrap_or_else(|| SourceLocation {
                    file: PathBuf::from(UNKNOWN_FILE),
                    line: 0,
                });
            last = Some(resolved.clone());
            entries.push(resolved);
        }

        Mapper { entries }
    }

    /// 1-based lookup; out-of-range lines map to `<unknown>:0`.
    pub fn lookup(&self, generated_line: usize) -> SourceLocation {
        generated_line
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .cloned()
            .unwrap_or_else(|| SourceLocation {
                file: PathBuf::from(UNKNOWN_FILE),
                line: 0,
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(feature = "json-map")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(file: &str, line: usize) -> SourceRef {
        SourceRef {
            file: PathBuf::from(file),
            line,
        }
    }

    fn gen(origin: Option<usize>) -> OutputLine {
        OutputLine {
            text: String::new(),
            origin,
        }
    }

    #[test]
    fn maps_generated_lines_through_expansion() {
        let expanded = vec![src("header.ih", 1), src("header.ih", 2), src("main.icpp", 2), src("main.icpp", 3)];
        let generated = vec![gen(Some(1)), gen(Some(2)), gen(Some(2)), gen(Some(3)), gen(Some(4))];
        let mapper = Mapper::build(&expanded, &generated);

        assert_eq!(mapper.lookup(1).file, PathBuf::from("header.ih"));
        assert_eq!(mapper.lookup(1).line, 1);
        assert_eq!(mapper.lookup(3).file, PathBuf::from("header.ih"));
        assert_eq!(mapper.lookup(3).line, 2);
        assert_eq!(mapper.lookup(4).file, PathBuf::from("main.icpp"));
        assert_eq!(mapper.lookup(4).line, 2);
    }

    #[test]
    fn synthesized_lines_inherit_nearest_preceding_location() {
        let expanded = vec![src("main.icpp", 1)];
        let generated = vec![gen(Some(1)), gen(None), gen(None)];
        let mapper = Mapper::build(&expanded, &generated);
        assert_eq!(mapper.lookup(2).line, 1);
        assert_eq!(mapper.lookup(3).line, 1);
    }

    #[test]
    fn out_of_range_lookup_is_unknown() {
        let mapper = Mapper::build(&[], &[]);
        let loc = mapper.lookup(1);
        assert_eq!(loc.file, PathBuf::from("<unknown>"));
    }
}
