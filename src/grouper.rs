//! Component 2 of the pipeline: fuses physical lines into [`LogicalLine`]s per the
//! dialect's line-continuation rules.

use crate::scanner::{LiteralKind, Scanner, Token, TokenKind};

/// Continuation operators that keep a logical line open when they're the buffer's
/// last meaningful token. `++`/`--` are deliberately absent — they're never
/// continuations even though `+`/`-` are.
const CONTINUATION_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "&", "|", "^", "=", "<", ">", ",", "(", "[", "&&", "||",
    "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=",
    ">>=", "->", ".", "::",
];

/// Tokens that, appearing first on the next physical line, pull it into the current
/// logical line (a continued expression starting with a closer or connective).
const CONTINUATION_STARTERS: &[&str] = &[".", ",", ")", "]", "?", ":"];

/// A maximal run of physical source lines fused by continuation rules — the unit the
/// block translator operates on.
#[derive(Debug, Clone)]
pub struct LogicalLine {
    /// 1-based line number of the first raw line.
    pub start_line: usize,
    /// The exact, unmodified source text of every raw line this logical line spans.
    pub raw_lines: Vec<String>,
    /// Every token whose line falls within this window, in source order.
    pub tokens: Vec<Token>,
}

impl LogicalLine {
    /// 1-based line number of the last raw line.
    pub fn end_line(&self) -> usize {
        self.start_line + self.raw_lines.len() - 1
    }

    pub fn meaningful_tokens(&self) -> Vec<&Token> {
        self.tokens.iter().filter(|t| !t.is_comment()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_comment_only(&self) -> bool {
        !self.tokens.is_empty() && self.tokens.iter().all(|t| t.is_comment())
    }

    /// Visual indent column of the first non-blank byte of the first raw line, tabs
    /// counted as `tab_width` columns. If the line is entirely whitespace, returns
    /// its total visual width.
    pub fn indent(&self, tab_width: usize) -> usize {
        visual_indent(&self.raw_lines[0], tab_width)
    }

    /// The exact leading whitespace of the first raw line.
    pub fn leading_whitespace(&self) -> String {
        leading_whitespace(&self.raw_lines[0])
    }
}

pub fn visual_indent(line: &str, tab_width: usize) -> usize {
    let mut col = 0;
    for c in line.chars() {
        match c {
            ' ' => col += 1,
            '\t' => col += tab_width,
            _ => break,
        }
    }
    col
}

pub fn leading_whitespace(line: &str) -> String {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
}

#[derive(Debug, Clone)]
struct PhysicalGroup {
    first_line: usize,
    last_line: usize,
    tokens: Vec<Token>,
}

/// Tokenizes `source` and groups it into [`LogicalLine`]s. This is the public entry
/// point for components 1 + 2 together.
pub fn group_logical_lines(source: &str) -> Vec<LogicalLine> {
    let raw: Vec<&str> = split_lines(source);
    let total_lines = raw.len().max(1);

    let tokens = Scanner::new(source).scan_tokens();
    let groups = build_physical_groups(&tokens, total_lines);
    let fused = fuse_groups(groups);

    fused
        .into_iter()
        .map(|g| LogicalLine {
            start_line: g.first_line,
            raw_lines: (g.first_line..=g.last_line)
                .map(|n| raw.get(n - 1).copied().unwrap_or("").to_string())
                .collect(),
            tokens: g.tokens,
        })
        .collect()
}

fn split_lines(source: &str) -> Vec<&str> {
    if source.is_empty() {
        return vec![""];
    }
    let mut lines: Vec<&str> = source.split('\n').collect();
    // A trailing '\n' produces a spurious empty final element; the file still ends
    // at the line before it.
    if source.ends_with('\n') {
        lines.pop();
    }
    lines.into_iter().map(|l| l.trim_end_matches('\r')).collect()
}

fn build_physical_groups(tokens: &[Token], total_lines: usize) -> Vec<PhysicalGroup> {
    let mut token_groups = Vec::new();
    let mut ti = 0;
    while ti < tokens.len() {
        let first_line = tokens[ti].line;
        let mut last_line = first_line;
        let mut toks = Vec::new();
        while ti < tokens.len() && tokens[ti].line <= last_line {
            let t = &tokens[ti];
            let span = t.spelling.matches('\n').count();
            let end_line = t.line + span;
            if end_line > last_line {
                last_line = end_line;
            }
            toks.push(t.clone());
            ti += 1;
        }
        token_groups.push(PhysicalGroup {
            first_line,
            last_line,
            tokens: toks,
        });
    }

    // Fill the gaps with blank groups so every physical line is covered exactly once.
    let mut result = Vec::new();
    let mut line = 1;
    let mut gi = 0;
    while line <= total_lines {
        if gi < token_groups.len() && token_groups[gi].first_line == line {
            let g = token_groups[gi].clone();
            line = g.last_line + 1;
            result.push(g);
            gi += 1;
        } else {
            result.push(PhysicalGroup {
                first_line: line,
                last_line: line,
                tokens: vec![],
            });
            line += 1;
        }
    }
    result
}

fn fuse_groups(groups: Vec<PhysicalGroup>) -> Vec<PhysicalGroup> {
    let mut result = Vec::new();
    let mut i = 0;
    while i < groups.len() {
        let mut buf = groups[i].clone();
        i += 1;
        loop {
            let meaningful: Vec<&Token> = buf.tokens.iter().filter(|t| !t.is_comment()).collect();
            if meaningful.first().map(|t| t.is_punct("#")).unwrap_or(false) {
                break;
            }
            if i >= groups.len() {
                break;
            }
            let next_meaningful: Vec<&Token> =
                groups[i].tokens.iter().filter(|t| !t.is_comment()).collect();
            if should_fuse(&meaningful, &next_meaningful) {
                buf.last_line = groups[i].last_line;
                buf.tokens.extend(groups[i].tokens.clone());
                i += 1;
            } else {
                break;
            }
        }
        result.push(buf);
    }
    result
}

fn should_fuse(buf_meaningful: &[&Token], next_meaningful: &[&Token]) -> bool {
    let opens = buf_meaningful
        .iter()
        .filter(|t| t.spelling == "(" || t.spelling == "[")
        .count();
    let closes = buf_meaningful
        .iter()
        .filter(|t| t.spelling == ")" || t.spelling == "]")
        .count();
    if opens > closes {
        return true;
    }

    if let Some(last) = buf_meaningful.last() {
        if CONTINUATION_OPERATORS.contains(&last.spelling.as_str()) {
            return true;
        }
    }

    if let Some(first_next) = next_meaningful.first() {
        if CONTINUATION_STARTERS.contains(&first_next.spelling.as_str()) {
            return true;
        }
        if matches!(
            first_next.kind,
            TokenKind::Literal(LiteralKind::String) | TokenKind::Literal(LiteralKind::RawString)
        ) {
            return true;
        }
    }

    if let Some(first) = buf_meaningful.first() {
        if first.is_keyword("for") {
            let second_is_paren = buf_meaningful.get(1).map(|t| t.is_punct("(")).unwrap_or(false);
            let ends_with_colon_or_brace = buf_meaningful
                .last()
                .map(|t| t.is_punct(":") || t.is_punct("{"))
                .unwrap_or(false);
            if !second_is_paren && !ends_with_colon_or_brace {
                return true;
            }
        }
    }

    false
}
