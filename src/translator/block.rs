//! The block-type tags and frame stack the translator keeps while walking
//! indentation levels.

use crate::scanner::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Normal,
    Class,
    Struct,
    Enum,
    Union,
    Switch,
    Lambda,
    Do,
    /// A block opened by a literal `{` already present in the source — its closing
    /// `}` is the author's own and must never be synthesized.
    RegularBrace,
}

impl BlockType {
    /// Whether popping this block type emits a synthesized `};`.
    pub fn closes_with_semicolon(&self) -> bool {
        matches!(
            self,
            BlockType::Class | BlockType::Struct | BlockType::Enum | BlockType::Union | BlockType::Lambda
        )
    }
}

/// One level of the open-block stack: the content indent it governs, the kind of
/// block it is, and the exact whitespace its closing brace should be given (taken
/// from the opener, not recomputed from the popping line).
#[derive(Debug, Clone)]
pub struct Frame {
    pub indent: usize,
    pub block_type: BlockType,
    pub whitespace: String,
}

/// Detects `enum`/`class`/`struct`/`union`/`switch`/lambda openers among the tokens
/// preceding a block-opening colon. Order matters: `enum class` must classify as
/// `Enum`, not `Class`.
pub fn detect_block_type(before_tokens: &[&Token]) -> BlockType {
    if before_tokens.first().map(|t| t.is_keyword("do")).unwrap_or(false) {
        return BlockType::Do;
    }
    if before_tokens.iter().any(|t| t.is_keyword("enum")) {
        return BlockType::Enum;
    }
    if before_tokens.iter().any(|t| t.is_keyword("class")) {
        return BlockType::Class;
    }
    if before_tokens.iter().any(|t| t.is_keyword("struct")) {
        return BlockType::Struct;
    }
    if before_tokens.iter().any(|t| t.is_keyword("union")) {
        return BlockType::Union;
    }
    if before_tokens.first().map(|t| t.is_keyword("switch")).unwrap_or(false) {
        return BlockType::Switch;
    }
    if is_lambda_opener(before_tokens) {
        return BlockType::Lambda;
    }
    BlockType::Normal
}

/// Scans `tokens` left-to-right for a `[` that opens a lambda capture rather than an
/// array subscript: a `[` is a subscript if the previous meaningful token is an
/// identifier, literal, `]`, or `)`; otherwise it opens a lambda if its matching `]`
/// is followed by `(`, or its capture contents are empty, `&`, `=`, or a single
/// identifier (the bare-capture forms).
pub fn is_lambda_opener(tokens: &[&Token]) -> bool {
    for (i, t) in tokens.iter().enumerate() {
        if !t.is_punct("[") {
            continue;
        }
        let is_subscript = i > 0 && is_subscriptable(tokens[i - 1]);
        if is_subscript {
            continue;
        }
        let Some(close_idx) = matching_close_bracket(tokens, i) else {
            continue;
        };
        let followed_by_params = tokens.get(close_idx + 1).map(|n| n.is_punct("(")).unwrap_or(false);
        let capture = &tokens[i + 1..close_idx];
        let bare_capture = capture.is_empty()
            || (capture.len() == 1
                && (capture[0].is_punct("&") || capture[0].is_punct("=") || capture[0].kind == TokenKind::Identifier));
        if followed_by_params || bare_capture {
            return true;
        }
    }
    false
}

fn is_subscriptable(prev: &Token) -> bool {
    matches!(prev.kind, TokenKind::Identifier | TokenKind::Literal(_)) || prev.is_punct("]") || prev.is_punct(")")
}

fn matching_close_bracket(tokens: &[&Token], open_idx: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (j, t) in tokens[open_idx..].iter().enumerate() {
        if t.is_punct("[") {
            depth += 1;
        } else if t.is_punct("]") {
            depth -= 1;
            if depth == 0 {
                return Some(open_idx + j);
            }
        }
    }
    None
}
