//! Component 3 of the pipeline: the indentation-to-brace state machine. Operates on
//! the [`LogicalLine`]s the grouper already fused, so this machine never has to
//! track paren/bracket depth or continuation indentation itself — only block
//! nesting.

pub mod block;
pub mod condition;

use crate::config::Config;
use crate::grouper::{group_logical_lines, LogicalLine};
use crate::scanner::{Token, TokenKind};
use block::{detect_block_type, BlockType, Frame};

/// One produced source line plus the origin source line it was derived from, if
/// any. Lines synthesized at end-of-file closing outer blocks carry no single
/// origin.
#[derive(Debug, Clone)]
pub struct OutputLine {
    pub text: String,
    pub origin: Option<usize>,
}

/// Runs the block translator over `source` and returns the generated lines paired
/// with their origin line numbers (component 5 composes these further).
pub fn translate(config: &Config, source: &str) -> Vec<OutputLine> {
    let lines = group_logical_lines(source);
    Translator::new(config, lines).run()
}

struct Translator<'a> {
    config: &'a Config,
    lines: Vec<LogicalLine>,
    idx: usize,
    frames: Vec<Frame>,
    output: Vec<OutputLine>,
    pending: Vec<OutputLine>,
}

impl<'a> Translator<'a> {
    fn new(config: &'a Config, lines: Vec<LogicalLine>) -> Self {
        Translator {
            config,
            lines,
            idx: 0,
            frames: vec![Frame {
                indent: 0,
                block_type: BlockType::Normal,
                whitespace: String::new(),
            }],
            output: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<OutputLine> {
        while self.idx < self.lines.len() {
            self.process_current();
            self.idx += 1;
        }
        let last_origin = self.lines.last().map(|l| l.end_line());
        while self.frames.len() > 1 {
            let frame = self.frames.pop().unwrap();
            if frame.block_type != BlockType::RegularBrace {
                self.emit_close_brace(&frame, None, last_origin);
            }
        }
        self.output.extend(std::mem::take(&mut self.pending));
        self.output
    }

    fn tab(&self) -> usize {
        self.config.tab_width
    }

    fn push(&mut self, text: String, origin: Option<usize>) {
        self.output.push(OutputLine { text, origin });
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            self.output.extend(std::mem::take(&mut self.pending));
        }
    }

    fn output_last_is_close_brace(&self) -> bool {
        self.output.last().map(|l| l.text.trim() == "}").unwrap_or(false)
    }

    fn current_is_do_while(&self) -> bool {
        for line in self.output.iter().rev() {
            let t = line.text.trim();
            if t.starts_with("do {") {
                return true;
            }
            if t.ends_with('{') && !t.contains("do") {
                return false;
            }
        }
        false
    }

    fn find_next_meaningful(&self, from_idx: usize) -> Option<(usize, &LogicalLine)> {
        self.lines[from_idx + 1..]
            .iter()
            .enumerate()
            .find(|(_, l)| !l.is_blank() && !l.is_comment_only())
            .map(|(i, l)| (from_idx + 1 + i, l))
    }

    fn is_access_specifier_line(&self, ll: &LogicalLine) -> bool {
        let m = ll.meaningful_tokens();
        m.len() == 2
            && m[1].is_punct(":")
            && (m[0].is_keyword("public") || m[0].is_keyword("private") || m[0].is_keyword("protected"))
    }

    fn emit_close_brace(&mut self, frame: &Frame, trigger: Option<&[&Token]>, origin: Option<usize>) {
        let mut needs_semi = frame.block_type.closes_with_semicolon();
        if frame.block_type == BlockType::Lambda {
            if let Some(trig) = trigger {
                if trig.first().map(|t| t.is_punct(")") || t.is_punct(",")).unwrap_or(false) {
                    needs_semi = false;
                }
            }
        }
        let text = if needs_semi {
            format!("{}}};", frame.whitespace)
        } else {
            format!("{}}}", frame.whitespace)
        };
        self.push(text, origin);
    }

    fn dedent_to(&mut self, indent: usize, trigger: Option<&[&Token]>, origin: Option<usize>) {
        let saved = std::mem::take(&mut self.pending);
        while self.frames.len() > 1 && self.frames.last().unwrap().indent > indent {
            let frame = self.frames.pop().unwrap();
            if frame.block_type != BlockType::RegularBrace {
                self.emit_close_brace(&frame, trigger, origin);
            }
        }
        self.pending = saved;
    }

    fn pop_to_class_or_struct(&mut self, origin: Option<usize>) {
        let saved = std::mem::take(&mut self.pending);
        while self.frames.len() > 1 {
            if matches!(self.frames.last().unwrap().block_type, BlockType::Class | BlockType::Struct) {
                break;
            }
            let frame = self.frames.pop().unwrap();
            if frame.block_type != BlockType::RegularBrace {
                self.emit_close_brace(&frame, None, origin);
            }
        }
        self.output.extend(saved);
    }

    fn comment_start_on_line(&self, ll: &LogicalLine, abs_line: usize) -> Option<usize> {
        ll.tokens
            .iter()
            .find(|t| t.is_comment() && t.line == abs_line)
            .map(|t| t.column - 1)
    }

    fn append_semicolon_text(&self, raw: &str, comment_pos: Option<usize>) -> String {
        match comment_pos {
            Some(pos) => {
                let chars: Vec<char> = raw.chars().collect();
                let before: String = chars[..pos.min(chars.len())].iter().collect();
                let code_trimmed = before.trim_end();
                let gap = &before[code_trimmed.len()..];
                let comment: String = chars[pos.min(chars.len())..].iter().collect();
                format!("{};{}{}", code_trimmed, gap, comment)
            }
            None => {
                let code_trimmed = raw.trim_end();
                let trailing = &raw[code_trimmed.len()..];
                format!("{};{}", code_trimmed, trailing)
            }
        }
    }

    /// Emits every raw line of `ll` unchanged except the last, which gets a `;`
    /// inserted before any trailing comment if `add_semicolon` is set. A passthrough
    /// line's origin is its own physical line, but a line this method
    /// actually rewrites (semicolon inserted) is attributed to the logical line's
    /// start, not the physical line the rewrite happened to land on.
    fn emit_statement_lines(&mut self, ll: &LogicalLine, add_semicolon: bool) {
        let n = ll.raw_lines.len();
        for i in 0..n - 1 {
            self.push(ll.raw_lines[i].clone(), Some(ll.start_line + i));
        }
        let last_abs = ll.start_line + n - 1;
        let raw = &ll.raw_lines[n - 1];
        if add_semicolon {
            let pos = self.comment_start_on_line(ll, last_abs);
            let text = self.append_semicolon_text(raw, pos);
            self.push(text, Some(ll.start_line));
        } else {
            self.push(raw.clone(), Some(last_abs));
        }
    }

    fn emit_raw(&mut self, ll: &LogicalLine) {
        for (i, raw) in ll.raw_lines.iter().enumerate() {
            self.push(raw.clone(), Some(ll.start_line + i));
        }
    }

    fn process_current(&mut self) {
        let ll = self.lines[self.idx].clone();
        if ll.is_blank() || ll.is_comment_only() {
            self.process_blank_or_comment(&ll);
            return;
        }
        self.process_code_line(&ll);
    }

    fn process_blank_or_comment(&mut self, ll: &LogicalLine) {
        let indent = ll.indent(self.tab());
        let top_indent = self.frames.last().unwrap().indent;
        if indent < top_indent {
            if let Some((_, next)) = self.find_next_meaningful(self.idx) {
                let next_indent = next.indent(self.tab());
                let is_access = self.is_access_specifier_line(next);
                if next_indent <= indent && !is_access {
                    self.dedent_to(indent, None, Some(ll.start_line));
                }
            }
        }

        let top_indent = self.frames.last().unwrap().indent;
        if ll.is_blank() {
            let should_buffer = self
                .find_next_meaningful(self.idx)
                .map(|(_, n)| n.indent(self.tab()) < top_indent && indent == n.indent(self.tab()))
                .unwrap_or(false);
            if should_buffer {
                self.pending.push(OutputLine {
                    text: ll.raw_lines[0].clone(),
                    origin: Some(ll.start_line),
                });
            } else {
                self.flush_pending();
                self.push(ll.raw_lines[0].clone(), Some(ll.start_line));
            }
        } else {
            let should_buffer = self
                .find_next_meaningful(self.idx)
                .map(|(_, n)| n.indent(self.tab()) < top_indent)
                .unwrap_or(false);
            if should_buffer {
                for (i, raw) in ll.raw_lines.iter().enumerate() {
                    self.pending.push(OutputLine {
                        text: raw.clone(),
                        origin: Some(ll.start_line + i),
                    });
                }
            } else {
                self.flush_pending();
                self.emit_raw(ll);
            }
        }
    }

    fn process_code_line(&mut self, ll: &LogicalLine) {
        let meaningful = ll.meaningful_tokens();
        let indent = ll.indent(self.tab());
        let leading_ws = ll.leading_whitespace();

        let top_indent = self.frames.last().unwrap().indent;
        if indent < top_indent {
            let has_class_or_struct = self
                .frames
                .iter()
                .any(|f| matches!(f.block_type, BlockType::Class | BlockType::Struct));
            if self.is_access_specifier_line(ll) && has_class_or_struct {
                self.pop_to_class_or_struct(Some(ll.start_line));
                self.push(ll.raw_lines[0].clone(), Some(ll.start_line));
                return;
            }
            self.dedent_to(indent, Some(&meaningful), Some(ll.start_line));
        }

        let is_else_or_catch = meaningful
            .first()
            .map(|t| t.is_keyword("else") || t.is_keyword("catch"))
            .unwrap_or(false);
        if !is_else_or_catch {
            self.flush_pending();
        }

        if self.ends_with_open_brace(&meaningful) {
            self.handle_regular_brace_line(ll, &meaningful, indent, is_else_or_catch);
            return;
        }

        if self.is_inline_close_and_while(&meaningful) {
            self.handle_inline_do_while_close(ll, &meaningful);
            return;
        }

        if meaningful.len() == 1 && meaningful[0].is_punct("}") {
            self.emit_raw(ll);
            return;
        }

        if meaningful.last().map(|t| t.is_punct(":")).unwrap_or(false) {
            self.handle_colon_line(ll, &meaningful, indent, &leading_ws);
            return;
        }

        if meaningful.first().map(|t| t.is_keyword("while")).unwrap_or(false) && self.current_is_do_while() {
            self.handle_bare_while_close(ll, &meaningful);
            return;
        }

        self.handle_statement(ll, &meaningful);
    }

    fn ends_with_open_brace(&self, meaningful: &[&Token]) -> bool {
        let n = meaningful.len();
        n > 0
            && meaningful[n - 1].is_punct("{")
            && !(n >= 2 && meaningful[n - 2].is_punct("{"))
    }

    fn is_inline_close_and_while(&self, meaningful: &[&Token]) -> bool {
        meaningful.len() >= 2
            && meaningful[0].is_punct("}")
            && meaningful[1].is_keyword("while")
            && self.current_is_do_while()
    }

    fn handle_regular_brace_line(
        &mut self,
        ll: &LogicalLine,
        _meaningful: &[&Token],
        indent: usize,
        is_else_or_catch: bool,
    ) {
        let leading_ws = ll.leading_whitespace();
        if is_else_or_catch && self.output_last_is_close_brace() {
            self.output.pop();
            let merged = format!("{}}} {}", leading_ws, ll.raw_lines[0].trim_start());
            self.push(merged, Some(ll.start_line));
            for (i, raw) in ll.raw_lines.iter().enumerate().skip(1) {
                self.push(raw.clone(), Some(ll.start_line + i));
            }
            self.flush_pending();
        } else {
            self.emit_raw(ll);
        }
        if let Some((_, next)) = self.find_next_meaningful(self.idx) {
            let next_indent = next.indent(self.tab());
            if next_indent > indent {
                self.frames.push(Frame {
                    indent: next_indent,
                    block_type: BlockType::RegularBrace,
                    whitespace: String::new(),
                });
            }
        }
    }

    fn split_trailing_comment<'b>(&self, ll: &LogicalLine, abs_line: usize, raw: &'b str) -> (String, String) {
        match self.comment_start_on_line(ll, abs_line) {
            Some(pos) => {
                let chars: Vec<char> = raw.chars().collect();
                let pos = pos.min(chars.len());
                (chars[..pos].iter().collect(), chars[pos..].iter().collect())
            }
            None => (raw.to_string(), String::new()),
        }
    }

    fn handle_inline_do_while_close(&mut self, ll: &LogicalLine, meaningful: &[&Token]) {
        let while_tok = meaningful[1];
        let idx = while_tok.line - ll.start_line;
        let raw = &ll.raw_lines[idx];
        let (code, comment) = self.split_trailing_comment(ll, while_tok.line, raw);
        let cond_raw: String = code.chars().skip(while_tok.end_column - 1).collect();
        let cond = cond_raw.trim_end_matches(';').trim();
        let wrapped = if condition::fully_parenthesized_text(cond) {
            cond.to_string()
        } else {
            format!("({})", cond)
        };
        let text = format!("{}}} while {};{}", ll.leading_whitespace(), wrapped, comment);
        self.push(text, Some(ll.start_line));
    }

    fn handle_bare_while_close(&mut self, ll: &LogicalLine, meaningful: &[&Token]) {
        let while_tok = meaningful[0];
        let idx = while_tok.line - ll.start_line;
        let raw = &ll.raw_lines[idx];
        let (code, comment) = self.split_trailing_comment(ll, while_tok.line, raw);
        let cond_raw: String = code.chars().skip(while_tok.end_column - 1).collect();
        let cond = cond_raw.trim_end_matches(';').trim();
        let wrapped = if condition::fully_parenthesized_text(cond) {
            cond.to_string()
        } else {
            format!("({})", cond)
        };
        let body = format!("while {};{}", wrapped, comment);
        if self.output_last_is_close_brace() {
            self.output.pop();
            self.push(format!("{}}} {}", ll.leading_whitespace(), body), Some(ll.start_line));
        } else {
            self.push(format!("{}{}", ll.leading_whitespace(), body), Some(ll.start_line));
        }
    }

    fn handle_colon_line(&mut self, ll: &LogicalLine, meaningful: &[&Token], indent: usize, leading_ws: &str) {
        let before = &meaningful[..meaningful.len() - 1];
        let colon_tok = meaningful[meaningful.len() - 1];

        if before.first().map(|t| t.is_keyword("case")).unwrap_or(false) {
            self.emit_raw(ll);
            return;
        }
        if before.len() == 1 && before[0].is_keyword("default") {
            self.emit_raw(ll);
            return;
        }
        if before.len() == 1
            && (before[0].is_keyword("public") || before[0].is_keyword("private") || before[0].is_keyword("protected"))
        {
            self.emit_raw(ll);
            return;
        }

        let is_else_or_catch = before
            .first()
            .map(|t| t.is_keyword("else") || t.is_keyword("catch"))
            .unwrap_or(false);

        let block_type = detect_block_type(before);
        let lines = self.build_opener_lines(ll, before, colon_tok);
        let n = lines.len();

        if is_else_or_catch && self.output_last_is_close_brace() {
            self.output.pop();
            self.push(format!("{}}} {}", leading_ws, lines[0].trim_start()), Some(ll.start_line));
            for (i, text) in lines.into_iter().enumerate().skip(1) {
                self.push(text, Some(ll.start_line + i));
            }
            self.flush_pending();
        } else {
            for (i, text) in lines.into_iter().enumerate() {
                self.push(text, Some(ll.start_line + i));
            }
        }

        self.maybe_open_block(ll, block_type, leading_ws, indent, n);
    }

    fn build_opener_lines(&self, ll: &LogicalLine, before: &[&Token], colon_tok: &Token) -> Vec<String> {
        let mut lines = ll.raw_lines.clone();
        let last_idx = lines.len() - 1;

        if let Some((_, cond_start)) = condition::needs_paren_wrap(before) {
            let kw_tok = before[cond_start - 1];
            if kw_tok.line == colon_tok.line {
                let idx = kw_tok.line - ll.start_line;
                lines[idx] = wrap_single_line_condition(&lines[idx], kw_tok.end_column, colon_tok.column, colon_tok.end_column);
            } else {
                let kw_idx = kw_tok.line - ll.start_line;
                lines[kw_idx] = insert_open_paren_after(&lines[kw_idx], kw_tok.end_column);
                lines[last_idx] = splice_colon(&lines[last_idx], colon_tok.column, colon_tok.end_column, ") {");
            }
        } else {
            let idx = colon_tok.line - ll.start_line;
            lines[idx] = splice_colon(&lines[idx], colon_tok.column, colon_tok.end_column, " {");
        }
        lines
    }

    fn maybe_open_block(&mut self, ll: &LogicalLine, block_type: BlockType, opener_ws: &str, indent: usize, emitted: usize) {
        let _ = emitted;
        if let Some((next_idx, next)) = self.find_next_meaningful(self.idx) {
            let mut next_indent = next.indent(self.tab());
            if matches!(block_type, BlockType::Class | BlockType::Struct) && self.is_access_specifier_line(next) {
                if let Some((_, after_access)) = self.find_next_meaningful(next_idx) {
                    next_indent = after_access.indent(self.tab());
                }
            }
            if next_indent > indent {
                self.frames.push(Frame {
                    indent: next_indent,
                    block_type,
                    whitespace: opener_ws.to_string(),
                });
            } else if is_pass_statement(next) {
                self.frames.push(Frame {
                    indent: indent + self.tab(),
                    block_type,
                    whitespace: opener_ws.to_string(),
                });
            }
        } else {
            self.frames.push(Frame {
                indent: indent + self.tab(),
                block_type,
                whitespace: opener_ws.to_string(),
            });
        }
    }

    fn handle_statement(&mut self, ll: &LogicalLine, meaningful: &[&Token]) {
        if meaningful.len() == 1 && is_pass_token(meaningful[0]) {
            return;
        }
        if self
            .frames
            .last()
            .map(|f| f.block_type == BlockType::Enum)
            .unwrap_or(false)
        {
            self.emit_raw(ll);
            return;
        }

        let last = *meaningful.last().unwrap();
        let first = *meaningful.first().unwrap();

        if first.is_punct("#") {
            self.emit_raw(ll);
            return;
        }
        if last.is_punct(";") || last.is_punct("{") {
            self.emit_raw(ll);
            return;
        }
        if first.is_punct(",") || first.is_punct(".") {
            self.emit_raw(ll);
            return;
        }
        if meaningful.len() >= 2 && first.is_punct(")") && meaningful[1].is_punct(",") {
            self.emit_raw(ll);
            return;
        }
        if last.is_punct("}") {
            let balance: i32 = meaningful
                .iter()
                .map(|t| if t.is_punct("{") { 1 } else if t.is_punct("}") { -1 } else { 0 })
                .sum();
            let is_brace_initializer = has_equals_then_open_brace(meaningful);
            let looks_lambda_shaped = balance == 0
                && meaningful.iter().any(|t| t.is_punct("["))
                && meaningful.iter().any(|t| t.is_punct("]"))
                && meaningful.iter().any(|t| t.is_punct("("));
            let has_assign_or_return = meaningful.iter().any(|t| t.is_punct("=")) || first.is_keyword("return");
            let needs_semicolon = is_brace_initializer || (looks_lambda_shaped && has_assign_or_return);
            self.emit_statement_lines(ll, needs_semicolon);
            return;
        }
        const CONTINUATION: &[&str] = &[
            "+", "-", "*", "/", "%", "&", "|", "^", "=", "<", ">", ",", "(", "[",
        ];
        if CONTINUATION.contains(&last.spelling.as_str()) {
            self.emit_raw(ll);
            return;
        }
        self.emit_statement_lines(ll, true);
    }
}

fn is_pass_token(t: &Token) -> bool {
    t.kind == TokenKind::Identifier && t.spelling == "pass"
}

fn is_pass_statement(ll: &LogicalLine) -> bool {
    let m = ll.meaningful_tokens();
    m.len() == 1 && is_pass_token(m[0])
}

/// Whether `tokens` contains an `=` immediately followed by a `{`, the brace-
/// initializer shape (`int arr[] = {1, 2, 3}`) that always wants a trailing `;`
/// regardless of whether it also happens to look lambda-shaped.
fn has_equals_then_open_brace(tokens: &[&Token]) -> bool {
    tokens.windows(2).any(|w| w[0].is_punct("=") && w[1].is_punct("{"))
}

fn splice_colon(raw: &str, colon_col: usize, colon_end: usize, insert: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let before: String = chars[..(colon_col - 1).min(chars.len())].iter().collect();
    let before_trimmed = before.trim_end();
    let after: String = chars[(colon_end - 1).min(chars.len())..].iter().collect();
    format!("{}{}{}", before_trimmed, insert, after)
}

fn insert_open_paren_after(raw: &str, end_col: usize) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let idx = (end_col - 1).min(chars.len());
    let before: String = chars[..idx].iter().collect();
    let after: String = chars[idx..].iter().collect();
    format!("{} ({}", before, after.trim_start())
}

fn wrap_single_line_condition(raw: &str, kw_end: usize, colon_col: usize, colon_end: usize) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let prefix: String = chars[..(kw_end - 1).min(chars.len())].iter().collect();
    let cond: String = chars[(kw_end - 1).min(chars.len())..(colon_col - 1).min(chars.len())]
        .iter()
        .collect();
    let after: String = chars[(colon_end - 1).min(chars.len())..].iter().collect();
    format!("{} ({}) {{{}", prefix, cond.trim(), after)
}
