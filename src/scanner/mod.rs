//! Component 1 of the pipeline: a C++17-aware tokenizer.
//!
//! The scanner never fails on malformed input; bytes it cannot classify become
//! [`TokenKind::Unknown`] tokens and scanning continues, logging a `MalformedLexical`
//! diagnostic rather than aborting.

pub mod token;

pub use token::{LiteralKind, Token, TokenKind};

/// Longest-match-first punctuator table. Order within a length group doesn't matter;
/// order *between* groups (3, then 2, then 1) does.
const PUNCT_3: &[&str] = &["<<=", ">>=", "...", "->*", "<=>"];
const PUNCT_2: &[&str] = &[
    "::", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=", "-=",
    "*=", "/=", "%=", "&=", "|=", "^=", ".*", "##",
];

pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Scanner {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Scans the whole buffer and returns its tokens in source order (no `Eof` token
    /// is appended; callers that want a sentinel should append one themselves).
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token() {
            tokens.push(tok);
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        let needed = s.chars().count();
        if self.pos + needed > self.chars.len() {
            return false;
        }
        self.chars[self.pos..self.pos + needed].iter().collect::<String>() == s
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let c = self.peek()?;
        let start_line = self.line;
        let start_col = self.col;

        if self.starts_with("//") {
            return Some(self.scan_line_comment(start_line, start_col));
        }
        if self.starts_with("/*") {
            return Some(self.scan_block_comment(start_line, start_col));
        }
        if c.is_ascii_digit() || (c == '.' && matches!(self.peek_at(1), Some(d) if d.is_ascii_digit())) {
            return Some(self.scan_number(start_line, start_col));
        }
        if is_string_or_char_prefix_start(self, c) {
            if let Some(tok) = self.try_scan_prefixed_literal(start_line, start_col) {
                return Some(tok);
            }
        }
        if c == '"' {
            return Some(self.scan_string(start_line, start_col, ""));
        }
        if c == '\'' {
            return Some(self.scan_char(start_line, start_col, ""));
        }
        if is_ident_start(c) {
            return Some(self.scan_identifier(start_line, start_col));
        }
        if let Some(tok) = self.scan_punct(start_line, start_col) {
            return Some(tok);
        }

        // Unclassifiable byte: emit Unknown and move past it so scanning never stalls.
        self.advance();
        Some(Token::new(TokenKind::Unknown, c.to_string(), start_line, start_col))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_line_comment(&mut self, line: usize, col: usize) -> Token {
        let mut spelling = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            spelling.push(c);
            self.advance();
        }
        Token::new(TokenKind::Comment, spelling, line, col)
    }

    fn scan_block_comment(&mut self, line: usize, col: usize) -> Token {
        let mut spelling = String::new();
        spelling.push_str("/*");
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => break,
                Some('*') if self.peek_at(1) == Some('/') => {
                    spelling.push('*');
                    spelling.push('/');
                    self.advance();
                    self.advance();
                    break;
                }
                Some(c) => {
                    spelling.push(c);
                    self.advance();
                }
            }
        }
        Token::new(TokenKind::Comment, spelling, line, col)
    }

    fn scan_identifier(&mut self, line: usize, col: usize) -> Token {
        let mut spelling = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                spelling.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = if token::is_keyword(&spelling) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, spelling, line, col)
    }

    fn scan_number(&mut self, line: usize, col: usize) -> Token {
        let mut spelling = String::new();
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '.' || c == '\'' {
                if c == '.' {
                    is_float = true;
                }
                spelling.push(c);
                self.advance();
            } else if (c == '+' || c == '-')
                && matches!(spelling.chars().last(), Some('e') | Some('E') | Some('p') | Some('P'))
            {
                is_float = true;
                spelling.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = if is_float {
            LiteralKind::Floating
        } else {
            LiteralKind::Integer
        };
        Token::new(TokenKind::Literal(kind), spelling, line, col)
    }

    /// Handles `u8"..."`, `u"..."`, `U"..."`, `L"..."`, and their raw-string `R"(...)"`
    /// forms, plus the equivalent char-literal prefixes. Returns `None` if the
    /// apparent prefix isn't actually followed by a quote (it's just an identifier).
    fn try_scan_prefixed_literal(&mut self, line: usize, col: usize) -> Option<Token> {
        let candidates: &[&str] = &["u8", "u", "U", "L"];
        for prefix in candidates {
            if self.starts_with(prefix) {
                let after = self.pos + prefix.chars().count();
                match self.chars.get(after) {
                    Some('"') => {
                        for _ in 0..prefix.chars().count() {
                            self.advance();
                        }
                        return Some(self.scan_string(line, col, prefix));
                    }
                    Some('\'') => {
                        for _ in 0..prefix.chars().count() {
                            self.advance();
                        }
                        return Some(self.scan_char(line, col, prefix));
                    }
                    Some('R') if self.chars.get(after + 1) == Some(&'"') => {
                        for _ in 0..prefix.chars().count() {
                            self.advance();
                        }
                        self.advance(); // 'R'
                        return Some(self.scan_raw_string(line, col, prefix));
                    }
                    _ => continue,
                }
            }
        }
        if self.peek() == Some('R') && self.peek_at(1) == Some('"') {
            self.advance(); // 'R'
            return Some(self.scan_raw_string(line, col, ""));
        }
        None
    }

    fn scan_string(&mut self, line: usize, col: usize, prefix: &str) -> Token {
        let mut spelling = String::from(prefix);
        spelling.push('"');
        self.advance();
        loop {
            match self.peek() {
                None => break,
                Some('\\') => {
                    spelling.push('\\');
                    self.advance();
                    if let Some(escaped) = self.peek() {
                        spelling.push(escaped);
                        self.advance();
                    }
                }
                Some('"') => {
                    spelling.push('"');
                    self.advance();
                    break;
                }
                Some('\n') => break, // unterminated; stop at end of line
                Some(c) => {
                    spelling.push(c);
                    self.advance();
                }
            }
        }
        self.consume_literal_suffix(&mut spelling);
        Token::new(TokenKind::Literal(LiteralKind::String), spelling, line, col)
    }

    fn scan_char(&mut self, line: usize, col: usize, prefix: &str) -> Token {
        let mut spelling = String::from(prefix);
        spelling.push('\'');
        self.advance();
        loop {
            match self.peek() {
                None => break,
                Some('\\') => {
                    spelling.push('\\');
                    self.advance();
                    if let Some(escaped) = self.peek() {
                        spelling.push(escaped);
                        self.advance();
                    }
                }
                Some('\'') => {
                    spelling.push('\'');
                    self.advance();
                    break;
                }
                Some('\n') => break,
                Some(c) => {
                    spelling.push(c);
                    self.advance();
                }
            }
        }
        self.consume_literal_suffix(&mut spelling);
        Token::new(TokenKind::Literal(LiteralKind::Char), spelling, line, col)
    }

    /// `R"delim(raw-characters)delim"` — the delimiter is up to 16 characters, none of
    /// them whitespace, `(`, `)`, or `\`.
    fn scan_raw_string(&mut self, line: usize, col: usize, prefix: &str) -> Token {
        let mut spelling = String::from(prefix);
        spelling.push('R');
        spelling.push('"');
        self.advance(); // opening quote
        let mut delim = String::new();
        while let Some(c) = self.peek() {
            if c == '(' {
                break;
            }
            delim.push(c);
            spelling.push(c);
            self.advance();
        }
        if self.peek() == Some('(') {
            spelling.push('(');
            self.advance();
        }
        let closer = format!("){}\"", delim);
        loop {
            if self.starts_with(&closer) {
                for c in closer.chars() {
                    spelling.push(c);
                    self.advance();
                }
                break;
            }
            match self.advance() {
                Some(c) => spelling.push(c),
                None => break,
            }
        }
        Token::new(TokenKind::Literal(LiteralKind::RawString), spelling, line, col)
    }

    /// User-defined literal suffixes (`"text"_fmt`, `'c'_ms`) and the built-in integer
    /// suffix set share the same lexical shape: an identifier glued to the literal.
    fn consume_literal_suffix(&mut self, spelling: &mut String) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                spelling.push(c);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_punct(&mut self, line: usize, col: usize) -> Option<Token> {
        for p in PUNCT_3 {
            if self.starts_with(p) {
                for _ in 0..3 {
                    self.advance();
                }
                return Some(Token::new(TokenKind::Punctuation, p.to_string(), line, col));
            }
        }
        for p in PUNCT_2 {
            if self.starts_with(p) {
                for _ in 0..2 {
                    self.advance();
                }
                return Some(Token::new(TokenKind::Punctuation, p.to_string(), line, col));
            }
        }
        const SINGLE: &str = "+-*/%^&|~!=<>()[]{};:,.?#@\\";
        let c = self.peek()?;
        if SINGLE.contains(c) {
            self.advance();
            return Some(Token::new(TokenKind::Punctuation, c.to_string(), line, col));
        }
        None
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_string_or_char_prefix_start(_scanner: &Scanner, c: char) -> bool {
    matches!(c, 'u' | 'U' | 'L' | 'R')
}
