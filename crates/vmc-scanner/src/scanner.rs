//! Scanner state machine.
//!
//! `ScannerState` produces one token per `scan()` call. Besides ordinary
//! tokenization it offers raw skipping over balanced brackets and JSX
//! elements. The parser uses those to step over function bodies and markup
//! without building nodes for them.

use crate::char_codes::{
    is_identifier_part, is_identifier_start, is_jsx_name_part, is_line_break,
    is_white_space_single_line,
};
use crate::syntax_kind::{SyntaxKind, text_to_keyword};
use memchr::{memchr, memchr2, memchr3, memmem};
use vmc_common::diagnostics::{DiagnosticMessage, diagnostic_messages};
use vmc_common::limits::MAX_SKIP_DEPTH;

/// A lexical error found while scanning.
#[derive(Clone, Debug)]
pub struct ScannerDiagnostic {
    pub pos: usize,
    pub length: usize,
    pub message: DiagnosticMessage,
}

/// Saved scanner position for speculative look-ahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    preceding_line_break: bool,
}

pub struct ScannerState {
    text: String,
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    preceding_line_break: bool,
    diagnostics: Vec<ScannerDiagnostic>,
}

/// Words after which a `/` starts a regular expression and a `<` starts JSX.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "do", "else", "in", "of", "yield", "await", "void", "delete",
    "throw", "new", "default",
];

impl ScannerState {
    pub fn new(text: String) -> ScannerState {
        // Skip a UTF-8 byte order mark
        let pos = if text.starts_with('\u{FEFF}') { 3 } else { 0 };
        ScannerState {
            text,
            pos,
            token_start: pos,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            preceding_line_break: false,
            diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    pub fn token_start(&self) -> usize {
        self.token_start
    }

    pub fn token_end(&self) -> usize {
        self.pos
    }

    /// Cooked value of the current token: identifier text, unescaped string
    /// contents, or raw numeric text.
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &str {
        self.text.get(self.token_start..self.pos).unwrap_or("")
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn diagnostics(&self) -> &[ScannerDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ScannerDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.preceding_line_break = snapshot.preceding_line_break;
    }

    /// Continue scanning from `pos`. The next `scan()` produces the token
    /// that starts at or after it.
    pub fn reset_to(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        self.text.as_bytes().get(pos).copied().unwrap_or(0)
    }

    /// True when the source at `pos` starts with `s`.
    pub fn starts_with_at(&self, pos: usize, s: &str) -> bool {
        self.text
            .as_bytes()
            .get(pos..)
            .is_some_and(|rest| rest.starts_with(s.as_bytes()))
    }

    fn error(&mut self, pos: usize, length: usize, message: DiagnosticMessage) {
        self.diagnostics.push(ScannerDiagnostic {
            pos,
            length,
            message,
        });
    }

    // =========================================================================
    // Tokenization
    // =========================================================================

    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.token_value.clear();
        self.pos = self.skip_trivia_tracking(self.pos);
        self.token_start = self.pos;

        if self.pos >= self.text.len() {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        }

        let ch = self.byte_at(self.pos);
        self.token = match ch {
            b'"' | b'\'' => self.scan_string(ch),
            b'`' => self.scan_template(),
            b'0'..=b'9' => self.scan_number(),
            b'.' if self.byte_at(self.pos + 1).is_ascii_digit() => self.scan_number(),
            b'#' if is_identifier_start(self.byte_at(self.pos + 1)) => {
                self.pos += 1;
                self.scan_identifier();
                SyntaxKind::PrivateIdentifier
            }
            b if is_identifier_start(b) => self.scan_identifier(),
            _ => self.scan_punctuation(ch),
        };
        self.token
    }

    /// Skip whitespace and comments from `pos`, recording line breaks.
    fn skip_trivia_tracking(&mut self, mut pos: usize) -> usize {
        loop {
            let b = self.byte_at(pos);
            match b {
                b'\n' | b'\r' => {
                    self.preceding_line_break = true;
                    pos += 1;
                }
                b if is_white_space_single_line(b) => pos += 1,
                b'/' if self.byte_at(pos + 1) == b'/' => pos = self.line_comment_end(pos),
                b'/' if self.byte_at(pos + 1) == b'*' => match self.block_comment_end(pos) {
                    Some((end, has_line_break)) => {
                        self.preceding_line_break |= has_line_break;
                        pos = end;
                    }
                    None => {
                        let len = self.text.len();
                        self.error(
                            pos,
                            len - pos,
                            diagnostic_messages::UNTERMINATED_COMMENT,
                        );
                        pos = len;
                    }
                },
                // U+2028 / U+2029
                0xE2 if self.byte_at(pos + 1) == 0x80
                    && matches!(self.byte_at(pos + 2), 0xA8 | 0xA9) =>
                {
                    self.preceding_line_break = true;
                    pos += 3;
                }
                // U+00A0
                0xC2 if self.byte_at(pos + 1) == 0xA0 => pos += 2,
                _ => return pos,
            }
        }
    }

    /// Position after whitespace and comments starting at `pos`.
    pub fn skip_trivia(&self, mut pos: usize) -> usize {
        loop {
            let b = self.byte_at(pos);
            match b {
                b if is_line_break(b) || is_white_space_single_line(b) => pos += 1,
                b'/' if self.byte_at(pos + 1) == b'/' => pos = self.line_comment_end(pos),
                b'/' if self.byte_at(pos + 1) == b'*' => match self.block_comment_end(pos) {
                    Some((end, _)) => pos = end,
                    None => return self.text.len(),
                },
                _ => return pos,
            }
        }
    }

    /// Position of the line break that ends a `//` comment (or end of text).
    fn line_comment_end(&self, pos: usize) -> usize {
        let bytes = self.text.as_bytes();
        memchr2(b'\n', b'\r', &bytes[pos..]).map_or(bytes.len(), |i| pos + i)
    }

    /// End of a `/* */` comment and whether it spans a line break.
    fn block_comment_end(&self, pos: usize) -> Option<(usize, bool)> {
        let bytes = self.text.as_bytes();
        let body_start = pos + 2;
        let rel = memmem::find(bytes.get(body_start..)?, b"*/")?;
        let body = &bytes[body_start..body_start + rel];
        let has_line_break = memchr2(b'\n', b'\r', body).is_some();
        Some((body_start + rel + 2, has_line_break))
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while self.pos < self.text.len() && is_identifier_part(self.byte_at(self.pos)) {
            self.pos += 1;
        }
        let text = &self.text[start..self.pos];
        self.token_value.push_str(text);
        text_to_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_string(&mut self, quote: u8) -> SyntaxKind {
        let start = self.pos;
        let mut pos = start + 1;
        let len = self.text.len();
        let terminated = loop {
            let Some(rel) = memchr3(quote, b'\\', b'\n', &self.text.as_bytes()[pos..]) else {
                pos = len;
                break false;
            };
            pos += rel;
            match self.byte_at(pos) {
                b'\\' => {
                    // \r\n line continuation counts as one escape
                    if self.byte_at(pos + 1) == b'\r' && self.byte_at(pos + 2) == b'\n' {
                        pos += 3;
                    } else {
                        pos += 2;
                    }
                    pos = pos.min(len);
                }
                b'\n' => break false,
                _ => break true,
            }
        };

        let content_end = pos;
        if terminated {
            self.pos = pos + 1;
        } else {
            self.pos = pos;
            self.error(
                start,
                pos - start,
                diagnostic_messages::UNTERMINATED_STRING_LITERAL,
            );
        }
        let raw = self.text.get(start + 1..content_end).unwrap_or("");
        self.token_value = cook_escapes(raw);
        SyntaxKind::StringLiteral
    }

    fn scan_template(&mut self) -> SyntaxKind {
        let start = self.pos;
        match self.skip_template(start, 0) {
            Some((end, has_substitution)) => {
                self.pos = end;
                let raw = self.text.get(start + 1..end - 1).unwrap_or("");
                if has_substitution {
                    self.token_value.push_str(raw);
                    SyntaxKind::TemplateLiteral
                } else {
                    self.token_value = cook_escapes(raw);
                    SyntaxKind::NoSubstitutionTemplateLiteral
                }
            }
            None => {
                let len = self.text.len();
                self.pos = len;
                self.error(
                    start,
                    len - start,
                    diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
                );
                SyntaxKind::NoSubstitutionTemplateLiteral
            }
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let is_radix_prefix = self.byte_at(start) == b'0'
            && matches!(
                self.byte_at(start + 1),
                b'x' | b'X' | b'o' | b'O' | b'b' | b'B'
            );

        if is_radix_prefix {
            self.pos += 2;
            while self.byte_at(self.pos).is_ascii_hexdigit() || self.byte_at(self.pos) == b'_' {
                self.pos += 1;
            }
        } else {
            self.eat_digits();
            if self.byte_at(self.pos) == b'.' {
                self.pos += 1;
                self.eat_digits();
            }
            if matches!(self.byte_at(self.pos), b'e' | b'E') {
                let sign = usize::from(matches!(self.byte_at(self.pos + 1), b'+' | b'-'));
                if self.byte_at(self.pos + 1 + sign).is_ascii_digit() {
                    self.pos += 1 + sign;
                    self.eat_digits();
                }
            }
        }

        let kind = if self.byte_at(self.pos) == b'n' {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        self.token_value.push_str(&self.text[start..self.pos]);
        kind
    }

    fn eat_digits(&mut self) {
        while self.byte_at(self.pos).is_ascii_digit() || self.byte_at(self.pos) == b'_' {
            self.pos += 1;
        }
    }

    #[inline]
    fn at(&self, s: &str) -> bool {
        self.starts_with_at(self.pos, s)
    }

    #[inline]
    fn op(&mut self, len: usize, kind: SyntaxKind) -> SyntaxKind {
        self.pos += len;
        kind
    }

    fn scan_punctuation(&mut self, ch: u8) -> SyntaxKind {
        use SyntaxKind::*;
        match ch {
            b'{' => self.op(1, OpenBraceToken),
            b'}' => self.op(1, CloseBraceToken),
            b'(' => self.op(1, OpenParenToken),
            b')' => self.op(1, CloseParenToken),
            b'[' => self.op(1, OpenBracketToken),
            b']' => self.op(1, CloseBracketToken),
            b';' => self.op(1, SemicolonToken),
            b',' => self.op(1, CommaToken),
            b':' => self.op(1, ColonToken),
            b'~' => self.op(1, TildeToken),
            b'@' => self.op(1, AtToken),
            b'#' => self.op(1, HashToken),
            b'.' => {
                if self.at("...") {
                    self.op(3, DotDotDotToken)
                } else {
                    self.op(1, DotToken)
                }
            }
            b'?' => {
                if self.at("?.") && !self.byte_at(self.pos + 2).is_ascii_digit() {
                    self.op(2, QuestionDotToken)
                } else if self.at("??=") {
                    self.op(3, QuestionQuestionEqualsToken)
                } else if self.at("??") {
                    self.op(2, QuestionQuestionToken)
                } else {
                    self.op(1, QuestionToken)
                }
            }
            b'<' => {
                if self.at("<<=") {
                    self.op(3, LessThanLessThanEqualsToken)
                } else if self.at("<<") {
                    self.op(2, LessThanLessThanToken)
                } else if self.at("<=") {
                    self.op(2, LessThanEqualsToken)
                } else {
                    self.op(1, LessThanToken)
                }
            }
            b'>' => {
                if self.at(">>>=") {
                    self.op(4, GreaterThanGreaterThanGreaterThanEqualsToken)
                } else if self.at(">>>") {
                    self.op(3, GreaterThanGreaterThanGreaterThanToken)
                } else if self.at(">>=") {
                    self.op(3, GreaterThanGreaterThanEqualsToken)
                } else if self.at(">>") {
                    self.op(2, GreaterThanGreaterThanToken)
                } else if self.at(">=") {
                    self.op(2, GreaterThanEqualsToken)
                } else {
                    self.op(1, GreaterThanToken)
                }
            }
            b'=' => {
                if self.at("===") {
                    self.op(3, EqualsEqualsEqualsToken)
                } else if self.at("==") {
                    self.op(2, EqualsEqualsToken)
                } else if self.at("=>") {
                    self.op(2, EqualsGreaterThanToken)
                } else {
                    self.op(1, EqualsToken)
                }
            }
            b'!' => {
                if self.at("!==") {
                    self.op(3, ExclamationEqualsEqualsToken)
                } else if self.at("!=") {
                    self.op(2, ExclamationEqualsToken)
                } else {
                    self.op(1, ExclamationToken)
                }
            }
            b'+' => {
                if self.at("++") {
                    self.op(2, PlusPlusToken)
                } else if self.at("+=") {
                    self.op(2, PlusEqualsToken)
                } else {
                    self.op(1, PlusToken)
                }
            }
            b'-' => {
                if self.at("--") {
                    self.op(2, MinusMinusToken)
                } else if self.at("-=") {
                    self.op(2, MinusEqualsToken)
                } else {
                    self.op(1, MinusToken)
                }
            }
            b'*' => {
                if self.at("**=") {
                    self.op(3, AsteriskAsteriskEqualsToken)
                } else if self.at("**") {
                    self.op(2, AsteriskAsteriskToken)
                } else if self.at("*=") {
                    self.op(2, AsteriskEqualsToken)
                } else {
                    self.op(1, AsteriskToken)
                }
            }
            b'/' => {
                if self.at("/=") {
                    self.op(2, SlashEqualsToken)
                } else {
                    self.op(1, SlashToken)
                }
            }
            b'%' => {
                if self.at("%=") {
                    self.op(2, PercentEqualsToken)
                } else {
                    self.op(1, PercentToken)
                }
            }
            b'&' => {
                if self.at("&&=") {
                    self.op(3, AmpersandAmpersandEqualsToken)
                } else if self.at("&&") {
                    self.op(2, AmpersandAmpersandToken)
                } else if self.at("&=") {
                    self.op(2, AmpersandEqualsToken)
                } else {
                    self.op(1, AmpersandToken)
                }
            }
            b'|' => {
                if self.at("||=") {
                    self.op(3, BarBarEqualsToken)
                } else if self.at("||") {
                    self.op(2, BarBarToken)
                } else if self.at("|=") {
                    self.op(2, BarEqualsToken)
                } else {
                    self.op(1, BarToken)
                }
            }
            b'^' => {
                if self.at("^=") {
                    self.op(2, CaretEqualsToken)
                } else {
                    self.op(1, CaretToken)
                }
            }
            _ => {
                let start = self.pos;
                self.pos += 1;
                self.error(start, 1, diagnostic_messages::INVALID_CHARACTER);
                Unknown
            }
        }
    }

    /// Re-scan the current `/` or `/=` token as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(
            self.token,
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken
        ) {
            return self.token;
        }
        let start = self.token_start;
        match self.skip_regex(start) {
            Some(end) => {
                self.pos = end;
                self.token = SyntaxKind::RegularExpressionLiteral;
                self.token_value = self.text[start..end].to_string();
            }
            None => {
                let end = self.line_comment_end(start);
                self.pos = end;
                self.token = SyntaxKind::RegularExpressionLiteral;
                self.error(
                    start,
                    end - start,
                    diagnostic_messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                );
            }
        }
        self.token
    }

    // =========================================================================
    // Raw skipping
    // =========================================================================

    /// Skip a balanced `{…}`, `(…)` or `[…]` group starting at `open`.
    ///
    /// Strings, template literals, comments, regular expressions and JSX
    /// elements inside the group are stepped over, so brackets inside them do
    /// not count. Returns the position after the matching closer, or `None`
    /// when the group is never closed or brackets are mismatched.
    pub fn skip_balanced(&self, open: usize) -> Option<usize> {
        self.skip_balanced_inner(open, 0)
    }

    /// Skip a JSX element or fragment starting at the `<` at `start`.
    pub fn skip_jsx_element(&self, start: usize) -> Option<usize> {
        self.skip_jsx_inner(start, 0)
    }

    fn skip_balanced_inner(&self, open: usize, depth: u32) -> Option<usize> {
        if depth > MAX_SKIP_DEPTH {
            return None;
        }
        let bytes = self.text.as_bytes();
        let mut stack: Vec<u8> = Vec::new();
        let mut pos = open;

        while pos < bytes.len() {
            match bytes[pos] {
                b'{' => {
                    stack.push(b'}');
                    pos += 1;
                }
                b'(' => {
                    stack.push(b')');
                    pos += 1;
                }
                b'[' => {
                    stack.push(b']');
                    pos += 1;
                }
                closer @ (b'}' | b')' | b']') => {
                    if stack.pop() != Some(closer) {
                        return None;
                    }
                    pos += 1;
                    if stack.is_empty() {
                        return Some(pos);
                    }
                }
                quote @ (b'"' | b'\'') => pos = self.skip_string_raw(pos, quote)?,
                b'`' => pos = self.skip_template(pos, depth + 1)?.0,
                b'/' => match self.byte_at(pos + 1) {
                    b'/' => pos = self.line_comment_end(pos),
                    b'*' => pos = self.block_comment_end(pos)?.0,
                    _ if self.expression_may_start_after(pos) => pos = self.skip_regex(pos)?,
                    _ => pos += 1,
                },
                b'<' if self.expression_may_start_after(pos)
                    && (is_identifier_start(self.byte_at(pos + 1))
                        || self.byte_at(pos + 1) == b'>') =>
                {
                    pos = self.skip_jsx_inner(pos, depth + 1)?;
                }
                _ => pos += 1,
            }
        }
        None
    }

    /// Whether an expression (regex literal, JSX element) can begin at `pos`,
    /// judged by the closest significant byte before it.
    fn expression_may_start_after(&self, pos: usize) -> bool {
        let bytes = self.text.as_bytes();
        let mut end = pos;
        while end > 0 && (bytes[end - 1].is_ascii_whitespace()) {
            end -= 1;
        }
        if end == 0 {
            return true;
        }
        let prev = bytes[end - 1];
        if is_identifier_part(prev) {
            let mut start = end;
            while start > 0 && is_identifier_part(bytes[start - 1]) {
                start -= 1;
            }
            let word = &self.text[start..end];
            return EXPRESSION_KEYWORDS.contains(&word);
        }
        matches!(
            prev,
            b'(' | b',' | b'=' | b':' | b'[' | b'!' | b'&' | b'|' | b'?' | b'{' | b'}' | b';'
                | b'+' | b'-' | b'*' | b'%' | b'<' | b'>' | b'~' | b'^'
        )
    }

    fn skip_string_raw(&self, start: usize, quote: u8) -> Option<usize> {
        let bytes = self.text.as_bytes();
        let mut pos = start + 1;
        loop {
            let rel = memchr3(quote, b'\\', b'\n', bytes.get(pos..)?)?;
            pos += rel;
            match bytes[pos] {
                b'\\' => pos += 2,
                b'\n' => return None,
                _ => return Some(pos + 1),
            }
        }
    }

    /// Skip a template literal starting at the backtick at `start`.
    /// Returns the end position and whether it contains `${…}` substitutions.
    fn skip_template(&self, start: usize, depth: u32) -> Option<(usize, bool)> {
        let bytes = self.text.as_bytes();
        let mut pos = start + 1;
        let mut has_substitution = false;
        loop {
            let rel = memchr3(b'`', b'\\', b'$', bytes.get(pos..)?)?;
            pos += rel;
            match bytes[pos] {
                b'\\' => pos += 2,
                b'`' => return Some((pos + 1, has_substitution)),
                _ if self.byte_at(pos + 1) == b'{' => {
                    has_substitution = true;
                    pos = self.skip_balanced_inner(pos + 1, depth + 1)?;
                }
                _ => pos += 1,
            }
        }
    }

    fn skip_regex(&self, start: usize) -> Option<usize> {
        let len = self.text.len();
        let mut pos = start + 1;
        let mut in_class = false;
        loop {
            if pos >= len {
                return None;
            }
            match self.byte_at(pos) {
                b if is_line_break(b) => return None,
                b'\\' => pos += 2,
                b'[' => {
                    in_class = true;
                    pos += 1;
                }
                b']' => {
                    in_class = false;
                    pos += 1;
                }
                b'/' if !in_class => {
                    pos += 1;
                    break;
                }
                _ => pos += 1,
            }
        }
        while pos < len && is_identifier_part(self.byte_at(pos)) {
            pos += 1;
        }
        Some(pos)
    }

    fn skip_jsx_inner(&self, start: usize, depth: u32) -> Option<usize> {
        if depth > MAX_SKIP_DEPTH {
            return None;
        }
        let bytes = self.text.as_bytes();
        let mut pos = start + 1;

        // <>...</>
        if self.byte_at(pos) == b'>' {
            return self.skip_jsx_children(pos + 1, depth);
        }

        while pos < bytes.len() && is_jsx_name_part(bytes[pos]) {
            pos += 1;
        }

        loop {
            match *bytes.get(pos)? {
                b'/' if self.byte_at(pos + 1) == b'>' => return Some(pos + 2),
                b'>' => return self.skip_jsx_children(pos + 1, depth),
                b'{' => pos = self.skip_balanced_inner(pos, depth + 1)?,
                quote @ (b'"' | b'\'') => {
                    let rel = memchr(quote, bytes.get(pos + 1..)?)?;
                    pos += rel + 2;
                }
                _ => pos += 1,
            }
        }
    }

    fn skip_jsx_children(&self, mut pos: usize, depth: u32) -> Option<usize> {
        let bytes = self.text.as_bytes();
        loop {
            let rel = memchr2(b'<', b'{', bytes.get(pos..)?)?;
            pos += rel;
            if bytes[pos] == b'{' {
                pos = self.skip_balanced_inner(pos, depth + 1)?;
                continue;
            }
            if self.byte_at(pos + 1) == b'/' {
                let close = memchr(b'>', &bytes[pos..])?;
                return Some(pos + close + 1);
            }
            pos = self.skip_jsx_inner(pos, depth + 1)?;
        }
    }
}

/// Resolve escape sequences in string and template literal contents.
pub(crate) fn cook_escapes(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(esc) = chars.next() else {
            break;
        };
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(char::is_ascii_digit) => out.push('\0'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex);
            }
            'u' => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                push_code_point(&mut out, &hex);
            }
            // Line continuations produce nothing
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => out.push('\u{FFFD}'),
    }
}
