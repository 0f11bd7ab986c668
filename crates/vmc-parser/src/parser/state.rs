//! Parser state: token cursor, diagnostics and recovery helpers.
//!
//! Statement parsing lives in `state_statements.rs`, expression parsing in
//! `state_expressions.rs`.

use super::base::{NodeIndex, NodeList};
use super::node::{NodeArena, NodeKind, SourceFileData};
use vmc_common::diagnostics::{DiagnosticMessage, diagnostic_messages, format_message};
use vmc_scanner::{ScannerState, SyntaxKind, token_is_keyword};

/// A syntax error found while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub code: u32,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    /// End of the last consumed token
    pub(crate) prev_token_end: u32,
    pub(crate) expression_depth: u32,
    /// Set after the nesting limit is hit; cleared at the next statement
    pub(crate) suppress_errors: bool,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        ParserState {
            scanner: ScannerState::new(source_text),
            arena: NodeArena::new(),
            file_name,
            parse_diagnostics: Vec::new(),
            prev_token_end: 0,
            expression_depth: 0,
            suppress_errors: false,
        }
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    pub fn get_file_name(&self) -> &str {
        &self.file_name
    }

    pub fn get_source_text(&self) -> &str {
        self.scanner.source_text()
    }

    /// Parse the whole file and return the `SourceFile` node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        self.next_token();

        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let start = self.token_pos();
            let errors_before = self.parse_diagnostics.len();

            if self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_error_at_current_token(
                    &diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    &[],
                );
                self.next_token();
                continue;
            }

            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.parse_diagnostics.len() > errors_before {
                self.resync_after_error();
            }
            self.suppress_errors = false;
            self.expression_depth = 0;
            // Always make progress
            if self.token_pos() == start && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.next_token();
            }
        }

        for diag in self.scanner.take_diagnostics() {
            self.parse_diagnostics.push(ParseDiagnostic {
                start: u32_from_usize(diag.pos),
                length: u32_from_usize(diag.length),
                message: diag.message.message.to_string(),
                code: diag.message.code,
            });
        }
        self.parse_diagnostics.sort_by_key(|d| d.start);

        tracing::debug!(
            file = %self.file_name,
            statements = statements.len(),
            nodes = self.arena.len(),
            errors = self.parse_diagnostics.len(),
            "parsed source file"
        );

        let end = u32_from_usize(self.scanner.source_text().len());
        self.arena.add_node(
            NodeKind::SourceFile(SourceFileData {
                statements: NodeList::new(statements),
                file_name: self.file_name.clone(),
            }),
            0,
            end,
        )
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.scanner.token() == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        u32_from_usize(self.scanner.token_start())
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        u32_from_usize(self.scanner.token_end())
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = u32_from_usize(self.scanner.token_end());
        self.scanner.scan()
    }

    /// True for an identifier token with exactly this text (contextual
    /// keywords such as `from`, `as`, `static`, `async`).
    pub(crate) fn is_contextual(&self, text: &str) -> bool {
        self.is_token(SyntaxKind::Identifier) && self.scanner.token_value() == text
    }

    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        self.is_token(SyntaxKind::Identifier) || token_is_keyword(self.token())
    }

    /// First byte of the next token after the current one.
    pub(crate) fn peek_byte(&self) -> u8 {
        let pos = self.scanner.skip_trivia(self.scanner.token_end());
        self.scanner
            .source_text()
            .as_bytes()
            .get(pos)
            .copied()
            .unwrap_or(0)
    }

    /// True when the text after the current token starts with `s`.
    pub(crate) fn peek_text(&self, s: &str) -> bool {
        let pos = self.scanner.skip_trivia(self.scanner.token_end());
        self.scanner.starts_with_at(pos, s)
    }

    /// Like `peek_text` for a word: `s` must not be followed by an
    /// identifier character.
    pub(crate) fn peek_word(&self, s: &str) -> bool {
        let pos = self.scanner.skip_trivia(self.scanner.token_end());
        self.scanner.starts_with_at(pos, s)
            && !self
                .scanner
                .source_text()
                .as_bytes()
                .get(pos + s.len())
                .is_some_and(|b| vmc_scanner::char_codes::is_identifier_part(*b))
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        self.parse_error_at_current_token(&diagnostic_messages::TOKEN_EXPECTED, &[kind.text()]);
        false
    }

    pub(crate) fn can_parse_semicolon(&self) -> bool {
        self.is_token(SyntaxKind::SemicolonToken)
            || self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.scanner.has_preceding_line_break()
    }

    /// Consume a `;` or accept an automatically inserted one.
    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return true;
        }
        if self.can_parse_semicolon() {
            return true;
        }
        self.parse_error_at_current_token(&diagnostic_messages::TOKEN_EXPECTED, &[";"]);
        false
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Add a node spanning from `pos` to the end of the last consumed token.
    pub(crate) fn finish_node(&mut self, kind: NodeKind, pos: u32) -> NodeIndex {
        self.finish_node_with_flags(kind, pos, 0, 0)
    }

    pub(crate) fn finish_node_with_flags(
        &mut self,
        kind: NodeKind,
        pos: u32,
        flags: u32,
        modifier_flags: u32,
    ) -> NodeIndex {
        let end = self.prev_token_end.max(pos);
        self.arena
            .add_node_with_flags(kind, pos, end, flags, modifier_flags)
    }

    pub(crate) fn make_node_list(&self, nodes: Vec<NodeIndex>) -> NodeList {
        NodeList::new(nodes)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn parse_error_at(
        &mut self,
        start: u32,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        // One error per position is enough; cascades add noise
        if self.suppress_errors
            || self
                .parse_diagnostics
                .last()
                .is_some_and(|last| last.start == start)
        {
            return;
        }
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length,
            message: format_message(message.message, args),
            code: message.code,
        });
    }

    pub(crate) fn parse_error_at_current_token(
        &mut self,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.parse_error_at(start, length, message, args);
    }

    // =========================================================================
    // Skipping and recovery
    // =========================================================================

    /// Skip the balanced group opened by the current `{`, `(` or `[` token
    /// and move to the token after it. Returns false (and moves to end of
    /// file) when the group is never closed.
    pub(crate) fn skip_group(&mut self) -> bool {
        let open = self.scanner.token_start();
        match self.scanner.skip_balanced(open) {
            Some(end) => {
                self.scanner.reset_to(end);
                self.prev_token_end = u32_from_usize(end);
                self.scanner.scan();
                true
            }
            None => {
                let text = self.token().text();
                self.parse_error_at_current_token(
                    &diagnostic_messages::UNTERMINATED_BLOCK,
                    &[text],
                );
                let len = self.scanner.source_text().len();
                self.scanner.reset_to(len);
                self.prev_token_end = u32_from_usize(len);
                self.scanner.scan();
                false
            }
        }
    }

    /// Skip the current `{ ... }` group and record it as an opaque `Block`.
    pub(crate) fn parse_opaque_block(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if !self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_error_at_current_token(&diagnostic_messages::TOKEN_EXPECTED, &["{"]);
            return NodeIndex::NONE;
        }
        self.skip_group();
        self.finish_node(NodeKind::Block, pos)
    }

    /// After a syntax error, skip to the start of the next statement: past a
    /// `;`, or to the first token on a new line.
    pub(crate) fn resync_after_error(&mut self) {
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    return;
                }
                _ if self.scanner.has_preceding_line_break() => return,
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => {
                    if !self.skip_group() {
                        return;
                    }
                }
                _ => {
                    self.next_token();
                }
            }
        }
    }
}

#[inline]
pub(crate) fn u32_from_usize(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
