//! Parser state - statement and declaration parsing methods

use super::base::NodeIndex;
use super::flags::{modifier_flags, node_flags};
use super::node::{
    BindingElementData, BindingPatternData, ClassData, ExportAssignmentData, ExportDeclData,
    ExpressionStatementData, FunctionData, IdentifierData, ImportDeclData, LiteralData,
    MethodDeclData, NodeKind, PropertyDeclarationData, SpecifierData, VariableData,
    VariableDeclarationData,
};
use super::state::ParserState;
use vmc_common::diagnostics::diagnostic_messages;
use vmc_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::ImportKeyword => {
                // import(...) and import.meta are expressions
                if matches!(self.peek_byte(), b'(' | b'.') {
                    self.parse_expression_statement()
                } else {
                    self.parse_import_declaration()
                }
            }
            SyntaxKind::ExportKeyword => self.parse_export_declaration(),
            SyntaxKind::ConstKeyword | SyntaxKind::LetKeyword | SyntaxKind::VarKeyword => {
                let pos = self.token_pos();
                self.parse_variable_statement(pos, modifier_flags::NONE)
            }
            SyntaxKind::ClassKeyword => {
                let pos = self.token_pos();
                self.parse_class_declaration(pos, modifier_flags::NONE)
            }
            SyntaxKind::FunctionKeyword => {
                let pos = self.token_pos();
                self.parse_function_declaration(pos, modifier_flags::NONE)
            }
            SyntaxKind::Identifier if self.is_async_function() => {
                let pos = self.token_pos();
                self.parse_function_declaration(pos, modifier_flags::NONE)
            }
            SyntaxKind::SemicolonToken => {
                let pos = self.token_pos();
                self.next_token();
                self.finish_node(NodeKind::EmptyStatement, pos)
            }
            SyntaxKind::OpenBraceToken
            | SyntaxKind::IfKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::WithKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::DebuggerKeyword => self.skip_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    /// `async function` on one line.
    pub(crate) fn is_async_function(&self) -> bool {
        self.is_contextual("async") && self.peek_word("function")
    }

    pub(crate) fn parse_expression_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = self.parse_expression();
        self.parse_semicolon();
        self.finish_node(
            NodeKind::ExpressionStatement(ExpressionStatementData { expression }),
            pos,
        )
    }

    /// Step over a statement that cannot declare a component: control flow,
    /// blocks, `return`, `throw` and friends.
    pub(crate) fn skip_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut first = true;
        // A line break does not end the statement after `if (...)` or `else`
        let mut continues = false;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken => break,
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    break;
                }
                _ if !first && !continues && self.scanner.has_preceding_line_break() => break,
                SyntaxKind::OpenBraceToken => {
                    if !self.skip_group() {
                        break;
                    }
                    // `} else {`, `} catch {`, `} finally {`, `} while (...)`
                    if !matches!(
                        self.token(),
                        SyntaxKind::ElseKeyword
                            | SyntaxKind::CatchKeyword
                            | SyntaxKind::FinallyKeyword
                            | SyntaxKind::WhileKeyword
                    ) {
                        break;
                    }
                    continues = false;
                }
                SyntaxKind::OpenParenToken | SyntaxKind::OpenBracketToken => {
                    let is_paren = self.is_token(SyntaxKind::OpenParenToken);
                    if !self.skip_group() {
                        break;
                    }
                    continues = is_paren;
                }
                kind => {
                    continues = matches!(
                        kind,
                        SyntaxKind::ElseKeyword
                            | SyntaxKind::DoKeyword
                            | SyntaxKind::TryKeyword
                            | SyntaxKind::FinallyKeyword
                    );
                    self.next_token();
                }
            }
            first = false;
        }
        self.finish_node(NodeKind::SkippedStatement, pos)
    }

    // =========================================================================
    // Imports
    // =========================================================================

    pub(crate) fn parse_import_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();

        let mut default_binding = NodeIndex::NONE;
        let mut namespace_binding = NodeIndex::NONE;
        let mut named_bindings = None;

        if !self.is_token(SyntaxKind::StringLiteral) {
            let mut expect_more = true;
            if self.is_token(SyntaxKind::Identifier) {
                default_binding = self.parse_identifier();
                expect_more = self.parse_optional(SyntaxKind::CommaToken);
            }
            if expect_more {
                if self.parse_optional(SyntaxKind::AsteriskToken) {
                    self.parse_expected_contextual("as");
                    namespace_binding = self.parse_identifier();
                } else if self.is_token(SyntaxKind::OpenBraceToken) {
                    named_bindings = Some(self.parse_named_specifiers(true));
                } else {
                    self.parse_error_at_current_token(&diagnostic_messages::TOKEN_EXPECTED, &["{"]);
                }
            }
            self.parse_expected_contextual("from");
        }

        let module_specifier = self.parse_module_specifier();
        self.parse_import_attributes();
        self.parse_semicolon();

        self.finish_node(
            NodeKind::ImportDeclaration(ImportDeclData {
                default_binding,
                namespace_binding,
                named_bindings,
                module_specifier,
            }),
            pos,
        )
    }

    /// `with { type: "json" }` / `assert { ... }` after a module specifier.
    fn parse_import_attributes(&mut self) {
        if (self.is_token(SyntaxKind::WithKeyword) || self.is_contextual("assert"))
            && !self.scanner.has_preceding_line_break()
        {
            self.next_token();
            if self.is_token(SyntaxKind::OpenBraceToken) {
                self.skip_group();
            }
        }
    }

    pub(crate) fn parse_expected_contextual(&mut self, text: &str) -> bool {
        if self.is_contextual(text) {
            self.next_token();
            return true;
        }
        self.parse_error_at_current_token(&diagnostic_messages::TOKEN_EXPECTED, &[text]);
        false
    }

    fn parse_module_specifier(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_string_literal()
        } else {
            self.parse_error_at_current_token(
                &diagnostic_messages::TOKEN_EXPECTED,
                &["string literal"],
            );
            NodeIndex::NONE
        }
    }

    /// `{ a, b as c, default as d, "x-y" as e }` for imports and exports.
    fn parse_named_specifiers(&mut self, is_import: bool) -> super::base::NodeList {
        let mut specifiers = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return self.make_node_list(specifiers);
        }
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let pos = self.token_pos();
            let first = self.parse_module_export_name();
            let (property_name, name) = if self.is_contextual("as") {
                self.next_token();
                (first, self.parse_module_export_name())
            } else {
                (NodeIndex::NONE, first)
            };
            let data = SpecifierData {
                property_name,
                name,
            };
            let kind = if is_import {
                NodeKind::ImportSpecifier(data)
            } else {
                NodeKind::ExportSpecifier(data)
            };
            specifiers.push(self.finish_node(kind, pos));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.make_node_list(specifiers)
    }

    fn parse_module_export_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_string_literal()
        } else if self.is_identifier_or_keyword() {
            self.parse_identifier_name()
        } else {
            self.parse_error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
            NodeIndex::NONE
        }
    }

    // =========================================================================
    // Exports
    // =========================================================================

    pub(crate) fn parse_export_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();

        if self.parse_optional(SyntaxKind::DefaultKeyword) {
            let modifiers = modifier_flags::EXPORT | modifier_flags::DEFAULT;
            return match self.token() {
                SyntaxKind::ClassKeyword => self.parse_class_declaration(pos, modifiers),
                SyntaxKind::FunctionKeyword => self.parse_function_declaration(pos, modifiers),
                SyntaxKind::Identifier if self.is_async_function() => {
                    self.parse_function_declaration(pos, modifiers)
                }
                _ => {
                    let expression = self.parse_assignment_expression();
                    self.parse_semicolon();
                    self.finish_node(
                        NodeKind::ExportAssignment(ExportAssignmentData { expression }),
                        pos,
                    )
                }
            };
        }

        match self.token() {
            SyntaxKind::AsteriskToken => {
                self.next_token();
                let namespace_export = if self.is_contextual("as") {
                    self.next_token();
                    self.parse_module_export_name()
                } else {
                    NodeIndex::NONE
                };
                self.parse_expected_contextual("from");
                let module_specifier = self.parse_module_specifier();
                self.parse_import_attributes();
                self.parse_semicolon();
                self.finish_node(
                    NodeKind::ExportDeclaration(ExportDeclData {
                        export_clause: None,
                        namespace_export,
                        module_specifier,
                    }),
                    pos,
                )
            }
            SyntaxKind::OpenBraceToken => {
                let clause = self.parse_named_specifiers(false);
                let module_specifier = if self.is_contextual("from") {
                    self.next_token();
                    let specifier = self.parse_module_specifier();
                    self.parse_import_attributes();
                    specifier
                } else {
                    NodeIndex::NONE
                };
                self.parse_semicolon();
                self.finish_node(
                    NodeKind::ExportDeclaration(ExportDeclData {
                        export_clause: Some(clause),
                        namespace_export: NodeIndex::NONE,
                        module_specifier,
                    }),
                    pos,
                )
            }
            SyntaxKind::ConstKeyword | SyntaxKind::LetKeyword | SyntaxKind::VarKeyword => {
                self.parse_variable_statement(pos, modifier_flags::EXPORT)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(pos, modifier_flags::EXPORT),
            SyntaxKind::FunctionKeyword => {
                self.parse_function_declaration(pos, modifier_flags::EXPORT)
            }
            SyntaxKind::Identifier if self.is_async_function() => {
                self.parse_function_declaration(pos, modifier_flags::EXPORT)
            }
            _ => {
                self.parse_error_at_current_token(
                    &diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    &[],
                );
                NodeIndex::NONE
            }
        }
    }

    // =========================================================================
    // Variables
    // =========================================================================

    pub(crate) fn parse_variable_statement(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        let flags = match self.token() {
            SyntaxKind::ConstKeyword => node_flags::CONST,
            SyntaxKind::LetKeyword => node_flags::LET,
            _ => node_flags::NONE,
        };
        self.next_token();

        let mut declarations = Vec::new();
        loop {
            let decl_pos = self.token_pos();
            let name = self.parse_binding_name();
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            declarations.push(self.finish_node(
                NodeKind::VariableDeclaration(VariableDeclarationData { name, initializer }),
                decl_pos,
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_semicolon();

        let declarations = self.make_node_list(declarations);
        self.finish_node_with_flags(
            NodeKind::VariableStatement(VariableData { declarations }),
            pos,
            flags,
            modifiers,
        )
    }

    /// Identifier or destructuring pattern.
    pub(crate) fn parse_binding_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::Identifier => self.parse_identifier(),
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => {
                self.parse_error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
                NodeIndex::NONE
            }
        }
    }

    fn parse_object_binding_pattern(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let element_pos = self.token_pos();
            let data = if self.parse_optional(SyntaxKind::DotDotDotToken) {
                BindingElementData {
                    property_name: NodeIndex::NONE,
                    name: self.parse_binding_name(),
                    initializer: NodeIndex::NONE,
                    dot_dot_dot_token: true,
                }
            } else {
                let property = self.parse_property_name();
                let (property_name, name) = if self.parse_optional(SyntaxKind::ColonToken) {
                    (property, self.parse_binding_name())
                } else {
                    (NodeIndex::NONE, property)
                };
                let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                    self.parse_assignment_expression()
                } else {
                    NodeIndex::NONE
                };
                BindingElementData {
                    property_name,
                    name,
                    initializer,
                    dot_dot_dot_token: false,
                }
            };
            elements.push(self.finish_node(NodeKind::BindingElement(data), element_pos));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let elements = self.make_node_list(elements);
        self.finish_node(
            NodeKind::ObjectBindingPattern(BindingPatternData { elements }),
            pos,
        )
    }

    fn parse_array_binding_pattern(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let element_pos = self.token_pos();
            if self.is_token(SyntaxKind::CommaToken) {
                elements.push(self.finish_node(NodeKind::OmittedExpression, element_pos));
                self.next_token();
                continue;
            }
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name();
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            elements.push(self.finish_node(
                NodeKind::BindingElement(BindingElementData {
                    property_name: NodeIndex::NONE,
                    name,
                    initializer,
                    dot_dot_dot_token,
                }),
                element_pos,
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let elements = self.make_node_list(elements);
        self.finish_node(
            NodeKind::ArrayBindingPattern(BindingPatternData { elements }),
            pos,
        )
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    pub(crate) fn parse_function_declaration(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        let (modifiers, name, body) = self.parse_function_like(modifiers);
        self.finish_node_with_flags(
            NodeKind::FunctionDeclaration(FunctionData { name, body }),
            pos,
            node_flags::NONE,
            modifiers,
        )
    }

    /// `[async] function [*] [name] (params) { body }`. Parameters and body
    /// are skipped.
    pub(crate) fn parse_function_like(&mut self, mut modifiers: u32) -> (u32, NodeIndex, NodeIndex) {
        if self.is_contextual("async") {
            self.next_token();
            modifiers |= modifier_flags::ASYNC;
        }
        self.parse_expected(SyntaxKind::FunctionKeyword);
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            modifiers |= modifier_flags::GENERATOR;
        }
        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        if self.is_token(SyntaxKind::OpenParenToken) {
            self.skip_group();
        } else {
            self.parse_error_at_current_token(&diagnostic_messages::TOKEN_EXPECTED, &["("]);
        }
        let body = self.parse_opaque_block();
        (modifiers, name, body)
    }

    pub(crate) fn parse_class_declaration(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        let data = self.parse_class_like();
        self.finish_node_with_flags(
            NodeKind::ClassDeclaration(data),
            pos,
            node_flags::NONE,
            modifiers,
        )
    }

    /// `class [Name] [extends Expr] { members }`
    pub(crate) fn parse_class_like(&mut self) -> ClassData {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let heritage = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_left_hand_side_expression()
        } else {
            NodeIndex::NONE
        };
        let members = self.parse_class_members();
        ClassData {
            name,
            heritage,
            members,
        }
    }

    fn parse_class_members(&mut self) -> super::base::NodeList {
        let mut members = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return self.make_node_list(members);
        }
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let start = self.token_pos();
            let member = self.parse_class_member();
            if member.is_some() {
                members.push(member);
            }
            if self.token_pos() == start {
                // Not a member; skip the token to avoid looping
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.make_node_list(members)
    }

    /// A modifier word (`static`, `async`, `get`, `set`) is a member name
    /// when the next token ends the name.
    fn is_member_modifier(&self, word: &str) -> bool {
        self.is_contextual(word) && !matches!(self.peek_byte(), b'(' | b'=' | b';' | b'}' | 0)
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut modifiers = modifier_flags::NONE;

        if self.is_member_modifier("static") {
            self.next_token();
            modifiers |= modifier_flags::STATIC;
            if self.is_token(SyntaxKind::OpenBraceToken) {
                let body = self.parse_opaque_block();
                return self.finish_node_with_flags(
                    NodeKind::MethodDeclaration(MethodDeclData {
                        name: NodeIndex::NONE,
                        body,
                    }),
                    pos,
                    node_flags::NONE,
                    modifiers,
                );
            }
        }

        let mut is_method = false;
        if self.is_member_modifier("async") && !self.scanner_line_break_after_token() {
            self.next_token();
            modifiers |= modifier_flags::ASYNC;
            is_method = true;
        }
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            modifiers |= modifier_flags::GENERATOR;
            is_method = true;
        }
        if self.is_member_modifier("get") || self.is_member_modifier("set") {
            self.next_token();
            is_method = true;
        }

        let name = self.parse_property_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }

        if self.is_token(SyntaxKind::OpenParenToken) {
            self.skip_group();
            let body = self.parse_opaque_block();
            return self.finish_node_with_flags(
                NodeKind::MethodDeclaration(MethodDeclData { name, body }),
                pos,
                node_flags::NONE,
                modifiers,
            );
        }
        if is_method {
            self.parse_error_at_current_token(&diagnostic_messages::TOKEN_EXPECTED, &["("]);
            return NodeIndex::NONE;
        }

        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.finish_node_with_flags(
            NodeKind::PropertyDeclaration(PropertyDeclarationData { name, initializer }),
            pos,
            node_flags::NONE,
            modifiers,
        )
    }

    /// Whether a line break separates the current token from the next one.
    fn scanner_line_break_after_token(&self) -> bool {
        let end = self.scanner.token_end();
        let next = self.scanner.skip_trivia(end);
        self.scanner
            .source_text()
            .get(end..next)
            .is_some_and(|gap| gap.contains(['\n', '\r']))
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if !self.is_token(SyntaxKind::Identifier) {
            self.parse_error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
            return NodeIndex::NONE;
        }
        self.parse_identifier_name()
    }

    /// Identifier or reserved word used as a name (`a.default`, `{ class: 1 }`).
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if !self.is_identifier_or_keyword() {
            self.parse_error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
            return NodeIndex::NONE;
        }
        let pos = self.token_pos();
        let escaped_text = self.scanner.token_value().to_string();
        self.next_token();
        self.finish_node(NodeKind::Identifier(IdentifierData { escaped_text }), pos)
    }

    pub(crate) fn parse_string_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let text = self.scanner.token_value().to_string();
        self.next_token();
        self.finish_node(NodeKind::StringLiteral(LiteralData { text }), pos)
    }

    /// Property name in an object literal, class body or binding pattern.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                let text = self.scanner.token_value().to_string();
                self.next_token();
                self.finish_node(NodeKind::NumericLiteral(LiteralData { text }), pos)
            }
            SyntaxKind::PrivateIdentifier => {
                let escaped_text = self.scanner.token_value().to_string();
                self.next_token();
                self.finish_node(
                    NodeKind::PrivateIdentifier(IdentifierData { escaped_text }),
                    pos,
                )
            }
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let expression = self.parse_assignment_expression();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.finish_node(
                    NodeKind::ComputedPropertyName(super::node::ComputedPropertyData {
                        expression,
                    }),
                    pos,
                )
            }
            _ if self.is_identifier_or_keyword() => self.parse_identifier_name(),
            _ => {
                self.parse_error_at_current_token(
                    &diagnostic_messages::PROPERTY_ASSIGNMENT_EXPECTED,
                    &[],
                );
                NodeIndex::NONE
            }
        }
    }
}
