//! Parser state - expression parsing methods

use super::base::NodeIndex;
use super::flags::{modifier_flags, node_flags};
use super::node::{
    AccessExprData, BinaryExprData, CallExprData, ConditionalExprData, FunctionData,
    IdentifierData, LiteralData, LiteralExprData, MethodDeclData, NodeKind, ParenthesizedData,
    PropertyAssignmentData, ShorthandPropertyData, SpreadData, TaggedTemplateData, UnaryExprData,
};
use super::state::{ParserState, u32_from_usize};
use vmc_common::diagnostics::diagnostic_messages;
use vmc_common::limits::MAX_PARSER_EXPRESSION_DEPTH;
use vmc_scanner::char_codes::{is_identifier_part, is_identifier_start};
use vmc_scanner::{SyntaxKind, token_is_assignment_operator};

/// Binary operator precedence; 0 for tokens that are not binary operators.
fn binary_precedence(kind: SyntaxKind) -> u8 {
    use SyntaxKind::*;
    match kind {
        QuestionQuestionToken => 1,
        BarBarToken => 2,
        AmpersandAmpersandToken => 3,
        BarToken => 4,
        CaretToken => 5,
        AmpersandToken => 6,
        EqualsEqualsToken
        | ExclamationEqualsToken
        | EqualsEqualsEqualsToken
        | ExclamationEqualsEqualsToken => 7,
        LessThanToken
        | GreaterThanToken
        | LessThanEqualsToken
        | GreaterThanEqualsToken
        | InstanceOfKeyword
        | InKeyword => 8,
        LessThanLessThanToken
        | GreaterThanGreaterThanToken
        | GreaterThanGreaterThanGreaterThanToken => 9,
        PlusToken | MinusToken => 10,
        AsteriskToken | SlashToken | PercentToken => 11,
        AsteriskAsteriskToken => 12,
        _ => 0,
    }
}

impl ParserState {
    /// Comma-separated expression.
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut left = self.parse_assignment_expression();
        while self.is_token(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression();
            left = self.finish_node(
                NodeKind::BinaryExpression(BinaryExprData {
                    left,
                    operator_token: SyntaxKind::CommaToken,
                    right,
                }),
                pos,
            );
        }
        left
    }

    /// Track nesting; false once the limit is exceeded. The rest of the
    /// statement is then skipped and further errors are suppressed until the
    /// statement loop recovers.
    fn enter_expression(&mut self) -> bool {
        if self.expression_depth >= MAX_PARSER_EXPRESSION_DEPTH {
            if !self.suppress_errors {
                self.parse_error_at_current_token(
                    &diagnostic_messages::MAXIMUM_NESTING_DEPTH_EXCEEDED,
                    &[],
                );
                self.suppress_errors = true;
                self.resync_after_error();
            }
            return false;
        }
        self.expression_depth += 1;
        true
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if !self.enter_expression() {
            return NodeIndex::NONE;
        }
        let result = self.parse_assignment_expression_worker();
        self.expression_depth -= 1;
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeIndex {
        if let Some(arrow) = self.try_parse_arrow_function() {
            return arrow;
        }
        let pos = self.token_pos();
        let left = self.parse_conditional_expression();
        if token_is_assignment_operator(self.token()) {
            let operator_token = self.token();
            self.next_token();
            let right = self.parse_assignment_expression();
            return self.finish_node(
                NodeKind::BinaryExpression(BinaryExprData {
                    left,
                    operator_token,
                    right,
                }),
                pos,
            );
        }
        left
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// If an arrow parameter list starts at `pos` (`x` or `(...)`), return
    /// the position after its `=>`.
    fn arrow_follows(&self, pos: usize) -> Option<usize> {
        let bytes = self.scanner.source_text().as_bytes();
        let params_end = match *bytes.get(pos)? {
            b'(' => self.scanner.skip_balanced(pos)?,
            b if is_identifier_start(b) => {
                let mut end = pos;
                while bytes.get(end).is_some_and(|b| is_identifier_part(*b)) {
                    end += 1;
                }
                end
            }
            _ => return None,
        };
        let arrow = self.scanner.skip_trivia(params_end);
        self.scanner.starts_with_at(arrow, "=>").then_some(arrow + 2)
    }

    fn try_parse_arrow_function(&mut self) -> Option<NodeIndex> {
        let pos = self.token_pos();
        let mut modifiers = modifier_flags::NONE;
        let after_arrow = match self.token() {
            SyntaxKind::Identifier if self.is_contextual("async") => {
                let params = self.scanner.skip_trivia(self.scanner.token_end());
                match self.arrow_follows(params) {
                    Some(after) => {
                        modifiers |= modifier_flags::ASYNC;
                        after
                    }
                    // `async => ...` uses `async` as the parameter name
                    None => self.arrow_follows(self.scanner.token_start())?,
                }
            }
            SyntaxKind::Identifier | SyntaxKind::OpenParenToken => {
                self.arrow_follows(self.scanner.token_start())?
            }
            _ => return None,
        };

        self.scanner.reset_to(after_arrow);
        self.prev_token_end = u32_from_usize(after_arrow);
        self.scanner.scan();

        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_opaque_block()
        } else {
            self.parse_assignment_expression()
        };
        Some(self.finish_node_with_flags(
            NodeKind::ArrowFunction(FunctionData {
                name: NodeIndex::NONE,
                body,
            }),
            pos,
            node_flags::NONE,
            modifiers,
        ))
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let condition = self.parse_binary_expression(0);
        if !self.parse_optional(SyntaxKind::QuestionToken) {
            return condition;
        }
        let when_true = self.parse_assignment_expression();
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression();
        self.finish_node(
            NodeKind::ConditionalExpression(ConditionalExprData {
                condition,
                when_true,
                when_false,
            }),
            pos,
        )
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        loop {
            let operator_token = self.token();
            let precedence = binary_precedence(operator_token);
            if precedence == 0 || precedence <= min_precedence {
                break;
            }
            self.next_token();
            // `**` is right-associative
            let right = if operator_token == SyntaxKind::AsteriskAsteriskToken {
                self.parse_binary_expression(precedence - 1)
            } else {
                self.parse_binary_expression(precedence)
            };
            left = self.finish_node(
                NodeKind::BinaryExpression(BinaryExprData {
                    left,
                    operator_token,
                    right,
                }),
                pos,
            );
        }
        left
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        if !self.enter_expression() {
            return NodeIndex::NONE;
        }
        let result = self.parse_unary_expression_worker();
        self.expression_depth -= 1;
        result
    }

    fn parse_unary_expression_worker(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                let operator = self.token();
                self.next_token();
                let operand = self.parse_unary_expression();
                self.finish_node(
                    NodeKind::PrefixUnaryExpression(UnaryExprData { operator, operand }),
                    pos,
                )
            }
            _ => {
                let operand = self.parse_left_hand_side_expression();
                if matches!(
                    self.token(),
                    SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
                ) && !self.scanner.has_preceding_line_break()
                {
                    let operator = self.token();
                    self.next_token();
                    return self.finish_node(
                        NodeKind::PostfixUnaryExpression(UnaryExprData { operator, operand }),
                        pos,
                    );
                }
                operand
            }
        }
    }

    // =========================================================================
    // Member and call chains
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_member_expression_rest(pos, expression, true)
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let expression = self.parse_member_expression_rest(pos, callee, false);
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_arguments())
        } else {
            None
        };
        self.finish_node(
            NodeKind::NewExpression(CallExprData {
                expression,
                arguments,
                question_dot_token: false,
            }),
            pos,
        )
    }

    fn parse_member_expression_rest(
        &mut self,
        pos: u32,
        mut expression: NodeIndex,
        allow_call: bool,
    ) -> NodeIndex {
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_member_name();
                    expression = self.finish_access(pos, expression, name, false, false);
                }
                SyntaxKind::QuestionDotToken => {
                    self.next_token();
                    if self.is_token(SyntaxKind::OpenParenToken) && allow_call {
                        let arguments = Some(self.parse_arguments());
                        expression = self.finish_node(
                            NodeKind::CallExpression(CallExprData {
                                expression,
                                arguments,
                                question_dot_token: true,
                            }),
                            pos,
                        );
                    } else if self.parse_optional(SyntaxKind::OpenBracketToken) {
                        let argument = self.parse_expression();
                        self.parse_expected(SyntaxKind::CloseBracketToken);
                        expression = self.finish_access(pos, expression, argument, true, true);
                    } else {
                        let name = self.parse_member_name();
                        expression = self.finish_access(pos, expression, name, true, false);
                    }
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let argument = self.parse_expression();
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    expression = self.finish_access(pos, expression, argument, false, true);
                }
                SyntaxKind::OpenParenToken if allow_call => {
                    let arguments = Some(self.parse_arguments());
                    expression = self.finish_node(
                        NodeKind::CallExpression(CallExprData {
                            expression,
                            arguments,
                            question_dot_token: false,
                        }),
                        pos,
                    );
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateLiteral => {
                    let template = self.parse_primary_expression();
                    expression = self.finish_node(
                        NodeKind::TaggedTemplateExpression(TaggedTemplateData {
                            tag: expression,
                            template,
                        }),
                        pos,
                    );
                }
                _ => return expression,
            }
        }
    }

    fn parse_member_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::PrivateIdentifier) {
            let pos = self.token_pos();
            let escaped_text = self.scanner.token_value().to_string();
            self.next_token();
            return self.finish_node(
                NodeKind::PrivateIdentifier(IdentifierData { escaped_text }),
                pos,
            );
        }
        self.parse_identifier_name()
    }

    fn finish_access(
        &mut self,
        pos: u32,
        expression: NodeIndex,
        name_or_argument: NodeIndex,
        question_dot_token: bool,
        is_element_access: bool,
    ) -> NodeIndex {
        let data = AccessExprData {
            expression,
            name_or_argument,
            question_dot_token,
        };
        let kind = if is_element_access {
            NodeKind::ElementAccessExpression(data)
        } else {
            NodeKind::PropertyAccessExpression(data)
        };
        self.finish_node(kind, pos)
    }

    fn parse_arguments(&mut self) -> super::base::NodeList {
        let mut arguments = Vec::new();
        self.parse_expected(SyntaxKind::OpenParenToken);
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            arguments.push(self.parse_argument_or_array_element());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.make_node_list(arguments)
    }

    fn parse_argument_or_array_element(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression();
            return self.finish_node(NodeKind::SpreadElement(SpreadData { expression }), pos);
        }
        self.parse_assignment_expression()
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_literal(&mut self, make: fn(LiteralData) -> NodeKind) -> NodeIndex {
        let pos = self.token_pos();
        let text = self.scanner.token_value().to_string();
        self.next_token();
        self.finish_node(make(LiteralData { text }), pos)
    }

    fn parse_token_node(&mut self, kind: NodeKind) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        self.finish_node(kind, pos)
    }

    pub(crate) fn parse_primary_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::Identifier if self.is_async_function() => {
                self.parse_function_expression()
            }
            SyntaxKind::Identifier => self.parse_identifier(),
            SyntaxKind::StringLiteral => self.parse_literal(NodeKind::StringLiteral),
            SyntaxKind::NumericLiteral => self.parse_literal(NodeKind::NumericLiteral),
            SyntaxKind::BigIntLiteral => self.parse_literal(NodeKind::BigIntLiteral),
            SyntaxKind::NoSubstitutionTemplateLiteral => {
                self.parse_literal(NodeKind::NoSubstitutionTemplateLiteral)
            }
            SyntaxKind::TemplateLiteral => self.parse_literal(NodeKind::TemplateExpression),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.scanner.re_scan_slash_token();
                self.parse_literal(NodeKind::RegularExpressionLiteral)
            }
            SyntaxKind::TrueKeyword => self.parse_token_node(NodeKind::TrueKeyword),
            SyntaxKind::FalseKeyword => self.parse_token_node(NodeKind::FalseKeyword),
            SyntaxKind::NullKeyword => self.parse_token_node(NodeKind::NullKeyword),
            SyntaxKind::ThisKeyword => self.parse_token_node(NodeKind::ThisKeyword),
            SyntaxKind::SuperKeyword => self.parse_token_node(NodeKind::SuperKeyword),
            // import(...) / import.meta; the member chain handles the rest
            SyntaxKind::ImportKeyword => self.parse_identifier_name(),
            SyntaxKind::PrivateIdentifier => self.parse_member_name(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.parse_expression();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.finish_node(
                    NodeKind::ParenthesizedExpression(ParenthesizedData { expression }),
                    pos,
                )
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(),
            SyntaxKind::ClassKeyword => {
                let data = self.parse_class_like();
                self.finish_node(NodeKind::ClassExpression(data), pos)
            }
            SyntaxKind::LessThanToken => self.parse_jsx_element(),
            _ => {
                self.parse_error_at_current_token(&diagnostic_messages::EXPRESSION_EXPECTED, &[]);
                NodeIndex::NONE
            }
        }
    }

    fn parse_function_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let (modifiers, name, body) = self.parse_function_like(modifier_flags::NONE);
        self.finish_node_with_flags(
            NodeKind::FunctionExpression(FunctionData { name, body }),
            pos,
            node_flags::NONE,
            modifiers,
        )
    }

    /// JSX is kept as one opaque node.
    fn parse_jsx_element(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.scanner.skip_jsx_element(self.scanner.token_start()) {
            Some(end) => {
                self.scanner.reset_to(end);
                self.prev_token_end = u32_from_usize(end);
                self.scanner.scan();
                self.finish_node(NodeKind::JsxElement, pos)
            }
            None => {
                self.parse_error_at_current_token(&diagnostic_messages::UNTERMINATED_BLOCK, &["<"]);
                let len = self.scanner.source_text().len();
                self.scanner.reset_to(len);
                self.prev_token_end = u32_from_usize(len);
                self.scanner.scan();
                NodeIndex::NONE
            }
        }
    }

    fn parse_array_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_token(SyntaxKind::CommaToken) {
                let hole = self.token_pos();
                self.next_token();
                let omitted = self
                    .arena
                    .add_node(NodeKind::OmittedExpression, hole, hole);
                elements.push(omitted);
                continue;
            }
            elements.push(self.parse_argument_or_array_element());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let elements = self.make_node_list(elements);
        self.finish_node(
            NodeKind::ArrayLiteralExpression(LiteralExprData { elements }),
            pos,
        )
    }

    /// A `get`/`set`/`async` prefix that starts a method rather than naming
    /// a property.
    fn is_method_prefix(&self) -> bool {
        (self.is_contextual("get") || self.is_contextual("set") || self.is_contextual("async"))
            && !matches!(self.peek_byte(), b',' | b':' | b'(' | b'}' | b'=' | 0)
    }

    fn parse_object_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let element = self.parse_object_literal_element();
            if element.is_some() {
                properties.push(element);
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let elements = self.make_node_list(properties);
        self.finish_node(
            NodeKind::ObjectLiteralExpression(LiteralExprData { elements }),
            pos,
        )
    }

    fn parse_object_literal_element(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression();
            return self.finish_node(NodeKind::SpreadAssignment(SpreadData { expression }), pos);
        }

        let mut modifiers = modifier_flags::NONE;
        let mut is_method = false;
        if self.is_method_prefix() {
            if self.is_contextual("async") {
                modifiers |= modifier_flags::ASYNC;
            }
            self.next_token();
            is_method = true;
        }
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            modifiers |= modifier_flags::GENERATOR;
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

        if self.parse_optional(SyntaxKind::ColonToken) {
            let initializer = self.parse_assignment_expression();
            return self.finish_node(
                NodeKind::PropertyAssignment(PropertyAssignmentData { name, initializer }),
                pos,
            );
        }

        let is_identifier = self.arena.get(name).is_some_and(|node| node.is_identifier());
        if !is_identifier {
            self.parse_error_at_current_token(&diagnostic_messages::TOKEN_EXPECTED, &[":"]);
            return NodeIndex::NONE;
        }
        // `{ a = 1 }` is only valid as a destructuring target; keep the name
        if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression();
        }
        self.finish_node(
            NodeKind::ShorthandPropertyAssignment(ShorthandPropertyData { name }),
            pos,
        )
    }
}
