//! NodeArena access methods.
//!
//! Typed getters return the payload of a node when it has the expected kind
//! and `None` otherwise, so callers can chain them with `?`.

use super::base::NodeIndex;
use super::flags::node_flags;
use super::node::*;

impl Node {
    #[inline]
    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, NodeKind::Identifier(_))
    }

    #[inline]
    pub fn is_string_literal(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::StringLiteral(_) | NodeKind::NoSubstitutionTemplateLiteral(_)
        )
    }

    #[inline]
    pub fn is_object_literal(&self) -> bool {
        matches!(self.kind, NodeKind::ObjectLiteralExpression(_))
    }

    #[inline]
    pub fn is_array_literal(&self) -> bool {
        matches!(self.kind, NodeKind::ArrayLiteralExpression(_))
    }

    #[inline]
    pub fn has_modifier(&self, flag: u32) -> bool {
        self.modifier_flags & flag != 0
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        self.flags & node_flags::CONST != 0
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.pos)
    }
}

impl NodeArena {
    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get the kind of a node by index
    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<&NodeKind> {
        self.get(index).map(|node| &node.kind)
    }

    pub fn get_source_file_at(&self, index: NodeIndex) -> Option<&SourceFileData> {
        match self.kind(index)? {
            NodeKind::SourceFile(data) => Some(data),
            _ => None,
        }
    }

    /// Get identifier data. Private identifiers are included.
    #[inline]
    pub fn get_identifier<'n>(&self, node: &'n Node) -> Option<&'n IdentifierData> {
        match &node.kind {
            NodeKind::Identifier(data) | NodeKind::PrivateIdentifier(data) => Some(data),
            _ => None,
        }
    }

    /// Text of an identifier node.
    pub fn get_identifier_text(&self, index: NodeIndex) -> Option<&str> {
        match self.kind(index)? {
            NodeKind::Identifier(data) => Some(&data.escaped_text),
            _ => None,
        }
    }

    /// Get literal data for any literal node.
    #[inline]
    pub fn get_literal<'n>(&self, node: &'n Node) -> Option<&'n LiteralData> {
        match &node.kind {
            NodeKind::StringLiteral(data)
            | NodeKind::NumericLiteral(data)
            | NodeKind::BigIntLiteral(data)
            | NodeKind::RegularExpressionLiteral(data)
            | NodeKind::NoSubstitutionTemplateLiteral(data)
            | NodeKind::TemplateExpression(data) => Some(data),
            _ => None,
        }
    }

    /// Cooked value of a string literal or a template without substitutions.
    pub fn get_string_literal_text(&self, index: NodeIndex) -> Option<&str> {
        match self.kind(index)? {
            NodeKind::StringLiteral(data) | NodeKind::NoSubstitutionTemplateLiteral(data) => {
                Some(&data.text)
            }
            _ => None,
        }
    }

    /// Elements of an object literal (its properties) or an array literal.
    #[inline]
    pub fn get_literal_expr<'n>(&self, node: &'n Node) -> Option<&'n LiteralExprData> {
        match &node.kind {
            NodeKind::ObjectLiteralExpression(data) | NodeKind::ArrayLiteralExpression(data) => {
                Some(data)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn get_property_assignment<'n>(&self, node: &'n Node) -> Option<&'n PropertyAssignmentData> {
        match &node.kind {
            NodeKind::PropertyAssignment(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_shorthand_property<'n>(&self, node: &'n Node) -> Option<&'n ShorthandPropertyData> {
        match &node.kind {
            NodeKind::ShorthandPropertyAssignment(data) => Some(data),
            _ => None,
        }
    }

    /// Spread in an object literal, array literal or argument list.
    #[inline]
    pub fn get_spread<'n>(&self, node: &'n Node) -> Option<&'n SpreadData> {
        match &node.kind {
            NodeKind::SpreadAssignment(data) | NodeKind::SpreadElement(data) => Some(data),
            _ => None,
        }
    }

    /// Property access data. Element access is not included.
    #[inline]
    pub fn get_property_access<'n>(&self, node: &'n Node) -> Option<&'n AccessExprData> {
        match &node.kind {
            NodeKind::PropertyAccessExpression(data) => Some(data),
            _ => None,
        }
    }

    /// Property access or element access data.
    #[inline]
    pub fn get_access_expr<'n>(&self, node: &'n Node) -> Option<&'n AccessExprData> {
        match &node.kind {
            NodeKind::PropertyAccessExpression(data) | NodeKind::ElementAccessExpression(data) => {
                Some(data)
            }
            _ => None,
        }
    }

    /// Call expression data. `new` expressions are not included.
    #[inline]
    pub fn get_call_expr<'n>(&self, node: &'n Node) -> Option<&'n CallExprData> {
        match &node.kind {
            NodeKind::CallExpression(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_binary_expr<'n>(&self, node: &'n Node) -> Option<&'n BinaryExprData> {
        match &node.kind {
            NodeKind::BinaryExpression(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_function<'n>(&self, node: &'n Node) -> Option<&'n FunctionData> {
        match &node.kind {
            NodeKind::ArrowFunction(data)
            | NodeKind::FunctionExpression(data)
            | NodeKind::FunctionDeclaration(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_class<'n>(&self, node: &'n Node) -> Option<&'n ClassData> {
        match &node.kind {
            NodeKind::ClassDeclaration(data) | NodeKind::ClassExpression(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_property_decl<'n>(&self, node: &'n Node) -> Option<&'n PropertyDeclarationData> {
        match &node.kind {
            NodeKind::PropertyDeclaration(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_variable<'n>(&self, node: &'n Node) -> Option<&'n VariableData> {
        match &node.kind {
            NodeKind::VariableStatement(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_variable_declaration<'n>(&self, node: &'n Node) -> Option<&'n VariableDeclarationData> {
        match &node.kind {
            NodeKind::VariableDeclaration(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_binding_pattern<'n>(&self, node: &'n Node) -> Option<&'n BindingPatternData> {
        match &node.kind {
            NodeKind::ObjectBindingPattern(data) | NodeKind::ArrayBindingPattern(data) => {
                Some(data)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn get_binding_element<'n>(&self, node: &'n Node) -> Option<&'n BindingElementData> {
        match &node.kind {
            NodeKind::BindingElement(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_import_decl<'n>(&self, node: &'n Node) -> Option<&'n ImportDeclData> {
        match &node.kind {
            NodeKind::ImportDeclaration(data) => Some(data),
            _ => None,
        }
    }

    /// Import or export specifier data.
    #[inline]
    pub fn get_specifier<'n>(&self, node: &'n Node) -> Option<&'n SpecifierData> {
        match &node.kind {
            NodeKind::ImportSpecifier(data) | NodeKind::ExportSpecifier(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_export_decl<'n>(&self, node: &'n Node) -> Option<&'n ExportDeclData> {
        match &node.kind {
            NodeKind::ExportDeclaration(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_export_assignment<'n>(&self, node: &'n Node) -> Option<&'n ExportAssignmentData> {
        match &node.kind {
            NodeKind::ExportAssignment(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_expression_statement<'n>(&self, node: &'n Node) -> Option<&'n ExpressionStatementData> {
        match &node.kind {
            NodeKind::ExpressionStatement(data) => Some(data),
            _ => None,
        }
    }

    // =========================================================================
    // Derived queries
    // =========================================================================

    /// Strip any number of enclosing parentheses.
    pub fn skip_parentheses(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(NodeKind::ParenthesizedExpression(data)) = self.kind(index) {
            index = data.expression;
        }
        index
    }

    /// Static text of a property name: identifiers, string literals and
    /// numeric literals. Computed and private names have none.
    pub fn get_property_name_text(&self, index: NodeIndex) -> Option<&str> {
        match self.kind(index)? {
            NodeKind::Identifier(data) => Some(&data.escaped_text),
            NodeKind::StringLiteral(data)
            | NodeKind::NoSubstitutionTemplateLiteral(data)
            | NodeKind::NumericLiteral(data) => Some(&data.text),
            _ => None,
        }
    }

    /// Name of a property-like member: property assignment, shorthand,
    /// class field or method.
    pub fn get_member_name(&self, index: NodeIndex) -> NodeIndex {
        match self.kind(index) {
            Some(NodeKind::PropertyAssignment(data)) => data.name,
            Some(NodeKind::ShorthandPropertyAssignment(data)) => data.name,
            Some(NodeKind::PropertyDeclaration(data)) => data.name,
            Some(NodeKind::MethodDeclaration(data)) => data.name,
            _ => NodeIndex::NONE,
        }
    }

    /// For `a.b.c`, returns `["a", "b", "c"]`. `None` when any link is not a
    /// plain identifier property access.
    pub fn get_access_chain(&self, index: NodeIndex) -> Option<Vec<&str>> {
        let mut names = Vec::new();
        let mut current = index;
        loop {
            let node = self.get(current)?;
            match &node.kind {
                NodeKind::PropertyAccessExpression(access) => {
                    names.push(self.get_identifier_text(access.name_or_argument)?);
                    current = access.expression;
                }
                NodeKind::Identifier(data) => {
                    names.push(&data.escaped_text);
                    break;
                }
                _ => return None,
            }
        }
        names.reverse();
        Some(names)
    }
}
