//! AST node storage.
//!
//! Every node lives in a single `NodeArena` vector and is addressed by
//! `NodeIndex`. Child links are indices, so the tree is cheap to build and to
//! share by reference with the binder and checker.

use super::base::{NodeIndex, NodeList};
use vmc_scanner::SyntaxKind;

// =============================================================================
// Node data
// =============================================================================

#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub statements: NodeList,
    pub file_name: String,
}

/// Identifier and private identifier text.
#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// String, numeric, bigint, regex and template literal text.
///
/// For string literals and templates without substitutions `text` is the
/// cooked value; for the rest it is the source text.
#[derive(Clone, Debug)]
pub struct LiteralData {
    pub text: String,
}

/// Object literal properties or array literal elements.
#[derive(Clone, Debug)]
pub struct LiteralExprData {
    pub elements: NodeList,
}

#[derive(Clone, Debug)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ShorthandPropertyData {
    pub name: NodeIndex,
}

/// `...expression` in an object literal, array literal or argument list.
#[derive(Clone, Debug)]
pub struct SpreadData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ComputedPropertyData {
    pub expression: NodeIndex,
}

/// Property access (`a.b`) or element access (`a[b]`).
#[derive(Clone, Debug)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    pub question_dot_token: bool,
}

/// Call or `new` expression. `arguments` is `None` for `new X` without parens.
#[derive(Clone, Debug)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub arguments: Option<NodeList>,
    pub question_dot_token: bool,
}

#[derive(Clone, Debug)]
pub struct TaggedTemplateData {
    pub tag: NodeIndex,
    pub template: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

/// Binary expression, including assignment and comma.
#[derive(Clone, Debug)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: SyntaxKind,
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct UnaryExprData {
    pub operator: SyntaxKind,
    pub operand: NodeIndex,
}

/// Function declaration, function expression or arrow function.
///
/// Parameters are not represented. `body` is an opaque `Block` or, for
/// concise arrow functions, the body expression.
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: NodeIndex,
    pub heritage: NodeIndex,
    pub members: NodeList,
}

/// Class field. `static` is recorded in `Node::modifier_flags`.
#[derive(Clone, Debug)]
pub struct PropertyDeclarationData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Method, accessor or static block. Parameters and body are skipped.
#[derive(Clone, Debug)]
pub struct MethodDeclData {
    pub name: NodeIndex,
    pub body: NodeIndex,
}

/// `var`/`let`/`const` statement. The keyword is in `Node::flags`.
#[derive(Clone, Debug)]
pub struct VariableData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BindingPatternData {
    pub elements: NodeList,
}

#[derive(Clone, Debug)]
pub struct BindingElementData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
    pub dot_dot_dot_token: bool,
}

/// `import a, * as b from "m"`, `import { c as d } from "m"`, `import "m"`.
#[derive(Clone, Debug)]
pub struct ImportDeclData {
    pub default_binding: NodeIndex,
    pub namespace_binding: NodeIndex,
    pub named_bindings: Option<NodeList>,
    pub module_specifier: NodeIndex,
}

/// Import or export specifier: `property_name as name`.
/// `property_name` is `NONE` when there is no `as` clause.
#[derive(Clone, Debug)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

/// `export { a, b as c } [from "m"]` or `export * [as ns] from "m"`.
/// `export_clause` is `None` for the star form.
#[derive(Clone, Debug)]
pub struct ExportDeclData {
    pub export_clause: Option<NodeList>,
    pub namespace_export: NodeIndex,
    pub module_specifier: NodeIndex,
}

/// `export default <expression>`.
#[derive(Clone, Debug)]
pub struct ExportAssignmentData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExpressionStatementData {
    pub expression: NodeIndex,
}

// =============================================================================
// Node kinds
// =============================================================================

#[derive(Clone, Debug)]
pub enum NodeKind {
    SourceFile(SourceFileData),

    // Names and literals
    Identifier(IdentifierData),
    PrivateIdentifier(IdentifierData),
    StringLiteral(LiteralData),
    NumericLiteral(LiteralData),
    BigIntLiteral(LiteralData),
    RegularExpressionLiteral(LiteralData),
    NoSubstitutionTemplateLiteral(LiteralData),
    TemplateExpression(LiteralData),
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ThisKeyword,
    SuperKeyword,

    // Expressions
    ObjectLiteralExpression(LiteralExprData),
    ArrayLiteralExpression(LiteralExprData),
    PropertyAssignment(PropertyAssignmentData),
    ShorthandPropertyAssignment(ShorthandPropertyData),
    SpreadAssignment(SpreadData),
    SpreadElement(SpreadData),
    ComputedPropertyName(ComputedPropertyData),
    OmittedExpression,
    PropertyAccessExpression(AccessExprData),
    ElementAccessExpression(AccessExprData),
    CallExpression(CallExprData),
    NewExpression(CallExprData),
    TaggedTemplateExpression(TaggedTemplateData),
    ParenthesizedExpression(ParenthesizedData),
    BinaryExpression(BinaryExprData),
    ConditionalExpression(ConditionalExprData),
    PrefixUnaryExpression(UnaryExprData),
    PostfixUnaryExpression(UnaryExprData),
    ArrowFunction(FunctionData),
    FunctionExpression(FunctionData),
    ClassExpression(ClassData),
    JsxElement,
    Block,

    // Declarations and statements
    VariableStatement(VariableData),
    VariableDeclaration(VariableDeclarationData),
    ObjectBindingPattern(BindingPatternData),
    ArrayBindingPattern(BindingPatternData),
    BindingElement(BindingElementData),
    FunctionDeclaration(FunctionData),
    ClassDeclaration(ClassData),
    PropertyDeclaration(PropertyDeclarationData),
    MethodDeclaration(MethodDeclData),
    ImportDeclaration(ImportDeclData),
    ImportSpecifier(SpecifierData),
    ExportDeclaration(ExportDeclData),
    ExportSpecifier(SpecifierData),
    ExportAssignment(ExportAssignmentData),
    ExpressionStatement(ExpressionStatementData),
    EmptyStatement,
    /// A statement the parser steps over without building nodes
    /// (`if`, `for`, blocks, ...).
    SkippedStatement,
}

impl NodeKind {
    /// Call `f` for each direct child, in source order.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeIndex)) {
        fn list(nodes: &NodeList, f: &mut dyn FnMut(NodeIndex)) {
            for &child in &nodes.nodes {
                f(child);
            }
        }
        match self {
            NodeKind::SourceFile(d) => list(&d.statements, &mut f),
            NodeKind::ObjectLiteralExpression(d) | NodeKind::ArrayLiteralExpression(d) => {
                list(&d.elements, &mut f);
            }
            NodeKind::PropertyAssignment(d) => {
                f(d.name);
                f(d.initializer);
            }
            NodeKind::ShorthandPropertyAssignment(d) => f(d.name),
            NodeKind::SpreadAssignment(d) | NodeKind::SpreadElement(d) => f(d.expression),
            NodeKind::ComputedPropertyName(d) => f(d.expression),
            NodeKind::PropertyAccessExpression(d) | NodeKind::ElementAccessExpression(d) => {
                f(d.expression);
                f(d.name_or_argument);
            }
            NodeKind::CallExpression(d) | NodeKind::NewExpression(d) => {
                f(d.expression);
                if let Some(arguments) = &d.arguments {
                    list(arguments, &mut f);
                }
            }
            NodeKind::TaggedTemplateExpression(d) => {
                f(d.tag);
                f(d.template);
            }
            NodeKind::ParenthesizedExpression(d) => f(d.expression),
            NodeKind::BinaryExpression(d) => {
                f(d.left);
                f(d.right);
            }
            NodeKind::ConditionalExpression(d) => {
                f(d.condition);
                f(d.when_true);
                f(d.when_false);
            }
            NodeKind::PrefixUnaryExpression(d) | NodeKind::PostfixUnaryExpression(d) => {
                f(d.operand);
            }
            NodeKind::ArrowFunction(d)
            | NodeKind::FunctionExpression(d)
            | NodeKind::FunctionDeclaration(d) => {
                f(d.name);
                f(d.body);
            }
            NodeKind::ClassExpression(d) | NodeKind::ClassDeclaration(d) => {
                f(d.name);
                f(d.heritage);
                list(&d.members, &mut f);
            }
            NodeKind::VariableStatement(d) => list(&d.declarations, &mut f),
            NodeKind::VariableDeclaration(d) => {
                f(d.name);
                f(d.initializer);
            }
            NodeKind::ObjectBindingPattern(d) | NodeKind::ArrayBindingPattern(d) => {
                list(&d.elements, &mut f);
            }
            NodeKind::BindingElement(d) => {
                f(d.property_name);
                f(d.name);
                f(d.initializer);
            }
            NodeKind::PropertyDeclaration(d) => {
                f(d.name);
                f(d.initializer);
            }
            NodeKind::MethodDeclaration(d) => {
                f(d.name);
                f(d.body);
            }
            NodeKind::ImportDeclaration(d) => {
                f(d.default_binding);
                f(d.namespace_binding);
                if let Some(named) = &d.named_bindings {
                    list(named, &mut f);
                }
                f(d.module_specifier);
            }
            NodeKind::ImportSpecifier(d) | NodeKind::ExportSpecifier(d) => {
                f(d.property_name);
                f(d.name);
            }
            NodeKind::ExportDeclaration(d) => {
                if let Some(clause) = &d.export_clause {
                    list(clause, &mut f);
                }
                f(d.namespace_export);
                f(d.module_specifier);
            }
            NodeKind::ExportAssignment(d) => f(d.expression),
            NodeKind::ExpressionStatement(d) => f(d.expression),
            NodeKind::Identifier(_)
            | NodeKind::PrivateIdentifier(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::NumericLiteral(_)
            | NodeKind::BigIntLiteral(_)
            | NodeKind::RegularExpressionLiteral(_)
            | NodeKind::NoSubstitutionTemplateLiteral(_)
            | NodeKind::TemplateExpression(_)
            | NodeKind::TrueKeyword
            | NodeKind::FalseKeyword
            | NodeKind::NullKeyword
            | NodeKind::ThisKeyword
            | NodeKind::SuperKeyword
            | NodeKind::OmittedExpression
            | NodeKind::JsxElement
            | NodeKind::Block
            | NodeKind::EmptyStatement
            | NodeKind::SkippedStatement => {}
        }
    }
}

// =============================================================================
// Node and arena
// =============================================================================

#[derive(Clone, Debug)]
pub struct Node {
    /// Start position (byte offset of the first token)
    pub pos: u32,
    /// End position (byte offset after the last token)
    pub end: u32,
    pub parent: NodeIndex,
    /// `node_flags`
    pub flags: u32,
    /// `modifier_flags`
    pub modifier_flags: u32,
    pub kind: NodeKind,
}

/// Flat storage for all nodes of one source file.
#[derive(Debug, Default)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node and point its children's `parent` at it.
    pub fn add_node(&mut self, kind: NodeKind, pos: u32, end: u32) -> NodeIndex {
        self.add_node_with_flags(kind, pos, end, 0, 0)
    }

    pub fn add_node_with_flags(
        &mut self,
        kind: NodeKind,
        pos: u32,
        end: u32,
        flags: u32,
        modifier_flags: u32,
    ) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let nodes = &mut self.nodes;
        kind.for_each_child(|child| {
            if let Some(node) = nodes.get_mut(child.0 as usize) {
                node.parent = index;
            }
        });
        self.nodes.push(Node {
            pos,
            end,
            parent: NodeIndex::NONE,
            flags,
            modifier_flags,
            kind,
        });
        index
    }
}
