//! Property-type classification.
//!
//! Walks the `propTypes` object literal and decides, for every statically
//! named property, whether its declared validator has a typed equivalent.
//! Shapes become nested trees; everything else is a leaf.

use crate::diagnostics::ContractDiagnosticKind;
use crate::resolver::{ReferenceResolver, ResolvedReference};
use crate::type_model::{EnumValue, TypeDescription};
use crate::vocabulary::{
    IS_REQUIRED, OBJECT_KEYS, OBJECT_NAMESPACE, OBJECT_VALUES, is_primitive_member,
    prop_types_members,
};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::trace;
use vmc_common::limits::{MAX_SHAPE_DEPTH, MAX_SHAPE_EXPANSIONS};
use vmc_parser::parser::node::CallExprData;
use vmc_parser::parser::{NodeArena, NodeIndex, NodeKind};
use vmc_scanner::SyntaxKind;

/// Classified properties in declaration order.
pub type ClassifiedTree = IndexMap<String, ClassifiedProperty>;

#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedProperty {
    /// The property node; diagnostics for this key are reported here.
    pub node: NodeIndex,
    /// Declared with a trailing `.isRequired`
    pub required: bool,
    pub entry: Classified,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Classified {
    Valid(TypeDescription),
    Invalid(ContractDiagnosticKind),
    /// A `shape`/`exact` object, wrapped in `array_depth` levels of `arrayOf`.
    Nested {
        tree: ClassifiedTree,
        array_depth: u32,
    },
}

pub struct PropTypesClassifier<'a> {
    arena: &'a NodeArena,
    resolver: &'a dyn ReferenceResolver,
    prop_types_field: &'a str,
    /// Referenced shape objects currently being classified
    active_shapes: FxHashSet<NodeIndex>,
    /// Active shape objects that were referenced again from inside themselves
    cyclic_shapes: FxHashSet<NodeIndex>,
    /// Shape objects expanded so far in this tree
    expanded_shapes: u32,
}

impl<'a> PropTypesClassifier<'a> {
    pub fn new(
        arena: &'a NodeArena,
        resolver: &'a dyn ReferenceResolver,
        prop_types_field: &'a str,
    ) -> Self {
        PropTypesClassifier {
            arena,
            resolver,
            prop_types_field,
            active_shapes: FxHashSet::default(),
            cyclic_shapes: FxHashSet::default(),
            expanded_shapes: 0,
        }
    }

    /// Classify the value of a `propTypes` field. Values other than an
    /// object literal (`B.propTypes`, `false`) declare nothing to check.
    pub fn classify(&mut self, prop_types: NodeIndex) -> ClassifiedTree {
        self.active_shapes.clear();
        self.cyclic_shapes.clear();
        self.expanded_shapes = 0;
        let object = self.arena.skip_parentheses(prop_types);
        match self.arena.get(object) {
            Some(node) if node.is_object_literal() => self.classify_properties(object, 0),
            _ => ClassifiedTree::new(),
        }
    }

    fn classify_properties(&mut self, object: NodeIndex, depth: u32) -> ClassifiedTree {
        let arena = self.arena;
        let mut tree = ClassifiedTree::new();
        let Some(literal) = arena
            .get(object)
            .and_then(|node| arena.get_literal_expr(node))
        else {
            return tree;
        };

        for &element in &literal.elements.nodes {
            let Some(node) = arena.get(element) else {
                continue;
            };
            let name = arena.get_member_name(element);
            let Some(key) = arena.get_property_name_text(name) else {
                trace!(pos = node.pos, "skipping property without a static name");
                continue;
            };
            let (entry, required) = match &node.kind {
                NodeKind::PropertyAssignment(data) => self.classify_value(data.initializer, depth),
                NodeKind::ShorthandPropertyAssignment(_) => (
                    Classified::Invalid(ContractDiagnosticKind::IllegalIdentifier),
                    false,
                ),
                NodeKind::MethodDeclaration(_) => (
                    Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall),
                    false,
                ),
                _ => continue,
            };
            trace!(key, depth, ?entry, "classified property");
            tree.insert(
                key.to_string(),
                ClassifiedProperty {
                    node: element,
                    required,
                    entry,
                },
            );
        }
        tree
    }

    /// Classify one validator expression. Returns the classification and
    /// whether `.isRequired` was stripped.
    fn classify_value(&mut self, expression: NodeIndex, depth: u32) -> (Classified, bool) {
        let (expression, required) = self.strip_is_required(expression);
        (self.classify_leaf(expression, depth), required)
    }

    fn strip_is_required(&self, mut expression: NodeIndex) -> (NodeIndex, bool) {
        let mut required = false;
        loop {
            expression = self.arena.skip_parentheses(expression);
            let Some(access) = self
                .arena
                .get(expression)
                .and_then(|node| self.arena.get_property_access(node))
            else {
                return (expression, required);
            };
            if self.arena.get_identifier_text(access.name_or_argument) != Some(IS_REQUIRED) {
                return (expression, required);
            }
            required = true;
            expression = access.expression;
        }
    }

    fn classify_leaf(&mut self, expression: NodeIndex, depth: u32) -> Classified {
        let arena = self.arena;
        let Some(node) = arena.get(expression) else {
            return Classified::Invalid(ContractDiagnosticKind::IllegalIdentifier);
        };
        match &node.kind {
            NodeKind::PropertyAccessExpression(_) | NodeKind::ElementAccessExpression(_) => {
                self.classify_member(expression)
            }
            NodeKind::CallExpression(call) => self.classify_call(call, depth),
            // Custom validator functions
            NodeKind::ArrowFunction(_) | NodeKind::FunctionExpression(_) => {
                Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall)
            }
            _ => Classified::Invalid(ContractDiagnosticKind::IllegalIdentifier),
        }
    }

    /// `PropTypes.<member>` (or an alias of the namespace) as the member name.
    fn namespace_member(&self, expression: NodeIndex) -> Option<&'a str> {
        let chain = self.arena.get_access_chain(expression)?;
        match chain.as_slice() {
            [namespace, member] if self.resolver.is_prop_types_namespace(namespace) => {
                Some(*member)
            }
            _ => None,
        }
    }

    fn classify_member(&self, expression: NodeIndex) -> Classified {
        use prop_types_members::{ARRAY, OBJECT};
        match self.namespace_member(expression) {
            Some(member) if is_primitive_member(member) => {
                Classified::Valid(TypeDescription::Primitive(member.to_string()))
            }
            Some(OBJECT) => Classified::Invalid(ContractDiagnosticKind::Object),
            Some(ARRAY) => Classified::Invalid(ContractDiagnosticKind::Array),
            _ => Classified::Invalid(ContractDiagnosticKind::IllegalReference),
        }
    }

    fn classify_call(&mut self, call: &CallExprData, depth: u32) -> Classified {
        use prop_types_members::{ARRAY_OF, EXACT, ONE_OF, ONE_OF_TYPE, SHAPE};
        let Some(member) = self.namespace_member(call.expression) else {
            return Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall);
        };
        let argument = first_argument(call);
        match member {
            ONE_OF_TYPE => Classified::Invalid(ContractDiagnosticKind::OneOfType),
            ARRAY_OF => self.classify_array_of(argument, depth),
            ONE_OF => self.classify_one_of(argument),
            SHAPE | EXACT => self.classify_shape(argument, depth),
            _ => Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall),
        }
    }

    /// `arrayOf(inner)` classifies `inner` in the same slot.
    fn classify_array_of(&mut self, argument: NodeIndex, depth: u32) -> Classified {
        if argument.is_none() {
            return Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall);
        }
        let (inner, _) = self.classify_value(argument, depth);
        match inner {
            Classified::Valid(element) => {
                Classified::Valid(TypeDescription::ArrayOf(Box::new(element)))
            }
            Classified::Nested { tree, array_depth } => Classified::Nested {
                tree,
                array_depth: array_depth + 1,
            },
            invalid @ Classified::Invalid(_) => invalid,
        }
    }

    /// `oneOf(values)`: the values must be statically known.
    fn classify_one_of(&self, argument: NodeIndex) -> Classified {
        let argument = self.arena.skip_parentheses(argument);
        let Some(node) = self.arena.get(argument) else {
            return Classified::Invalid(ContractDiagnosticKind::MissingObjectReference);
        };
        match &node.kind {
            NodeKind::ArrayLiteralExpression(_) => {
                Classified::Valid(TypeDescription::Enum(self.array_values(argument)))
            }
            NodeKind::Identifier(data) => {
                match self.resolver.resolve(self.arena, &data.escaped_text) {
                    ResolvedReference::LocalArrayLiteral(array) => {
                        Classified::Valid(TypeDescription::Enum(self.array_values(array)))
                    }
                    ResolvedReference::Imported { .. } => {
                        Classified::Invalid(ContractDiagnosticKind::ImportedArrayReference)
                    }
                    ResolvedReference::LocalObjectLiteral(_) => {
                        Classified::Invalid(ContractDiagnosticKind::IllegalReference)
                    }
                    ResolvedReference::Unresolved => {
                        Classified::Invalid(ContractDiagnosticKind::MissingObjectReference)
                    }
                }
            }
            NodeKind::CallExpression(call) => self.classify_object_enum(call),
            NodeKind::PropertyAccessExpression(_) | NodeKind::ElementAccessExpression(_) => {
                Classified::Invalid(ContractDiagnosticKind::IllegalReference)
            }
            _ => Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall),
        }
    }

    /// `Object.keys(x)` / `Object.values(x)` inside `oneOf`.
    fn classify_object_enum(&self, call: &CallExprData) -> Classified {
        let keys = match self.arena.get_access_chain(call.expression).as_deref() {
            Some([namespace, method]) if *namespace == OBJECT_NAMESPACE => match *method {
                OBJECT_KEYS => true,
                OBJECT_VALUES => false,
                _ => return Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall),
            },
            _ => return Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall),
        };

        let source = self.arena.skip_parentheses(first_argument(call));
        let object = match self.arena.kind(source) {
            Some(NodeKind::ObjectLiteralExpression(_)) => source,
            Some(NodeKind::Identifier(data)) => {
                match self.resolver.resolve(self.arena, &data.escaped_text) {
                    ResolvedReference::LocalObjectLiteral(object) => object,
                    ResolvedReference::Imported { .. } => {
                        return Classified::Invalid(ContractDiagnosticKind::ImportedObjectReference);
                    }
                    ResolvedReference::LocalArrayLiteral(_) => {
                        return Classified::Invalid(ContractDiagnosticKind::IllegalReference);
                    }
                    ResolvedReference::Unresolved => {
                        return Classified::Invalid(ContractDiagnosticKind::MissingObjectReference);
                    }
                }
            }
            _ => return Classified::Invalid(ContractDiagnosticKind::MissingObjectReference),
        };
        Classified::Valid(TypeDescription::Enum(self.object_values(object, keys)))
    }

    /// `shape(props)` / `exact(props)`.
    fn classify_shape(&mut self, argument: NodeIndex, depth: u32) -> Classified {
        let arena = self.arena;
        let argument = arena.skip_parentheses(argument);
        let Some(node) = arena.get(argument) else {
            return Classified::Valid(TypeDescription::Shape(IndexMap::new()));
        };
        match &node.kind {
            NodeKind::ObjectLiteralExpression(_) => self.nested(argument, depth),
            NodeKind::PropertyAccessExpression(_) => {
                match self.arena.get_access_chain(argument).as_deref() {
                    Some([component, field]) if *field == self.prop_types_field => {
                        Classified::Valid(TypeDescription::ShapeOf((*component).to_string()))
                    }
                    _ => Classified::Invalid(ContractDiagnosticKind::IllegalReference),
                }
            }
            NodeKind::ElementAccessExpression(_) => {
                Classified::Invalid(ContractDiagnosticKind::IllegalReference)
            }
            NodeKind::Identifier(data) => {
                match self.resolver.resolve(self.arena, &data.escaped_text) {
                    ResolvedReference::LocalObjectLiteral(object) => {
                        self.referenced_shape(object, depth)
                    }
                    ResolvedReference::Imported { .. } => {
                        Classified::Invalid(ContractDiagnosticKind::ImportedObjectReference)
                    }
                    ResolvedReference::LocalArrayLiteral(_) => {
                        Classified::Invalid(ContractDiagnosticKind::IllegalReference)
                    }
                    ResolvedReference::Unresolved => {
                        Classified::Invalid(ContractDiagnosticKind::MissingObjectReference)
                    }
                }
            }
            _ => Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall),
        }
    }

    /// A shape whose properties live in a local object bound to a name.
    ///
    /// An object that reaches itself through its own shapes has no finite
    /// type. The property that first referenced it is reported instead of
    /// anything inside the object.
    fn referenced_shape(&mut self, object: NodeIndex, depth: u32) -> Classified {
        if !self.active_shapes.insert(object) {
            trace!(object = object.0, "cyclic shape reference");
            self.cyclic_shapes.insert(object);
            return Classified::Invalid(ContractDiagnosticKind::IllegalReference);
        }
        let nested = self.nested(object, depth);
        self.active_shapes.remove(&object);
        if self.cyclic_shapes.remove(&object) {
            return Classified::Invalid(ContractDiagnosticKind::IllegalReference);
        }
        nested
    }

    fn nested(&mut self, object: NodeIndex, depth: u32) -> Classified {
        if depth >= MAX_SHAPE_DEPTH {
            trace!(depth, "shape nesting limit reached");
            return Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall);
        }
        if self.expanded_shapes >= MAX_SHAPE_EXPANSIONS {
            trace!(expanded = self.expanded_shapes, "shape expansion limit reached");
            return Classified::Invalid(ContractDiagnosticKind::IllegalFunctionCall);
        }
        self.expanded_shapes += 1;
        Classified::Nested {
            tree: self.classify_properties(object, depth + 1),
            array_depth: 0,
        }
    }

    // =========================================================================
    // Enum values
    // =========================================================================

    fn array_values(&self, array: NodeIndex) -> Vec<EnumValue> {
        let Some(literal) = self
            .arena
            .get(array)
            .and_then(|node| self.arena.get_literal_expr(node))
        else {
            return Vec::new();
        };
        literal
            .elements
            .iter()
            .filter_map(|element| self.literal_value(element))
            .collect()
    }

    fn object_values(&self, object: NodeIndex, keys: bool) -> Vec<EnumValue> {
        let Some(literal) = self
            .arena
            .get(object)
            .and_then(|node| self.arena.get_literal_expr(node))
        else {
            return Vec::new();
        };
        literal
            .elements
            .iter()
            .filter_map(|element| {
                if keys {
                    let name = self.arena.get_member_name(element);
                    let text = self.arena.get_property_name_text(name)?;
                    return Some(EnumValue::String(text.to_string()));
                }
                let node = self.arena.get(element)?;
                let property = self.arena.get_property_assignment(node)?;
                self.literal_value(property.initializer)
            })
            .collect()
    }

    /// Value of a literal enum member; `None` for anything computed.
    fn literal_value(&self, expression: NodeIndex) -> Option<EnumValue> {
        let expression = self.arena.skip_parentheses(expression);
        match self.arena.kind(expression)? {
            NodeKind::StringLiteral(data) | NodeKind::NoSubstitutionTemplateLiteral(data) => {
                Some(EnumValue::String(data.text.clone()))
            }
            NodeKind::NumericLiteral(data) => parse_numeric(&data.text).map(EnumValue::Number),
            NodeKind::PrefixUnaryExpression(unary) if unary.operator == SyntaxKind::MinusToken => {
                match self.literal_value(unary.operand)? {
                    EnumValue::Number(value) => Some(EnumValue::Number(-value)),
                    _ => None,
                }
            }
            NodeKind::TrueKeyword => Some(EnumValue::Bool(true)),
            NodeKind::FalseKeyword => Some(EnumValue::Bool(false)),
            NodeKind::NullKeyword => Some(EnumValue::Null),
            _ => None,
        }
    }
}

fn first_argument(call: &CallExprData) -> NodeIndex {
    call.arguments
        .as_ref()
        .and_then(|arguments| arguments.nodes.first().copied())
        .unwrap_or(NodeIndex::NONE)
}

/// Numeric literal text to a value: decimal, exponent, hex, octal, binary
/// and `_` separators.
fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|&ch| ch != '_').collect();
    let radix = match cleaned.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return cleaned.parse().ok(),
    };
    u64::from_str_radix(&cleaned[2..], radix)
        .ok()
        .map(|value| value as f64)
}
