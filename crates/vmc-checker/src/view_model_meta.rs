//! Override metadata (`viewModelMeta`): reading, validation and lowering.
//!
//! Validation is independent of the property types: every value in the
//! override tree is checked whether or not the key it overrides exists or
//! is valid.

use crate::diagnostics::{ContractDiagnostic, ContractDiagnosticKind};
use crate::vocabulary::{IGNORE, MetaTypeName, expected_meta_type_names, is_meta_type_name};
use indexmap::IndexMap;
use tracing::trace;
use vmc_common::limits::MAX_META_DEPTH;
use vmc_parser::parser::{NodeArena, NodeIndex, NodeKind};

/// A lowered override value.
#[derive(Clone, Debug, PartialEq)]
pub enum OverrideNode {
    /// `"ignore"`
    Sentinel,
    TypeName {
        name: MetaTypeName,
        nullable: bool,
    },
    /// A bare identifier naming another component.
    ComponentReference(String),
    /// `[element]`; only the first element is inspected.
    ArrayOf(Box<OverrideNode>),
    NestedObject(IndexMap<String, OverrideNode>),
    Invalid,
}

/// Whole-component view of the `viewModelMeta` field.
#[derive(Clone, Debug, PartialEq)]
pub enum ComponentMeta {
    /// `viewModelMeta = "ignore"`
    Ignored,
    /// Any other string literal.
    BadIgnore { node: NodeIndex, value: String },
    /// Per-key overrides. `object` is `NONE` when the field is absent or is
    /// not an object literal, which both read as an empty tree.
    Properties {
        object: NodeIndex,
        entries: IndexMap<String, NodeIndex>,
    },
}

/// Read the value of a `viewModelMeta` field.
pub fn read_component_meta(arena: &NodeArena, value: NodeIndex) -> ComponentMeta {
    let value = arena.skip_parentheses(value);
    if let Some(text) = arena.get_string_literal_text(value) {
        return if text == IGNORE {
            ComponentMeta::Ignored
        } else {
            ComponentMeta::BadIgnore {
                node: value,
                value: text.to_string(),
            }
        };
    }
    match arena.get(value) {
        Some(node) if node.is_object_literal() => ComponentMeta::Properties {
            object: value,
            entries: meta_entries(arena, value),
        },
        _ => ComponentMeta::Properties {
            object: NodeIndex::NONE,
            entries: IndexMap::new(),
        },
    }
}

/// Statically named keys of an override object and their value nodes.
/// Shorthand entries map to their identifier; methods to the method node.
pub fn meta_entries(arena: &NodeArena, object: NodeIndex) -> IndexMap<String, NodeIndex> {
    let mut entries = IndexMap::new();
    let Some(literal) = arena
        .get(object)
        .and_then(|node| arena.get_literal_expr(node))
    else {
        return entries;
    };
    for &element in &literal.elements.nodes {
        let name = arena.get_member_name(element);
        let Some(key) = arena.get_property_name_text(name) else {
            continue;
        };
        let value = match arena.kind(element) {
            Some(NodeKind::PropertyAssignment(data)) => data.initializer,
            Some(NodeKind::ShorthandPropertyAssignment(data)) => data.name,
            Some(NodeKind::MethodDeclaration(_)) => element,
            _ => continue,
        };
        entries.insert(key.to_string(), value);
    }
    entries
}

// =============================================================================
// Validation
// =============================================================================

/// Validate every value of the override object at `object`.
pub fn validate_meta(arena: &NodeArena, object: NodeIndex) -> Vec<ContractDiagnostic> {
    let mut validator = MetaValidator {
        arena,
        diagnostics: Vec::new(),
    };
    if object.is_some() {
        validator.validate_object(object, 0);
    }
    validator.diagnostics
}

struct MetaValidator<'a> {
    arena: &'a NodeArena,
    diagnostics: Vec<ContractDiagnostic>,
}

impl MetaValidator<'_> {
    fn report(&mut self, kind: ContractDiagnosticKind, node: NodeIndex, params: Vec<String>) {
        trace!(?kind, node = node.0, "override diagnostic");
        self.diagnostics
            .push(ContractDiagnostic::with_params(kind, node, params));
    }

    fn validate_object(&mut self, object: NodeIndex, depth: u32) {
        let arena = self.arena;
        let Some(literal) = arena
            .get(object)
            .and_then(|node| arena.get_literal_expr(node))
        else {
            return;
        };
        for &element in &literal.elements.nodes {
            match arena.kind(element) {
                Some(NodeKind::PropertyAssignment(data)) => {
                    self.validate_leaf(data.initializer, depth + 1);
                }
                // `{ b }` is a component reference
                Some(NodeKind::ShorthandPropertyAssignment(_)) => {}
                _ => self.report(ContractDiagnosticKind::BadMeta, element, Vec::new()),
            }
        }
    }

    fn validate_leaf(&mut self, value: NodeIndex, depth: u32) {
        let arena = self.arena;
        let value = arena.skip_parentheses(value);
        let Some(node) = arena.get(value) else {
            // Missing after a syntax error; the parser already reported it
            return;
        };
        if depth > MAX_META_DEPTH {
            self.report(ContractDiagnosticKind::BadMeta, value, Vec::new());
            return;
        }
        match &node.kind {
            NodeKind::ObjectLiteralExpression(_) => self.validate_object(value, depth),
            NodeKind::StringLiteral(data) | NodeKind::NoSubstitutionTemplateLiteral(data) => {
                if !is_meta_type_name(&data.text) {
                    self.report(
                        ContractDiagnosticKind::BadStringLiteral,
                        value,
                        vec![data.text.clone(), expected_meta_type_names()],
                    );
                }
            }
            NodeKind::ArrayLiteralExpression(data) => {
                if let Some(&first) = data.elements.nodes.first() {
                    self.validate_leaf(first, depth + 1);
                }
            }
            NodeKind::Identifier(_) => {}
            _ => self.report(ContractDiagnosticKind::BadMeta, value, Vec::new()),
        }
    }
}

// =============================================================================
// Lowering
// =============================================================================

/// Lower one override value for the type model.
pub fn lower_override(arena: &NodeArena, value: NodeIndex) -> OverrideNode {
    lower_at_depth(arena, value, 0)
}

fn lower_at_depth(arena: &NodeArena, value: NodeIndex, depth: u32) -> OverrideNode {
    if depth > MAX_META_DEPTH {
        return OverrideNode::Invalid;
    }
    let value = arena.skip_parentheses(value);
    match arena.kind(value) {
        Some(NodeKind::StringLiteral(data) | NodeKind::NoSubstitutionTemplateLiteral(data)) => {
            if data.text == IGNORE {
                return OverrideNode::Sentinel;
            }
            match MetaTypeName::parse(&data.text) {
                Some((name, nullable)) => OverrideNode::TypeName { name, nullable },
                None => OverrideNode::Invalid,
            }
        }
        Some(NodeKind::Identifier(data)) => {
            OverrideNode::ComponentReference(data.escaped_text.clone())
        }
        Some(NodeKind::ArrayLiteralExpression(data)) => {
            let element = match data.elements.nodes.first() {
                Some(&first) => lower_at_depth(arena, first, depth + 1),
                None => OverrideNode::Invalid,
            };
            OverrideNode::ArrayOf(Box::new(element))
        }
        Some(NodeKind::ObjectLiteralExpression(_)) => OverrideNode::NestedObject(
            meta_entries(arena, value)
                .into_iter()
                .map(|(key, entry)| (key, lower_at_depth(arena, entry, depth + 1)))
                .collect(),
        ),
        _ => OverrideNode::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmc_parser::parser::ParserState;

    /// Parse `const m = <source>;` and return the arena and initializer.
    fn parse_value(source: &str) -> (NodeArena, NodeIndex) {
        let mut parser = ParserState::new("test.jsx".to_string(), format!("const m = {source};"));
        let root = parser.parse_source_file();
        let arena = parser.into_arena();
        let statement = arena.get_source_file_at(root).unwrap().statements.nodes[0];
        let variable = arena.get_variable(arena.get(statement).unwrap()).unwrap();
        let declaration = arena
            .get_variable_declaration(arena.get(variable.declarations.nodes[0]).unwrap())
            .unwrap()
            .initializer;
        (arena, declaration)
    }

    #[test]
    fn reads_whole_component_forms() {
        let (arena, value) = parse_value("'ignore'");
        assert_eq!(read_component_meta(&arena, value), ComponentMeta::Ignored);

        let (arena, value) = parse_value("\"igno\"");
        assert!(matches!(
            read_component_meta(&arena, value),
            ComponentMeta::BadIgnore { value, .. } if value == "igno"
        ));

        let (arena, value) = parse_value("false");
        assert!(matches!(
            read_component_meta(&arena, value),
            ComponentMeta::Properties { object, entries } if object.is_none() && entries.is_empty()
        ));
    }

    #[test]
    fn lowers_override_values() {
        let (arena, value) = parse_value("{ a: 'int?', b: Link, c: [B], d: { e: 'ignore' }, f: [] }");
        let OverrideNode::NestedObject(entries) = lower_override(&arena, value) else {
            panic!("expected nested object");
        };
        assert_eq!(
            entries["a"],
            OverrideNode::TypeName {
                name: MetaTypeName::Int,
                nullable: true
            }
        );
        assert_eq!(entries["b"], OverrideNode::ComponentReference("Link".to_string()));
        assert_eq!(
            entries["c"],
            OverrideNode::ArrayOf(Box::new(OverrideNode::ComponentReference("B".to_string())))
        );
        let OverrideNode::NestedObject(nested) = &entries["d"] else {
            panic!("expected nested object for d");
        };
        assert_eq!(nested["e"], OverrideNode::Sentinel);
        assert_eq!(entries["f"], OverrideNode::ArrayOf(Box::new(OverrideNode::Invalid)));
    }

    #[test]
    fn deep_meta_is_bad_past_the_limit() {
        let depth = MAX_META_DEPTH as usize + 2;
        let source = format!("{}'int'{}", "{ a: ".repeat(depth), " }".repeat(depth));
        let (arena, value) = parse_value(&source);
        let diagnostics = validate_meta(&arena, value);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, ContractDiagnosticKind::BadMeta);
    }
}
