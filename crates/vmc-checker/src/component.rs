//! Component extraction.
//!
//! A component declares its contract either as static class members
//! (`class A { static propTypes = {...} }`) or as assignments after the
//! declaration (`A.propTypes = {...};`). Both forms normalize to the same
//! `Component`.

use tracing::debug;
use vmc_binder::BinderState;
use vmc_parser::parser::{NodeArena, NodeIndex, NodeKind, modifier_flags};
use vmc_scanner::SyntaxKind;

/// Names of the two static fields that make up a component contract.
#[derive(Clone, Copy, Debug)]
pub struct StaticFields<'a> {
    pub prop_types: &'a str,
    pub meta: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    /// `None` for anonymous default exports.
    pub name: Option<String>,
    /// Class declaring the component, if it is one.
    pub class_node: NodeIndex,
    /// Value of the `propTypes` field, `NONE` when absent.
    pub prop_types: NodeIndex,
    /// Value of the `viewModelMeta` field, `NONE` when absent.
    pub view_model_meta: NodeIndex,
}

impl Component {
    /// Collect the component named `name` and/or declared at `declaration`.
    ///
    /// Static class members are applied first, then top-level assignments in
    /// source order, so the last declaration of a field wins. A field
    /// declared without a value never overrides one with a value.
    pub fn collect(
        arena: &NodeArena,
        root: NodeIndex,
        binder: &BinderState,
        name: Option<&str>,
        declaration: NodeIndex,
        fields: StaticFields<'_>,
    ) -> Component {
        let class_node = if is_class(arena, declaration) {
            declaration
        } else {
            name.map_or(NodeIndex::NONE, |name| class_for_name(arena, binder, name))
        };
        let mut component = Component {
            name: name.map(str::to_string),
            class_node,
            prop_types: NodeIndex::NONE,
            view_model_meta: NodeIndex::NONE,
        };

        if let Some(class_data) = arena.get(class_node).and_then(|node| arena.get_class(node)) {
            for &member in &class_data.members.nodes {
                let Some(member_node) = arena.get(member) else {
                    continue;
                };
                let Some(property) = arena.get_property_decl(member_node) else {
                    continue;
                };
                if !member_node.has_modifier(modifier_flags::STATIC) {
                    continue;
                }
                if let Some(field) = arena.get_property_name_text(property.name) {
                    component.apply(field, property.initializer, fields);
                }
            }
        }

        if let Some(name) = name {
            for statement in top_level_statements(arena, root) {
                if let Some((owner, field, value)) = static_field_statement(arena, statement)
                    && owner == name
                {
                    component.apply(field, value, fields);
                }
            }
        }

        debug!(
            name = component.name.as_deref().unwrap_or("<anonymous>"),
            is_class = component.class_node.is_some(),
            has_prop_types = component.prop_types.is_some(),
            has_meta = component.view_model_meta.is_some(),
            "collected component"
        );
        component
    }

    fn apply(&mut self, field: &str, value: NodeIndex, fields: StaticFields<'_>) {
        if value.is_none() {
            return;
        }
        if field == fields.prop_types {
            self.prop_types = value;
        } else if field == fields.meta {
            self.view_model_meta = value;
        }
    }
}

/// The first top-level name that declares either contract field, with the
/// class it belongs to. Used when the export count does not identify the
/// component.
pub fn first_declaring_component(
    arena: &NodeArena,
    root: NodeIndex,
    fields: StaticFields<'_>,
) -> Option<(Option<String>, NodeIndex)> {
    let declares = |field: &str| field == fields.prop_types || field == fields.meta;

    for statement in top_level_statements(arena, root) {
        let Some(node) = arena.get(statement) else {
            continue;
        };
        match &node.kind {
            NodeKind::ClassDeclaration(data) => {
                if class_declares_field(arena, statement, &declares) {
                    let name = arena.get_identifier_text(data.name).map(str::to_string);
                    return Some((name, statement));
                }
            }
            NodeKind::VariableStatement(variable) => {
                for &decl in &variable.declarations.nodes {
                    let Some(data) = arena
                        .get(decl)
                        .and_then(|decl_node| arena.get_variable_declaration(decl_node))
                    else {
                        continue;
                    };
                    let initializer = arena.skip_parentheses(data.initializer);
                    if is_class(arena, initializer)
                        && class_declares_field(arena, initializer, &declares)
                        && let Some(name) = arena.get_identifier_text(data.name)
                    {
                        return Some((Some(name.to_string()), initializer));
                    }
                }
            }
            NodeKind::ExpressionStatement(_) => {
                if let Some((owner, field, _)) = static_field_statement(arena, statement)
                    && declares(field)
                {
                    return Some((Some(owner.to_string()), NodeIndex::NONE));
                }
            }
            _ => {}
        }
    }
    None
}

fn top_level_statements(
    arena: &NodeArena,
    root: NodeIndex,
) -> impl Iterator<Item = NodeIndex> + '_ {
    arena
        .get_source_file_at(root)
        .into_iter()
        .flat_map(|source_file| source_file.statements.iter())
}

fn is_class(arena: &NodeArena, idx: NodeIndex) -> bool {
    matches!(
        arena.kind(idx),
        Some(NodeKind::ClassDeclaration(_) | NodeKind::ClassExpression(_))
    )
}

/// The class a top-level name is bound to: a class declaration, or a
/// variable initialized with a class expression.
fn class_for_name(arena: &NodeArena, binder: &BinderState, name: &str) -> NodeIndex {
    let Some(symbol) = binder.lookup(name) else {
        return NodeIndex::NONE;
    };
    if is_class(arena, symbol.value_declaration) {
        return symbol.value_declaration;
    }
    let initializer = arena.skip_parentheses(symbol.initializer);
    if is_class(arena, initializer) {
        initializer
    } else {
        NodeIndex::NONE
    }
}

fn class_declares_field(
    arena: &NodeArena,
    class_node: NodeIndex,
    declares: &dyn Fn(&str) -> bool,
) -> bool {
    let Some(class_data) = arena.get(class_node).and_then(|node| arena.get_class(node)) else {
        return false;
    };
    class_data.members.iter().any(|member| {
        arena.get(member).is_some_and(|member_node| {
            member_node.has_modifier(modifier_flags::STATIC)
                && arena
                    .get_property_decl(member_node)
                    .and_then(|property| arena.get_property_name_text(property.name))
                    .is_some_and(declares)
        })
    })
}

/// `Owner.field = value;`, `Owner["field"] = value;` or a bare `Owner.field;`
/// as `(owner, field, value)`. The value is `NONE` for the bare form.
fn static_field_statement(
    arena: &NodeArena,
    statement: NodeIndex,
) -> Option<(&str, &str, NodeIndex)> {
    let node = arena.get(statement)?;
    let expression = arena.get_expression_statement(node)?.expression;
    let expression_node = arena.get(expression)?;

    let (target, value) = match arena.get_binary_expr(expression_node) {
        Some(binary) if binary.operator_token == SyntaxKind::EqualsToken => {
            (binary.left, binary.right)
        }
        Some(_) => return None,
        None => (expression, NodeIndex::NONE),
    };

    let access = arena
        .get(target)
        .and_then(|target_node| arena.get_access_expr(target_node))?;
    let owner = arena.get_identifier_text(access.expression)?;
    let field = match arena.kind(target)? {
        NodeKind::PropertyAccessExpression(_) => {
            arena.get_identifier_text(access.name_or_argument)?
        }
        _ => arena.get_string_literal_text(access.name_or_argument)?,
    };
    Some((owner, field, value))
}
