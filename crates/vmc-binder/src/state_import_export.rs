//! Import and export declaration binding.

use crate::state::BinderState;
use crate::{ExportDeclaration, ExportKind, PROP_TYPES_MODULE, symbol_flags};
use tracing::trace;
use vmc_parser::parser::{Node, NodeArena, NodeIndex};

impl BinderState {
    pub(crate) fn bind_import_declaration(&mut self, arena: &NodeArena, node: &Node) {
        let Some(import) = arena.get_import_decl(node) else {
            return;
        };
        let module_specifier = arena.get_string_literal_text(import.module_specifier);
        let from_prop_types = module_specifier == Some(PROP_TYPES_MODULE);

        // Default import: `import X from "m"`
        if let Some(name) = arena.get_identifier_text(import.default_binding) {
            self.declare_import(name, import.default_binding, module_specifier, "default");
            if from_prop_types {
                self.prop_types_aliases.insert(name.to_string());
            }
        }

        // Namespace import: `import * as ns from "m"`
        if let Some(name) = arena.get_identifier_text(import.namespace_binding) {
            self.declare_import(name, import.namespace_binding, module_specifier, "*");
            if from_prop_types {
                self.prop_types_aliases.insert(name.to_string());
            }
        }

        // Named imports: `import { a, b as c } from "m"`
        if let Some(named) = &import.named_bindings {
            for &spec_idx in &named.nodes {
                let Some(spec) = arena
                    .get(spec_idx)
                    .and_then(|spec_node| arena.get_specifier(spec_node))
                else {
                    continue;
                };
                let Some(local_name) = arena.get_identifier_text(spec.name) else {
                    continue;
                };
                let imported_name = if spec.property_name.is_none() {
                    local_name
                } else {
                    arena
                        .get_property_name_text(spec.property_name)
                        .unwrap_or(local_name)
                };
                self.declare_import(local_name, spec_idx, module_specifier, imported_name);
            }
        }
    }

    fn declare_import(
        &mut self,
        local_name: &str,
        declaration: NodeIndex,
        module_specifier: Option<&str>,
        imported_name: &str,
    ) {
        let id = self.declare_symbol(
            local_name,
            symbol_flags::ALIAS,
            declaration,
            NodeIndex::NONE,
        );
        if let Some(symbol) = self.symbols.get_mut(id)
            && symbol.import_module.is_none()
        {
            symbol.import_module = module_specifier.map(str::to_string);
            symbol.import_name = Some(imported_name.to_string());
        }
    }

    /// `export { a, b as c }` counts one export per specifier. Re-exports
    /// (`export { a } from "m"`, `export * from "m"`) are not counted.
    pub(crate) fn bind_export_declaration(&mut self, arena: &NodeArena, node: &Node) {
        let Some(export) = arena.get_export_decl(node) else {
            return;
        };
        let Some(clause) = &export.export_clause else {
            trace!("export * is not counted");
            return;
        };
        if export.module_specifier.is_some() {
            trace!("re-export is not counted");
            return;
        }

        for &spec_idx in &clause.nodes {
            let Some(spec) = arena
                .get(spec_idx)
                .and_then(|spec_node| arena.get_specifier(spec_node))
            else {
                continue;
            };
            // `export { local as exported }`
            let local = if spec.property_name.is_none() {
                spec.name
            } else {
                spec.property_name
            };
            self.export_declarations.push(ExportDeclaration {
                kind: ExportKind::Specifier,
                node: spec_idx,
                local_name: arena.get_identifier_text(local).map(str::to_string),
                declaration: NodeIndex::NONE,
            });
        }
    }

    /// `export default <identifier>`. Other default expressions do not name
    /// a component and are not counted.
    pub(crate) fn bind_export_assignment(
        &mut self,
        arena: &NodeArena,
        node: &Node,
        idx: NodeIndex,
    ) {
        let Some(assignment) = arena.get_export_assignment(node) else {
            return;
        };
        let expression = arena.skip_parentheses(assignment.expression);
        let Some(name) = arena.get_identifier_text(expression) else {
            trace!("export default of a non-identifier is not counted");
            return;
        };
        self.export_declarations.push(ExportDeclaration {
            kind: ExportKind::DefaultExpression,
            node: idx,
            local_name: Some(name.to_string()),
            declaration: NodeIndex::NONE,
        });
    }
}
