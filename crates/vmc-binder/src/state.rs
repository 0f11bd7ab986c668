//! Binder state and top-level statement binding.

use crate::{ExportDeclaration, ExportKind, Symbol, SymbolId, SymbolTable, symbol_flags};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};
use vmc_parser::parser::{Node, NodeArena, NodeIndex, NodeKind, modifier_flags};

/// Module-scope bindings of one source file.
///
/// Built fresh for every file by `bind_source_file`; nothing is shared
/// between files.
pub struct BinderState {
    pub symbols: SymbolTable,
    /// Top-level names, the only scope component contracts can see
    pub file_locals: FxHashMap<String, SymbolId>,
    pub(crate) export_declarations: Vec<ExportDeclaration>,
    pub(crate) prop_types_aliases: FxHashSet<String>,
}

impl Default for BinderState {
    fn default() -> Self {
        Self::new()
    }
}

impl BinderState {
    pub fn new() -> BinderState {
        BinderState {
            symbols: SymbolTable::new(),
            file_locals: FxHashMap::default(),
            export_declarations: Vec::new(),
            prop_types_aliases: FxHashSet::default(),
        }
    }

    /// Bind every top-level statement of the `SourceFile` at `root`.
    pub fn bind_source_file(&mut self, arena: &NodeArena, root: NodeIndex) {
        let Some(source_file) = arena.get_source_file_at(root) else {
            return;
        };

        for &statement in &source_file.statements.nodes {
            if let Some(node) = arena.get(statement) {
                self.bind_statement(arena, node, statement);
            }
        }
        self.mark_exported_symbols();

        debug!(
            file = %source_file.file_name,
            symbols = self.symbols.len(),
            exports = self.export_declarations.len(),
            prop_types_aliases = self.prop_types_aliases.len(),
            "bound source file"
        );
    }

    fn bind_statement(&mut self, arena: &NodeArena, node: &Node, idx: NodeIndex) {
        match &node.kind {
            NodeKind::VariableStatement(_) => self.bind_variable_statement(arena, node),
            NodeKind::ClassDeclaration(data) => {
                self.bind_named_declaration(arena, node, idx, data.name, symbol_flags::CLASS);
            }
            NodeKind::FunctionDeclaration(function) => {
                self.bind_named_declaration(
                    arena,
                    node,
                    idx,
                    function.name,
                    symbol_flags::FUNCTION,
                );
            }
            NodeKind::ImportDeclaration(_) => self.bind_import_declaration(arena, node),
            NodeKind::ExportDeclaration(_) => self.bind_export_declaration(arena, node),
            NodeKind::ExportAssignment(_) => self.bind_export_assignment(arena, node, idx),
            _ => {}
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Declare `name` in the module scope. The first declaration of a name
    /// wins; later ones only add their flags.
    pub(crate) fn declare_symbol(
        &mut self,
        name: &str,
        flags: u32,
        declaration: NodeIndex,
        initializer: NodeIndex,
    ) -> SymbolId {
        if let Some(&existing) = self.file_locals.get(name) {
            if let Some(symbol) = self.symbols.get_mut(existing) {
                symbol.flags |= flags;
            }
            trace!(name, "duplicate declaration, keeping the first");
            return existing;
        }
        let id = self.symbols.alloc(Symbol {
            escaped_name: name.to_string(),
            flags,
            value_declaration: declaration,
            initializer,
            import_module: None,
            import_name: None,
        });
        self.file_locals.insert(name.to_string(), id);
        id
    }

    fn bind_variable_statement(&mut self, arena: &NodeArena, node: &Node) {
        let Some(variable) = arena.get_variable(node) else {
            return;
        };
        let mut flags = symbol_flags::VARIABLE;
        if node.is_const() {
            flags |= symbol_flags::CONST;
        }
        let exported = node.has_modifier(modifier_flags::EXPORT);

        for &decl_idx in &variable.declarations.nodes {
            let Some(decl) = arena
                .get(decl_idx)
                .and_then(|decl_node| arena.get_variable_declaration(decl_node))
            else {
                continue;
            };

            let local_name = arena.get_identifier_text(decl.name);
            match local_name {
                Some(name) => {
                    self.declare_symbol(name, flags, decl_idx, decl.initializer);
                }
                None => self.bind_binding_pattern(arena, decl.name, flags, decl_idx),
            }

            if exported {
                self.export_declarations.push(ExportDeclaration {
                    kind: ExportKind::Variable,
                    node: decl_idx,
                    local_name: local_name.map(str::to_string),
                    declaration: NodeIndex::NONE,
                });
            }
        }
    }

    /// Declare every name bound by a destructuring pattern. The names have
    /// no initializer of their own.
    fn bind_binding_pattern(
        &mut self,
        arena: &NodeArena,
        pattern: NodeIndex,
        flags: u32,
        declaration: NodeIndex,
    ) {
        let mut pending = vec![pattern];
        while let Some(current) = pending.pop() {
            let Some(node) = arena.get(current) else {
                continue;
            };
            if let Some(name) = arena.get_identifier_text(current) {
                self.declare_symbol(name, flags, declaration, NodeIndex::NONE);
            } else if let Some(binding) = arena.get_binding_pattern(node) {
                // Reverse keeps declaration order when popping
                pending.extend(binding.elements.nodes.iter().rev());
            } else if let Some(element) = arena.get_binding_element(node) {
                pending.push(element.name);
            }
        }
    }

    /// Class or function declaration, exported or not.
    fn bind_named_declaration(
        &mut self,
        arena: &NodeArena,
        node: &Node,
        idx: NodeIndex,
        name: NodeIndex,
        flags: u32,
    ) {
        let local_name = arena.get_identifier_text(name);
        if let Some(local_name) = local_name {
            self.declare_symbol(local_name, flags, idx, NodeIndex::NONE);
        }

        if node.has_modifier(modifier_flags::EXPORT) {
            let kind = if node.has_modifier(modifier_flags::DEFAULT) {
                ExportKind::DefaultDeclaration
            } else {
                ExportKind::Declaration
            };
            self.export_declarations.push(ExportDeclaration {
                kind,
                node: idx,
                local_name: local_name.map(str::to_string),
                declaration: idx,
            });
        }
    }

    /// Exports may precede the declaration they name, so flags are applied
    /// after the whole file is bound.
    fn mark_exported_symbols(&mut self) {
        for export in &self.export_declarations {
            let Some(name) = export.local_name.as_deref() else {
                continue;
            };
            if let Some(&id) = self.file_locals.get(name)
                && let Some(symbol) = self.symbols.get_mut(id)
            {
                symbol.flags |= symbol_flags::EXPORTED;
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Look up a top-level name.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.file_locals
            .get(name)
            .and_then(|&id| self.symbols.get(id))
    }

    pub fn get_symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Counted export declarations in source order.
    pub fn export_declarations(&self) -> &[ExportDeclaration] {
        &self.export_declarations
    }

    /// True when `name` is a default or namespace import of `prop-types`.
    pub fn is_prop_types_alias(&self, name: &str) -> bool {
        self.prop_types_aliases.contains(name)
    }

    pub fn prop_types_aliases(&self) -> impl Iterator<Item = &str> {
        self.prop_types_aliases.iter().map(String::as_str)
    }
}
