//! Module-scope binder for vmc.
//!
//! The binder walks the top-level statements of a parsed module once and
//! records:
//! - every top-level binding (variables, imports, classes, functions)
//! - the export declarations that can name a component, in source order
//! - the local names bound to the `prop-types` package
//!
//! Nested scopes are not modelled: component contracts only reference
//! module-level names.

pub mod state;
mod state_import_export;

pub use state::BinderState;

/// Symbol flags.
pub mod symbol_flags {
    pub const NONE: u32 = 0;
    pub const VARIABLE: u32 = 1 << 0;
    pub const CLASS: u32 = 1 << 1;
    pub const FUNCTION: u32 = 1 << 2;
    /// Local name of an import
    pub const ALIAS: u32 = 1 << 3;
    pub const EXPORTED: u32 = 1 << 4;
    pub const CONST: u32 = 1 << 5;
}

/// Module the `PropTypes` validators are imported from.
pub const PROP_TYPES_MODULE: &str = "prop-types";

/// Index of a symbol in the `SymbolTable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == SymbolId::NONE
    }
}

/// A module-scope binding.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub escaped_name: String,
    pub flags: u32,
    /// Declaring node: the variable declarator, class, function or import
    /// specifier.
    pub value_declaration: vmc_parser::parser::NodeIndex,
    /// Initializer of a variable declared with a plain identifier name.
    pub initializer: vmc_parser::parser::NodeIndex,
    /// Module specifier of an import.
    pub import_module: Option<String>,
    /// Imported name: `default`, `*` for a namespace import, or the
    /// exported name of a named import.
    pub import_name: Option<String>,
}

impl Symbol {
    #[inline]
    pub fn has_flags(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }
}

/// Flat symbol storage.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(u32::try_from(self.symbols.len()).unwrap_or(u32::MAX));
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

/// How an export declaration names its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    /// `export default <identifier>`
    DefaultExpression,
    /// `export default class [Name]` / `export default function [name]`
    DefaultDeclaration,
    /// One specifier of `export { a, b as c }`
    Specifier,
    /// One declarator of `export const|let|var`
    Variable,
    /// `export class Name` / `export function name`
    Declaration,
}

/// An export that can name a component.
#[derive(Clone, Debug)]
pub struct ExportDeclaration {
    pub kind: ExportKind,
    /// Node diagnostics about this export are reported on.
    pub node: vmc_parser::parser::NodeIndex,
    /// Local name of the exported binding; `None` for anonymous default
    /// declarations and destructuring declarators.
    pub local_name: Option<String>,
    /// The class or function declared by the export itself, if any.
    pub declaration: vmc_parser::parser::NodeIndex,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmc_parser::parser::NodeIndex;

    fn symbol(name: &str, flags: u32) -> Symbol {
        Symbol {
            escaped_name: name.to_string(),
            flags,
            value_declaration: NodeIndex::NONE,
            initializer: NodeIndex::NONE,
            import_module: None,
            import_name: None,
        }
    }

    #[test]
    fn symbol_table_allocates_sequential_ids() {
        let mut table = SymbolTable::new();
        let a = table.alloc(symbol("a", symbol_flags::VARIABLE));
        let b = table.alloc(symbol("b", symbol_flags::CLASS));
        assert_eq!((a, b), (SymbolId(0), SymbolId(1)));
        assert_eq!(table.len(), 2);
        assert!(table.get(b).is_some_and(|s| s.has_flags(symbol_flags::CLASS)));
        assert!(table.get(SymbolId::NONE).is_none());
    }

    #[test]
    fn symbol_flags_are_distinct() {
        let all = [
            symbol_flags::VARIABLE,
            symbol_flags::CLASS,
            symbol_flags::FUNCTION,
            symbol_flags::ALIAS,
            symbol_flags::EXPORTED,
            symbol_flags::CONST,
        ];
        let combined = all.iter().fold(0, |acc, flag| {
            assert_eq!(acc & flag, 0);
            acc | flag
        });
        assert_eq!(combined.count_ones() as usize, all.len());
    }
}
