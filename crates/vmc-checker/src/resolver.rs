//! Module-scope reference resolution.
//!
//! The checker never looks at the binder directly when it needs to know what
//! an identifier refers to; it asks a `ReferenceResolver`. `BinderState`
//! answers from the top-level bindings of the file.

use crate::vocabulary::PROP_TYPES_NAMESPACE;
use vmc_binder::{BinderState, symbol_flags};
use vmc_parser::parser::{NodeArena, NodeIndex, NodeKind};

/// What a module-scope identifier refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedReference {
    /// A local binding initialized with an object literal.
    LocalObjectLiteral(NodeIndex),
    /// A local binding initialized with an array literal.
    LocalArrayLiteral(NodeIndex),
    /// An imported binding. The import is never followed.
    Imported { module: String },
    /// Not declared, or declared with anything else.
    Unresolved,
}

pub trait ReferenceResolver {
    fn resolve(&self, arena: &NodeArena, name: &str) -> ResolvedReference;

    /// True when `name` refers to the `PropTypes` validators.
    fn is_prop_types_namespace(&self, name: &str) -> bool {
        name == PROP_TYPES_NAMESPACE
    }
}

impl ReferenceResolver for BinderState {
    fn resolve(&self, arena: &NodeArena, name: &str) -> ResolvedReference {
        let Some(symbol) = self.lookup(name) else {
            return ResolvedReference::Unresolved;
        };
        if symbol.has_flags(symbol_flags::ALIAS) {
            return ResolvedReference::Imported {
                module: symbol.import_module.clone().unwrap_or_default(),
            };
        }
        let initializer = arena.skip_parentheses(symbol.initializer);
        match arena.kind(initializer) {
            Some(NodeKind::ObjectLiteralExpression(_)) => {
                ResolvedReference::LocalObjectLiteral(initializer)
            }
            Some(NodeKind::ArrayLiteralExpression(_)) => {
                ResolvedReference::LocalArrayLiteral(initializer)
            }
            _ => ResolvedReference::Unresolved,
        }
    }

    fn is_prop_types_namespace(&self, name: &str) -> bool {
        name == PROP_TYPES_NAMESPACE || self.is_prop_types_alias(name)
    }
}
