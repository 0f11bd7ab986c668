//! Parser: AST arena and recursive-descent parser state.

pub mod base;
pub mod flags;
pub mod node;
mod node_access;
mod state;
mod state_expressions;
mod state_statements;

pub use base::{NodeIndex, NodeList};
pub use flags::{modifier_flags, node_flags};
pub use node::{Node, NodeArena, NodeKind};
pub use state::{ParseDiagnostic, ParserState};
