//! Contract diagnostics.

use vmc_common::diagnostics::{DiagnosticMessage, diagnostic_messages};
use vmc_common::Diagnostic;
use vmc_parser::parser::{NodeArena, NodeIndex};

/// Every inconsistency the contract checker reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractDiagnosticKind {
    NoExport,
    TooManyExports,
    PropNameCollision,
    BadIgnore,
    Object,
    Array,
    OneOfType,
    IllegalFunctionCall,
    IllegalIdentifier,
    IllegalReference,
    ImportedObjectReference,
    ImportedArrayReference,
    MissingObjectReference,
    BadStringLiteral,
    BadMeta,
}

impl ContractDiagnosticKind {
    pub fn message(self) -> &'static DiagnosticMessage {
        use ContractDiagnosticKind::*;
        match self {
            NoExport => &diagnostic_messages::NO_EXPORT,
            TooManyExports => &diagnostic_messages::TOO_MANY_EXPORTS,
            PropNameCollision => &diagnostic_messages::PROP_NAME_COLLISION,
            BadIgnore => &diagnostic_messages::BAD_IGNORE,
            Object => &diagnostic_messages::OBJECT,
            Array => &diagnostic_messages::ARRAY,
            OneOfType => &diagnostic_messages::ONE_OF_TYPE,
            IllegalFunctionCall => &diagnostic_messages::ILLEGAL_FUNCTION_CALL,
            IllegalIdentifier => &diagnostic_messages::ILLEGAL_IDENTIFIER,
            IllegalReference => &diagnostic_messages::ILLEGAL_REFERENCE,
            ImportedObjectReference => &diagnostic_messages::IMPORTED_OBJECT_REFERENCE,
            ImportedArrayReference => &diagnostic_messages::IMPORTED_ARRAY_REFERENCE,
            MissingObjectReference => &diagnostic_messages::MISSING_OBJECT_REFERENCE,
            BadStringLiteral => &diagnostic_messages::BAD_STRING_LITERAL,
            BadMeta => &diagnostic_messages::BAD_META,
        }
    }

    #[inline]
    pub fn code(self) -> u32 {
        self.message().code
    }
}

/// A diagnostic anchored to one AST node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractDiagnostic {
    pub kind: ContractDiagnosticKind,
    pub node: NodeIndex,
    /// Values for the message placeholders, in order.
    pub params: Vec<String>,
}

impl ContractDiagnostic {
    pub fn new(kind: ContractDiagnosticKind, node: NodeIndex) -> ContractDiagnostic {
        ContractDiagnostic {
            kind,
            node,
            params: Vec::new(),
        }
    }

    pub fn with_params(
        kind: ContractDiagnosticKind,
        node: NodeIndex,
        params: Vec<String>,
    ) -> ContractDiagnostic {
        ContractDiagnostic { kind, node, params }
    }

    #[inline]
    pub fn code(&self) -> u32 {
        self.kind.code()
    }

    /// Resolve the node span and format the message.
    pub fn to_diagnostic(&self, arena: &NodeArena, file: &str) -> Diagnostic {
        let (start, length) = arena
            .get(self.node)
            .map(|node| (node.pos, node.width()))
            .unwrap_or((0, 0));
        let args: Vec<&str> = self.params.iter().map(String::as_str).collect();
        Diagnostic::from_message(file.to_string(), start, length, self.kind.message(), &args)
    }
}
