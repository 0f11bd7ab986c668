//! JavaScript scanner/tokenizer for vmc.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine, including the raw skipping
//!   helpers used for opaque function bodies and JSX
//! - Character classification utilities

pub mod char_codes;
mod scanner;
mod syntax_kind;

pub use scanner::{ScannerDiagnostic, ScannerSnapshot, ScannerState};
pub use syntax_kind::{SyntaxKind, text_to_keyword, token_is_assignment_operator, token_is_keyword};

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;
