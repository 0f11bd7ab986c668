//! Common types and utilities for the vmc component contract validator.
//!
//! This crate provides foundational types used across all vmc crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message table and codes)
//! - Position/Range types and the `LineMap` offset converter
//! - Centralized limits

// Diagnostic types and the generated message table
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage, format_message};

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, Range};

// Centralized limits and thresholds
pub mod limits;
