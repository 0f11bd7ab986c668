//! Component contract checker.
//!
//! Validates that a component's declared `propTypes` and its optional
//! `viewModelMeta` override agree, and builds the merged type model handed
//! to code generators.
//!
//! - `component` - locates the exported component and its static fields
//! - `prop_types` - classifies each declared property type
//! - `view_model_meta` - validates and lowers the override metadata
//! - `contract` - `ContractChecker`, which runs the passes and merges them
//! - `type_model` - the serializable model for clean components

pub mod component;
pub mod contract;
pub mod diagnostics;
pub mod name_equivalence;
pub mod prop_types;
pub mod resolver;
pub mod type_model;
pub mod view_model_meta;
pub mod vocabulary;

pub use contract::{CheckerOptions, ContractChecker};
pub use diagnostics::{ContractDiagnostic, ContractDiagnosticKind};
pub use resolver::{ReferenceResolver, ResolvedReference};
pub use type_model::{ComponentModel, OverrideType, PropertyModel, TypeDescription};
