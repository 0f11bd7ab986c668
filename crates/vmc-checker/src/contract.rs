//! Contract checking: export resolution, classification, the override walk
//! and model building.

use crate::component::{Component, StaticFields, first_declaring_component};
use crate::diagnostics::{ContractDiagnostic, ContractDiagnosticKind};
use crate::name_equivalence::equivalent;
use crate::prop_types::{Classified, ClassifiedTree, PropTypesClassifier};
use crate::type_model::{ComponentModel, build_component_model};
use crate::view_model_meta::{ComponentMeta, lower_override, meta_entries, read_component_meta, validate_meta};
use crate::vocabulary::{PROP_TYPES_FIELD, VIEW_MODEL_META_FIELD};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, trace};
use vmc_binder::BinderState;
use vmc_common::Diagnostic;
use vmc_parser::parser::{NodeArena, NodeIndex};

/// Checker options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Static field holding the property types
    pub prop_types_field: String,
    /// Static field holding the override metadata
    pub meta_field: String,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            prop_types_field: PROP_TYPES_FIELD.to_string(),
            meta_field: VIEW_MODEL_META_FIELD.to_string(),
        }
    }
}

/// Checks the component contract of one bound source file.
pub struct ContractChecker<'a> {
    arena: &'a NodeArena,
    binder: &'a BinderState,
    file_name: String,
    options: CheckerOptions,
    diagnostics: Vec<ContractDiagnostic>,
    component: Option<Component>,
    model: Option<ComponentModel>,
}

impl<'a> ContractChecker<'a> {
    pub fn new(
        arena: &'a NodeArena,
        binder: &'a BinderState,
        file_name: String,
        options: CheckerOptions,
    ) -> Self {
        ContractChecker {
            arena,
            binder,
            file_name,
            options,
            diagnostics: Vec::new(),
            component: None,
            model: None,
        }
    }

    /// Run every check on the `SourceFile` at `root`. Results replace those
    /// of any previous call.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %self.file_name))]
    pub fn check_source_file(&mut self, root: NodeIndex) {
        let mut diagnostics = Vec::new();
        let (component, model) = self.check_component(root, &mut diagnostics);
        debug!(
            diagnostics = diagnostics.len(),
            has_model = model.is_some(),
            "checked component contract"
        );
        self.diagnostics = diagnostics;
        self.component = component;
        self.model = model;
    }

    fn check_component(
        &self,
        root: NodeIndex,
        diagnostics: &mut Vec<ContractDiagnostic>,
    ) -> (Option<Component>, Option<ComponentModel>) {
        let arena = self.arena;
        let fields = StaticFields {
            prop_types: &self.options.prop_types_field,
            meta: &self.options.meta_field,
        };

        // Export resolution
        let exports = self.binder.export_declarations();
        let component = match exports {
            [export] => Component::collect(
                arena,
                root,
                self.binder,
                export.local_name.as_deref(),
                export.declaration,
                fields,
            ),
            _ => {
                if exports.is_empty() {
                    diagnostics.push(ContractDiagnostic::new(ContractDiagnosticKind::NoExport, root));
                } else {
                    diagnostics.extend(exports.iter().map(|export| {
                        ContractDiagnostic::new(ContractDiagnosticKind::TooManyExports, export.node)
                    }));
                }
                // Best effort: keep checking the first declared contract
                let Some((name, declaration)) = first_declaring_component(arena, root, fields) else {
                    return (None, None);
                };
                Component::collect(arena, root, self.binder, name.as_deref(), declaration, fields)
            }
        };
        let trusted_name = match exports {
            [_] => component.name.as_deref(),
            _ => None,
        };

        // Whole-component override
        let (meta_object, meta_entries_by_key) = match read_component_meta(arena, component.view_model_meta) {
            ComponentMeta::Ignored => {
                debug!(name = ?component.name, "component ignored");
                return (Some(component), None);
            }
            ComponentMeta::BadIgnore { node, value } => {
                diagnostics.push(ContractDiagnostic::with_params(
                    ContractDiagnosticKind::BadIgnore,
                    node,
                    vec![value],
                ));
                return (Some(component), None);
            }
            ComponentMeta::Properties { object, entries } => (object, entries),
        };

        let mut classifier = PropTypesClassifier::new(arena, self.binder, fields.prop_types);
        let classified = classifier.classify(component.prop_types);

        if let Some(name) = trusted_name {
            self.check_name_collisions(component.prop_types, name, diagnostics);
        }
        self.walk_classified(&classified, Some(&meta_entries_by_key), diagnostics);
        diagnostics.extend(validate_meta(arena, meta_object));

        if !diagnostics.is_empty() || exports.len() != 1 {
            return (Some(component), None);
        }
        let overrides: IndexMap<_, _> = meta_entries_by_key
            .iter()
            .map(|(key, &value)| (key.clone(), lower_override(arena, value)))
            .collect();
        let name = component
            .name
            .clone()
            .unwrap_or_else(|| file_stem(&self.file_name));
        let model = build_component_model(&name, &classified, &overrides);
        (Some(component), Some(model))
    }

    /// Every statically named key of the `propTypes` literal is checked,
    /// repeated keys included.
    fn check_name_collisions(
        &self,
        prop_types: NodeIndex,
        component_name: &str,
        diagnostics: &mut Vec<ContractDiagnostic>,
    ) {
        let arena = self.arena;
        let object = arena.skip_parentheses(prop_types);
        let Some(literal) = arena
            .get(object)
            .filter(|node| node.is_object_literal())
            .and_then(|node| arena.get_literal_expr(node))
        else {
            return;
        };
        for &element in &literal.elements.nodes {
            let name = arena.get_member_name(element);
            let Some(key) = arena.get_property_name_text(name) else {
                continue;
            };
            if equivalent(key, component_name) {
                diagnostics.push(ContractDiagnostic::with_params(
                    ContractDiagnosticKind::PropNameCollision,
                    name,
                    vec![key.to_string(), component_name.to_string()],
                ));
            }
        }
    }

    /// Report invalid property types that no override covers. A key present
    /// in the override tree suppresses its own diagnostics; an object override
    /// is matched against a nested shape key by key.
    fn walk_classified(
        &self,
        tree: &ClassifiedTree,
        overrides: Option<&IndexMap<String, NodeIndex>>,
        diagnostics: &mut Vec<ContractDiagnostic>,
    ) {
        for (key, property) in tree {
            let Some(&value) = overrides.and_then(|entries| entries.get(key)) else {
                match &property.entry {
                    Classified::Invalid(kind) => {
                        diagnostics.push(ContractDiagnostic::new(*kind, property.node));
                    }
                    Classified::Nested { tree, .. } => self.walk_classified(tree, None, diagnostics),
                    Classified::Valid(_) => {}
                }
                continue;
            };

            let value = self.arena.skip_parentheses(value);
            let is_object = self
                .arena
                .get(value)
                .is_some_and(|node| node.is_object_literal());
            match &property.entry {
                Classified::Nested { tree, .. } if is_object => {
                    let nested = meta_entries(self.arena, value);
                    self.walk_classified(tree, Some(&nested), diagnostics);
                }
                _ => trace!(key, "property type replaced by override"),
            }
        }
    }

    // =========================================================================
    // Results
    // =========================================================================

    pub fn diagnostics(&self) -> &[ContractDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ContractDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Diagnostics with resolved spans and formatted messages.
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .iter()
            .map(|diag| diag.to_diagnostic(self.arena, &self.file_name))
            .collect()
    }

    pub fn component(&self) -> Option<&Component> {
        self.component.as_ref()
    }

    /// Merged type model; present only for a clean, non-ignored component.
    pub fn component_model(&self) -> Option<&ComponentModel> {
        self.model.as_ref()
    }

    pub fn into_component_model(self) -> Option<ComponentModel> {
        self.model
    }
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
        .to_string()
}
