//! Merged type model for code generators.
//!
//! Built only for components that checked clean and are not ignored. Every
//! override replaces the declared type of its key; ignored keys are dropped.

use crate::prop_types::{Classified, ClassifiedTree};
use crate::view_model_meta::OverrideNode;
use crate::vocabulary::MetaTypeName;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentModel {
    pub name: String,
    pub properties: IndexMap<String, PropertyModel>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyModel {
    #[serde(rename = "type")]
    pub ty: TypeDescription,
    pub required: bool,
}

/// Final type of one property.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum TypeDescription {
    /// A `PropTypes` primitive such as `string` or `func`
    Primitive(String),
    /// Literal values of a `oneOf`
    Enum(Vec<EnumValue>),
    ArrayOf(Box<TypeDescription>),
    Shape(IndexMap<String, PropertyModel>),
    /// `shape(Other.propTypes)`: the properties of another component
    ShapeOf(String),
    Override(OverrideType),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// Type written by an override.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum OverrideType {
    Named { name: MetaTypeName, nullable: bool },
    Component(String),
    ArrayOf(Box<OverrideType>),
    Object(IndexMap<String, OverrideType>),
    /// Element type of an empty array override
    Unknown,
}

/// Merge the classified property types of a clean component with its
/// override tree.
///
/// Override keys with no declared property are not part of the model.
pub fn build_component_model(
    name: &str,
    classified: &ClassifiedTree,
    overrides: &IndexMap<String, OverrideNode>,
) -> ComponentModel {
    ComponentModel {
        name: name.to_string(),
        properties: merge_properties(classified, overrides),
    }
}

fn merge_properties(
    classified: &ClassifiedTree,
    overrides: &IndexMap<String, OverrideNode>,
) -> IndexMap<String, PropertyModel> {
    let mut properties = IndexMap::new();
    for (key, property) in classified {
        let ty = match (overrides.get(key), &property.entry) {
            (Some(OverrideNode::Sentinel), _) => continue,
            (Some(OverrideNode::NestedObject(nested)), Classified::Nested { tree, array_depth }) => {
                wrap_array(
                    TypeDescription::Shape(merge_properties(tree, nested)),
                    *array_depth,
                )
            }
            (Some(node), _) => TypeDescription::Override(lower_override_type(node)),
            (None, Classified::Valid(ty)) => ty.clone(),
            (None, Classified::Nested { tree, array_depth }) => wrap_array(
                TypeDescription::Shape(merge_properties(tree, &IndexMap::new())),
                *array_depth,
            ),
            // A clean component has no invalid entries left
            (None, Classified::Invalid(_)) => continue,
        };
        properties.insert(
            key.clone(),
            PropertyModel {
                ty,
                required: property.required,
            },
        );
    }
    properties
}

fn wrap_array(mut ty: TypeDescription, depth: u32) -> TypeDescription {
    for _ in 0..depth {
        ty = TypeDescription::ArrayOf(Box::new(ty));
    }
    ty
}

fn lower_override_type(node: &OverrideNode) -> OverrideType {
    match node {
        OverrideNode::TypeName { name, nullable } => OverrideType::Named {
            name: *name,
            nullable: *nullable,
        },
        OverrideNode::ComponentReference(name) => OverrideType::Component(name.clone()),
        OverrideNode::ArrayOf(element) => OverrideType::ArrayOf(Box::new(lower_override_type(element))),
        OverrideNode::NestedObject(entries) => OverrideType::Object(
            entries
                .iter()
                .filter(|(_, entry)| **entry != OverrideNode::Sentinel)
                .map(|(key, entry)| (key.clone(), lower_override_type(entry)))
                .collect(),
        ),
        OverrideNode::Sentinel | OverrideNode::Invalid => OverrideType::Unknown,
    }
}
