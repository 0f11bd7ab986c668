//! Names the checker recognizes: override type names, static field names
//! and `PropTypes` members.

/// Sentinel that ignores a whole component or a single property.
pub const IGNORE: &str = "ignore";

pub const PROP_TYPES_FIELD: &str = "propTypes";
pub const VIEW_MODEL_META_FIELD: &str = "viewModelMeta";

/// Global namespace of the `prop-types` validators.
pub const PROP_TYPES_NAMESPACE: &str = "PropTypes";

/// Trailing member that marks a property required.
pub const IS_REQUIRED: &str = "isRequired";

/// Suffix that makes an override type nullable.
pub const NULLABLE_SUFFIX: char = '?';

/// Every string accepted as an override value, in display order.
pub const META_TYPE_NAMES: &[&str] = &[
    "int", "int?", "float", "float?", "double", "double?", IGNORE,
];

/// Numeric override types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaTypeName {
    Int,
    Float,
    Double,
}

impl MetaTypeName {
    pub fn as_str(self) -> &'static str {
        match self {
            MetaTypeName::Int => "int",
            MetaTypeName::Float => "float",
            MetaTypeName::Double => "double",
        }
    }

    /// Parse `int`, `float?` and so on into the type and its nullability.
    pub fn parse(text: &str) -> Option<(MetaTypeName, bool)> {
        let (base, nullable) = match text.strip_suffix(NULLABLE_SUFFIX) {
            Some(base) => (base, true),
            None => (text, false),
        };
        let name = match base {
            "int" => MetaTypeName::Int,
            "float" => MetaTypeName::Float,
            "double" => MetaTypeName::Double,
            _ => return None,
        };
        Some((name, nullable))
    }
}

/// True for strings allowed as override values, `ignore` included.
pub fn is_meta_type_name(text: &str) -> bool {
    META_TYPE_NAMES.contains(&text)
}

/// The vocabulary as shown in diagnostics.
pub fn expected_meta_type_names() -> String {
    META_TYPE_NAMES
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `PropTypes` member names.
pub mod prop_types_members {
    pub const ANY: &str = "any";
    pub const BOOL: &str = "bool";
    pub const ELEMENT: &str = "element";
    pub const ELEMENT_TYPE: &str = "elementType";
    pub const FUNC: &str = "func";
    pub const NODE: &str = "node";
    pub const NUMBER: &str = "number";
    pub const STRING: &str = "string";
    pub const SYMBOL: &str = "symbol";

    pub const OBJECT: &str = "object";
    pub const ARRAY: &str = "array";
    pub const ONE_OF_TYPE: &str = "oneOfType";

    pub const ARRAY_OF: &str = "arrayOf";
    pub const ONE_OF: &str = "oneOf";
    pub const SHAPE: &str = "shape";
    pub const EXACT: &str = "exact";

    /// Members that map directly to a typed primitive.
    pub const PRIMITIVES: &[&str] = &[
        ANY,
        BOOL,
        ELEMENT,
        ELEMENT_TYPE,
        FUNC,
        NODE,
        NUMBER,
        STRING,
        SYMBOL,
    ];
}

pub fn is_primitive_member(member: &str) -> bool {
    prop_types_members::PRIMITIVES.contains(&member)
}

/// `Object.keys` / `Object.values`, the accepted enum sources.
pub const OBJECT_NAMESPACE: &str = "Object";
pub const OBJECT_KEYS: &str = "keys";
pub const OBJECT_VALUES: &str = "values";
