//! Tests for property-type classification.

use vmc_binder::BinderState;
use vmc_checker::ContractDiagnosticKind;
use vmc_checker::prop_types::{Classified, ClassifiedTree, PropTypesClassifier};
use vmc_checker::type_model::{EnumValue, TypeDescription};
use vmc_common::limits::{MAX_SHAPE_DEPTH, MAX_SHAPE_EXPANSIONS};
use vmc_parser::parser::{NodeArena, NodeIndex, ParserState};

/// Classify the right-hand side of the last statement of `source`, which
/// must be an assignment.
fn classify(source: &str) -> ClassifiedTree {
    let mut parser = ParserState::new("test.jsx".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    let arena = parser.into_arena();

    let mut binder = BinderState::new();
    binder.bind_source_file(&arena, root);

    let value = last_assignment_value(&arena, root);
    PropTypesClassifier::new(&arena, &binder, "propTypes").classify(value)
}

fn last_assignment_value(arena: &NodeArena, root: NodeIndex) -> NodeIndex {
    let statement = *arena
        .get_source_file_at(root)
        .unwrap()
        .statements
        .nodes
        .last()
        .unwrap();
    let expression = arena
        .get_expression_statement(arena.get(statement).unwrap())
        .unwrap()
        .expression;
    arena
        .get_binary_expr(arena.get(expression).unwrap())
        .unwrap()
        .right
}

fn invalid_kind(tree: &ClassifiedTree, key: &str) -> ContractDiagnosticKind {
    match &tree[key].entry {
        Classified::Invalid(kind) => *kind,
        other => panic!("expected {key} to be invalid, got {other:?}"),
    }
}

fn valid_type<'a>(tree: &'a ClassifiedTree, key: &str) -> &'a TypeDescription {
    match &tree[key].entry {
        Classified::Valid(ty) => ty,
        other => panic!("expected {key} to be valid, got {other:?}"),
    }
}

#[test]
fn test_primitives_are_valid() {
    let tree = classify(
        "A.propTypes = { a: PropTypes.any, b: PropTypes.bool, c: PropTypes.element, d: PropTypes.elementType, e: PropTypes.func, f: PropTypes.node, g: PropTypes.number, h: PropTypes.string, i: PropTypes.symbol };",
    );
    assert_eq!(tree.len(), 9);
    assert_eq!(valid_type(&tree, "d"), &TypeDescription::Primitive("elementType".to_string()));
    assert_eq!(valid_type(&tree, "h"), &TypeDescription::Primitive("string".to_string()));
    assert!(tree.values().all(|p| matches!(p.entry, Classified::Valid(_))));
}

#[test]
fn test_is_required_is_stripped() {
    let tree = classify("A.propTypes = { a: PropTypes.string.isRequired, b: (PropTypes.object).isRequired, c: PropTypes.bool };");
    assert!(tree["a"].required);
    assert_eq!(valid_type(&tree, "a"), &TypeDescription::Primitive("string".to_string()));
    assert!(tree["b"].required);
    assert_eq!(invalid_kind(&tree, "b"), ContractDiagnosticKind::Object);
    assert!(!tree["c"].required);
}

#[test]
fn test_untyped_containers_are_invalid() {
    let tree = classify(
        "A.propTypes = { a: PropTypes.object, b: PropTypes.array, c: PropTypes.oneOfType([PropTypes.string, PropTypes.number]) };",
    );
    assert_eq!(invalid_kind(&tree, "a"), ContractDiagnosticKind::Object);
    assert_eq!(invalid_kind(&tree, "b"), ContractDiagnosticKind::Array);
    assert_eq!(invalid_kind(&tree, "c"), ContractDiagnosticKind::OneOfType);
}

#[test]
fn test_unknown_calls_are_illegal_function_calls() {
    let tree = classify(
        "A.propTypes = { a: PropTypes.instanceOf(Date), b: PropTypes.objectOf(PropTypes.string), c: customValidator(), d: (props) => null, e: function () {}, f: PropTypes.arrayOf() };",
    );
    for key in ["a", "b", "c", "d", "e", "f"] {
        assert_eq!(invalid_kind(&tree, key), ContractDiagnosticKind::IllegalFunctionCall, "{key}");
    }
}

#[test]
fn test_identifiers_and_literals_are_illegal_identifiers() {
    let tree = classify("A.propTypes = { a: someIdentifier, b: 42, c: \"string\", d: null };");
    for key in ["a", "b", "c", "d"] {
        assert_eq!(invalid_kind(&tree, key), ContractDiagnosticKind::IllegalIdentifier, "{key}");
    }
}

#[test]
fn test_array_of_is_transparent() {
    let tree = classify(
        "A.propTypes = { a: PropTypes.arrayOf(PropTypes.string), b: PropTypes.arrayOf(PropTypes.object), c: PropTypes.arrayOf(PropTypes.arrayOf(PropTypes.shape({ d: PropTypes.number }))) };",
    );
    assert_eq!(
        valid_type(&tree, "a"),
        &TypeDescription::ArrayOf(Box::new(TypeDescription::Primitive("string".to_string())))
    );
    assert_eq!(invalid_kind(&tree, "b"), ContractDiagnosticKind::Object);
    match &tree["c"].entry {
        Classified::Nested { tree, array_depth } => {
            assert_eq!(*array_depth, 2);
            assert!(matches!(tree["d"].entry, Classified::Valid(_)));
        }
        other => panic!("expected nested, got {other:?}"),
    }
}

#[test]
fn test_one_of_sources() {
    let source = r#"
        import imported from "./values";
        const local = ["x", "y"];
        const obj = { small: 1, large: 2 };
        A.propTypes = {
            inline: PropTypes.oneOf(["a", -1, true, null]),
            array: PropTypes.oneOf(local),
            imported: PropTypes.oneOf(imported),
            object: PropTypes.oneOf(obj),
            missing: PropTypes.oneOf(nowhere),
            empty: PropTypes.oneOf(),
            member: PropTypes.oneOf(Sizes.all),
            call: PropTypes.oneOf(getValues()),
        };
    "#;
    let tree = classify(source);
    assert_eq!(
        valid_type(&tree, "inline"),
        &TypeDescription::Enum(vec![
            EnumValue::String("a".to_string()),
            EnumValue::Number(-1.0),
            EnumValue::Bool(true),
            EnumValue::Null,
        ])
    );
    assert_eq!(
        valid_type(&tree, "array"),
        &TypeDescription::Enum(vec![
            EnumValue::String("x".to_string()),
            EnumValue::String("y".to_string()),
        ])
    );
    assert_eq!(invalid_kind(&tree, "imported"), ContractDiagnosticKind::ImportedArrayReference);
    assert_eq!(invalid_kind(&tree, "object"), ContractDiagnosticKind::IllegalReference);
    assert_eq!(invalid_kind(&tree, "missing"), ContractDiagnosticKind::MissingObjectReference);
    assert_eq!(invalid_kind(&tree, "empty"), ContractDiagnosticKind::MissingObjectReference);
    assert_eq!(invalid_kind(&tree, "member"), ContractDiagnosticKind::IllegalReference);
    assert_eq!(invalid_kind(&tree, "call"), ContractDiagnosticKind::IllegalFunctionCall);
}

#[test]
fn test_one_of_object_keys_and_values() {
    let source = r##"
        import * as imported from "./colors";
        const COLORS = { red: "#f00", green: "#0f0" };
        const list = [1];
        A.propTypes = {
            keys: PropTypes.oneOf(Object.keys(COLORS)),
            values: PropTypes.oneOf(Object.values(COLORS)),
            inline: PropTypes.oneOf(Object.keys({ a: 1, b: 2 })),
            imported: PropTypes.oneOf(Object.keys(imported)),
            array: PropTypes.oneOf(Object.values(list)),
            missing: PropTypes.oneOf(Object.keys(nowhere)),
            empty: PropTypes.oneOf(Object.values()),
            other: PropTypes.oneOf(Object.entries(COLORS)),
        };
    "##;
    let tree = classify(source);
    assert_eq!(
        valid_type(&tree, "keys"),
        &TypeDescription::Enum(vec![
            EnumValue::String("red".to_string()),
            EnumValue::String("green".to_string()),
        ])
    );
    assert_eq!(
        valid_type(&tree, "values"),
        &TypeDescription::Enum(vec![
            EnumValue::String("#f00".to_string()),
            EnumValue::String("#0f0".to_string()),
        ])
    );
    assert_eq!(
        valid_type(&tree, "inline"),
        &TypeDescription::Enum(vec![
            EnumValue::String("a".to_string()),
            EnumValue::String("b".to_string()),
        ])
    );
    assert_eq!(invalid_kind(&tree, "imported"), ContractDiagnosticKind::ImportedObjectReference);
    assert_eq!(invalid_kind(&tree, "array"), ContractDiagnosticKind::IllegalReference);
    assert_eq!(invalid_kind(&tree, "missing"), ContractDiagnosticKind::MissingObjectReference);
    assert_eq!(invalid_kind(&tree, "empty"), ContractDiagnosticKind::MissingObjectReference);
    assert_eq!(invalid_kind(&tree, "other"), ContractDiagnosticKind::IllegalFunctionCall);
}

#[test]
fn test_shape_sources() {
    let source = r#"
        import Imported from "./shapes";
        const local = { x: PropTypes.number, y: PropTypes.object };
        const list = [];
        A.propTypes = {
            inline: PropTypes.shape({ x: PropTypes.number }),
            exact: PropTypes.exact({ x: PropTypes.number }),
            empty: PropTypes.shape(),
            reference: PropTypes.shape(Other.propTypes),
            member: PropTypes.shape(Other.defaults),
            local: PropTypes.shape(local),
            imported: PropTypes.shape(Imported),
            array: PropTypes.shape(list),
            missing: PropTypes.shape(nowhere),
            call: PropTypes.shape(makeShape()),
        };
    "#;
    let tree = classify(source);
    assert!(matches!(tree["inline"].entry, Classified::Nested { array_depth: 0, .. }));
    assert!(matches!(tree["exact"].entry, Classified::Nested { .. }));
    assert!(matches!(tree["empty"].entry, Classified::Valid(TypeDescription::Shape(_))));
    assert_eq!(
        valid_type(&tree, "reference"),
        &TypeDescription::ShapeOf("Other".to_string())
    );
    assert_eq!(invalid_kind(&tree, "member"), ContractDiagnosticKind::IllegalReference);
    match &tree["local"].entry {
        Classified::Nested { tree, .. } => {
            assert!(matches!(tree["x"].entry, Classified::Valid(_)));
            assert_eq!(invalid_kind(tree, "y"), ContractDiagnosticKind::Object);
        }
        other => panic!("expected nested, got {other:?}"),
    }
    assert_eq!(invalid_kind(&tree, "imported"), ContractDiagnosticKind::ImportedObjectReference);
    assert_eq!(invalid_kind(&tree, "array"), ContractDiagnosticKind::IllegalReference);
    assert_eq!(invalid_kind(&tree, "missing"), ContractDiagnosticKind::MissingObjectReference);
    assert_eq!(invalid_kind(&tree, "call"), ContractDiagnosticKind::IllegalFunctionCall);
}

/// Number of `Nested` entries in `tree`, recursively.
fn count_nested(tree: &ClassifiedTree) -> u32 {
    tree.values()
        .map(|property| match &property.entry {
            Classified::Nested { tree, .. } => 1 + count_nested(tree),
            _ => 0,
        })
        .sum()
}

fn any_invalid(tree: &ClassifiedTree, expected: ContractDiagnosticKind) -> bool {
    tree.values().any(|property| match &property.entry {
        Classified::Nested { tree, .. } => any_invalid(tree, expected),
        Classified::Invalid(kind) => *kind == expected,
        Classified::Valid(_) => false,
    })
}

#[test]
fn test_self_referencing_shape_is_illegal_reference() {
    let tree = classify("const node = { child: PropTypes.shape(node) };\nA.propTypes = { root: PropTypes.shape(node) };");
    assert_eq!(invalid_kind(&tree, "root"), ContractDiagnosticKind::IllegalReference);
}

#[test]
fn test_branching_self_reference_does_not_expand() {
    let tree = classify(
        "const s = { a: PropTypes.shape(s), b: PropTypes.shape(s) };\nA.propTypes = { b: PropTypes.shape(s) };",
    );
    assert_eq!(tree.len(), 1);
    assert_eq!(invalid_kind(&tree, "b"), ContractDiagnosticKind::IllegalReference);
}

#[test]
fn test_mutually_referencing_shapes_are_illegal_reference() {
    let tree = classify(
        "const t = { back: PropTypes.shape(s) };\nconst s = { next: PropTypes.shape(t), name: PropTypes.string };\nA.propTypes = { root: PropTypes.shape(s) };",
    );
    assert_eq!(invalid_kind(&tree, "root"), ContractDiagnosticKind::IllegalReference);
}

#[test]
fn test_shape_shared_by_siblings_is_not_a_cycle() {
    let tree = classify(
        "const point = { x: PropTypes.number };\nconst line = { from: PropTypes.shape(point), to: PropTypes.shape(point) };\nA.propTypes = { a: PropTypes.shape(line), b: PropTypes.shape(point) };",
    );
    assert_eq!(count_nested(&tree), 4);
    assert!(!any_invalid(&tree, ContractDiagnosticKind::IllegalReference));
}

#[test]
fn test_shape_chain_stops_at_depth_limit() {
    let links = MAX_SHAPE_DEPTH + 1;
    let mut source = String::from("const s0 = { leaf: PropTypes.string };\n");
    for i in 1..=links {
        source.push_str(&format!("const s{i} = {{ child: PropTypes.shape(s{}) }};\n", i - 1));
    }
    source.push_str(&format!("A.propTypes = {{ root: PropTypes.shape(s{links}) }};"));
    let tree = classify(&source);

    let mut depth = 0;
    let mut current = &tree["root"].entry;
    loop {
        match current {
            Classified::Nested { tree, .. } => {
                depth += 1;
                current = &tree["child"].entry;
            }
            Classified::Invalid(kind) => {
                assert_eq!(*kind, ContractDiagnosticKind::IllegalFunctionCall);
                break;
            }
            Classified::Valid(ty) => panic!("unexpected valid entry {ty:?}"),
        }
    }
    assert_eq!(depth, MAX_SHAPE_DEPTH);
}

#[test]
fn test_doubling_shape_chain_is_bounded() {
    // Fully expanded, this declares 2^21 - 1 shapes
    let mut source = String::from("const s0 = { v: PropTypes.string };\n");
    for i in 1..=20 {
        let prev = i - 1;
        source.push_str(&format!(
            "const s{i} = {{ l: PropTypes.shape(s{prev}), r: PropTypes.shape(s{prev}) }};\n"
        ));
    }
    source.push_str("A.propTypes = { root: PropTypes.shape(s20) };");
    let tree = classify(&source);

    assert_eq!(count_nested(&tree), MAX_SHAPE_EXPANSIONS);
    assert!(any_invalid(&tree, ContractDiagnosticKind::IllegalFunctionCall));
}

#[test]
fn test_only_static_keys_are_classified() {
    let tree = classify(
        "const key = \"k\";\nA.propTypes = { plain: PropTypes.string, \"quoted-key\": PropTypes.bool, 3: PropTypes.number, [key]: PropTypes.object, ...Base.propTypes };",
    );
    let keys: Vec<&str> = tree.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["plain", "quoted-key", "3"]);
}

#[test]
fn test_non_object_prop_types_declare_nothing() {
    assert!(classify("A.propTypes = B.propTypes;").is_empty());
    assert!(classify("A.propTypes = false;").is_empty());
    assert_eq!(classify("A.propTypes = ({ a: PropTypes.string });").len(), 1);
}

#[test]
fn test_duplicate_keys_keep_last_declaration() {
    let tree = classify("A.propTypes = { a: PropTypes.object, a: PropTypes.string };");
    assert_eq!(tree.len(), 1);
    assert_eq!(valid_type(&tree, "a"), &TypeDescription::Primitive("string".to_string()));
}
