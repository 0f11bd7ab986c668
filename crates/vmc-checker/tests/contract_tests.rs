//! Contract checks over whole modules, in both the assignment and the class
//! form of a component.

use vmc_binder::BinderState;
use vmc_checker::{CheckerOptions, ContractChecker};
use vmc_common::Diagnostic;
use vmc_common::diagnostics::diagnostic_codes;
use vmc_parser::parser::ParserState;

const FOOTER: &str = "export default A;";

fn diagnostics_with_options(file_name: &str, source: &str, options: CheckerOptions) -> Vec<Diagnostic> {
    let mut parser = ParserState::new(file_name.to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected parse errors for {source:?}: {:?}",
        parser.get_diagnostics()
    );

    let mut binder = BinderState::new();
    binder.bind_source_file(parser.get_arena(), root);

    let mut checker = ContractChecker::new(
        parser.get_arena(),
        &binder,
        file_name.to_string(),
        options,
    );
    checker.check_source_file(root);
    checker.to_diagnostics()
}

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    diagnostics_with_options("a.jsx", source, CheckerOptions::default())
}

fn codes(source: &str) -> Vec<u32> {
    diagnostics(source).iter().map(|d| d.code).collect()
}

fn with_footer(source: &str) -> String {
    format!("{source}\n{FOOTER}")
}

/// Text covered by a diagnostic.
fn span_text<'a>(source: &'a str, diag: &Diagnostic) -> &'a str {
    &source[diag.start as usize..(diag.start + diag.length) as usize]
}

const VALID_CASES: &[&str] = &[
    // Only the export statement
    "",
    "A.propTypes = {};",
    // propTypes that is not an object literal
    "A.propTypes = B.propTypes;",
    "A.propTypes = false;",
    "A.viewModelMeta = {};",
    // Declared without a value
    "A.viewModelMeta;",
    "class A { static viewModelMeta }",
    "A.viewModelMeta = false;",
    "class A { static propTypes = B.propTypes; }",
    // Whole component ignored
    r#"A.propTypes = { b: PropTypes.object }; A.viewModelMeta = "ignore";"#,
    r#"class A { static propTypes = { b: PropTypes.object }; static viewModelMeta = "ignore"; }"#,
    // Invalid property types replaced by an override
    r#"A.propTypes = { b: PropTypes.object }; A.viewModelMeta = { b: "ignore" };"#,
    r#"class A { static propTypes = { b: PropTypes.object }; static viewModelMeta = { b: "ignore" };}"#,
    r#"A.propTypes = { b: PropTypes.object.isRequired }; A.viewModelMeta = { b: "ignore" };"#,
    r#"class A { static propTypes = { b: PropTypes.object.isRequired }; static viewModelMeta = { b: "ignore" }; }"#,
    r#"A.propTypes = { b: PropTypes.array }; A.viewModelMeta = { b: "ignore" };"#,
    r#"class A { static propTypes = { b: PropTypes.array }; static viewModelMeta = { b: "ignore" }; }"#,
    r#"A.propTypes = { b: PropTypes.oneOfType() }; A.viewModelMeta = { b: "ignore" };"#,
    r#"class A { static propTypes = { b: PropTypes.oneOfType() }; static viewModelMeta = { b: "ignore" }; }"#,
    r#"A.propTypes = { b: someFunc() }; A.viewModelMeta = { b: "ignore" };"#,
    r#"class A { static propTypes = { b: someFunc() }; static viewModelMeta = { b: "ignore" }; }"#,
    // Override values
    "A.viewModelMeta = { b: B };",
    "A.viewModelMeta = { b: [B] };",
    "class A { static viewModelMeta = { b: [B] }; }",
    r#"A.viewModelMeta = { b: "ignore" };"#,
    r#"class A { static viewModelMeta = { b: "ignore" }; }"#,
    "A.viewModelMeta = {
        b: 'int',
        c: 'int?',
        d: 'float',
        e: 'float?',
        f: 'double',
        g: 'double?'
    };",
    "class A {
        static viewModelMeta = {
            b: 'int',
            c: 'int?',
            d: 'float',
            e: 'float?',
            f: 'double',
            g: 'double?'
        };
    }",
    // Nested overrides
    "A.propTypes = { b: PropTypes.object }; A.viewModelMeta = { b: { c: Link } };",
    "A.propTypes = { b: PropTypes.shape() };",
    "A.propTypes = { b: PropTypes.shape({ c: PropTypes.object }) }; A.viewModelMeta = { b: { c: Link } };",
    // Enumerated values from local sources
    r#"const obj = { c: "d" }; A.propTypes = { c: PropTypes.oneOf(Object.keys(obj)) };"#,
    r#"const obj = { c: "d" }; A.propTypes = { c: PropTypes.oneOf(Object.values(obj)) };"#,
    "A.propTypes = { b: PropTypes.shape(C.propTypes) };",
    "const arr = [1,2]; A.propTypes = { c: PropTypes.oneOf(arr) };",
];

#[test]
fn test_valid_components_have_no_diagnostics() {
    for case in VALID_CASES {
        let source = with_footer(case);
        let diags = diagnostics(&source);
        assert!(diags.is_empty(), "expected no diagnostics for {source:?}, got {diags:?}");
    }
}

#[test]
fn test_invalid_components_report_expected_codes() {
    use diagnostic_codes::*;
    let cases: &[(&str, &[u32])] = &[
        (r#"A.viewModelMeta = "igno";"#, &[BAD_IGNORE]),
        ("A.propTypes = { b: PropTypes.object };", &[OBJECT]),
        ("class A { static propTypes = { b: PropTypes.object };}", &[OBJECT]),
        ("A.propTypes = { b: PropTypes.array };", &[ARRAY]),
        ("class A { static propTypes = { b: PropTypes.array }; }", &[ARRAY]),
        ("A.propTypes = { b: PropTypes.object.isRequired };", &[OBJECT]),
        ("A.propTypes = { b: PropTypes.arrayOf(PropTypes.object) };", &[OBJECT]),
        ("class A { static propTypes = { b: PropTypes.object.isRequired }; }", &[OBJECT]),
        ("A.propTypes = { b: PropTypes.oneOfType() };", &[ONE_OF_TYPE]),
        ("class A { static propTypes = { b: PropTypes.oneOfType() }; }", &[ONE_OF_TYPE]),
        ("A.propTypes = { a: PropTypes.string };", &[PROP_NAME_COLLISION]),
        ("class A { static propTypes = { a: PropTypes.string }; }", &[PROP_NAME_COLLISION]),
        ("A.propTypes = { b: someFunc() };", &[ILLEGAL_FUNCTION_CALL]),
        ("class A { static propTypes = { b: someFunc() }; }", &[ILLEGAL_FUNCTION_CALL]),
        ("class A { static propTypes = { b: someIdentifier }; }", &[ILLEGAL_IDENTIFIER]),
        ("A.propTypes = { b: PropTypes.shape({ c: PropTypes.object }) };", &[OBJECT]),
        (r#"A.viewModelMeta = { b: "igno" };"#, &[BAD_STRING_LITERAL]),
        ("A.viewModelMeta = { b: someFunc(B) };", &[BAD_META]),
        (r#"A.viewModelMeta = { b: ["abcdefg"] };"#, &[BAD_STRING_LITERAL]),
        (
            r#"import obj from "./obj"; A.propTypes = { c: PropTypes.oneOf(Object.keys(obj)) };"#,
            &[IMPORTED_OBJECT_REFERENCE],
        ),
        (
            r#"import obj from "./obj"; A.propTypes = { c: PropTypes.oneOf(Object.values(obj)) };"#,
            &[IMPORTED_OBJECT_REFERENCE],
        ),
        (
            "const arr = [1,2]; A.propTypes = { c: PropTypes.oneOf(Object.values()) };",
            &[MISSING_OBJECT_REFERENCE],
        ),
        (
            r#"import arr from "./arr"; A.propTypes = { c: PropTypes.oneOf(arr) };"#,
            &[IMPORTED_ARRAY_REFERENCE],
        ),
        (
            "A.propTypes = { b: PropTypes.shape(Something.somethingElse) };",
            &[ILLEGAL_REFERENCE],
        ),
        (
            "A.propTypes = { b: PropTypes.exact(Something.somethingElse) };",
            &[ILLEGAL_REFERENCE],
        ),
    ];

    for (case, expected) in cases {
        let source = with_footer(case);
        assert_eq!(codes(&source), *expected, "for {source:?}");
    }
}

#[test]
fn test_export_count_diagnostics() {
    assert_eq!(codes("const A = () => {};"), vec![diagnostic_codes::NO_EXPORT]);
    assert_eq!(
        codes("const A = {}, B = {}; export { A, B };"),
        vec![diagnostic_codes::TOO_MANY_EXPORTS; 2]
    );
    assert_eq!(
        codes("const A = {}, B = {}, C = {}; export default A; export { B, C };"),
        vec![diagnostic_codes::TOO_MANY_EXPORTS; 3]
    );
}

#[test]
fn test_no_export_targets_module_body() {
    let source = "const A = () => {};\n";
    let diags = diagnostics(source);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].start, 0);
    assert_eq!(diags[0].length as usize, source.len());
}

#[test]
fn test_too_many_exports_targets_each_specifier() {
    let source = "const A = {}, B = {}; export { A, B };";
    let diags = diagnostics(source);
    let spans: Vec<&str> = diags.iter().map(|d| span_text(source, d)).collect();
    assert_eq!(spans, vec!["A", "B"]);
}

#[test]
fn test_best_effort_checks_first_declared_component() {
    let source = "const A = {}, B = {};\nexport { A, B };\nA.propTypes = { a: PropTypes.object };";
    assert_eq!(
        codes(source),
        vec![
            diagnostic_codes::TOO_MANY_EXPORTS,
            diagnostic_codes::TOO_MANY_EXPORTS,
            // No collision check without a trusted component name
            diagnostic_codes::OBJECT,
        ]
    );

    let source = "A.propTypes = { b: PropTypes.array };";
    assert_eq!(
        codes(source),
        vec![diagnostic_codes::NO_EXPORT, diagnostic_codes::ARRAY]
    );
}

#[test]
fn test_bad_ignore_message_names_the_value() {
    let source = with_footer(r#"A.propTypes = { b: PropTypes.object }; A.viewModelMeta = "igno";"#);
    let diags = diagnostics(&source);
    assert_eq!(diags.len(), 1, "{diags:?}");
    assert_eq!(diags[0].code, diagnostic_codes::BAD_IGNORE);
    assert!(diags[0].message_text.contains("'igno'"));
    assert_eq!(span_text(&source, &diags[0]), r#""igno""#);
}

#[test]
fn test_property_diagnostic_targets_property_node() {
    let source = with_footer("A.propTypes = {\n  title: PropTypes.string,\n  style: PropTypes.object,\n};");
    let diags = diagnostics(&source);
    assert_eq!(diags.len(), 1);
    assert_eq!(span_text(&source, &diags[0]), "style: PropTypes.object");
}

#[test]
fn test_nested_diagnostic_targets_nested_property() {
    let source = with_footer("A.propTypes = { b: PropTypes.shape({ inner: PropTypes.array }) };");
    let diags = diagnostics(&source);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, diagnostic_codes::ARRAY);
    assert_eq!(span_text(&source, &diags[0]), "inner: PropTypes.array");
}

#[test]
fn test_name_collision_uses_normalized_names() {
    let source = "export class ProductCard {\n  static propTypes = { product_card: PropTypes.string, title: PropTypes.string };\n}";
    let diags = diagnostics(source);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, diagnostic_codes::PROP_NAME_COLLISION);
    assert_eq!(span_text(source, &diags[0]), "product_card");
    assert!(diags[0].message_text.contains("'product_card'"));
    assert!(diags[0].message_text.contains("'ProductCard'"));
}

#[test]
fn test_name_collision_reports_every_repeated_key() {
    let source = with_footer("A.propTypes = { a: PropTypes.string, a: PropTypes.bool };");
    let diags = diagnostics(&source);
    assert_eq!(
        diags.iter().map(|d| d.code).collect::<Vec<_>>(),
        vec![diagnostic_codes::PROP_NAME_COLLISION; 2]
    );
    assert_eq!(diags[0].start as usize, source.find("a: PropTypes.string").unwrap());
    assert_eq!(diags[1].start as usize, source.find("a: PropTypes.bool").unwrap());
}

#[test]
fn test_whole_component_ignore_keeps_export_checks() {
    assert_eq!(
        codes("A.propTypes = { b: PropTypes.object };\nA.viewModelMeta = \"ignore\";"),
        vec![diagnostic_codes::NO_EXPORT]
    );
    assert_eq!(
        codes("const B = 1;\nA.propTypes = { b: PropTypes.object };\nA.viewModelMeta = \"ignore\";\nexport { A, B };"),
        vec![diagnostic_codes::TOO_MANY_EXPORTS; 2]
    );
}

#[test]
fn test_cyclic_shape_is_reported_at_the_referencing_property() {
    let source = with_footer(
        "const s = { a: PropTypes.shape(s), b: PropTypes.shape(s) };\nA.propTypes = { b: PropTypes.shape(s) };",
    );
    let diags = diagnostics(&source);
    assert_eq!(diags.len(), 1, "{diags:?}");
    assert_eq!(diags[0].code, diagnostic_codes::ILLEGAL_REFERENCE);
    assert_eq!(diags[0].start as usize, source.rfind("b: PropTypes.shape(s)").unwrap());
    assert_eq!(span_text(&source, &diags[0]), "b: PropTypes.shape(s)");
}

#[test]
fn test_bad_string_literal_lists_vocabulary() {
    let source = with_footer(r#"A.viewModelMeta = { b: "integer" };"#);
    let diags = diagnostics(&source);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message_text.contains("'integer'"));
    assert!(diags[0].message_text.contains("'int'"));
    assert!(diags[0].message_text.contains("'double?'"));
}

#[test]
fn test_override_validation_is_independent_of_property_types() {
    // The bad override is reported even though `b` is valid
    let source = with_footer(r#"A.propTypes = { b: PropTypes.string }; A.viewModelMeta = { b: "igno", c: 1 };"#);
    assert_eq!(
        codes(&source),
        vec![diagnostic_codes::BAD_STRING_LITERAL, diagnostic_codes::BAD_META]
    );
}

#[test]
fn test_override_diagnostics_follow_property_diagnostics() {
    let source = with_footer(
        r#"A.propTypes = { b: PropTypes.object, c: PropTypes.array }; A.viewModelMeta = { c: "nope" };"#,
    );
    assert_eq!(
        codes(&source),
        vec![diagnostic_codes::OBJECT, diagnostic_codes::BAD_STRING_LITERAL]
    );
}

#[test]
fn test_nested_override_only_covers_its_keys() {
    let source = with_footer(
        "A.propTypes = { b: PropTypes.shape({ c: PropTypes.object, d: PropTypes.array }) };\nA.viewModelMeta = { b: { c: Link } };",
    );
    assert_eq!(codes(&source), vec![diagnostic_codes::ARRAY]);
}

#[test]
fn test_leaf_override_suppresses_whole_shape() {
    let source = with_footer(
        r#"A.propTypes = { b: PropTypes.shape({ c: PropTypes.object, d: PropTypes.array }) }; A.viewModelMeta = { b: "ignore" };"#,
    );
    assert!(codes(&source).is_empty());
}

#[test]
fn test_prop_types_import_aliases_are_recognized() {
    let source = with_footer(
        "import PT from \"prop-types\";\nimport * as Types from \"prop-types\";\nA.propTypes = { b: PT.string, c: Types.bool, d: PT.object };",
    );
    assert_eq!(codes(&source), vec![diagnostic_codes::OBJECT]);
}

#[test]
fn test_unknown_namespace_member_is_illegal_reference() {
    let source = with_footer("A.propTypes = { b: Types.string, c: PropTypes.integer };");
    assert_eq!(
        codes(&source),
        vec![
            diagnostic_codes::ILLEGAL_REFERENCE,
            diagnostic_codes::ILLEGAL_REFERENCE
        ]
    );
}

#[test]
fn test_static_assignment_after_class_wins() {
    let source = with_footer(
        "class A { static propTypes = { b: PropTypes.object }; }\nA.propTypes = { b: PropTypes.string };",
    );
    assert!(codes(&source).is_empty());
}

#[test]
fn test_component_declared_by_exported_class() {
    let source = "export default class Card {\n  static propTypes = { b: PropTypes.object };\n}";
    assert_eq!(codes(source), vec![diagnostic_codes::OBJECT]);
}

#[test]
fn test_component_declared_by_class_expression() {
    let source = "const A = class { static propTypes = { a: PropTypes.bool }; };\nexport default A;";
    assert_eq!(codes(source), vec![diagnostic_codes::PROP_NAME_COLLISION]);
}

#[test]
fn test_custom_field_names() {
    let options = CheckerOptions {
        prop_types_field: "props".to_string(),
        meta_field: "meta".to_string(),
    };
    let source = with_footer(
        r#"A.props = { b: PropTypes.object, c: PropTypes.shape(B.props) }; A.meta = { b: "ignore" }; A.propTypes = { d: PropTypes.array };"#,
    );
    let diags = diagnostics_with_options("a.jsx", &source, options);
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn test_diagnostics_carry_file_name() {
    let diags = diagnostics_with_options(
        "src/Button.jsx",
        &with_footer("A.propTypes = { b: PropTypes.object };"),
        CheckerOptions::default(),
    );
    assert_eq!(diags[0].file, "src/Button.jsx");
}
