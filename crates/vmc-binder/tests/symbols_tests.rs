//! Tests for module-scope symbol binding.

use vmc_binder::{BinderState, symbol_flags};
use vmc_parser::parser::{NodeArena, NodeKind, ParserState};

fn bind(source: &str) -> (NodeArena, BinderState) {
    let mut parser = ParserState::new("test.jsx".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    let arena = parser.into_arena();
    let mut binder = BinderState::new();
    binder.bind_source_file(&arena, root);
    (arena, binder)
}

#[test]
fn test_binds_variables_with_initializers() {
    let (arena, binder) = bind("const COLORS = { red: 1 };\nlet sizes = ['s', 'm'];\nvar n;");

    let colors = binder.lookup("COLORS").expect("COLORS");
    assert!(colors.has_flags(symbol_flags::VARIABLE));
    assert!(colors.has_flags(symbol_flags::CONST));
    assert!(matches!(
        arena.kind(colors.initializer),
        Some(NodeKind::ObjectLiteralExpression(_))
    ));

    let sizes = binder.lookup("sizes").expect("sizes");
    assert!(!sizes.has_flags(symbol_flags::CONST));
    assert!(matches!(
        arena.kind(sizes.initializer),
        Some(NodeKind::ArrayLiteralExpression(_))
    ));

    let n = binder.lookup("n").expect("n");
    assert!(n.initializer.is_none());
}

#[test]
fn test_binds_destructured_names_without_initializers() {
    let (_arena, binder) = bind("const { a, b: [c, d = 1], ...rest } = source;");
    for name in ["a", "c", "d", "rest"] {
        let symbol = binder.lookup(name).unwrap_or_else(|| panic!("missing {name}"));
        assert!(symbol.initializer.is_none());
    }
    assert!(binder.lookup("b").is_none());
}

#[test]
fn test_binds_classes_and_functions() {
    let (arena, binder) = bind(
        "class A extends React.Component {}\nfunction helper() {}\nasync function load() {}",
    );
    let a = binder.lookup("A").expect("A");
    assert!(a.has_flags(symbol_flags::CLASS));
    assert!(matches!(
        arena.kind(a.value_declaration),
        Some(NodeKind::ClassDeclaration(_))
    ));
    assert!(binder.lookup("helper").unwrap().has_flags(symbol_flags::FUNCTION));
    assert!(binder.lookup("load").unwrap().has_flags(symbol_flags::FUNCTION));
}

#[test]
fn test_binds_imports_with_module_and_name() {
    let (_arena, binder) = bind(
        "import React, { Component as Base } from 'react';\n\
         import * as utils from './utils';\n\
         import obj from './obj';",
    );

    let react = binder.lookup("React").expect("React");
    assert!(react.has_flags(symbol_flags::ALIAS));
    assert_eq!(react.import_module.as_deref(), Some("react"));
    assert_eq!(react.import_name.as_deref(), Some("default"));

    let base = binder.lookup("Base").expect("Base");
    assert_eq!(base.import_name.as_deref(), Some("Component"));
    assert!(binder.lookup("Component").is_none());

    let utils = binder.lookup("utils").expect("utils");
    assert_eq!(utils.import_name.as_deref(), Some("*"));
    assert_eq!(utils.import_module.as_deref(), Some("./utils"));

    assert_eq!(
        binder.lookup("obj").and_then(|s| s.import_module.as_deref()),
        Some("./obj")
    );
}

#[test]
fn test_records_prop_types_aliases() {
    let (_arena, binder) = bind(
        "import PT from 'prop-types';\n\
         import * as types from \"prop-types\";\n\
         import { shape } from 'prop-types';\n\
         import Other from 'other-prop-types';",
    );
    assert!(binder.is_prop_types_alias("PT"));
    assert!(binder.is_prop_types_alias("types"));
    assert!(!binder.is_prop_types_alias("shape"));
    assert!(!binder.is_prop_types_alias("Other"));

    let mut aliases: Vec<&str> = binder.prop_types_aliases().collect();
    aliases.sort_unstable();
    assert_eq!(aliases, vec!["PT", "types"]);
}

#[test]
fn test_first_declaration_wins() {
    let (arena, binder) = bind("var x = {};\nvar x = [];");
    let x = binder.lookup("x").expect("x");
    assert!(matches!(
        arena.kind(x.initializer),
        Some(NodeKind::ObjectLiteralExpression(_))
    ));
    assert_eq!(binder.symbols.len(), 1);
}

#[test]
fn test_nested_declarations_are_not_bound() {
    let (_arena, binder) = bind(
        "function f() { const inner = {}; }\nif (x) { var hidden = 1; }\nconst outer = () => { let y; };",
    );
    assert!(binder.lookup("inner").is_none());
    assert!(binder.lookup("hidden").is_none());
    assert!(binder.lookup("y").is_none());
    assert!(binder.lookup("outer").is_some());
}
