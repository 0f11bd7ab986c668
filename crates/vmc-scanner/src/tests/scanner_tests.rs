//! Tests for scanner.rs

use crate::{ScannerState, SyntaxKind};
use vmc_common::diagnostics::diagnostic_codes;

fn kinds(source: &str) -> Vec<SyntaxKind> {
    let mut scanner = ScannerState::new(source.to_string());
    let mut out = Vec::new();
    loop {
        let kind = scanner.scan();
        out.push(kind);
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
    }
    out
}

#[test]
fn test_scan_prop_types_assignment() {
    use SyntaxKind::*;
    assert_eq!(
        kinds("A.propTypes = { b: PropTypes.object };"),
        vec![
            Identifier,
            DotToken,
            Identifier,
            EqualsToken,
            OpenBraceToken,
            Identifier,
            ColonToken,
            Identifier,
            DotToken,
            Identifier,
            CloseBraceToken,
            SemicolonToken,
            EndOfFileToken,
        ]
    );
}

#[test]
fn test_scan_keywords_and_operators() {
    use SyntaxKind::*;
    assert_eq!(
        kinds("export default class A extends B {} x ?? y?.z => ..."),
        vec![
            ExportKeyword,
            DefaultKeyword,
            ClassKeyword,
            Identifier,
            ExtendsKeyword,
            Identifier,
            OpenBraceToken,
            CloseBraceToken,
            Identifier,
            QuestionQuestionToken,
            Identifier,
            QuestionDotToken,
            Identifier,
            EqualsGreaterThanToken,
            DotDotDotToken,
            EndOfFileToken,
        ]
    );
}

#[test]
fn test_string_escapes_are_cooked() {
    let mut scanner = ScannerState::new(r#"'it\'s' "a\nb" "A\x42\u{43}""#.to_string());
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "it's");
    assert_eq!(scanner.token_text(), r"'it\'s'");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "a\nb");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "ABC");
    assert!(scanner.diagnostics().is_empty());
}

#[test]
fn test_unterminated_string_reports_diagnostic() {
    let mut scanner = ScannerState::new("'abc\nnext".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "abc");
    assert_eq!(scanner.diagnostics().len(), 1);
    assert_eq!(
        scanner.diagnostics()[0].message.code,
        diagnostic_codes::UNTERMINATED_STRING_LITERAL
    );
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_line_breaks_through_comments() {
    let mut scanner = ScannerState::new("a /* x\n */ b // c\n d e".to_string());
    scanner.scan();
    assert!(!scanner.has_preceding_line_break());
    scanner.scan();
    assert_eq!(scanner.token_value(), "b");
    assert!(scanner.has_preceding_line_break());
    scanner.scan();
    assert_eq!(scanner.token_value(), "d");
    assert!(scanner.has_preceding_line_break());
    scanner.scan();
    assert_eq!(scanner.token_value(), "e");
    assert!(!scanner.has_preceding_line_break());
}

#[test]
fn test_numeric_literals() {
    use SyntaxKind::*;
    let mut scanner = ScannerState::new("0x1F 1_000 .5 1e3 10n".to_string());
    let mut seen = Vec::new();
    while scanner.scan() != EndOfFileToken {
        seen.push((scanner.token(), scanner.token_value().to_string()));
    }
    assert_eq!(
        seen,
        vec![
            (NumericLiteral, "0x1F".to_string()),
            (NumericLiteral, "1_000".to_string()),
            (NumericLiteral, ".5".to_string()),
            (NumericLiteral, "1e3".to_string()),
            (BigIntLiteral, "10n".to_string()),
        ]
    );
}

#[test]
fn test_template_literals() {
    let mut scanner = ScannerState::new("`plain` `a ${ {b: 1}.b } c`".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::NoSubstitutionTemplateLiteral);
    assert_eq!(scanner.token_value(), "plain");
    assert_eq!(scanner.scan(), SyntaxKind::TemplateLiteral);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_re_scan_slash_as_regex() {
    let mut scanner = ScannerState::new("/ab+c/gi;".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(
        scanner.re_scan_slash_token(),
        SyntaxKind::RegularExpressionLiteral
    );
    assert_eq!(scanner.token_value(), "/ab+c/gi");
    assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
}

#[test]
fn test_skip_balanced_function_body_with_jsx() {
    let body = r#"{ const s = "}"; if (a) { return <div className="x">Don't {b}</div>; } }"#;
    let scanner = ScannerState::new(format!("{body} after"));
    assert_eq!(scanner.skip_balanced(0), Some(body.len()));
}

#[test]
fn test_skip_balanced_regex_and_division() {
    let regex_body = "{ const r = /[}]/g; }";
    let scanner = ScannerState::new(regex_body.to_string());
    assert_eq!(scanner.skip_balanced(0), Some(regex_body.len()));

    let division_body = "{ a / b / c }";
    let scanner = ScannerState::new(division_body.to_string());
    assert_eq!(scanner.skip_balanced(0), Some(division_body.len()));
}

#[test]
fn test_skip_balanced_unclosed_group() {
    let scanner = ScannerState::new("{ a: [1, 2 }".to_string());
    assert_eq!(scanner.skip_balanced(0), None);
    let scanner = ScannerState::new("( a, b".to_string());
    assert_eq!(scanner.skip_balanced(0), None);
}

#[test]
fn test_skip_jsx_self_closing_and_fragment() {
    let source = r#"<A.B prop={() => {}} other="x" />rest"#;
    let scanner = ScannerState::new(source.to_string());
    assert_eq!(scanner.skip_jsx_element(0), source.find("rest"));

    let fragment = "<><p>hi</p></>";
    let scanner = ScannerState::new(fragment.to_string());
    assert_eq!(scanner.skip_jsx_element(0), Some(fragment.len()));
}

#[test]
fn test_invalid_character() {
    let mut scanner = ScannerState::new("a \u{7f} b".to_string());
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(
        scanner.diagnostics()[0].message.code,
        diagnostic_codes::INVALID_CHARACTER
    );
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
}

#[test]
fn test_byte_order_mark_is_skipped() {
    let mut scanner = ScannerState::new("\u{FEFF}A".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_start(), 3);
}
