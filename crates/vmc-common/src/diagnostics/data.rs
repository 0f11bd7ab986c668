//! Diagnostic message table.
//!
//! Keep `diagnostic_codes`, `diagnostic_messages` and `DIAGNOSTIC_MESSAGES` in sync.

use super::DiagnosticMessage;

pub mod diagnostic_codes {
    // Parser
    pub const INVALID_CHARACTER: u32 = 1001;
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1003;
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: u32 = 1004;
    pub const TOKEN_EXPECTED: u32 = 1005;
    pub const IDENTIFIER_EXPECTED: u32 = 1006;
    pub const EXPRESSION_EXPECTED: u32 = 1007;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1008;
    pub const PROPERTY_ASSIGNMENT_EXPECTED: u32 = 1009;
    pub const UNTERMINATED_BLOCK: u32 = 1010;
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: u32 = 1011;
    pub const UNTERMINATED_COMMENT: u32 = 1012;

    // Module / export shape
    pub const NO_EXPORT: u32 = 9001;
    pub const TOO_MANY_EXPORTS: u32 = 9002;
    pub const PROP_NAME_COLLISION: u32 = 9003;
    pub const BAD_IGNORE: u32 = 9004;

    // Property types
    pub const OBJECT: u32 = 9101;
    pub const ARRAY: u32 = 9102;
    pub const ONE_OF_TYPE: u32 = 9103;
    pub const ILLEGAL_FUNCTION_CALL: u32 = 9104;
    pub const ILLEGAL_IDENTIFIER: u32 = 9105;
    pub const ILLEGAL_REFERENCE: u32 = 9106;
    pub const IMPORTED_OBJECT_REFERENCE: u32 = 9107;
    pub const IMPORTED_ARRAY_REFERENCE: u32 = 9108;
    pub const MISSING_OBJECT_REFERENCE: u32 = 9109;

    // Override metadata
    pub const BAD_STRING_LITERAL: u32 = 9201;
    pub const BAD_META: u32 = 9202;
}

pub mod diagnostic_messages {
    use super::super::{DiagnosticCategory, DiagnosticMessage};
    use super::diagnostic_codes as codes;

    const fn error(code: u32, message: &'static str) -> DiagnosticMessage {
        DiagnosticMessage {
            code,
            category: DiagnosticCategory::Error,
            message,
        }
    }

    pub const INVALID_CHARACTER: DiagnosticMessage =
        error(codes::INVALID_CHARACTER, "Invalid character.");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = error(
        codes::UNTERMINATED_STRING_LITERAL,
        "Unterminated string literal.",
    );
    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = error(
        codes::UNTERMINATED_TEMPLATE_LITERAL,
        "Unterminated template literal.",
    );
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: DiagnosticMessage = error(
        codes::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
        "Unterminated regular expression literal.",
    );
    pub const TOKEN_EXPECTED: DiagnosticMessage = error(codes::TOKEN_EXPECTED, "'{0}' expected.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage =
        error(codes::IDENTIFIER_EXPECTED, "Identifier expected.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage =
        error(codes::EXPRESSION_EXPECTED, "Expression expected.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = error(
        codes::DECLARATION_OR_STATEMENT_EXPECTED,
        "Declaration or statement expected.",
    );
    pub const PROPERTY_ASSIGNMENT_EXPECTED: DiagnosticMessage = error(
        codes::PROPERTY_ASSIGNMENT_EXPECTED,
        "Property assignment expected.",
    );
    pub const UNTERMINATED_BLOCK: DiagnosticMessage =
        error(codes::UNTERMINATED_BLOCK, "'{0}' was never closed.");
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: DiagnosticMessage = error(
        codes::MAXIMUM_NESTING_DEPTH_EXCEEDED,
        "Expression nesting is too deep.",
    );
    pub const UNTERMINATED_COMMENT: DiagnosticMessage =
        error(codes::UNTERMINATED_COMMENT, "'*/' expected.");

    pub const NO_EXPORT: DiagnosticMessage = error(
        codes::NO_EXPORT,
        "No exported component found. The module must export exactly one component.",
    );
    pub const TOO_MANY_EXPORTS: DiagnosticMessage = error(
        codes::TOO_MANY_EXPORTS,
        "Too many exports. The module must export exactly one component.",
    );
    pub const PROP_NAME_COLLISION: DiagnosticMessage = error(
        codes::PROP_NAME_COLLISION,
        "Property '{0}' has the same name as the component '{1}'. Rename the property.",
    );
    pub const BAD_IGNORE: DiagnosticMessage = error(
        codes::BAD_IGNORE,
        "Invalid value '{0}' for viewModelMeta. Use 'ignore' to skip the whole component.",
    );

    pub const OBJECT: DiagnosticMessage = error(
        codes::OBJECT,
        "'PropTypes.object' has no typed equivalent. Use 'PropTypes.shape' or add a viewModelMeta override.",
    );
    pub const ARRAY: DiagnosticMessage = error(
        codes::ARRAY,
        "'PropTypes.array' has no typed equivalent. Use 'PropTypes.arrayOf' or add a viewModelMeta override.",
    );
    pub const ONE_OF_TYPE: DiagnosticMessage = error(
        codes::ONE_OF_TYPE,
        "'PropTypes.oneOfType' has no typed equivalent. Add a viewModelMeta override.",
    );
    pub const ILLEGAL_FUNCTION_CALL: DiagnosticMessage = error(
        codes::ILLEGAL_FUNCTION_CALL,
        "Unsupported function call in propTypes. Add a viewModelMeta override.",
    );
    pub const ILLEGAL_IDENTIFIER: DiagnosticMessage = error(
        codes::ILLEGAL_IDENTIFIER,
        "Unsupported value in propTypes. Use a PropTypes validator or add a viewModelMeta override.",
    );
    pub const ILLEGAL_REFERENCE: DiagnosticMessage = error(
        codes::ILLEGAL_REFERENCE,
        "Unsupported reference in propTypes. Only references to another component's propTypes are allowed.",
    );
    pub const IMPORTED_OBJECT_REFERENCE: DiagnosticMessage = error(
        codes::IMPORTED_OBJECT_REFERENCE,
        "Imported objects cannot be analyzed. Declare the object in this module.",
    );
    pub const IMPORTED_ARRAY_REFERENCE: DiagnosticMessage = error(
        codes::IMPORTED_ARRAY_REFERENCE,
        "Imported arrays cannot be analyzed. Declare the array in this module.",
    );
    pub const MISSING_OBJECT_REFERENCE: DiagnosticMessage = error(
        codes::MISSING_OBJECT_REFERENCE,
        "Reference does not resolve to an object or array declared in this module.",
    );

    pub const BAD_STRING_LITERAL: DiagnosticMessage = error(
        codes::BAD_STRING_LITERAL,
        "'{0}' is not a valid viewModelMeta type. Expected one of: {1}.",
    );
    pub const BAD_META: DiagnosticMessage = error(
        codes::BAD_META,
        "Invalid viewModelMeta value. Use a type name string, a component, an array or an object.",
    );
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::INVALID_CHARACTER,
    diagnostic_messages::UNTERMINATED_STRING_LITERAL,
    diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
    diagnostic_messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
    diagnostic_messages::TOKEN_EXPECTED,
    diagnostic_messages::IDENTIFIER_EXPECTED,
    diagnostic_messages::EXPRESSION_EXPECTED,
    diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
    diagnostic_messages::PROPERTY_ASSIGNMENT_EXPECTED,
    diagnostic_messages::UNTERMINATED_BLOCK,
    diagnostic_messages::MAXIMUM_NESTING_DEPTH_EXCEEDED,
    diagnostic_messages::UNTERMINATED_COMMENT,
    diagnostic_messages::NO_EXPORT,
    diagnostic_messages::TOO_MANY_EXPORTS,
    diagnostic_messages::PROP_NAME_COLLISION,
    diagnostic_messages::BAD_IGNORE,
    diagnostic_messages::OBJECT,
    diagnostic_messages::ARRAY,
    diagnostic_messages::ONE_OF_TYPE,
    diagnostic_messages::ILLEGAL_FUNCTION_CALL,
    diagnostic_messages::ILLEGAL_IDENTIFIER,
    diagnostic_messages::ILLEGAL_REFERENCE,
    diagnostic_messages::IMPORTED_OBJECT_REFERENCE,
    diagnostic_messages::IMPORTED_ARRAY_REFERENCE,
    diagnostic_messages::MISSING_OBJECT_REFERENCE,
    diagnostic_messages::BAD_STRING_LITERAL,
    diagnostic_messages::BAD_META,
];
