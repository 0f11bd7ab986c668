//! Centralized limits and thresholds.
//!
//! Recursive walks over source declarations are bounded here so that a
//! pathological input cannot overflow the stack.

/// Maximum nesting depth for expressions built by the parser.
///
/// Each nested call, member access, literal or parenthesized expression adds
/// a parser frame. Past this depth the parser reports
/// `MAXIMUM_NESTING_DEPTH_EXCEEDED` and skips the rest of the statement.
pub const MAX_PARSER_EXPRESSION_DEPTH: u32 = 256;

/// Maximum depth of nested `PropTypes.shape`/`PropTypes.exact` declarations.
///
/// ```javascript
/// A.propTypes = {
///   a: PropTypes.shape({ b: PropTypes.shape({ c: PropTypes.shape({ /* ... */ }) }) }),
/// };
/// ```
///
/// A shape nested deeper than this is reported as an unsupported call.
pub const MAX_SHAPE_DEPTH: u32 = 64;

/// Maximum number of shape objects expanded while classifying one
/// `propTypes` object.
///
/// A local object referenced from several shapes is expanded once per
/// reference, so a chain of such objects doubles at every level. Shapes past
/// this budget are reported as unsupported calls.
pub const MAX_SHAPE_EXPANSIONS: u32 = 4096;

/// Maximum depth of nested `viewModelMeta` objects and arrays.
pub const MAX_META_DEPTH: u32 = 64;

/// Maximum nesting of braces, parentheses and JSX elements skipped opaquely
/// inside function bodies.
pub const MAX_SKIP_DEPTH: u32 = 1024;
