//! JavaScript module parser for vmc.
//!
//! The parser reads the subset of JavaScript that component modules use and
//! stores the result in a `NodeArena`. Function bodies and JSX are skipped
//! opaquely; everything that can hold a component contract (imports, exports,
//! top-level declarations, classes, object and array literals) is built into
//! nodes.

pub mod parser;
