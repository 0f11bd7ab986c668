//! Node and modifier flags.

/// Flags stored in `Node::flags`.
pub mod node_flags {
    pub const NONE: u32 = 0;
    pub const LET: u32 = 1;
    pub const CONST: u32 = 2;
}

/// Flags stored in `Node::modifier_flags`.
pub mod modifier_flags {
    pub const NONE: u32 = 0;
    pub const EXPORT: u32 = 1;
    pub const DEFAULT: u32 = 1 << 1;
    pub const STATIC: u32 = 1 << 2;
    pub const ASYNC: u32 = 1 << 3;
    pub const GENERATOR: u32 = 1 << 4;
}
