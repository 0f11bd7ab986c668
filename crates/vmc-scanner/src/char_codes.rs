//! Byte classification helpers.
//!
//! The scanner works on UTF-8 bytes. Any non-ASCII byte is treated as part of
//! an identifier, which accepts Unicode identifiers without decoding them.

#[inline]
pub fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

#[inline]
pub fn is_identifier_part(b: u8) -> bool {
    is_identifier_start(b) || b.is_ascii_digit()
}

#[inline]
pub fn is_line_break(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

#[inline]
pub fn is_white_space_single_line(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0B | 0x0C)
}

/// JSX tag names also allow `-`, `.` and `:` (`<my-element>`, `<Foo.Bar>`, `<svg:rect>`).
#[inline]
pub fn is_jsx_name_part(b: u8) -> bool {
    is_identifier_part(b) || matches!(b, b'-' | b'.' | b':')
}
