//! Case- and separator-insensitive name comparison.

/// `name` without non-alphanumeric characters, lowercased.
fn normalized(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
}

/// True when `a` and `b` only differ in case and separators.
pub fn equivalent(a: &str, b: &str) -> bool {
    normalized(a).eq(normalized(b))
}
