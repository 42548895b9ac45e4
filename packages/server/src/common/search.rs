//! Substring matching shared by the Postgres and in-memory stores.

/// Builds a `LIKE`/`ILIKE` pattern matching `needle` anywhere in a column.
///
/// Wildcards in the needle are escaped; queries must use `ESCAPE '\'`.
pub fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring test with `ILIKE` semantics.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
