//! Key Namespacer Module
//!
//! Derives physical storage keys from logical keys.

/// Separator between namespace and logical key.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Returns the physical key for `key` under `namespace`.
///
/// An absent or empty namespace leaves the key unchanged; otherwise the
/// result is `"{namespace}:{key}"`. Neither part is escaped, so a namespace
/// containing `:` can collide with a nested logical key.
pub fn physical_key(namespace: Option<&str>, key: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}{}{}", ns, NAMESPACE_SEPARATOR, key),
        _ => key.to_string(),
    }
}

/// Inverse of [`physical_key`] for enumeration: returns the logical key if
/// `physical` belongs to `namespace`.
pub fn logical_key<'a>(namespace: Option<&str>, physical: &'a str) -> Option<&'a str> {
    match namespace {
        Some(ns) if !ns.is_empty() => physical
            .strip_prefix(ns)
            .and_then(|rest| rest.strip_prefix(NAMESPACE_SEPARATOR)),
        _ => Some(physical),
    }
}
