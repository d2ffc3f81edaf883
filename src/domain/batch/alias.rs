//! Cache key <-> GraphQL field alias mapping
//!
//! GraphQL aliases cannot contain `/` or `-`, so keys are rewritten before they
//! go out and rewritten back when the response arrives. Slashes become a single
//! underscore first, then hyphens become a double underscore; the reverse
//! applies `__` -> `-` and then `_` -> `/`.

/// Marker for aliases that are returned untouched
const GLOBAL_MARKER: &str = "global";

/// Converts a cache key into a GraphQL-safe alias
pub fn forward_alias(key: &str) -> String {
    key.replace('/', "_").replace('-', "__")
}

/// Recovers a cache key from an alias found in a response
///
/// Aliases containing `global` are passed through unchanged.
pub fn reverse_alias(alias: &str) -> String {
    if is_global_alias(alias) {
        return alias.to_string();
    }

    alias.replace("__", "-").replace('_', "/")
}

/// Whether an alias is exempt from the reverse mapping
pub fn is_global_alias(alias: &str) -> bool {
    alias.contains(GLOBAL_MARKER)
}
