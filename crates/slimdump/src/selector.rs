//! Wildcard selector resolution shared by table and column policies.
//!
//! Selectors are shell-style patterns (`*` matches any run of characters,
//! `?` a single character) matched case-insensitively against the full
//! object name.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};

use crate::error::{DumpError, Result};

/// An ordered mapping from selector pattern to a policy value.
///
/// When several patterns match the same name, the tie-break is the
/// *descending lexicographic order of the raw pattern strings*: patterns are
/// kept sorted and probed from the highest key downwards, and the first match
/// wins. This is neither declaration-order priority nor most-specific-wins;
/// it is a property of the pattern strings themselves and is part of the
/// observable contract, so callers relying on declaration order may be
/// surprised.
#[derive(Debug)]
pub struct SelectorMap<T> {
    entries: BTreeMap<String, SelectorEntry<T>>,
}

impl<T> Default for SelectorMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct SelectorEntry<T> {
    pattern: Regex,
    value: T,
}

impl<T> SelectorMap<T> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert a value under a selector, compiling the pattern.
    ///
    /// Inserting the same selector string again fully replaces the previous
    /// value.
    pub fn insert(&mut self, selector: String, value: T) -> Result<()> {
        let pattern = compile_selector(&selector)?;
        self.entries
            .insert(selector, SelectorEntry { pattern, value });
        Ok(())
    }

    /// Resolve a concrete name to the matching value, if any.
    pub fn resolve(&self, name: &str) -> Option<&T> {
        self.entries
            .values()
            .rev()
            .find(|entry| entry.pattern.is_match(name))
            .map(|entry| &entry.value)
    }

    /// Merge another map into this one. Entries for identical selector
    /// strings are fully replaced by the other map's value.
    pub fn merge(&mut self, other: SelectorMap<T>) {
        self.entries.extend(other.entries);
    }

    /// Iterate over all values.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values().map(|entry| &entry.value)
    }

    /// Number of selectors in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no selectors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Translate a wildcard selector into an anchored, case-insensitive regex.
fn compile_selector(selector: &str) -> Result<Regex> {
    let translated = selector.replace('*', "(.*)").replace('?', ".");
    let anchored = format!("^{}$", translated);

    RegexBuilder::new(&anchored)
        .case_insensitive(true)
        .build()
        .map_err(|source| DumpError::InvalidPattern {
            pattern: selector.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(selectors: &[&str]) -> SelectorMap<String> {
        let mut map = SelectorMap::new();
        for s in selectors {
            map.insert(s.to_string(), s.to_string()).unwrap();
        }
        map
    }

    #[test]
    fn star_matches_any_run() {
        let map = map_of(&["user*"]);
        assert!(map.resolve("users").is_some());
        assert!(map.resolve("user_accounts").is_some());
        assert!(map.resolve("user").is_some());
        assert!(map.resolve("customer").is_none());
    }

    #[test]
    fn question_mark_matches_exactly_one_character() {
        let map = map_of(&["user?"]);
        assert!(map.resolve("usera").is_some());
        assert!(map.resolve("userab").is_none());
        assert!(map.resolve("user").is_none());
    }

    #[test]
    fn matching_is_case_insensitive_and_anchored() {
        let map = map_of(&["Users"]);
        assert!(map.resolve("users").is_some());
        assert!(map.resolve("USERS").is_some());
        assert!(map.resolve("users_archive").is_none());
        assert!(map.resolve("all_users").is_none());
    }

    #[test]
    fn tie_break_is_descending_lexicographic_on_raw_pattern() {
        // Both patterns match "users"; "users" > "user*" lexicographically,
        // so the literal selector wins regardless of insertion order.
        let mut map = SelectorMap::new();
        map.insert("user*".to_string(), "wildcard").unwrap();
        map.insert("users".to_string(), "literal").unwrap();
        assert_eq!(map.resolve("users"), Some(&"literal"));

        let mut map = SelectorMap::new();
        map.insert("users".to_string(), "literal").unwrap();
        map.insert("user*".to_string(), "wildcard").unwrap();
        assert_eq!(map.resolve("users"), Some(&"literal"));
    }

    #[test]
    fn merge_replaces_identical_selectors() {
        let mut base = map_of(&["orders"]);
        let mut other = SelectorMap::new();
        other.insert("orders".to_string(), "replacement".to_string()).unwrap();
        base.merge(other);
        assert_eq!(base.len(), 1);
        assert_eq!(base.resolve("orders"), Some(&"replacement".to_string()));
    }

    #[test]
    fn invalid_selector_is_a_config_error() {
        let mut map: SelectorMap<()> = SelectorMap::new();
        let err = map.insert("users[".to_string(), ()).unwrap_err();
        assert!(matches!(err, DumpError::InvalidPattern { .. }));
    }
}
