use std::collections::HashMap;

use compact_str::CompactString;

/// Prefix → namespace-URI registrations for a context.
///
/// Keys are case-sensitive and unique; registering a prefix twice keeps
/// the last value. Registering an empty URI is meaningful: a selector
/// prefix resolving to `""` matches only nodes *without* a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    by_prefix: HashMap<CompactString, CompactString>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `prefix`, replacing any earlier registration.
    pub fn add(&mut self, prefix: impl Into<CompactString>, uri: impl Into<CompactString>) {
        self.by_prefix.insert(prefix.into(), uri.into());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.by_prefix.get(prefix).map(CompactString::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_prefix
            .iter()
            .map(|(p, u)| (p.as_str(), u.as_str()))
    }
}
