//! Fully-qualified name identifiers and their on-chain records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ChainAddress;

/// Maximum total length of a fully-qualified name, label and namespace
/// included.
pub const MAX_NAME_LEN: usize = 40;

/// A fully-qualified name: `label.namespace`, e.g. `alice.id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameId(String);

impl NameId {
    /// Wrap a string as a name without validating it.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that the name is well-formed: lowercase label and namespace
    /// separated by a single dot, allowed charset `[a-z0-9_-]`, total
    /// length at most [`MAX_NAME_LEN`].
    pub fn is_valid(&self) -> bool {
        let s = &self.0;
        if s.is_empty() || s.len() > MAX_NAME_LEN {
            return false;
        }
        let mut parts = s.split('.');
        let (Some(label), Some(namespace), None) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        if label.is_empty() || namespace.is_empty() {
            return false;
        }
        let ok = |p: &str| {
            p.bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
        };
        ok(label) && ok(namespace)
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The on-chain record for a registered name.
///
/// Read-only to the registrar: the chain client produces it, the
/// orchestrator only inspects it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NameRecord {
    /// Address of the current owner.
    pub owner_address: ChainAddress,
    /// Hash of the data currently bound to the name, if any.
    #[serde(default)]
    pub value_hash: Option<String>,
    /// Block height at which the name was registered.
    #[serde(default)]
    pub registered_at: u64,
    /// Block height at which the registration lapses, if the namespace expires names.
    #[serde(default)]
    pub expires_at: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_names_are_valid() {
        assert!(NameId::new("alice.id").is_valid());
        assert!(NameId::new("bob-2.id").is_valid());
        assert!(NameId::new("under_score.app").is_valid());
    }

    #[test]
    fn missing_namespace_rejected() {
        assert!(!NameId::new("alice").is_valid());
        assert!(!NameId::new("alice.").is_valid());
        assert!(!NameId::new(".id").is_valid());
    }

    #[test]
    fn two_dots_rejected() {
        assert!(!NameId::new("a.b.c").is_valid());
    }

    #[test]
    fn uppercase_rejected() {
        assert!(!NameId::new("Alice.id").is_valid());
    }

    #[test]
    fn overlong_rejected() {
        let long = format!("{}.id", "a".repeat(MAX_NAME_LEN));
        assert!(!NameId::new(long).is_valid());
    }
}
