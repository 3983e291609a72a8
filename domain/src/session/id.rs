//! Session identifier

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique session identifier (Value Object)
///
/// Generated from 122 random bits, so collisions across repeated
/// creates are negligible and the id doubles as an unguessable bearer
/// capability: knowing it is the only requirement for asking follow-up
/// questions against the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened prefix for log lines
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<SessionId> = (0..1000).map(|_| SessionId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_short_prefix() {
        let id = SessionId::from("0123456789abcdef");
        assert_eq!(id.short(), "01234567");

        let tiny = SessionId::from("abc");
        assert_eq!(tiny.short(), "abc");
    }

    #[test]
    fn test_display_roundtrip() {
        let id = SessionId::generate();
        let parsed = SessionId::from(id.to_string());
        assert_eq!(id, parsed);
    }
}
