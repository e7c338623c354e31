//! Document identifiers.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const ID_LEN: usize = 24;

/// Identifier of a stored document: 12 bytes rendered as 24 lowercase hex chars.
///
/// This is the textual form of a document-store object id. Storage adapters
/// convert it to their native representation at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new identifier.
    ///
    /// Uses the leading 12 bytes of a UUIDv7, so identifiers minted in sequence
    /// sort by creation time like native object ids do.
    pub fn new() -> Self {
        let uuid = Uuid::now_v7();
        let hex = uuid.as_bytes()[..ID_LEN / 2]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DomainError::invalid_id(format!(
                "DocumentId: expected {ID_LEN} hex characters, got '{s}'"
            )));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_valid_and_distinct() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 24);
        assert!(a.as_str().parse::<DocumentId>().is_ok());
    }

    #[test]
    fn parse_normalizes_case() {
        let id: DocumentId = "65A1B2C3D4E5F60718293A4B".parse().unwrap();
        assert_eq!(id.as_str(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!("".parse::<DocumentId>().is_err());
        assert!("not-an-id".parse::<DocumentId>().is_err());
        assert!("65a1b2c3d4e5f60718293a4z".parse::<DocumentId>().is_err());
        assert!("65a1b2c3d4e5f60718293a4b00".parse::<DocumentId>().is_err());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<DocumentId, _> = serde_json::from_str("\"65a1b2c3d4e5f60718293a4b\"");
        assert!(ok.is_ok());
        let bad: Result<DocumentId, _> = serde_json::from_str("\"abc\"");
        assert!(bad.is_err());
    }
}
