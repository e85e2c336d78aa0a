//! Incident identity using prefixed ULIDs
//!
//! Every incident gets an `INC-<ULID>` identifier at creation. ULIDs are
//! time-ordered and collision-resistant, so ids stay unique for the lifetime
//! of a store without a counter file, and survive any future reordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Prefix shared by every incident id
pub const ID_PREFIX: &str = "INC";

/// A unique incident identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IncidentId {
    ulid: Ulid,
}

impl IncidentId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self { ulid: Ulid::new() }
    }

    /// Build an id around an existing ULID
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self { ulid }
    }

    /// Get the ULID component
    pub fn ulid(&self) -> Ulid {
        self.ulid
    }

    /// Parse an id from its textual form (prefix is case-insensitive)
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl Default for IncidentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}-{}", ID_PREFIX, self.ulid))
    }
}

impl FromStr for IncidentId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (prefix, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        if !prefix.eq_ignore_ascii_case(ID_PREFIX) {
            return Err(IdParseError::InvalidPrefix(prefix.to_string()));
        }

        let ulid = Ulid::from_string(&ulid_str.to_ascii_uppercase())
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { ulid })
    }
}

impl Serialize for IncidentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IncidentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing incident ids
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("invalid incident id prefix: '{0}' (expected {ID_PREFIX})")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in incident id: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_incident_id_generation() {
        let id = IncidentId::new();
        assert!(id.to_string().starts_with("INC-"));
        assert_eq!(id.to_string().len(), 30); // INC- (4) + ULID (26)
    }

    #[test]
    fn test_incident_id_display_honors_width() {
        let id = IncidentId::new();
        let padded = format!("{:<32}|", id);
        assert_eq!(padded.len(), 33);
        assert!(padded.starts_with(&id.to_string()));
    }

    #[test]
    fn test_incident_id_parsing() {
        let original = IncidentId::new();
        let parsed = IncidentId::parse(&original.to_string()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_incident_id_parsing_is_case_insensitive() {
        let original = IncidentId::new();
        let lowered = original.to_string().to_lowercase();
        assert_eq!(IncidentId::parse(&lowered).unwrap(), original);
    }

    #[test]
    fn test_incident_id_invalid_prefix() {
        let err = IncidentId::parse("REQ-01HQ3K4N5M6P7R8S9T0VWXYZAB").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidPrefix(_)));
    }

    #[test]
    fn test_incident_id_missing_delimiter() {
        let err = IncidentId::parse("INC01HQ3K4N5M6P7R8S9T0VWXYZAB").unwrap_err();
        assert!(matches!(err, IdParseError::MissingDelimiter(_)));
    }

    #[test]
    fn test_incident_id_invalid_ulid() {
        let err = IncidentId::parse("INC-notaulid").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidUlid(_, _)));
    }

    #[test]
    fn test_incident_ids_are_distinct() {
        let ids: HashSet<IncidentId> = (0..500).map(|_| IncidentId::new()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_incident_id_serde() {
        let id = IncidentId::new();
        let yaml = serde_yml::to_string(&id).unwrap();
        let back: IncidentId = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(id, back);
    }
}
