use anyhow::{bail, Context, Result};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a document identifier in bytes (24 hex characters on the wire).
pub const DOC_ID_LEN: usize = 12;

/// Random document identifier used for both notes and users.
///
/// Rendered as 24 lowercase hex characters in JSON and in the WAL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocId([u8; DOC_ID_LEN]);

impl DocId {
    pub fn generate() -> Self {
        let mut bytes = [0u8; DOC_ID_LEN];
        rand::rng().fill(&mut bytes[..]);
        DocId(bytes)
    }

    /// Parse a 24-character hex string into a DocId.
    ///
    /// Anything else is a malformed identifier.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).context("Invalid hex in id")?;

        if bytes.len() != DOC_ID_LEN {
            bail!("id must be {} bytes, got {}", DOC_ID_LEN, bytes.len());
        }

        let mut id = [0u8; DOC_ID_LEN];
        id.copy_from_slice(&bytes);

        Ok(DocId(id))
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for DocId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        DocId::parse(s)
    }
}

impl Serialize for DocId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DocId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DocId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_round_trips_through_hex() {
        let id = DocId::generate();
        let rendered = id.to_string();

        assert_eq!(rendered.len(), DOC_ID_LEN * 2);
        assert_eq!(DocId::parse(&rendered).unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_bad_hex() {
        assert!(DocId::parse("a123bss").is_err());
        assert!(DocId::parse("zz".repeat(12).as_str()).is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(DocId::parse("abcdef").is_err());
        assert!(DocId::parse(&"ab".repeat(13)).is_err());
        assert!(DocId::parse("").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id = DocId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: DocId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        let result: Result<DocId, _> = serde_json::from_str("\"not-an-id\"");
        assert!(result.is_err());
    }
}
