use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DagIndexError, DagIndexResult};

/// Opaque fixed-width block identifier (§3 BlockHash).
///
/// Exchanged as its lowercase hex string in memory and persisted as raw bytes.
/// `Serialize`/`Deserialize` go through the hex string (not the raw bytes) since
/// page records are persisted as JSON with hex keys (§6) -- a `HashMap<BlockHash, _>`
/// must serialize its keys as strings for `serde_json` to accept them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockHash([u8; BlockHash::SIZE]);

impl BlockHash {
    pub const SIZE: usize = 32;

    pub const fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }

    /// The designated sentinel hash of the DAG root (§3). Genesis is simply the
    /// all-zero hash; no block may legitimately compute to it since hashing
    /// functions are one of the out-of-scope external collaborators (§1).
    pub const fn genesis_sentinel() -> Self {
        Self([0u8; Self::SIZE])
    }

    /// Parses a hex string arriving at an external boundary (a peer-sync message,
    /// a CLI/RPC argument), rejecting malformed input as `DagIndexError::InputError`
    /// rather than the bare `faster_hex::Error` `FromStr` surfaces (§7 InputError:
    /// "a caller passes a malformed hash... reject at the boundary").
    pub fn parse_hex(s: &str) -> DagIndexResult<Self> {
        s.parse().map_err(|e| DagIndexError::InputError(format!("malformed block hash {s:?}: {e}")))
    }
}

impl Display for BlockHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut hex = [0u8; BlockHash::SIZE * 2];
        faster_hex::hex_encode(&self.0, &mut hex).expect("hex buffer is exactly sized");
        f.write_str(std::str::from_utf8(&hex).expect("hex output is always valid UTF-8"))
    }
}

impl Debug for BlockHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for BlockHash {
    type Err = faster_hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::SIZE * 2 {
            return Err(faster_hex::Error::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; Self::SIZE];
        faster_hex::hex_decode(s.as_bytes(), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for BlockHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; BlockHash::SIZE]> for BlockHash {
    fn from(bytes: [u8; BlockHash::SIZE]) -> Self {
        Self(bytes)
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

struct BlockHashVisitor;

impl Visitor<'_> for BlockHashVisitor {
    type Value = BlockHash;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a 64-character lowercase hex string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        BlockHash::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(BlockHashVisitor)
    }
}

/// Non-negative block height (§3 BlockHeight). Genesis is height 0.
pub type BlockHeight = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let hash = BlockHash::from_bytes([7u8; BlockHash::SIZE]);
        let s = hash.to_string();
        assert_eq!(s.len(), 64);
        assert_eq!(BlockHash::from_str(&s).unwrap(), hash);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(BlockHash::from_str("not-hex").is_err());
        assert!(BlockHash::from_str("ab").is_err());
    }

    #[test]
    fn parse_hex_rejects_malformed_input_as_input_error() {
        assert!(matches!(BlockHash::parse_hex("not-hex"), Err(DagIndexError::InputError(_))));
        let hash = BlockHash::from_bytes([3u8; BlockHash::SIZE]);
        assert_eq!(BlockHash::parse_hex(&hash.to_string()).unwrap(), hash);
    }
}
