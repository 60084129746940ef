//! Chunk fingerprint type.

use std::fmt;
use std::str::FromStr;

/// A 32-byte BLAKE3 fingerprint of chunk data.
///
/// Consumers use it as a dedup key: the same file reached through two
/// configured paths yields chunks with equal fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkHash([u8; 32]);

impl ChunkHash {
    /// The size of the fingerprint in bytes.
    pub const SIZE: usize = 32;

    /// Wraps raw fingerprint bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex form, as printed in logs.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl AsRef<[u8]> for ChunkHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ChunkHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{:02x}", byte))
    }
}

/// Error returned when parsing a malformed hex fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("fingerprint must be 64 hex characters")]
pub struct ParseChunkHashError;

impl FromStr for ChunkHash {
    type Err = ParseChunkHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::SIZE * 2 || !s.is_ascii() {
            return Err(ParseChunkHashError);
        }
        let mut bytes = [0u8; 32];
        for (out, pair) in bytes.iter_mut().zip(s.as_bytes().chunks_exact(2)) {
            let pair = std::str::from_utf8(pair).map_err(|_| ParseChunkHashError)?;
            *out = u8::from_str_radix(pair, 16).map_err(|_| ParseChunkHashError)?;
        }
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_lowercase_hex() {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let hash = ChunkHash::new(bytes);
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with("deadbeef"));
    }

    #[test]
    fn test_parse_hex() {
        let hash = ChunkHash::new([0xABu8; 32]);
        let parsed: ChunkHash = hash.to_hex().parse().unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("abc".parse::<ChunkHash>().is_err());
        assert!("zz".repeat(32).parse::<ChunkHash>().is_err());
    }
}
