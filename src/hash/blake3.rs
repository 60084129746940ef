//! BLAKE3-based chunk fingerprints.

use crate::chunk::ChunkHash;

/// Computes BLAKE3 fingerprints of chunk data.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Blake3Hasher;

impl Blake3Hasher {
    /// Fingerprints `data` in one shot.
    pub(crate) fn hash(data: &[u8]) -> ChunkHash {
        ChunkHash::new(blake3::hash(data).into())
    }
}
