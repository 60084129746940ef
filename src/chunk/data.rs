//! The Chunk type - a tagged slice of source bytes handed to the matching stage.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identifies the kind of connector that produced a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SourceType {
    /// Local files and directories.
    Filesystem,
    /// A local or cloned git repository.
    Git,
    /// GitHub organizations and repositories.
    Github,
    /// GitLab projects.
    Gitlab,
    /// Amazon S3 buckets.
    S3,
    /// Google Cloud Storage buckets.
    Gcs,
    /// A syslog listener.
    Syslog,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceType::Filesystem => "filesystem",
            SourceType::Git => "git",
            SourceType::Github => "github",
            SourceType::Gitlab => "gitlab",
            SourceType::S3 => "s3",
            SourceType::Gcs => "gcs",
            SourceType::Syslog => "syslog",
        };
        f.write_str(name)
    }
}

/// Provenance of a chunk, one variant per connector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SourceMetadata {
    /// A chunk read from a local file.
    Filesystem {
        /// Path of the originating file, as valid UTF-8.
        file: String,
    },
}

impl SourceMetadata {
    /// Builds filesystem metadata, replacing invalid UTF-8 in the path.
    pub fn filesystem(path: &Path) -> Self {
        SourceMetadata::Filesystem {
            file: path.to_string_lossy().into_owned(),
        }
    }

    /// Returns the originating file, if this is filesystem metadata.
    pub fn file(&self) -> Option<&str> {
        match self {
            SourceMetadata::Filesystem { file } => Some(file),
        }
    }
}

/// Data to be scanned along with context on where it came from.
///
/// Chunks from one source may overlap; each chunk is a self-contained scan
/// unit.
///
/// # Example
///
/// ```
/// use chunkfeed::{Chunk, SourceType};
/// use bytes::Bytes;
///
/// let template = Chunk::template("fs", 7, SourceType::Filesystem, None, true);
/// let chunk = template.with_data(Bytes::from_static(b"AKIA..."));
///
/// assert_eq!(chunk.source_id, 7);
/// assert!(template.data.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Name of the source that produced the chunk.
    pub source_name: String,

    /// ID of the source that produced the chunk.
    pub source_id: i64,

    /// Kind of source that produced the chunk.
    pub source_type: SourceType,

    /// Where the chunk was found.
    pub source_metadata: Option<SourceMetadata>,

    /// Bytes to decode and scan.
    pub data: Bytes,

    /// Whether secrets found in the chunk should be verified.
    pub verify: bool,
}

impl Chunk {
    /// Creates a chunk with empty data, to be stamped with
    /// [`Chunk::with_data`] for every emission.
    pub fn template(
        source_name: impl Into<String>,
        source_id: i64,
        source_type: SourceType,
        source_metadata: Option<SourceMetadata>,
        verify: bool,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            source_id,
            source_type,
            source_metadata,
            data: Bytes::new(),
            verify,
        }
    }

    /// Returns a copy of this chunk carrying `data`.
    pub fn with_data(&self, data: impl Into<Bytes>) -> Self {
        Self {
            source_name: self.source_name.clone(),
            source_id: self.source_id,
            source_type: self.source_type,
            source_metadata: self.source_metadata.clone(),
            data: data.into(),
            verify: self.verify,
        }
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the originating file for filesystem chunks.
    pub fn file(&self) -> Option<&str> {
        self.source_metadata.as_ref().and_then(SourceMetadata::file)
    }

    /// BLAKE3 fingerprint of the chunk data.
    ///
    /// Lets consumers drop identical chunks when configured paths overlap.
    #[cfg(feature = "hash-blake3")]
    pub fn fingerprint(&self) -> super::ChunkHash {
        crate::hash::Blake3Hasher::hash(&self.data)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunk({} bytes from {} source {:?}",
            self.len(),
            self.source_type,
            self.source_name
        )?;
        if let Some(file) = self.file() {
            write!(f, ", file={}", file)?;
        }
        write!(f, ")")
    }
}
