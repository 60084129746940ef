//! Source units and the results produced in unit-based scanning.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Chunk;
use crate::error::{Error, Result};
use crate::source::SourceUnitUnmarshaller;

/// A source's unit of work.
///
/// Units are the output of enumeration and the input of per-unit chunking.
/// Two units are the same unit when their IDs are equal.
pub trait SourceUnit: fmt::Debug + Send + Sync {
    /// Uniquely identifies the unit within its source.
    fn source_unit_id(&self) -> &str;
}

/// A unit identified by a plain string, such as a configured path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommonSourceUnit {
    /// The unit identifier.
    #[serde(rename = "source_unit_id")]
    pub id: String,
}

impl CommonSourceUnit {
    /// Creates a unit from an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl SourceUnit for CommonSourceUnit {
    fn source_unit_id(&self) -> &str {
        &self.id
    }
}

/// Decodes [`CommonSourceUnit`]s from `{"source_unit_id": "..."}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonSourceUnitUnmarshaller;

impl SourceUnitUnmarshaller for CommonSourceUnitUnmarshaller {
    fn unmarshal_source_unit(&self, data: &[u8]) -> Result<Box<dyn SourceUnit>> {
        let unit: CommonSourceUnit = serde_json::from_slice(data).map_err(Error::UnitDecode)?;
        Ok(Box::new(unit))
    }
}

/// Outcome of listing one unit: either the unit or the reason it could not
/// be listed.
#[derive(Debug)]
pub enum EnumerationResult {
    /// A unit ready to be chunked.
    Unit(Box<dyn SourceUnit>),
    /// A recoverable failure for one item.
    Error(Error),
}

impl EnumerationResult {
    /// Wraps `id` in a [`CommonSourceUnit`].
    pub fn ok(id: impl Into<String>) -> Self {
        EnumerationResult::Unit(Box::new(CommonSourceUnit::new(id)))
    }

    /// Builds an error result.
    pub fn err(error: Error) -> Self {
        EnumerationResult::Error(error)
    }

    /// Returns the unit, if any.
    pub fn unit(&self) -> Option<&dyn SourceUnit> {
        match self {
            EnumerationResult::Unit(unit) => Some(unit.as_ref()),
            EnumerationResult::Error(_) => None,
        }
    }

    /// Returns the error, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            EnumerationResult::Unit(_) => None,
            EnumerationResult::Error(e) => Some(e),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<Box<dyn SourceUnit>> {
        match self {
            EnumerationResult::Unit(unit) => Ok(unit),
            EnumerationResult::Error(e) => Err(e),
        }
    }
}

/// Outcome of chunking a unit: either one chunk or a unit-level failure.
#[derive(Debug)]
pub enum ChunkResult {
    /// A produced chunk.
    Chunk(Chunk),
    /// A failure isolated to the unit being chunked.
    Error(Error),
}

impl ChunkResult {
    /// Builds a successful result.
    pub fn ok(chunk: Chunk) -> Self {
        ChunkResult::Chunk(chunk)
    }

    /// Builds an error result.
    pub fn err(error: Error) -> Self {
        ChunkResult::Error(error)
    }

    /// Returns the chunk, if any.
    pub fn chunk(&self) -> Option<&Chunk> {
        match self {
            ChunkResult::Chunk(chunk) => Some(chunk),
            ChunkResult::Error(_) => None,
        }
    }

    /// Returns the error, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            ChunkResult::Chunk(_) => None,
            ChunkResult::Error(e) => Some(e),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<Chunk> {
        match self {
            ChunkResult::Chunk(chunk) => Ok(chunk),
            ChunkResult::Error(e) => Err(e),
        }
    }
}
