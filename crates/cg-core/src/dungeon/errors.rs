//! Generation failures

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::object::ProvenanceError;

/// A recoverable failure of one generation attempt
///
/// The retry controller discards the attempt and starts over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenFailure {
    /// The builder gave up on this layout
    #[error("{0}")]
    Builder(String),

    /// A generation arena bound was hit
    #[error("too many {0}")]
    ArenaOverflow(&'static str),

    /// The finished level holds more monsters than allowed
    #[error("too many monsters")]
    TooManyMonsters,

    #[error(transparent)]
    Provenance(#[from] ProvenanceError),
}

impl GenFailure {
    pub fn builder(reason: impl Into<String>) -> Self {
        GenFailure::Builder(reason.into())
    }
}

/// A level that could not be produced at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("level generation failed after {attempts} attempts (last: {last_reason})")]
    RetriesExhausted { attempts: usize, last_reason: String },
}
