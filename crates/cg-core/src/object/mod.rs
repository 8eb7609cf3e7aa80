//! Objects and artifacts

mod artifact;
mod lifecycle;
mod obj;

pub use artifact::{
    ArtifactDef, ArtifactId, ArtifactKey, ArtifactLedger, LedgerEntry, Provenance, ProvenanceError,
};
pub use lifecycle::{WipeSummary, mark_generated_if_ready, preserve_on_discard, wipe_chunk};
pub use obj::{Object, ObjectId, ObjectKind};
