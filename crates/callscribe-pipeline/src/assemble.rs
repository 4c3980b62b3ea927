//! Segment assembly: engine artifacts → leg-tagged segments.

use std::path::Path;

use callscribe_core::{AudioLeg, EngineArtifact, TranscriptionSegment};

use crate::errors::AssemblyError;

/// Parse each leg's output artifact, stamp its segments with the leg tag,
/// and concatenate in leg order (A before B, single tag for uploads).
/// Ordering within a leg is the engine's own output order.
///
/// A missing or malformed artifact aborts assembly for the whole job.
pub async fn assemble(
    legs: &[AudioLeg],
    transcript_dir: &Path,
) -> Result<Vec<TranscriptionSegment>, AssemblyError> {
    let mut segments = Vec::new();
    for leg in legs {
        let path = leg.artifact_path(transcript_dir);
        let raw = tokio::fs::read(&path).await.map_err(|source| AssemblyError::Read {
            path: path.clone(),
            source,
        })?;
        let artifact: EngineArtifact =
            serde_json::from_slice(&raw).map_err(|source| AssemblyError::Parse {
                path: path.clone(),
                source,
            })?;
        segments.extend(artifact.segments.into_iter().map(|s| s.tagged(leg.tag)));
    }
    Ok(segments)
}
