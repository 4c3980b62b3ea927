//! Artifact cleanup.

use std::path::Path;

use tracing::{debug, warn};

use callscribe_core::AudioLeg;

/// Delete each leg's local audio file and engine artifact.
///
/// Deletions are independent and best-effort: a failure is logged and the
/// remaining files are still attempted. Never affects the slot.
pub async fn cleanup(legs: &[AudioLeg], audio_dir: &Path, transcript_dir: &Path) {
    for leg in legs {
        for path in [leg.audio_path(audio_dir), leg.artifact_path(transcript_dir)] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "artifact deleted"),
                Err(e) => warn!(path = %path.display(), error = %e, "artifact deletion failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscribe_core::LegTag;

    #[tokio::test]
    async fn deletes_audio_and_artifact_for_every_leg() {
        let audio = tempfile::tempdir().unwrap();
        let transcripts = tempfile::tempdir().unwrap();
        let legs = vec![
            AudioLeg::call_leg("100.1", LegTag::A),
            AudioLeg::call_leg("100.1", LegTag::B),
        ];
        for leg in &legs {
            std::fs::write(leg.audio_path(audio.path()), b"audio").unwrap();
            std::fs::write(leg.artifact_path(transcripts.path()), b"{}").unwrap();
        }

        cleanup(&legs, audio.path(), transcripts.path()).await;

        for leg in &legs {
            assert!(!leg.audio_path(audio.path()).exists());
            assert!(!leg.artifact_path(transcripts.path()).exists());
        }
    }

    #[tokio::test]
    async fn missing_files_do_not_stop_the_sweep() {
        let audio = tempfile::tempdir().unwrap();
        let transcripts = tempfile::tempdir().unwrap();
        let legs = vec![
            AudioLeg::call_leg("100.1", LegTag::A),
            AudioLeg::call_leg("100.1", LegTag::B),
        ];
        // Only leg B's artifact exists; everything else is already gone
        std::fs::write(legs[1].artifact_path(transcripts.path()), b"{}").unwrap();

        cleanup(&legs, audio.path(), transcripts.path()).await;

        assert!(!legs[1].artifact_path(transcripts.path()).exists());
    }
}
