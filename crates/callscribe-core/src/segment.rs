//! Transcription segments and the engine's output artifact schema.

use serde::{Deserialize, Serialize};

use crate::leg::LegTag;

/// One timed slice of transcribed speech, stamped with the leg it came from.
///
/// Wire format is camelCase; the backend receives
/// `{ "start": .., "end": .., "text": .., "legTag": "A" | "B" | "SINGLE" }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionSegment {
    /// Offset of the segment start from the beginning of the leg, seconds.
    pub start: f64,
    /// Offset of the segment end, seconds.
    pub end: f64,
    /// Recognized text.
    pub text: String,
    /// Which leg the segment was recognized on.
    pub leg_tag: LegTag,
}

/// The JSON artifact the recognition engine writes on a clean exit.
///
/// Only the fields the pipeline consumes are modeled; the engine emits more
/// (token ids, probabilities) and those are ignored on parse.
#[derive(Clone, Debug, Deserialize)]
pub struct EngineArtifact {
    /// Segments in the engine's own output order.
    pub segments: Vec<EngineSegment>,
}

/// One segment as the engine reports it, not yet leg-tagged.
#[derive(Clone, Debug, Deserialize)]
pub struct EngineSegment {
    /// Segment start offset, seconds.
    pub start: f64,
    /// Segment end offset, seconds.
    pub end: f64,
    /// Recognized text.
    pub text: String,
}

impl EngineSegment {
    /// Stamp this segment with the leg it was recognized on.
    pub fn tagged(self, tag: LegTag) -> TranscriptionSegment {
        TranscriptionSegment {
            start: self.start,
            end: self.end,
            text: self.text,
            leg_tag: tag,
        }
    }
}
