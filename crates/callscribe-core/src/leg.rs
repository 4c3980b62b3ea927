//! Audio legs and their deterministic file naming.
//!
//! Call recordings arrive as two raw-audio files, one per side of the call,
//! named after the PBX unique ID. The leg file name is the single key the
//! whole pipeline hangs off: the remote fetch path, the local audio path,
//! and the engine's output artifact path are all derived from it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension of the uncompressed telephony recordings served by the PBX.
pub const RAW_AUDIO_EXT: &str = "sln";

/// Sub-path on the PBX origin where uploaded recordings are served.
pub const UPLOAD_SUBPATH: &str = "mp3s";

/// Which side of the recording a leg (and its segments) belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegTag {
    /// The answering side of a two-party call.
    A,
    /// The calling side of a two-party call.
    B,
    /// The only leg of an uploaded recording.
    Single,
}

/// One retrievable, transcribable audio unit belonging to a job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioLeg {
    /// Which side of the recording this is.
    pub tag: LegTag,
    /// Local file name, also the key for every derived path.
    pub file_name: String,
    /// Path of the resource under the PBX origin, no leading slash.
    pub remote_path: String,
}

impl AudioLeg {
    /// Leg of a two-party call. The file name is the unique ID with dots
    /// replaced by dashes, suffixed `-a` or `-b`. `tag` must be [`LegTag::A`]
    /// or [`LegTag::B`].
    pub fn call_leg(unique_id: &str, tag: LegTag) -> Self {
        debug_assert!(tag != LegTag::Single, "call legs are tagged A or B");
        let suffix = match tag {
            LegTag::A => "a",
            LegTag::B | LegTag::Single => "b",
        };
        let file_name = format!(
            "{}-{suffix}.{RAW_AUDIO_EXT}",
            unique_id.replace('.', "-")
        );
        Self {
            tag,
            remote_path: file_name.clone(),
            file_name,
        }
    }

    /// The single leg of an uploaded recording, fetched under the
    /// [`UPLOAD_SUBPATH`] with the supplied file name unmodified.
    pub fn upload(file_name: &str) -> Self {
        Self {
            tag: LegTag::Single,
            file_name: file_name.to_string(),
            remote_path: format!("{UPLOAD_SUBPATH}/{file_name}"),
        }
    }

    /// Where the fetched audio lands on local disk.
    pub fn audio_path(&self, audio_dir: &Path) -> PathBuf {
        audio_dir.join(&self.file_name)
    }

    /// Where the engine writes this leg's JSON output: the audio file name
    /// with its extension replaced by `.json`, under the transcript dir.
    pub fn artifact_path(&self, transcript_dir: &Path) -> PathBuf {
        transcript_dir.join(format!("{}.json", self.stem()))
    }

    fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }
}
