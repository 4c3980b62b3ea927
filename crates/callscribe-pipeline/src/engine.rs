//! The recognition engine seam.
//!
//! The engine is an opaque external program with an exit-code contract:
//! code 0 guarantees a JSON artifact at the leg's deterministic output path,
//! nonzero guarantees nothing usable. [`Recognizer`] is the trait seam the
//! worker thread drives; [`EngineCommand`] is the production implementation.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tracing::{debug, info};

use callscribe_settings::EngineSettings;

use crate::errors::EngineError;

/// Blocking invocation of the speech-recognition engine for one audio file.
///
/// `recognize` returning `Ok(())` means the engine wrote its artifact next
/// to the configured output directory. Implementations block for the whole
/// engine run; callers are expected to be off the async runtime.
pub trait Recognizer: Send {
    /// Run the engine against `audio_path` until it exits.
    fn recognize(&self, audio_path: &Path) -> Result<(), EngineError>;
}

/// Creates a fresh [`Recognizer`] for each spawned worker thread.
pub type RecognizerFactory = Arc<dyn Fn() -> Box<dyn Recognizer> + Send + Sync>;

/// The production recognizer: spawns the external engine process and waits
/// for it synchronously.
///
/// The invocation carries no timeout — a hung engine holds the worker (and
/// the slot) indefinitely.
pub struct EngineCommand {
    command: String,
    model: String,
    language: String,
    beam_size: u32,
    patience: u32,
    transcript_dir: PathBuf,
}

impl EngineCommand {
    /// Build the engine invocation from settings.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            command: settings.command.clone(),
            model: settings.model.clone(),
            language: settings.language.clone(),
            beam_size: settings.beam_size,
            patience: settings.patience,
            transcript_dir: PathBuf::from(&settings.transcript_dir),
        }
    }

    fn arguments(&self, audio_path: &Path) -> Vec<String> {
        vec![
            audio_path.display().to_string(),
            format!("--model={}", self.model),
            "--fp16=False".to_string(),
            format!("--language={}", self.language),
            format!("--beam_size={}", self.beam_size),
            format!("--patience={}", self.patience),
            "--output_format=json".to_string(),
            format!("--output_dir={}", self.transcript_dir.display()),
        ]
    }
}

impl Recognizer for EngineCommand {
    fn recognize(&self, audio_path: &Path) -> Result<(), EngineError> {
        debug!(audio = %audio_path.display(), command = %self.command, "invoking recognition engine");
        let status = Command::new(&self.command)
            .args(self.arguments(audio_path))
            .status()?;
        if status.success() {
            info!(audio = %audio_path.display(), "recognition engine finished");
            Ok(())
        } else {
            Err(EngineError::Exit {
                code: status.code(),
            })
        }
    }
}
