//! Test doubles for the recognition seam.
//!
//! Each double stands in for the external engine at a different point of its
//! contract: a clean exit with a written artifact, a nonzero exit, a worker
//! thread death, and a run that blocks until the test releases it.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::sync::{Arc, Mutex};

use crate::engine::{Recognizer, RecognizerFactory};
use crate::errors::EngineError;

/// Wrap a cloneable recognizer in a factory handing out fresh copies.
pub(crate) fn factory<R>(recognizer: R) -> RecognizerFactory
where
    R: Recognizer + Clone + Sync + 'static,
{
    Arc::new(move || Box::new(recognizer.clone()) as Box<dyn Recognizer>)
}

/// Clean engine run: writes a deterministic two-segment artifact derived
/// from the audio file's stem.
#[derive(Clone)]
pub(crate) struct ScriptedRecognizer {
    transcript_dir: PathBuf,
}

impl ScriptedRecognizer {
    pub(crate) fn new(transcript_dir: PathBuf) -> Self {
        Self { transcript_dir }
    }

    /// The artifact body this recognizer writes for `stem`.
    pub(crate) fn artifact_json(stem: &str) -> serde_json::Value {
        serde_json::json!({
            "segments": [
                {"start": 0.0, "end": 1.5, "text": format!("{stem} hello")},
                {"start": 1.5, "end": 3.0, "text": format!("{stem} world")},
            ]
        })
    }
}

impl Recognizer for ScriptedRecognizer {
    fn recognize(&self, audio_path: &Path) -> Result<(), EngineError> {
        let stem = audio_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap()
            .to_string();
        std::fs::write(
            self.transcript_dir.join(format!("{stem}.json")),
            Self::artifact_json(&stem).to_string(),
        )
        .unwrap();
        Ok(())
    }
}

/// Engine exits 1 and writes nothing.
#[derive(Clone)]
pub(crate) struct FailingRecognizer;

impl Recognizer for FailingRecognizer {
    fn recognize(&self, _audio_path: &Path) -> Result<(), EngineError> {
        Err(EngineError::Exit { code: Some(1) })
    }
}

/// Kills the worker thread.
#[derive(Clone)]
pub(crate) struct PanickingRecognizer;

impl Recognizer for PanickingRecognizer {
    fn recognize(&self, _audio_path: &Path) -> Result<(), EngineError> {
        panic!("recognizer blew up");
    }
}

/// Test-side controls for a [`GatedRecognizer`].
pub(crate) struct Gate {
    /// Receives one message per `recognize` entry.
    pub(crate) entered: Receiver<()>,
    /// Send one message to let a blocked `recognize` finish.
    pub(crate) release: SyncSender<()>,
}

/// Blocks inside `recognize` until the test releases it, then behaves like
/// [`ScriptedRecognizer`]. Cloneable so a factory can hand out instances
/// sharing one gate.
#[derive(Clone)]
pub(crate) struct GatedRecognizer {
    transcript_dir: PathBuf,
    entered: SyncSender<()>,
    release: Arc<Mutex<Receiver<()>>>,
}

impl GatedRecognizer {
    pub(crate) fn new(transcript_dir: PathBuf) -> (Self, Gate) {
        let (entered_tx, entered_rx) = sync_channel(16);
        let (release_tx, release_rx) = sync_channel(16);
        let recognizer = Self {
            transcript_dir,
            entered: entered_tx,
            release: Arc::new(Mutex::new(release_rx)),
        };
        let gate = Gate {
            entered: entered_rx,
            release: release_tx,
        };
        (recognizer, gate)
    }
}

impl Recognizer for GatedRecognizer {
    fn recognize(&self, audio_path: &Path) -> Result<(), EngineError> {
        self.entered.send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        ScriptedRecognizer::new(self.transcript_dir.clone()).recognize(audio_path)
    }
}
