//! The recognition worker thread.
//!
//! The engine call is long-running, accelerator-bound, and blocking; running
//! it on the async runtime would stall admission decisions and probes for
//! the duration. It lives on one dedicated OS thread instead, reached only
//! through a request/reply channel. The worker never sequences legs or
//! touches the slot — it reports one leg's completion or failure and waits
//! for the next request.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::engine::RecognizerFactory;
use crate::errors::{EngineError, JobError};

/// One leg's transcription request, answered on `reply`.
struct TranscribeRequest {
    audio_path: PathBuf,
    reply: oneshot::Sender<Result<(), EngineError>>,
}

/// Why a transcription request produced no result.
#[derive(Debug)]
pub enum TranscribeError {
    /// The engine ran and exited nonzero (or failed to launch).
    Engine(EngineError),
    /// The worker thread died before answering; the request is lost.
    Crashed,
}

impl From<TranscribeError> for JobError {
    fn from(err: TranscribeError) -> Self {
        match err {
            TranscribeError::Engine(e) => JobError::Engine(e),
            TranscribeError::Crashed => JobError::WorkerCrash,
        }
    }
}

/// Client half of the worker channel. Cloneable; the thread exits when the
/// last handle is dropped.
#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::Sender<TranscribeRequest>,
}

impl WorkerHandle {
    /// Spawn a fresh worker thread with its own recognizer.
    pub fn spawn(recognizers: &RecognizerFactory) -> Self {
        let (tx, mut rx) = mpsc::channel::<TranscribeRequest>(1);
        let recognizer = recognizers();
        debug!("recognition worker thread starting");
        drop(std::thread::spawn(move || {
            while let Some(req) = rx.blocking_recv() {
                let result = recognizer.recognize(&req.audio_path);
                let _ = req.reply.send(result);
            }
            debug!("recognition worker thread exiting");
        }));
        Self { tx }
    }

    /// Submit one leg and wait for the engine to finish it.
    ///
    /// A closed request or reply channel means the thread is gone
    /// (recognizer panic) and surfaces as [`TranscribeError::Crashed`].
    pub async fn transcribe(&self, audio_path: PathBuf) -> Result<(), TranscribeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = TranscribeRequest {
            audio_path,
            reply: reply_tx,
        };
        if self.tx.send(request).await.is_err() {
            return Err(TranscribeError::Crashed);
        }
        match reply_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(TranscribeError::Engine(e)),
            Err(_) => Err(TranscribeError::Crashed),
        }
    }
}
