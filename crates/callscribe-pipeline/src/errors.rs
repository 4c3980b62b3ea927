//! Pipeline error taxonomy.
//!
//! Every variant is terminal for the affected job: the controller logs it,
//! releases the worker slot, and moves on. Nothing here propagates back to
//! the upstream transport.

use std::path::PathBuf;

use thiserror::Error;

use callscribe_core::JobDescriptorError;

/// Network or disk failure while fetching a leg's audio.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Remote fetch failed (connect, status, timeout, or mid-stream).
    #[error("audio fetch failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Local write failed.
    #[error("audio write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The external recognition engine could not produce an artifact.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine process could not be launched.
    #[error("failed to launch recognition engine: {0}")]
    Spawn(#[from] std::io::Error),
    /// The engine exited nonzero; no usable artifact exists.
    #[error("recognition engine exited with code {code:?}")]
    Exit {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },
}

/// A leg's output artifact is missing or malformed.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The artifact file could not be read.
    #[error("artifact {} unreadable: {source}", .path.display())]
    Read {
        /// Path of the artifact that was expected.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The artifact file is not valid engine output.
    #[error("artifact {} malformed: {source}", .path.display())]
    Parse {
        /// Path of the offending artifact.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// The backend could not be notified (unreachable, error status, timeout).
#[derive(Debug, Error)]
#[error("result delivery failed: {0}")]
pub struct NotifyError(#[from] reqwest::Error);

/// Terminal failure of one job, by pipeline stage.
#[derive(Debug, Error)]
pub enum JobError {
    /// The descriptor cannot be turned into legs.
    #[error(transparent)]
    Descriptor(#[from] JobDescriptorError),
    /// Acquisition failed; the job stalls at that leg.
    #[error(transparent)]
    Acquire(#[from] AcquireError),
    /// The engine failed a leg; no assembly or delivery happens.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The recognition worker's thread died mid-job.
    #[error("recognition worker crashed")]
    WorkerCrash,
    /// Assembly failed; no delivery happens.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    /// Delivery failed after a fully transcribed job.
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
