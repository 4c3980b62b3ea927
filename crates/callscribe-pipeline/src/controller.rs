//! The job admission controller.
//!
//! Top-level orchestrator: accepts or rejects jobs against the single worker
//! slot, then drives an accepted job through
//! probe → acquire/transcribe per leg → assemble → deliver → clean up.
//! This is a single-flight gate, not a queue — a rejected job is the
//! transport's problem to redeliver.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use callscribe_core::CallJob;
use callscribe_settings::{CallscribeSettings, CleanupMode};

use crate::acquire::AudioFetcher;
use crate::assemble::assemble;
use crate::engine::RecognizerFactory;
use crate::errors::JobError;
use crate::notify::ResultNotifier;
use crate::probe::IdempotencyProbe;
use crate::reaper::cleanup;
use crate::slot::WorkerSlot;
use crate::worker::WorkerHandle;

/// Outcome of an admission decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The job holds the slot; the pipeline is running.
    Accepted,
    /// Another job holds the slot. Nothing happened.
    Busy,
}

/// Owns the worker slot, the recognition worker, and every pipeline stage.
pub struct AdmissionController {
    slot: WorkerSlot,
    worker: Mutex<WorkerHandle>,
    recognizers: RecognizerFactory,
    fetcher: AudioFetcher,
    probe: IdempotencyProbe,
    notifier: ResultNotifier,
    audio_dir: PathBuf,
    transcript_dir: PathBuf,
    cleanup_mode: CleanupMode,
}

impl AdmissionController {
    /// Wire the controller and spawn the initial recognition worker.
    pub fn new(
        settings: &CallscribeSettings,
        client: reqwest::Client,
        recognizers: RecognizerFactory,
    ) -> Arc<Self> {
        let worker = WorkerHandle::spawn(&recognizers);
        Arc::new(Self {
            slot: WorkerSlot::new(),
            worker: Mutex::new(worker),
            recognizers,
            fetcher: AudioFetcher::new(client.clone(), &settings.pbx),
            probe: IdempotencyProbe::new(client.clone(), &settings.backend),
            notifier: ResultNotifier::new(client, &settings.backend),
            audio_dir: PathBuf::from(&settings.engine.audio_dir),
            transcript_dir: PathBuf::from(&settings.engine.transcript_dir),
            cleanup_mode: settings.cleanup_mode,
        })
    }

    /// Whether a job currently holds the worker slot.
    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    /// Admit a job or reject it immediately.
    ///
    /// The slot is claimed synchronously before this returns, so two
    /// concurrent submissions cannot both be accepted. The accepted job runs
    /// on a spawned task; the caller is never blocked for its duration.
    pub fn submit(self: &Arc<Self>, job: CallJob) -> Submission {
        if !self.slot.try_acquire() {
            info!(cdr_id = job.id, unique_id = %job.unique_id, "worker busy, job rejected");
            return Submission::Busy;
        }
        info!(cdr_id = job.id, unique_id = %job.unique_id, source = ?job.source, "job admitted");
        let controller = Arc::clone(self);
        drop(tokio::spawn(async move { controller.run(job).await }));
        Submission::Accepted
    }

    /// Drive one admitted job to its terminal state and release the slot
    /// exactly once.
    async fn run(&self, job: CallJob) {
        let crashed = match self.drive(&job).await {
            Ok(()) => false,
            Err(JobError::WorkerCrash) => {
                error!(cdr_id = job.id, "worker crashed, job abandoned");
                true
            }
            Err(e) => {
                warn!(cdr_id = job.id, error = %e, "job abandoned");
                false
            }
        };
        if crashed {
            // Fresh worker first, then the slot: there is never a window
            // where the slot is free but no worker exists to serve it.
            *self.worker.lock() = WorkerHandle::spawn(&self.recognizers);
        }
        self.slot.release();
    }

    async fn drive(&self, job: &CallJob) -> Result<(), JobError> {
        if self.probe.already_transcribed(job).await {
            info!(cdr_id = job.id, unique_id = %job.unique_id, "already transcribed, skipping");
            return Ok(());
        }

        let legs = job.legs()?;
        for leg in &legs {
            let audio_path = self.fetcher.fetch(leg, &self.audio_dir).await?;
            debug!(cdr_id = job.id, leg = ?leg.tag, "audio acquired");
            let worker = self.worker.lock().clone();
            worker.transcribe(audio_path).await?;
            info!(cdr_id = job.id, leg = ?leg.tag, "leg transcribed");
        }

        let segments = assemble(&legs, &self.transcript_dir).await?;
        match self.notifier.notify(job, &segments).await {
            Ok(()) => {
                info!(cdr_id = job.id, segments = segments.len(), "transcription delivered");
                cleanup(&legs, &self.audio_dir, &self.transcript_dir).await;
                Ok(())
            }
            Err(e) => {
                if self.cleanup_mode == CleanupMode::Always {
                    cleanup(&legs, &self.audio_dir, &self.transcript_dir).await;
                }
                Err(e.into())
            }
        }
    }
}
