//! Result delivery to the backend's recognition endpoint.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use callscribe_core::{CallJob, TranscriptionSegment};
use callscribe_settings::BackendSettings;

use crate::errors::NotifyError;

/// Wire body of `POST /recognitions`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionReport<'a> {
    cdr_id: i64,
    segments: &'a [TranscriptionSegment],
}

/// Delivers assembled segments to the backend.
pub struct ResultNotifier {
    client: reqwest::Client,
    base_url: String,
    developer_base_url: String,
    timeout: Duration,
}

impl ResultNotifier {
    /// Build a notifier against the configured backend.
    pub fn new(client: reqwest::Client, settings: &BackendSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            developer_base_url: settings.developer_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(settings.notify_timeout_ms),
        }
    }

    /// Post the job's segments, keyed by its CDR ID. Developer-instance jobs
    /// go to the developer backend. One attempt; failure is the caller's
    /// policy problem.
    pub async fn notify(
        &self,
        job: &CallJob,
        segments: &[TranscriptionSegment],
    ) -> Result<(), NotifyError> {
        let base = if job.developer_instance {
            &self.developer_base_url
        } else {
            &self.base_url
        };
        let url = format!("{base}/recognitions");
        debug!(cdr_id = job.id, segments = segments.len(), url = %url, "delivering transcription");

        let report = RecognitionReport {
            cdr_id: job.id,
            segments,
        };
        let _ = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&report)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
