//! Idempotency probe: has this call already been transcribed?

use std::time::Duration;

use tracing::debug;

use callscribe_core::CallJob;
use callscribe_settings::BackendSettings;

/// Existence probe against the backend, keyed by the call's unique ID.
///
/// Probing targets the same backend instance the result would be delivered
/// to, so developer-instance jobs are checked against the developer backend.
///
/// The probe is keyed on the whole job: a job that failed partway through a
/// previous delivery attempt still probes as absent and is redone from leg A.
pub struct IdempotencyProbe {
    client: reqwest::Client,
    base_url: String,
    developer_base_url: String,
    timeout: Duration,
}

impl IdempotencyProbe {
    /// Build a probe against the configured backend.
    pub fn new(client: reqwest::Client, settings: &BackendSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            developer_base_url: settings.developer_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(settings.probe_timeout_ms),
        }
    }

    /// `true` only on a success response for the job's unique ID.
    ///
    /// Every other outcome — 404, 5xx, timeout, connection failure — reads
    /// as "not yet transcribed": the cost of redoing work is accepted over
    /// the cost of silently dropping a call.
    pub async fn already_transcribed(&self, job: &CallJob) -> bool {
        let base = if job.developer_instance {
            &self.developer_base_url
        } else {
            &self.base_url
        };
        let url = format!("{base}/recognitions/{}", job.unique_id);
        match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(unique_id = %job.unique_id, error = %e, "probe failed, treating as not transcribed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscribe_core::CallSource;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn job(developer_instance: bool) -> CallJob {
        CallJob {
            id: 1,
            unique_id: "100.1".into(),
            source: CallSource::Inbound,
            upload_file_name: None,
            developer_instance,
        }
    }

    fn probe(standard: &str, developer: &str) -> IdempotencyProbe {
        IdempotencyProbe::new(
            reqwest::Client::new(),
            &BackendSettings {
                base_url: standard.to_string(),
                developer_base_url: developer.to_string(),
                probe_timeout_ms: 2_000,
                notify_timeout_ms: 60_000,
            },
        )
    }

    #[tokio::test]
    async fn found_recognition_reads_as_transcribed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recognitions/100.1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        assert!(probe(&server.uri(), &server.uri()).already_transcribed(&job(false)).await);
    }

    #[tokio::test]
    async fn not_found_reads_as_novel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(!probe(&server.uri(), &server.uri()).already_transcribed(&job(false)).await);
    }

    #[tokio::test]
    async fn server_error_reads_as_novel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(!probe(&server.uri(), &server.uri()).already_transcribed(&job(false)).await);
    }

    #[tokio::test]
    async fn unreachable_backend_reads_as_novel() {
        // Nothing listens here
        assert!(
            !probe("http://127.0.0.1:9", "http://127.0.0.1:9")
                .already_transcribed(&job(false))
                .await
        );
    }

    #[tokio::test]
    async fn developer_jobs_probe_the_developer_backend() {
        let standard = MockServer::start().await;
        let developer = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recognitions/100.1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&developer)
            .await;
        // The standard backend must not be consulted
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&standard)
            .await;

        assert!(
            probe(&standard.uri(), &developer.uri())
                .already_transcribed(&job(true))
                .await
        );
    }
}
