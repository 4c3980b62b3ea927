//! Audio acquisition: one remote recording streamed to local storage.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tracing::debug;

use callscribe_core::AudioLeg;
use callscribe_settings::PbxSettings;

use crate::errors::AcquireError;

/// Fetches one named audio artifact from the PBX origin to local storage.
pub struct AudioFetcher {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl AudioFetcher {
    /// Build a fetcher against the configured PBX origin.
    pub fn new(client: reqwest::Client, settings: &PbxSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(settings.fetch_timeout_ms),
        }
    }

    /// Stream the leg's recording into `audio_dir`.
    ///
    /// Returns only once the local file is fully written and flushed. Any
    /// remote or disk failure abandons the leg — no partial-file recovery,
    /// no retry.
    pub async fn fetch(&self, leg: &AudioLeg, audio_dir: &Path) -> Result<PathBuf, AcquireError> {
        let url = format!("{}/{}", self.base_url, leg.remote_path);
        debug!(url = %url, "fetching audio");

        let mut response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let path = leg.audio_path(audio_dir);
        let mut file = tokio::fs::File::create(&path).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(path = %path.display(), "audio stored");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use callscribe_core::LegTag;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(base_url: &str) -> AudioFetcher {
        AudioFetcher::new(
            reqwest::Client::new(),
            &PbxSettings {
                base_url: base_url.to_string(),
                fetch_timeout_ms: 5_000,
            },
        )
    }

    #[tokio::test]
    async fn streams_leg_audio_to_disk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/100-1-a.sln"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"raw audio bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let leg = AudioLeg::call_leg("100.1", LegTag::A);
        let stored = fetcher(&server.uri()).fetch(&leg, dir.path()).await.unwrap();

        assert_eq!(stored, dir.path().join("100-1-a.sln"));
        assert_eq!(std::fs::read(stored).unwrap(), b"raw audio bytes");
    }

    #[tokio::test]
    async fn upload_legs_fetch_under_the_mp3_subpath() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mp3s/meeting.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let leg = AudioLeg::upload("meeting.mp3");
        let stored = fetcher(&server.uri()).fetch(&leg, dir.path()).await.unwrap();
        assert_eq!(stored, dir.path().join("meeting.mp3"));
    }

    #[tokio::test]
    async fn missing_recording_is_an_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let leg = AudioLeg::call_leg("100.1", LegTag::A);
        let result = fetcher(&server.uri()).fetch(&leg, dir.path()).await;
        assert_matches!(result, Err(AcquireError::Http(_)));
    }

    #[tokio::test]
    async fn unwritable_audio_dir_is_an_io_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .mount(&server)
            .await;

        let leg = AudioLeg::call_leg("100.1", LegTag::A);
        let result = fetcher(&server.uri())
            .fetch(&leg, Path::new("/nonexistent-callscribe-dir"))
            .await;
        assert_matches!(result, Err(AcquireError::Io(_)));
    }
}
