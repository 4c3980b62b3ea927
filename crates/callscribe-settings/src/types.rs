//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so partial JSON files work — missing fields get their production default.

use serde::{Deserialize, Serialize};

/// Root settings type for the callscribe service.
///
/// Loaded from `~/.callscribe/settings.json` with defaults applied for
/// missing fields. Environment variables can override specific values.
///
/// # JSON Format
///
/// ```json
/// {
///   "server": { "port": 3000 },
///   "backend": { "baseUrl": "https://backend.example.com" },
///   "cleanupMode": "onNotifySuccess"
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallscribeSettings {
    /// HTTP ingress settings.
    pub server: HttpSettings,
    /// PBX recording origin settings.
    pub pbx: PbxSettings,
    /// Result backend settings.
    pub backend: BackendSettings,
    /// External recognition engine settings.
    pub engine: EngineSettings,
    /// Whether local artifacts are deleted after a failed delivery.
    pub cleanup_mode: CleanupMode,
}

/// HTTP ingress settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Where call-leg recordings are fetched from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PbxSettings {
    /// Base URL of the PBX recording origin.
    pub base_url: String,
    /// Timeout for one audio download, milliseconds.
    pub fetch_timeout_ms: u64,
}

impl Default for PbxSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8088".to_string(),
            fetch_timeout_ms: 120_000,
        }
    }
}

/// Where results are probed for and delivered to.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendSettings {
    /// Base URL of the standard backend.
    pub base_url: String,
    /// Base URL of the developer-instance backend, used for jobs flagged
    /// `isDeveloperInstance`.
    pub developer_base_url: String,
    /// Timeout for the idempotency probe, milliseconds.
    pub probe_timeout_ms: u64,
    /// Timeout for result delivery, milliseconds. Sized to the slowest
    /// expected backend round trip.
    pub notify_timeout_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            developer_base_url: "http://127.0.0.1:8081".to_string(),
            probe_timeout_ms: 10_000,
            notify_timeout_ms: 60_000,
        }
    }
}

/// External recognition engine invocation settings.
///
/// The engine is an opaque subprocess; these map directly onto its
/// command line.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Program to invoke.
    pub command: String,
    /// Model name passed as `--model`.
    pub model: String,
    /// Recognition language passed as `--language`.
    pub language: String,
    /// Beam width passed as `--beam_size`.
    pub beam_size: u32,
    /// Patience factor passed as `--patience`.
    pub patience: u32,
    /// Directory holding in-flight audio files.
    pub audio_dir: String,
    /// Directory the engine writes JSON artifacts into.
    pub transcript_dir: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            command: "whisper".to_string(),
            model: "turbo".to_string(),
            language: "pt".to_string(),
            beam_size: 5,
            patience: 2,
            audio_dir: "audios".to_string(),
            transcript_dir: "transcriptions".to_string(),
        }
    }
}

/// When local audio and artifact files are deleted.
///
/// Cleanup after a *successful* delivery always happens; this switch decides
/// the failed-delivery path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CleanupMode {
    /// Delete artifacts whether or not delivery succeeded.
    #[default]
    Always,
    /// Keep artifacts on disk when delivery failed.
    OnNotifySuccess,
}
