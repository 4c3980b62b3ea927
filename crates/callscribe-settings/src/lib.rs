//! # callscribe-settings
//!
//! Layered configuration for the callscribe service.
//!
//! Settings are resolved in three layers, lowest priority first:
//!
//! 1. Compiled defaults ([`CallscribeSettings::default()`])
//! 2. `~/.callscribe/settings.json`, deep-merged over the defaults
//! 3. `CALLSCRIBE_*` environment variables (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::SettingsError;
pub use loader::{load_settings, load_settings_from_path, settings_path};
pub use types::{
    BackendSettings, CallscribeSettings, CleanupMode, EngineSettings, HttpSettings, PbxSettings,
};
