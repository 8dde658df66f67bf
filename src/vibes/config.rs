//! # Configuration
//!
//! Vibes configuration is managed by [`confique`], which handles layered loading
//! from environment variables, TOML files, and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `COSMOS_ENDPOINT`, `COSMOS_KEY`, etc.
//! 2. **Project Config**: `./vibes.toml`, or the file passed with `--config`.
//! 3. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default |
//! |-----|-----|---------|
//! | `endpoint` | `COSMOS_ENDPOINT` | `https://localhost:8081` |
//! | `key` | `COSMOS_KEY` | (none) |
//! | `database_name` | `COSMOS_DATABASE_NAME` | `vibes` |
//! | `container_name` | `COSMOS_CONTAINER_NAME` | `items` |
//! | `disable_ssl_verification` | `DISABLE_SSL_VERIFICATION` | `false` |
//! | `request_timeout_secs` | `COSMOS_REQUEST_TIMEOUT` | `30` |
//! | `backend` | `VIBES_BACKEND` | `cosmos` |

use crate::error::{Result, VibesError};
use confique::Config;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "vibes.toml";

/// Which [`VibeStore`](crate::store::VibeStore) a session runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    Cosmos,
    Memory,
}

impl FromStr for BackendKind {
    type Err = VibesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosmos" => Ok(BackendKind::Cosmos),
            "memory" => Ok(BackendKind::Memory),
            other => Err(VibesError::InvalidConfig(format!(
                "unknown backend '{}' (expected 'cosmos' or 'memory')",
                other
            ))),
        }
    }
}

#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct VibesConfig {
    /// Account endpoint, e.g. the local emulator.
    #[config(env = "COSMOS_ENDPOINT", default = "https://localhost:8081")]
    pub endpoint: String,

    /// Base64 account master key.
    #[config(env = "COSMOS_KEY")]
    pub key: Option<String>,

    #[config(env = "COSMOS_DATABASE_NAME", default = "vibes")]
    pub database_name: String,

    #[config(env = "COSMOS_CONTAINER_NAME", default = "items")]
    pub container_name: String,

    /// Accept self-signed certificates (the emulator ships one).
    #[config(env = "DISABLE_SSL_VERIFICATION", default = false)]
    pub disable_ssl_verification: bool,

    /// Applies to both connecting and the whole request.
    #[config(env = "COSMOS_REQUEST_TIMEOUT", default = 30)]
    pub request_timeout_secs: u64,

    /// `cosmos` or `memory`.
    #[config(env = "VIBES_BACKEND", default = "cosmos")]
    pub backend: String,
}

/// Where configuration files are looked up.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub project: PathBuf,
    pub global: Option<PathBuf>,
}

impl ConfigPaths {
    /// `./vibes.toml` (or an explicit override) plus the user-wide file.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        let project = explicit.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
        let global = ProjectDirs::from("com", "vibes", "vibes")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME));
        Self { project, global }
    }
}

impl VibesConfig {
    pub fn load(paths: &ConfigPaths) -> Result<Self> {
        Self::layered(paths, true)
    }

    fn layered(paths: &ConfigPaths, with_env: bool) -> Result<Self> {
        let mut builder = Self::builder();
        if with_env {
            builder = builder.env();
        }
        builder = builder.file(paths.project.clone());
        if let Some(global) = &paths.global {
            builder = builder.file(global.clone());
        }
        Ok(builder.load()?)
    }

    pub fn backend(&self) -> Result<BackendKind> {
        self.backend.parse()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The master key, or the startup error shown when it is missing.
    pub fn require_key(&self) -> Result<&str> {
        self.key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                VibesError::InvalidConfig("COSMOS_KEY not found in environment variables".into())
            })
    }
}
