// crates/rhtmx-resp/src/config.rs — buffer and body tuning, loaded from TOML on request

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Response engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RespConfig {
    #[serde(default)]
    pub buffers: BufferConfig,

    #[serde(default)]
    pub body: BodyConfig,
}

/// Scratch buffer pool sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Initial capacity of JSON/JSONP scratch buffers
    #[serde(default = "default_json_capacity")]
    pub json_capacity: usize,

    /// Initial capacity of large-body scratch buffers
    #[serde(default = "default_large_capacity")]
    pub large_capacity: usize,

    /// Buffers kept per pool once returned
    #[serde(default = "default_max_retained")]
    pub max_retained: usize,

    /// Buffers that grew past this many bytes are dropped instead of pooled
    #[serde(default = "default_max_buffer_size")]
    pub max_buffer_size: usize,
}

/// Body emission tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Strings longer than this are written through a pooled buffer
    #[serde(default = "default_large_string_threshold")]
    pub large_string_threshold: usize,

    /// Chunk size for stream copies
    #[serde(default = "default_stream_chunk_size")]
    pub stream_chunk_size: usize,
}

fn default_json_capacity() -> usize {
    4 * 1024
}

fn default_large_capacity() -> usize {
    64 * 1024
}

fn default_max_retained() -> usize {
    64
}

fn default_max_buffer_size() -> usize {
    1024 * 1024
}

fn default_large_string_threshold() -> usize {
    8 * 1024
}

fn default_stream_chunk_size() -> usize {
    32 * 1024
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            json_capacity: default_json_capacity(),
            large_capacity: default_large_capacity(),
            max_retained: default_max_retained(),
            max_buffer_size: default_max_buffer_size(),
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            large_string_threshold: default_large_string_threshold(),
            stream_chunk_size: default_stream_chunk_size(),
        }
    }
}

impl RespConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RespConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./rhtmx-resp.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx-resp.toml")
    }

    /// Chunk size used for streaming, never zero.
    pub fn chunk_size(&self) -> usize {
        self.body.stream_chunk_size.max(1)
    }
}

static GLOBAL: OnceCell<RespConfig> = OnceCell::new();

/// Installs the process-wide configuration. Only the first call wins; pools
/// created before this call keep the sizes they were built with.
pub fn init(config: RespConfig) -> bool {
    let installed = GLOBAL.set(config).is_ok();
    if !installed {
        tracing::warn!("rhtmx-resp config already initialised, ignoring new value");
    }
    installed
}

/// The installed configuration, or defaults when `init` was never called.
/// Never touches the filesystem; hosts that want `rhtmx-resp.toml` call
/// `init(RespConfig::load_default()?)` at startup.
pub fn get() -> &'static RespConfig {
    GLOBAL.get_or_init(RespConfig::default)
}
