use crate::defaults;
use crate::error::{FunasrError, Result};
use crate::protocol::{ChunkSize, Mode};
use crate::session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub stream: StreamConfig,
}

/// Where the FunASR server lives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub ssl: bool,
}

/// Streaming protocol parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    pub mode: Mode,
    pub chunk_size: ChunkSize,
    pub chunk_interval: u32,
    pub itn: bool,
    pub final_wait_secs: f64,
    pub receive_timeout_secs: u64,
    pub settle_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            ssl: true,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Offline,
            chunk_size: ChunkSize::default(),
            chunk_interval: defaults::CHUNK_INTERVAL,
            itn: true,
            final_wait_secs: defaults::FINAL_WAIT_SECS,
            receive_timeout_secs: defaults::RECEIVE_TIMEOUT_SECS,
            settle_delay_ms: defaults::SETTLE_DELAY_MS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FunasrError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                FunasrError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(FunasrError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - FUNASR_HOST → server.host
    /// - FUNASR_PORT → server.port
    /// - FUNASR_SSL → server.ssl (`1`/`0`/`true`/`false`)
    /// - FUNASR_MODE → stream.mode
    ///
    /// Empty or unparsable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("FUNASR_HOST")
            && !host.is_empty()
        {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("FUNASR_PORT")
            && let Ok(port) = port.trim().parse()
        {
            self.server.port = port;
        }

        if let Ok(ssl) = std::env::var("FUNASR_SSL")
            && let Some(ssl) = parse_bool(&ssl)
        {
            self.server.ssl = ssl;
        }

        if let Ok(mode) = std::env::var("FUNASR_MODE")
            && let Ok(mode) = mode.parse()
        {
            self.stream.mode = mode;
        }

        self
    }

    /// Reject values that would break the chunking arithmetic.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(FunasrError::ConfigInvalidValue {
                key: "server.port".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.server.host.trim().is_empty() {
            return Err(FunasrError::ConfigInvalidValue {
                key: "server.host".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.stream.chunk_interval == 0 {
            return Err(FunasrError::ConfigInvalidValue {
                key: "stream.chunk_interval".to_string(),
                message: "must be positive".to_string(),
            });
        }
        self.final_wait()?;
        Ok(())
    }

    /// `stream.final_wait_secs` as a `Duration`; negative, NaN or
    /// out-of-range values are rejected.
    fn final_wait(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.stream.final_wait_secs).map_err(|_| {
            FunasrError::ConfigInvalidValue {
                key: "stream.final_wait_secs".to_string(),
                message: format!(
                    "{} is not a usable non-negative number of seconds",
                    self.stream.final_wait_secs
                ),
            }
        })
    }

    /// Session parameters for the client.
    pub fn session(&self) -> Result<SessionConfig> {
        self.validate()?;
        Ok(SessionConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            ssl: self.server.ssl,
            mode: self.stream.mode,
            chunk_size: self.stream.chunk_size,
            chunk_interval: self.stream.chunk_interval,
            itn: self.stream.itn,
            final_wait: self.final_wait()?,
            receive_timeout: Duration::from_secs(self.stream.receive_timeout_secs),
            settle_delay: Duration::from_millis(self.stream.settle_delay_ms),
        })
    }

    /// Serialize as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FunasrError::ConfigSerialize {
            message: e.to_string(),
        })
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/funasr-client/config.toml on Linux, or `None` when
    /// no config directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("funasr-client").join("config.toml"))
    }
}

/// Parse `1`/`0`/`true`/`false`/`yes`/`no`/`on`/`off`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
