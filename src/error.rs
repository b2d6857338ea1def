//! Error types for funasr-client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FunasrError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to serialize configuration: {message}")]
    ConfigSerialize { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Input parsing errors
    #[error("Invalid mode '{value}': expected offline, online or 2pass")]
    InvalidMode { value: String },

    #[error("Invalid chunk size '{value}': {message}")]
    InvalidChunkSize { value: String, message: String },

    // Audio errors
    #[error("Audio file not found: {path}")]
    AudioFileNotFound { path: String },

    #[error("Unsupported audio format: {message}")]
    AudioFormat { message: String },

    #[error("{tool} conversion failed: {message}")]
    Transcoding { tool: String, message: String },

    #[error("External tool not found: {tool}")]
    ToolNotFound { tool: String },

    // Transport errors
    #[error("Connection to {uri} failed: {message}")]
    Connection { uri: String, message: String },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] rustls::Error),

    // Protocol errors
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, FunasrError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = FunasrError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = FunasrError::ConfigInvalidValue {
            key: "stream.chunk_interval".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for stream.chunk_interval: must be positive"
        );
    }

    #[test]
    fn test_invalid_mode_display() {
        let error = FunasrError::InvalidMode {
            value: "batch".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid mode 'batch': expected offline, online or 2pass"
        );
    }

    #[test]
    fn test_invalid_chunk_size_display() {
        let error = FunasrError::InvalidChunkSize {
            value: "5,10".to_string(),
            message: "expected three comma-separated integers".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid chunk size '5,10': expected three comma-separated integers"
        );
    }

    #[test]
    fn test_audio_file_not_found_display() {
        let error = FunasrError::AudioFileNotFound {
            path: "/tmp/missing.wav".to_string(),
        };
        assert_eq!(error.to_string(), "Audio file not found: /tmp/missing.wav");
    }

    #[test]
    fn test_transcoding_display_carries_tool_output() {
        let error = FunasrError::Transcoding {
            tool: "ffmpeg".to_string(),
            message: "Invalid data found when processing input".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "ffmpeg conversion failed: Invalid data found when processing input"
        );
    }

    #[test]
    fn test_connection_display() {
        let error = FunasrError::Connection {
            uri: "wss://localhost:10095".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Connection to wss://localhost:10095 failed: connection refused"
        );
    }

    #[test]
    fn test_protocol_display() {
        let error = FunasrError::Protocol {
            message: "server sent invalid JSON".to_string(),
        };
        assert_eq!(error.to_string(), "Protocol error: server sent invalid JSON");
    }

    #[test]
    fn test_config_serialize_display() {
        let error = FunasrError::ConfigSerialize {
            message: "unsupported value".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to serialize configuration: unsupported value"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: FunasrError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: FunasrError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: FunasrError = json_error.into();
        assert!(error.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_from_websocket_error() {
        let ws_error = tokio_tungstenite::tungstenite::Error::ConnectionClosed;
        let error: FunasrError = ws_error.into();
        assert!(error.to_string().starts_with("WebSocket error"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: FunasrError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<FunasrError>();
        assert_sync::<FunasrError>();
    }

    #[test]
    fn test_error_debug_format() {
        let error = FunasrError::AudioFileNotFound {
            path: "/test/path".to_string(),
        };
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("AudioFileNotFound"));
        assert!(debug_str.contains("/test/path"));
    }
}
