//! JSON message schema spoken with a FunASR WebSocket server.
//!
//! The client sends one [`StartMessage`] (text), the audio as binary frames,
//! and one [`EndMessage`] (text). The server answers with [`ServerMessage`]s;
//! only those carrying `text` become [`Segment`]s.

use crate::defaults;
use crate::error::{FunasrError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recognition mode requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "offline")]
    Offline,
    #[serde(rename = "online")]
    Online,
    #[serde(rename = "2pass")]
    TwoPass,
}

impl Mode {
    /// Wire spelling of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Offline => "offline",
            Mode::Online => "online",
            Mode::TwoPass => "2pass",
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Mode::Offline)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = FunasrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "offline" => Ok(Mode::Offline),
            "online" => Ok(Mode::Online),
            "2pass" => Ok(Mode::TwoPass),
            other => Err(FunasrError::InvalidMode {
                value: other.to_string(),
            }),
        }
    }
}

/// Chunk-size triple, in 60ms units: `[lookahead, chunk, lookbehind]`.
///
/// Only the middle value drives the client's stride and pacing; the whole
/// triple is forwarded to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 3]", into = "[u32; 3]")]
pub struct ChunkSize([u32; 3]);

impl ChunkSize {
    /// Create a chunk size, rejecting zero entries.
    pub fn new(values: [u32; 3]) -> Result<Self> {
        if values.contains(&0) {
            return Err(FunasrError::InvalidChunkSize {
                value: format!("{},{},{}", values[0], values[1], values[2]),
                message: "values must be positive".to_string(),
            });
        }
        Ok(Self(values))
    }

    /// The chunk window (middle value) that sizes each audio message.
    pub fn window(&self) -> u32 {
        self.0[1]
    }

    pub fn values(&self) -> [u32; 3] {
        self.0
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self(defaults::CHUNK_SIZE)
    }
}

impl TryFrom<[u32; 3]> for ChunkSize {
    type Error = FunasrError;

    fn try_from(values: [u32; 3]) -> Result<Self> {
        Self::new(values)
    }
}

impl From<ChunkSize> for [u32; 3] {
    fn from(chunk_size: ChunkSize) -> Self {
        chunk_size.0
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for ChunkSize {
    type Err = FunasrError;

    /// Parse `"5,10,5"` style input.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |message: &str| FunasrError::InvalidChunkSize {
            value: s.to_string(),
            message: message.to_string(),
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid("expected three comma-separated integers"));
        }

        let mut values = [0u32; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| invalid(&format!("'{}' is not a non-negative integer", part)))?;
        }

        Self::new(values).map_err(|_| invalid("values must be positive"))
    }
}

/// Format tag describing the audio payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Little-endian 16-bit PCM.
    Pcm,
    /// Undecoded container bytes passed through for the server to handle.
    Others,
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioFormat::Pcm => f.write_str("pcm"),
            AudioFormat::Others => f.write_str("others"),
        }
    }
}

/// First message of a session, sent as text before any audio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartMessage {
    pub mode: Mode,
    pub chunk_size: ChunkSize,
    pub chunk_interval: u32,
    pub encoder_chunk_look_back: u32,
    pub decoder_chunk_look_back: u32,
    pub audio_fs: u32,
    pub wav_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wav_format: Option<AudioFormat>,
    pub is_speaking: bool,
    pub itn: bool,
}

impl StartMessage {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// End-of-speech marker sent after the last audio chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndMessage {
    pub is_speaking: bool,
}

impl EndMessage {
    pub fn new() -> Self {
        Self { is_speaking: false }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for EndMessage {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything the server sends. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ServerMessage {
    pub text: Option<String>,
    pub wav_name: Option<String>,
    pub timestamp: Option<serde_json::Value>,
    pub is_final: Option<bool>,
    pub mode: Option<String>,
}

impl ServerMessage {
    /// Parse a server payload.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| FunasrError::Protocol {
            message: format!("server sent invalid JSON: {}", e),
        })
    }

    /// Turn the message into a segment, or `None` when it carries no text.
    pub fn into_segment(self, session_mode: Mode) -> Option<Segment> {
        let text = self.text?;
        Some(Segment {
            text,
            wav_name: self
                .wav_name
                .unwrap_or_else(|| defaults::DEFAULT_WAV_NAME.to_string()),
            timestamp: self
                .timestamp
                .unwrap_or_else(|| serde_json::Value::String(String::new())),
            is_final: self.is_final.unwrap_or(false),
            mode: self.mode.unwrap_or_else(|| session_mode.to_string()),
        })
    }
}

/// One transcript fragment as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub wav_name: String,
    pub timestamp: serde_json::Value,
    pub is_final: bool,
    /// Server-reported mode, e.g. `2pass-online`.
    pub mode: String,
}
