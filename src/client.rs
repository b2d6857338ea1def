//! Transcription client: one connection, send then receive.

use crate::audio::loader::STDIN_PATH;
use crate::audio::transcode::{CommandExecutor, SystemCommandExecutor};
use crate::audio::{AudioBuffer, AudioLoader};
use crate::defaults;
use crate::error::{FunasrError, Result};
use crate::protocol::Segment;
use crate::session::{SessionConfig, receive_segments, send_audio, send_chunks};
use crate::text::join_segments;
use crate::transport::{self, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of one transcription session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Cleaned segment texts joined with spaces.
    pub text: String,
    /// Segments in the order received.
    pub segments: Vec<Segment>,
    /// Source file, absent for in-memory streams.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub audio_file: Option<String>,
}

impl Transcription {
    pub fn from_segments(segments: Vec<Segment>, audio_file: Option<String>) -> Self {
        let text = join_segments(segments.iter().map(|s| s.text.as_str()));
        Self {
            text,
            segments,
            audio_file,
        }
    }
}

/// Client for a FunASR WebSocket server.
pub struct FunasrClient<E: CommandExecutor = SystemCommandExecutor> {
    config: SessionConfig,
    loader: AudioLoader<E>,
}

impl FunasrClient<SystemCommandExecutor> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_loader(config, AudioLoader::system())
    }
}

impl<E: CommandExecutor> FunasrClient<E> {
    /// Client with a custom audio loader (e.g. a mocked transcoder).
    pub fn with_loader(config: SessionConfig, loader: AudioLoader<E>) -> Self {
        Self { config, loader }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Load `path` and transcribe it.
    pub async fn transcribe_file(&self, path: &Path) -> Result<Transcription> {
        let is_stdin = path.as_os_str() == STDIN_PATH;
        if !is_stdin && !path.exists() {
            return Err(FunasrError::AudioFileNotFound {
                path: path.display().to_string(),
            });
        }

        info!(path = %path.display(), "reading audio file");
        let audio = self.loader.load(path)?;
        info!(
            bytes = audio.len(),
            sample_rate = audio.sample_rate,
            duration_secs = audio.duration_secs(),
            "audio ready"
        );

        let wav_name = if is_stdin {
            defaults::DEFAULT_WAV_NAME.to_string()
        } else {
            wav_name_for(path)
        };

        let segments = self.transcribe_audio(&audio, &wav_name).await?;
        Ok(Transcription::from_segments(
            segments,
            Some(path.display().to_string()),
        ))
    }

    /// Transcribe an already loaded buffer; returns the raw segments.
    pub async fn transcribe_audio(
        &self,
        audio: &AudioBuffer,
        wav_name: &str,
    ) -> Result<Vec<Segment>> {
        let mut connection = transport::connect(&self.config).await?;

        send_audio(&mut connection, audio, wav_name, &self.config).await?;
        tokio::time::sleep(self.config.settle_delay).await;

        let segments = self.receive(&mut connection).await?;
        close(&mut connection).await;
        Ok(segments)
    }

    /// Transcribe caller-provided chunks without slicing or real-time pacing.
    pub async fn transcribe_stream<I>(&self, chunks: I, sample_rate: u32) -> Result<Transcription>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut connection = transport::connect(&self.config).await?;

        send_chunks(&mut connection, chunks, sample_rate, &self.config).await?;
        tokio::time::sleep(Duration::from_millis(defaults::STREAM_SETTLE_DELAY_MS)).await;

        let segments = self.receive(&mut connection).await?;
        close(&mut connection).await;
        Ok(Transcription::from_segments(segments, None))
    }

    /// Run the receiver under the session timeout. Timing out yields no
    /// segments rather than an error.
    async fn receive(&self, connection: &mut Connection) -> Result<Vec<Segment>> {
        match tokio::time::timeout(
            self.config.receive_timeout,
            receive_segments(connection, &self.config),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_secs = self.config.receive_timeout.as_secs_f64(),
                    "timeout waiting for results"
                );
                Ok(Vec::new())
            }
        }
    }
}

/// `wav_name` for a file: its stem, or `demo` when it has none.
pub fn wav_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| defaults::DEFAULT_WAV_NAME.to_string())
}

async fn close(connection: &mut Connection) {
    if let Err(e) = connection.close(None).await {
        debug!(error = %e, "closing connection");
    }
}
