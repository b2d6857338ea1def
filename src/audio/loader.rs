//! Audio file loading: WAV, raw PCM, ffmpeg transcoding, raw fallback.

use crate::audio::transcode::{CommandExecutor, SystemCommandExecutor, Transcoder};
use crate::audio::wav::{WavPcm, looks_like_wav, read_wav};
use crate::defaults;
use crate::error::{FunasrError, Result};
use crate::protocol::AudioFormat;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use tracing::{info, warn};

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Audio ready for transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Little-endian 16-bit PCM, or container bytes when `format` is `Others`.
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
    pub format: AudioFormat,
}

impl AudioBuffer {
    pub fn pcm(bytes: Vec<u8>, sample_rate: u32) -> Self {
        Self {
            bytes,
            sample_rate,
            format: AudioFormat::Pcm,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Duration assuming mono 16-bit samples.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.bytes.len() as f64 / 2.0 / self.sample_rate as f64
    }
}

impl From<WavPcm> for AudioBuffer {
    fn from(wav: WavPcm) -> Self {
        AudioBuffer::pcm(wav.bytes, wav.sample_rate)
    }
}

/// Loads audio files, transcoding through ffmpeg when needed.
pub struct AudioLoader<E: CommandExecutor> {
    transcoder: Transcoder<E>,
}

impl AudioLoader<SystemCommandExecutor> {
    /// Loader backed by the real ffmpeg binary.
    pub fn system() -> Self {
        Self::new(SystemCommandExecutor::new())
    }
}

impl<E: CommandExecutor> AudioLoader<E> {
    pub fn new(executor: E) -> Self {
        Self {
            transcoder: Transcoder::new(executor),
        }
    }

    /// Load an audio file by extension.
    ///
    /// - `.wav` is parsed; non-16-bit WAV goes through ffmpeg when present.
    /// - `.pcm` is raw 16kHz PCM.
    /// - anything else is converted with ffmpeg, or passed through raw and
    ///   tagged `others` when ffmpeg is missing.
    /// - `-` reads standard input.
    pub fn load(&self, path: &Path) -> Result<AudioBuffer> {
        if path.as_os_str() == STDIN_PATH {
            return self.load_stdin();
        }

        if !path.exists() {
            return Err(FunasrError::AudioFileNotFound {
                path: path.display().to_string(),
            });
        }

        let suffix = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let buffer = match suffix.as_str() {
            "wav" => match read_wav(BufReader::new(File::open(path)?)) {
                Ok(wav) => AudioBuffer::from(wav),
                Err(FunasrError::AudioFormat { message }) if self.transcoder.is_available() => {
                    warn!(reason = %message, "WAV needs conversion");
                    self.transcode(path)?
                }
                Err(e) => return Err(e),
            },
            "pcm" => AudioBuffer::pcm(std::fs::read(path)?, defaults::SAMPLE_RATE),
            _ if self.transcoder.is_available() => self.transcode(path)?,
            _ => {
                warn!(
                    path = %path.display(),
                    "{} not found, sending raw bytes", defaults::TRANSCODER
                );
                AudioBuffer {
                    bytes: std::fs::read(path)?,
                    sample_rate: defaults::SAMPLE_RATE,
                    format: AudioFormat::Others,
                }
            }
        };

        info!(
            bytes = buffer.len(),
            sample_rate = buffer.sample_rate,
            format = %buffer.format,
            "audio loaded"
        );
        Ok(buffer)
    }

    /// Read all of standard input and decode it with [`Self::load_bytes`].
    pub fn load_stdin(&self) -> Result<AudioBuffer> {
        let mut data = Vec::new();
        std::io::stdin().lock().read_to_end(&mut data)?;
        self.load_bytes(data)
    }

    /// Decode in-memory audio: WAV when it has a RIFF header, else raw 16kHz PCM.
    pub fn load_bytes(&self, data: Vec<u8>) -> Result<AudioBuffer> {
        if looks_like_wav(&data) {
            Ok(read_wav(Cursor::new(data))?.into())
        } else {
            Ok(AudioBuffer::pcm(data, defaults::SAMPLE_RATE))
        }
    }

    fn transcode(&self, path: &Path) -> Result<AudioBuffer> {
        let temp = tempfile::Builder::new()
            .prefix("funasr-")
            .suffix(".wav")
            .tempfile()?
            .into_temp_path();

        self.transcoder.to_wav(path, &temp)?;
        let wav = read_wav(BufReader::new(File::open(&temp)?))?;
        info!(
            bytes = wav.bytes.len(),
            sample_rate = wav.sample_rate,
            "{} conversion complete", defaults::TRANSCODER
        );
        Ok(wav.into())
    }
}

/// Load an audio file with the system ffmpeg.
pub fn load_audio(path: &Path) -> Result<AudioBuffer> {
    AudioLoader::system().load(path)
}
