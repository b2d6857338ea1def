//! ffmpeg-based conversion of arbitrary audio into 16kHz mono 16-bit WAV.
//!
//! The `CommandExecutor` trait keeps the external process behind a seam so
//! conversion can be tested without ffmpeg installed.

use crate::defaults;
use crate::error::{FunasrError, Result};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success. A missing binary maps
    /// to [`FunasrError::ToolNotFound`]; a non-zero exit maps to
    /// [`FunasrError::Transcoding`] carrying the command's stderr.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;

    /// Whether the command can be run at all.
    fn is_available(&self, command: &str) -> bool {
        self.execute(command, &["-version"]).is_ok()
    }
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FunasrError::ToolNotFound {
                    tool: command.to_string(),
                }
            } else {
                FunasrError::Transcoding {
                    tool: command.to_string(),
                    message: format!("failed to execute: {}", e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FunasrError::Transcoding {
                tool: command.to_string(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Converts audio files with ffmpeg.
pub struct Transcoder<E: CommandExecutor> {
    executor: E,
}

impl<E: CommandExecutor> Transcoder<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Whether ffmpeg is installed.
    pub fn is_available(&self) -> bool {
        self.executor.is_available(defaults::TRANSCODER)
    }

    /// Convert `input` into a 16kHz mono `pcm_s16le` WAV file at `output`.
    ///
    /// `output` is overwritten if it exists.
    pub fn to_wav(&self, input: &Path, output: &Path) -> Result<()> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        let sample_rate = defaults::SAMPLE_RATE.to_string();
        let args = [
            "-y",
            "-i",
            input.as_ref(),
            "-ar",
            sample_rate.as_str(),
            "-ac",
            "1",
            "-acodec",
            "pcm_s16le",
            output.as_ref(),
        ];

        info!(input = %input, "converting audio with {}", defaults::TRANSCODER);
        self.executor.execute(defaults::TRANSCODER, &args)?;
        debug!(output = %output, "conversion finished");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records invocations; optionally writes a WAV file to the last argument.
    ///
    /// A failing executor still answers `-version`, like an installed ffmpeg
    /// that cannot decode its input.
    pub(crate) struct MockExecutor {
        pub(crate) available: bool,
        pub(crate) fail_with: Option<String>,
        pub(crate) wav_output: Option<Vec<u8>>,
        pub(crate) calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl MockExecutor {
        pub(crate) fn missing() -> Self {
            Self {
                available: false,
                fail_with: None,
                wav_output: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn producing(wav: Vec<u8>) -> Self {
            Self {
                available: true,
                fail_with: None,
                wav_output: Some(wav),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(stderr: &str) -> Self {
            Self {
                available: true,
                fail_with: Some(stderr.to_string()),
                wav_output: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandExecutor for MockExecutor {
        fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
            self.calls.lock().unwrap().push((
                command.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
            if !self.available {
                return Err(FunasrError::ToolNotFound {
                    tool: command.to_string(),
                });
            }
            if let Some(stderr) = &self.fail_with
                && args != ["-version"]
            {
                return Err(FunasrError::Transcoding {
                    tool: command.to_string(),
                    message: stderr.clone(),
                });
            }
            if let (Some(wav), Some(out)) = (&self.wav_output, args.last())
                && args.len() > 1
            {
                std::fs::write(out, wav)?;
            }
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockExecutor;
    use super::*;
    use crate::audio::wav::make_wav_data;
    use tempfile::TempDir;

    #[test]
    fn system_executor_reports_missing_tool() {
        let executor = SystemCommandExecutor::new();
        let err = executor
            .execute("definitely-not-a-real-binary-funasr", &[])
            .unwrap_err();
        assert!(matches!(err, FunasrError::ToolNotFound { .. }));
        assert!(!executor.is_available("definitely-not-a-real-binary-funasr"));
    }

    #[test]
    fn to_wav_passes_ffmpeg_arguments() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("talk.mp3");
        let output = dir.path().join("out.wav");
        let executor = MockExecutor::producing(make_wav_data(16000, 1, 16, &[0; 4]));
        let transcoder = Transcoder::new(executor);

        transcoder.to_wav(&input, &output).unwrap();

        let calls = transcoder.executor.calls();
        assert_eq!(calls.len(), 1);
        let (command, args) = &calls[0];
        assert_eq!(command, "ffmpeg");
        assert_eq!(
            args,
            &vec![
                "-y".to_string(),
                "-i".to_string(),
                input.to_string_lossy().to_string(),
                "-ar".to_string(),
                "16000".to_string(),
                "-ac".to_string(),
                "1".to_string(),
                "-acodec".to_string(),
                "pcm_s16le".to_string(),
                output.to_string_lossy().to_string(),
            ]
        );
        assert!(output.exists());
    }

    #[test]
    fn to_wav_surfaces_tool_diagnostics() {
        let dir = TempDir::new().unwrap();
        let transcoder = Transcoder::new(MockExecutor::failing("moov atom not found"));

        let err = transcoder
            .to_wav(&dir.path().join("broken.m4a"), &dir.path().join("out.wav"))
            .unwrap_err();

        assert_eq!(err.to_string(), "ffmpeg conversion failed: moov atom not found");
    }

    #[test]
    fn availability_follows_executor() {
        assert!(!Transcoder::new(MockExecutor::missing()).is_available());
        assert!(Transcoder::new(MockExecutor::producing(Vec::new())).is_available());
        assert!(Transcoder::new(MockExecutor::failing("moov atom not found")).is_available());
    }
}
