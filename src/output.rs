//! Terminal and file output for a finished transcription.

use crate::client::Transcription;
use crate::error::Result;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Width of the `=` rules around the transcript.
const RULE_WIDTH: usize = 50;

/// Transcript framed by `=` rules, ready to print.
pub fn render_transcript(text: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\nTranscription Result:\n{rule}\n{text}\n{rule}\n")
}

/// Print the framed transcript to stdout.
pub fn print_transcript(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(render_transcript(text).as_bytes())?;
    stdout.flush()
}

/// Write `result` as pretty-printed JSON. Non-ASCII text is kept as-is.
pub fn write_json(path: &Path, result: &Transcription) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Segment;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[test]
    fn transcript_is_framed() {
        let rendered = render_transcript("hello world");
        let lines: Vec<&str> = rendered.lines().collect();
        let rule = "=".repeat(50);

        assert_eq!(
            lines,
            vec![
                "",
                rule.as_str(),
                "Transcription Result:",
                rule.as_str(),
                "hello world",
                rule.as_str(),
            ]
        );
    }

    #[test]
    fn empty_transcript_still_framed() {
        let rendered = render_transcript("");
        assert_eq!(rendered.matches(&"=".repeat(50)).count(), 3);
    }

    #[test]
    fn json_file_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.json");
        let result = Transcription {
            text: "欢迎大家".to_string(),
            segments: vec![Segment {
                text: "<|zh|>欢迎大家".to_string(),
                wav_name: "meeting".to_string(),
                timestamp: json!([[0, 880]]),
                is_final: true,
                mode: "offline".to_string(),
            }],
            audio_file: Some("meeting.wav".to_string()),
        };

        write_json(&path, &result).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        // UTF-8 preserved, not \u-escaped
        assert!(written.contains("欢迎大家"));
        assert!(written.contains('\n'));

        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            value,
            json!({
                "text": "欢迎大家",
                "segments": [{
                    "text": "<|zh|>欢迎大家",
                    "wav_name": "meeting",
                    "timestamp": [[0, 880]],
                    "is_final": true,
                    "mode": "offline"
                }],
                "audio_file": "meeting.wav"
            })
        );
    }

    #[test]
    fn json_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("result.json");
        let result = Transcription::from_segments(Vec::new(), None);

        assert!(write_json(&path, &result).is_err());
    }
}
