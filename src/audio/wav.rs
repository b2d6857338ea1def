//! WAV parsing into the raw PCM bytes the server expects.

use crate::error::{FunasrError, Result};
use std::io::Read;

/// Decoded WAV payload: interleaved little-endian 16-bit frames.
#[derive(Debug, Clone, PartialEq)]
pub struct WavPcm {
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Read a 16-bit integer WAV stream.
///
/// Frames are passed through untouched (no downmix, no resampling); the
/// server is told the file's own sample rate. Any other sample format is
/// rejected with [`FunasrError::AudioFormat`] so the caller can transcode.
pub fn read_wav<R: Read>(reader: R) -> Result<WavPcm> {
    let mut wav_reader = hound::WavReader::new(reader).map_err(|e| FunasrError::AudioFormat {
        message: format!("Failed to parse WAV file: {}", e),
    })?;

    let spec = wav_reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(FunasrError::AudioFormat {
            message: format!(
                "expected 16-bit integer PCM, got {}-bit {:?}",
                spec.bits_per_sample, spec.sample_format
            ),
        });
    }

    let samples: Vec<i16> = wav_reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| FunasrError::AudioFormat {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    let bytes = samples.iter().flat_map(|s| s.to_le_bytes()).collect();

    Ok(WavPcm {
        bytes,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// True when the data starts with a RIFF header.
pub fn looks_like_wav(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE"
}

#[cfg(test)]
pub(crate) fn make_wav_data(
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    samples: &[i32],
) -> Vec<u8> {
    use std::io::Cursor;

    let mut cursor = Cursor::new(Vec::new());
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
    for &s in samples {
        if bits_per_sample == 16 {
            writer.write_sample(s as i16).unwrap();
        } else {
            writer.write_sample(s).unwrap();
        }
    }
    writer.finalize().unwrap();
    cursor.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_16khz_mono_as_le_bytes() {
        let wav_data = make_wav_data(16000, 1, 16, &[1, -2, 300]);

        let pcm = read_wav(Cursor::new(wav_data)).unwrap();

        assert_eq!(pcm.sample_rate, 16000);
        assert_eq!(pcm.channels, 1);
        assert_eq!(pcm.bytes, vec![0x01, 0x00, 0xfe, 0xff, 0x2c, 0x01]);
    }

    #[test]
    fn keeps_stereo_frames_interleaved() {
        let wav_data = make_wav_data(8000, 2, 16, &[1, 2, 3, 4]);

        let pcm = read_wav(Cursor::new(wav_data)).unwrap();

        assert_eq!(pcm.sample_rate, 8000);
        assert_eq!(pcm.channels, 2);
        assert_eq!(pcm.bytes, vec![1, 0, 2, 0, 3, 0, 4, 0]);
    }

    #[test]
    fn reports_native_sample_rate() {
        let wav_data = make_wav_data(44100, 1, 16, &[0; 441]);

        let pcm = read_wav(Cursor::new(wav_data)).unwrap();

        assert_eq!(pcm.sample_rate, 44100);
        assert_eq!(pcm.bytes.len(), 882);
    }

    #[test]
    fn rejects_24_bit_audio() {
        let wav_data = make_wav_data(16000, 1, 24, &[0, 1, 2]);

        let err = read_wav(Cursor::new(wav_data)).unwrap_err();

        assert!(matches!(err, FunasrError::AudioFormat { .. }));
        assert!(err.to_string().contains("24-bit"), "got: {}", err);
    }

    #[test]
    fn rejects_non_wav_data() {
        let err = read_wav(Cursor::new(b"not a wav file".to_vec())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse WAV file"));
    }

    #[test]
    fn empty_wav_yields_no_bytes() {
        let wav_data = make_wav_data(16000, 1, 16, &[]);
        let pcm = read_wav(Cursor::new(wav_data)).unwrap();
        assert!(pcm.bytes.is_empty());
    }

    #[test]
    fn header_sniffing() {
        assert!(looks_like_wav(&make_wav_data(16000, 1, 16, &[0])));
        assert!(!looks_like_wav(b"RIFF"));
        assert!(!looks_like_wav(&[0u8; 64]));
    }
}
