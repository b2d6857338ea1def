//! Default configuration constants for funasr-client.
//!
//! This module provides shared constants used across the configuration file,
//! the CLI and the library session config so they never drift apart.

/// Default FunASR server host.
pub const HOST: &str = "localhost";

/// Default FunASR WebSocket port.
///
/// 10095 is the port the FunASR runtime's websocket server listens on
/// out of the box.
pub const PORT: u16 = 10095;

/// Default audio sample rate in Hz for `.pcm` files and raw fallbacks.
///
/// Raw PCM carries no header, so 16kHz (the rate FunASR models expect) is assumed.
pub const SAMPLE_RATE: u32 = 16000;

/// Default chunk-size triple `[lookahead, chunk, lookbehind]` in 60ms units.
pub const CHUNK_SIZE: [u32; 3] = [5, 10, 5];

/// Default chunk interval.
///
/// Divides the chunk window: with `CHUNK_SIZE[1] = 10` and interval 10 each
/// audio message covers 60ms.
pub const CHUNK_INTERVAL: u32 = 10;

/// Encoder look-back sent in the session metadata.
pub const ENCODER_CHUNK_LOOK_BACK: u32 = 4;

/// Decoder look-back sent in the session metadata.
pub const DECODER_CHUNK_LOOK_BACK: u32 = 0;

/// Seconds to keep the connection open after a final result in streaming modes.
pub const FINAL_WAIT_SECS: f64 = 3.0;

/// Upper bound on the whole receive phase.
pub const RECEIVE_TIMEOUT_SECS: u64 = 30;

/// Pause between the end-of-speech marker and the first read.
pub const SETTLE_DELAY_MS: u64 = 500;

/// Pause between audio chunks in offline mode.
///
/// Offline sessions are not paced to real time; the server buffers the
/// whole utterance before decoding.
pub const OFFLINE_CHUNK_PAUSE_MS: u64 = 1;

/// Pause between caller-provided chunks in `transcribe_stream`.
pub const STREAM_CHUNK_PAUSE_MS: u64 = 5;

/// Settle delay used by `transcribe_stream`.
pub const STREAM_SETTLE_DELAY_MS: u64 = 1000;

/// `wav_name` sent when the audio has no source file.
pub const DEFAULT_WAV_NAME: &str = "demo";

/// `wav_name` sent for caller-provided chunk streams.
pub const STREAM_WAV_NAME: &str = "stream";

/// External tool used to transcode non-WAV inputs.
pub const TRANSCODER: &str = "ffmpeg";
