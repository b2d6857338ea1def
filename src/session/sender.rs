//! Send half of a session: metadata, paced audio chunks, end marker.

use crate::audio::AudioBuffer;
use crate::defaults;
use crate::error::Result;
use crate::protocol::{AudioFormat, EndMessage, StartMessage};
use crate::session::{ChunkPlan, SessionConfig};
use futures_util::{Sink, SinkExt};
use std::time::Duration;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info};

fn start_message(
    config: &SessionConfig,
    sample_rate: u32,
    wav_name: &str,
    wav_format: Option<AudioFormat>,
) -> StartMessage {
    StartMessage {
        mode: config.mode,
        chunk_size: config.chunk_size,
        chunk_interval: config.chunk_interval,
        encoder_chunk_look_back: defaults::ENCODER_CHUNK_LOOK_BACK,
        decoder_chunk_look_back: defaults::DECODER_CHUNK_LOOK_BACK,
        audio_fs: sample_rate,
        wav_name: wav_name.to_string(),
        wav_format,
        is_speaking: true,
        itn: config.itn,
    }
}

/// Stream `audio` over `sink` following the chunked-audio protocol.
///
/// Sends the metadata message, then each chunk followed by the mode's pause,
/// with the end-of-speech marker right after the last chunk. An empty buffer
/// still gets the end marker. Returns the number of audio chunks sent.
///
/// Transport errors abort immediately; nothing is retried.
pub async fn send_audio<S>(
    sink: &mut S,
    audio: &AudioBuffer,
    wav_name: &str,
    config: &SessionConfig,
) -> Result<usize>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    let plan = ChunkPlan::new(
        audio.len(),
        audio.sample_rate,
        config.chunk_size,
        config.chunk_interval,
    )?;
    let pause = config.chunk_pause();

    info!(
        chunks = plan.count,
        stride = plan.stride,
        "sending audio chunks to server"
    );

    let start = start_message(config, audio.sample_rate, wav_name, Some(audio.format));
    sink.send(Message::Text(start.to_json()?)).await?;

    let end = EndMessage::new().to_json()?;
    for (index, range) in plan.ranges().enumerate() {
        debug!(index, bytes = range.len(), "chunk");
        sink.send(Message::Binary(audio.bytes[range].to_vec())).await?;
        if index + 1 == plan.count {
            sink.send(Message::Text(end.clone())).await?;
        }
        tokio::time::sleep(pause).await;
    }

    if plan.count == 0 {
        sink.send(Message::Text(end)).await?;
    }

    Ok(plan.count)
}

/// Stream caller-provided chunks as-is.
///
/// Used when audio arrives already cut (e.g. from a live source): no stride
/// is computed, chunks are paced by a fixed short pause, and the metadata
/// carries no `wav_format`.
pub async fn send_chunks<S, I>(
    sink: &mut S,
    chunks: I,
    sample_rate: u32,
    config: &SessionConfig,
) -> Result<usize>
where
    S: Sink<Message, Error = WsError> + Unpin,
    I: IntoIterator<Item = Vec<u8>>,
{
    let start = start_message(config, sample_rate, defaults::STREAM_WAV_NAME, None);
    sink.send(Message::Text(start.to_json()?)).await?;

    let pause = Duration::from_millis(defaults::STREAM_CHUNK_PAUSE_MS);
    let mut sent = 0;
    for chunk in chunks {
        sink.send(Message::Binary(chunk)).await?;
        sent += 1;
        tokio::time::sleep(pause).await;
    }

    sink.send(Message::Text(EndMessage::new().to_json()?)).await?;
    info!(chunks = sent, "stream chunks sent");

    Ok(sent)
}
