//! Receive half of a session: collect segments until the server is done.

use crate::error::{FunasrError, Result};
use crate::protocol::{Segment, ServerMessage};
use crate::session::SessionConfig;
use futures_util::{Stream, StreamExt};
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info};

/// Characters of segment text shown in logs.
const LOG_PREVIEW_CHARS: usize = 100;

/// Read server messages until the session is complete.
///
/// Termination:
/// - offline mode: the first segment with non-empty text;
/// - streaming modes: the first segment with `is_final`, after sleeping the
///   final-wait grace period;
/// - either mode: the server closes the connection (not an error).
///
/// Messages without `text` are skipped. There is no progress guard; callers
/// bound this with a timeout.
pub async fn receive_segments<S>(stream: &mut S, config: &SessionConfig) -> Result<Vec<Segment>>
where
    S: Stream<Item = std::result::Result<Message, WsError>> + Unpin,
{
    let mut segments = Vec::new();

    while let Some(message) = stream.next().await {
        let payload = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(data)) => {
                String::from_utf8(data).map_err(|e| FunasrError::Protocol {
                    message: format!("server sent non-UTF-8 binary message: {}", e),
                })?
            }
            Ok(Message::Close(frame)) => {
                info!(?frame, "WebSocket connection closed");
                break;
            }
            Ok(_) => continue,
            Err(e) if is_closed(&e) => {
                info!("WebSocket connection closed");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let Some(segment) = ServerMessage::from_json(&payload)?.into_segment(config.mode) else {
            debug!("skipping message without text");
            continue;
        };

        info!(
            text = %preview(&segment.text),
            is_final = segment.is_final,
            mode = %segment.mode,
            "received"
        );

        let finished = if config.mode.is_offline() {
            !segment.text.is_empty()
        } else {
            segment.is_final
        };
        let wait_for_stragglers = finished && !config.mode.is_offline();
        segments.push(segment);

        if wait_for_stragglers {
            tokio::time::sleep(config.final_wait).await;
        }
        if finished {
            break;
        }
    }

    Ok(segments)
}

fn is_closed(error: &WsError) -> bool {
    matches!(
        error,
        WsError::ConnectionClosed
            | WsError::AlreadyClosed
            | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    )
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
