//! Websocket fan-out sessions.
//!
//! Each session subscribes to the [`BroadcastHub`] and forwards envelope
//! frames verbatim. The feed is one-way: inbound frames other than close are
//! ignored. A session that lags past the hub capacity drops the missed
//! frames and continues from the tip — slow dashboards see fewer updates,
//! never stale ones.

use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use chainpulse_core::{broadcast::BroadcastHub, metrics::record_broadcast_subscribers};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Upgrades the connection and hands it to a dashboard session.
pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| dashboard_session(socket, state.hub))
}

async fn dashboard_session(socket: WebSocket, hub: BroadcastHub) {
    let mut rx = hub.subscribe();
    record_broadcast_subscribers(hub.subscriber_count());
    debug!(subscribers = hub.subscriber_count(), "dashboard session opened");

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = rx.recv() => {
                match frame {
                    Ok(frame) => {
                        if sink.send(Message::Text(frame.to_string())).await.is_err() {
                            debug!("dashboard session closed while sending");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "dashboard subscriber lagged; continuing from tip");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        debug!(%error, "dashboard session socket error");
                        break;
                    }
                }
            }
        }
    }

    drop(rx);
    record_broadcast_subscribers(hub.subscriber_count());
    debug!(subscribers = hub.subscriber_count(), "dashboard session closed");
}
