//! Billing-mode change stream
//!
//! Clients receive a `connected` greeting carrying the current mode, then one
//! `billing_mode_changed` message per change made after they connected.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::select;
use tracing::{debug, error, info, warn};

use crate::application::BillingModeController;
use crate::interfaces::http::middleware::Caller;
use crate::notifications::{Event, EventMessage};
use crate::shared::ShutdownSignal;

#[derive(Clone)]
pub struct BillingModeStreamState {
    pub controller: Arc<BillingModeController>,
    pub shutdown: ShutdownSignal,
}

pub async fn ws_billing_mode_handler(
    ws: WebSocketUpgrade,
    State(state): State<BillingModeStreamState>,
    caller: Caller,
) -> impl IntoResponse {
    info!(
        "Billing mode stream opened by {}",
        caller.subject().unwrap_or("anonymous")
    );
    ws.on_upgrade(move |socket| handle_billing_mode_socket(socket, state))
}

fn greeting(state: &BillingModeStreamState) -> String {
    serde_json::json!({
        "type": "connected",
        "mode": state.controller.mode(),
    })
    .to_string()
}

async fn handle_billing_mode_socket(socket: WebSocket, state: BillingModeStreamState) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe before greeting so no change slips between the two.
    let mut subscriber = state.controller.subscribe();

    if let Err(e) = sender.send(Message::Text(greeting(&state).into())).await {
        error!("Failed to send billing mode greeting: {}", e);
        return;
    }

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            error!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!("Billing mode stream error: {}", e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }

            changed = subscriber.recv() => {
                let Some(changed) = changed else {
                    warn!("Event bus closed");
                    break;
                };
                let message = EventMessage::new(Event::BillingModeChanged(changed));
                match serde_json::to_string(&message) {
                    Ok(json) => {
                        if let Err(e) = sender.send(Message::Text(json.into())).await {
                            error!("Failed to send billing mode change: {}", e);
                            break;
                        }
                        debug!("Billing mode change sent: {}", message.id);
                    }
                    Err(e) => error!("Failed to serialize billing mode change: {}", e),
                }
            }

            _ = state.shutdown.wait() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    }

    info!("Billing mode stream closed");
}
