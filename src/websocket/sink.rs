use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::websocket::messages::ServerMessage;

/// Somewhere game notifications can be delivered.
/// Delivery never feeds back into the game; a closed sink is just skipped.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Returns false once the receiving side is gone
    async fn publish(&self, message: ServerMessage) -> bool;
}

#[async_trait]
impl EventSink for mpsc::Sender<ServerMessage> {
    async fn publish(&self, message: ServerMessage) -> bool {
        self.send(message).await.is_ok()
    }
}

/// Deliver every message, in order, to every sink
pub async fn broadcast<S: EventSink>(sinks: &[S], messages: &[ServerMessage]) {
    for sink in sinks {
        for message in messages {
            if !sink.publish(message.clone()).await {
                tracing::debug!("Subscriber went away mid-broadcast");
                break;
            }
        }
    }
}
