//! Broadcast notification hub for connected WebSocket clients

use tokio::sync::broadcast;

/// Capacity of the broadcast channel; slow clients past this lag drop messages
const CHANNEL_CAPACITY: usize = 256;

/// Broadcast-only fan-out hub. Clients subscribe on WebSocket upgrade and
/// receive every message published after they join; no per-client state.
#[derive(Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<String>,
}

impl NotificationHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish a message to all connected clients
    pub fn broadcast(&self, message: String) {
        // Err means no subscribers, which is fine
        let delivered = self.sender.send(message).unwrap_or(0);
        tracing::debug!("Broadcast notification delivered to {} clients", delivered);
    }

    /// Subscribe a new client
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Number of currently connected clients
    pub fn client_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_all_subscribers() {
        let hub = NotificationHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.client_count(), 2);

        hub.broadcast("Reminder: The book \"Dune\" is due tomorrow.".to_string());

        assert_eq!(
            first.recv().await.unwrap(),
            "Reminder: The book \"Dune\" is due tomorrow."
        );
        assert_eq!(
            second.recv().await.unwrap(),
            "Reminder: The book \"Dune\" is due tomorrow."
        );
    }

    #[test]
    fn broadcast_without_subscribers_is_a_noop() {
        let hub = NotificationHub::new();
        hub.broadcast("nobody listening".to_string());
        assert_eq!(hub.client_count(), 0);
    }

    #[tokio::test]
    async fn late_subscribers_miss_earlier_messages() {
        let hub = NotificationHub::new();
        hub.broadcast("early".to_string());

        let mut late = hub.subscribe();
        hub.broadcast("late".to_string());
        assert_eq!(late.recv().await.unwrap(), "late");
    }
}
