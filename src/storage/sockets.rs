use axum::extract::ws::Message;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{atomic::AtomicUsize, Arc};
use tokio::sync::{mpsc, RwLock};

pub static NEXT_SOCKET_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Clone, Default)]
pub struct HashMapClientSocketsStorage {
    storage: Arc<RwLock<HashMap<usize, mpsc::UnboundedSender<Message>>>>,
}

impl HashMapClientSocketsStorage {
    pub async fn add(&self, socket: mpsc::UnboundedSender<Message>) -> usize {
        let socket_id = NEXT_SOCKET_ID.fetch_add(1, Ordering::Relaxed);
        self.storage.write().await.insert(socket_id, socket);
        socket_id
    }

    pub async fn remove(&self, socket_id: usize) {
        self.storage.write().await.remove(&socket_id);
    }

    pub async fn send_msg(&self, msg: &str, socket_id: usize) {
        let storage_guard = self.storage.read().await;
        let Some(tx) = storage_guard.get(&socket_id) else {
            tracing::warn!(socket_id, "Tried to send a message to an unknown socket.");
            return;
        };
        if let Err(_disconnected) = tx.send(Message::Text(msg.to_string())) {
            // The socket is being torn down by its own task.
            tracing::warn!(socket_id, "Failed to send a message to a socket.");
        }
    }

    pub async fn broadcast_msg(&self, msg: &str, sockets_ids: &[usize]) {
        for (&socket_id, tx) in self.storage.read().await.iter() {
            if sockets_ids.contains(&socket_id) {
                if let Err(_disconnected) = tx.send(Message::Text(msg.to_string())) {
                    tracing::warn!(socket_id, "Failed to broadcast a message to a socket.");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_only_listed_sockets() {
        let sockets = HashMapClientSocketsStorage::default();
        let (tx_1, mut rx_1) = mpsc::unbounded_channel();
        let (tx_2, mut rx_2) = mpsc::unbounded_channel();
        let id_1 = sockets.add(tx_1).await;
        let _id_2 = sockets.add(tx_2).await;

        sockets.broadcast_msg("hello", &[id_1]).await;

        assert!(matches!(rx_1.try_recv(), Ok(Message::Text(text)) if text == "hello"));
        assert!(rx_2.try_recv().is_err());
    }

    #[tokio::test]
    async fn removed_socket_gets_nothing() {
        let sockets = HashMapClientSocketsStorage::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = sockets.add(tx).await;
        sockets.remove(id).await;

        sockets.send_msg("hello", id).await;

        assert!(rx.try_recv().is_err());
    }
}
