use tokio::sync::mpsc;

use super::{ChatStore, SubscriberId};
use crate::events::SessionEvent;

impl ChatStore {
    /// Registers a listener for every state change from now on.
    pub async fn subscribe(&self) -> (SubscriberId, mpsc::UnboundedReceiver<SessionEvent>) {
        let id = self.next_id().await;
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.write().await.insert(id, tx);
        (id, rx)
    }

    pub async fn unsubscribe(&self, subscriber_id: SubscriberId) {
        self.subscribers.write().await.remove(&subscriber_id);
    }

    /// Callers hold the state guard so listeners see changes in the order
    /// they were applied.
    pub(crate) async fn emit(&self, event: SessionEvent) {
        let subs = self.subscribers.read().await;
        for tx in subs.values() {
            let _ = tx.send(event.clone());
        }
    }
}
