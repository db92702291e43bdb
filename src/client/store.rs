use tokio::sync::watch;

use crate::client::TimelineClient;
use crate::error::AppError;
use crate::models::{ItemType, TimelineItem};

/// Snapshot of the timeline view state
#[derive(Debug, Clone, Default)]
pub struct TimelineState {
    pub items: Vec<TimelineItem>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Observable wrapper around the timeline API.
///
/// Every transition is published synchronously through a watch channel, so
/// `state()` and subscribed receivers always see the latest snapshot.
/// Overlapping calls are not serialized; the last writer wins.
pub struct TimelineStore {
    client: TimelineClient,
    tx: watch::Sender<TimelineState>,
}

impl TimelineStore {
    pub fn new(client: TimelineClient) -> Self {
        let (tx, _rx) = watch::channel(TimelineState::default());
        Self { client, tx }
    }

    /// Subscribe to state snapshots
    pub fn subscribe(&self) -> watch::Receiver<TimelineState> {
        self.tx.subscribe()
    }

    /// Current state snapshot
    pub fn state(&self) -> TimelineState {
        self.tx.borrow().clone()
    }

    /// Reload the timeline from the server
    pub async fn fetch(&self) {
        self.set_loading(true);
        match self.client.list(0, 100).await {
            Ok(items) => self.tx.send_modify(|state| {
                state.items = items;
                state.error = None;
                state.loading = false;
            }),
            Err(e) => self.fail(e),
        }
    }

    /// Create a status entry and prepend it to the local list
    pub async fn append_status(&self, text: &str) {
        self.set_loading(true);
        match self.client.create_status(text).await {
            Ok(item) => self.prepend(item),
            Err(e) => self.fail(e),
        }
    }

    /// Upload an image entry and prepend it to the local list
    pub async fn append_image(&self, text: Option<&str>, data: Vec<u8>, filename: &str) {
        self.set_loading(true);
        match self
            .client
            .create_with_file(ItemType::Image, text, filename, data)
            .await
        {
            Ok(item) => self.prepend(item),
            Err(e) => self.fail(e),
        }
    }

    /// Upload a report entry and prepend it to the local list
    pub async fn append_report(&self, text: Option<&str>, data: Vec<u8>, filename: &str) {
        self.set_loading(true);
        match self
            .client
            .create_with_file(ItemType::Report, text, filename, data)
            .await
        {
            Ok(item) => self.prepend(item),
            Err(e) => self.fail(e),
        }
    }

    fn set_loading(&self, loading: bool) {
        self.tx.send_modify(|state| state.loading = loading);
    }

    // The server echoes the created item; newest entries go to the front
    fn prepend(&self, item: TimelineItem) {
        self.tx.send_modify(|state| {
            state.items.insert(0, item);
            state.error = None;
            state.loading = false;
        });
    }

    fn fail(&self, error: AppError) {
        let message = error.to_string();
        tracing::debug!("Timeline request failed: {}", message);
        self.tx.send_modify(|state| {
            state.error = Some(message);
            state.loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_starts_empty_and_idle() {
        let store = TimelineStore::new(TimelineClient::new("http://localhost:8000"));
        let state = store.state();
        assert!(state.items.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn subscribers_see_the_initial_snapshot() {
        let store = TimelineStore::new(TimelineClient::new("http://localhost:8000"));
        let rx = store.subscribe();
        assert!(rx.borrow().items.is_empty());
        assert!(!rx.borrow().loading);
    }
}
