use std::sync::Arc;

use async_trait::async_trait;

use crate::model::Event;

/// Side effect run after a mutation has been applied.
///
/// Hooks cannot veto or roll back; the state change is already visible.
#[async_trait]
pub trait PostCommitHook: Send + Sync {
    async fn on_commit(&self, event: &Event);
}

/// Run every hook for `event`, concurrently.
pub async fn publish(hooks: &[Arc<dyn PostCommitHook>], event: &Event) {
    futures::future::join_all(hooks.iter().map(|h| h.on_commit(event))).await;
}
