//! Rate-limit-aware submission.

use super::{BoardClient, PostDraft, ThreadSummary};
use crate::error::SubmitError;
use std::time::Duration;
use tokio::time::sleep;

/// Resubmits a post for as long as the board answers with a cooldown.
///
/// Only `RateLimited` is retried, after sleeping exactly the advised
/// cooldown. `ThreadStopped` and every other failure go straight back to the
/// caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct RateLimitRetryPolicy;

impl RateLimitRetryPolicy {
    /// Submit `draft` to `thread`, waiting out every cooldown.
    ///
    /// `on_cooldown` is told about each wait before it starts.
    pub async fn submit<F>(
        &self,
        board: &dyn BoardClient,
        thread: &ThreadSummary,
        draft: &PostDraft,
        mut on_cooldown: F,
    ) -> Result<(), SubmitError>
    where
        F: FnMut(Duration),
    {
        loop {
            match board.submit(thread.id, draft).await {
                Err(SubmitError::RateLimited { cooldown }) => {
                    tracing::info!(
                        thread = thread.id,
                        cooldown_secs = cooldown.as_secs(),
                        "rate limited; waiting before resubmitting"
                    );
                    on_cooldown(cooldown);
                    sleep(cooldown).await;
                }
                other => return other,
            }
        }
    }
}
