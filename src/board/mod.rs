//! Board clients for the two supported dialects.
//!
//! The board layer is split into cohesive modules:
//! - `shitaraba`: EUC-JP boards with `rawmode.cgi` / `write.cgi`
//! - `nichan`: Shift_JIS boards with `.dat` files / `bbs.cgi`
//! - `transport`: shared HTTP, charset and response classification helpers
//! - `retry`: rate-limit-aware submission wrapper

use crate::error::{BoardError, SubmitError};
use crate::spec::{Protocol, ThreadSpec};
use async_trait::async_trait;
use std::time::Duration;

mod nichan;
pub mod retry;
mod shitaraba;
mod transport;

pub use nichan::NichanClient;
pub use retry::RateLimitRetryPolicy;
pub use shitaraba::ShitarabaClient;

/// Posts a thread can hold before it stops accepting more.
pub const THREAD_CAPACITY: u32 = 1000;

/// One thread as seen in a board listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSummary {
    /// Creation timestamp; smaller ids are older threads.
    pub id: u64,
    pub title: String,
    /// Number of the last post in the thread.
    pub last: u32,
}

impl ThreadSummary {
    /// True while the thread is below capacity.
    pub fn is_postable(&self) -> bool {
        self.last < THREAD_CAPACITY
    }
}

/// One message in a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// 1-based sequence number within the thread.
    pub no: u32,
    pub name: String,
    /// Contact field; empty when the poster left it blank.
    pub mail: String,
    /// Board-formatted timestamp.
    pub date: String,
    pub poster_id: Option<String>,
    /// Body text with HTML markup and entities.
    pub body: String,
}

/// Outgoing post contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub name: String,
    pub mail: String,
    pub body: String,
}

/// Dialect-independent board capability used by resolution and sessions.
///
/// Tests provide scripted implementations without network calls while the
/// production path uses [`ShitarabaClient`] or [`NichanClient`].
#[async_trait]
pub trait BoardClient: Send + Sync {
    /// List every thread currently on the board.
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, BoardError>;

    /// Look up one thread by id without going through the listing.
    async fn thread_by_id(&self, id: u64) -> Result<Option<ThreadSummary>, BoardError>;

    /// Fetch posts numbered `from` and above, in sequence order.
    async fn fetch_posts(&self, thread_id: u64, from: u32) -> Result<Vec<Post>, BoardError>;

    /// Submit a new post to a thread.
    async fn submit(&self, thread_id: u64, draft: &PostDraft) -> Result<(), SubmitError>;
}

/// Connect to the board a spec points at, picking the client by dialect.
pub fn connect(spec: &ThreadSpec, timeout: Duration) -> Box<dyn BoardClient> {
    match spec.protocol {
        Protocol::Shitaraba => Box::new(ShitarabaClient::new(&spec.host, &spec.board, timeout)),
        Protocol::Nichan => Box::new(NichanClient::new(&spec.host, &spec.board, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postable_means_below_capacity() {
        let mut thread = ThreadSummary {
            id: 1,
            title: "t".into(),
            last: 999,
        };
        assert!(thread.is_postable());
        thread.last = 1000;
        assert!(!thread.is_postable());
    }
}
