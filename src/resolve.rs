//! Resolve a thread specification to candidate threads on a board.

use crate::board::{BoardClient, ThreadSummary};
use crate::error::ResolveError;
use crate::spec::ThreadSpec;

/// Rendering preferences chosen by the spec options.
///
/// These do not filter candidates; they are fixed once at resolution and
/// handed to the session and renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayPrefs {
    pub multilines: bool,
    pub showtime: bool,
    pub last10: bool,
}

impl DisplayPrefs {
    fn from_spec(spec: &ThreadSpec) -> Self {
        Self {
            multilines: spec.options.multilines,
            showtime: spec.options.showtime,
            last10: spec.options.last10,
        }
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Matching threads, in listing order; never empty.
    pub candidates: Vec<ThreadSummary>,
    pub prefs: DisplayPrefs,
}

impl Resolution {
    /// The thread a session should attach to.
    pub fn first(&self) -> &ThreadSummary {
        &self.candidates[0]
    }

    /// Take ownership of the first candidate.
    pub fn into_first(self) -> ThreadSummary {
        let mut candidates = self.candidates;
        candidates.swap_remove(0)
    }
}

/// Parse `spec_text` and resolve it against `board`.
pub async fn search_threads(
    spec_text: &str,
    board: &dyn BoardClient,
) -> Result<Resolution, ResolveError> {
    let spec = ThreadSpec::parse(spec_text)?;
    resolve(&spec, board).await
}

/// Resolve a parsed spec against `board`.
///
/// Thread mode with a numeric pattern looks the thread up directly; every
/// other spec filters the board listing by title. `postable` and `oldest`
/// then narrow whichever candidates were found.
pub async fn resolve(
    spec: &ThreadSpec,
    board: &dyn BoardClient,
) -> Result<Resolution, ResolveError> {
    let mut candidates = match (spec.options.thread_mode, spec.thread_id()) {
        (true, Some(id)) => {
            tracing::debug!(id, "looking up thread directly");
            board.thread_by_id(id).await?.into_iter().collect::<Vec<_>>()
        }
        _ => {
            let threads = board.list_threads().await?;
            tracing::debug!(
                listed = threads.len(),
                pattern = %spec.pattern,
                "filtering board listing"
            );
            threads
                .into_iter()
                .filter(|thread| spec.matcher().is_match(&thread.title))
                .collect::<Vec<_>>()
        }
    };

    if spec.options.postable {
        candidates.retain(ThreadSummary::is_postable);
    }
    if spec.options.oldest {
        // Ties between equal ids keep whichever `min_by_key` yields.
        candidates = candidates
            .into_iter()
            .min_by_key(|thread| thread.id)
            .into_iter()
            .collect();
    }

    if candidates.is_empty() {
        return Err(ResolveError::NotFound);
    }
    Ok(Resolution {
        candidates,
        prefs: DisplayPrefs::from_spec(spec),
    })
}
