//! Search session: query state, results, and the pending/idle lifecycle.
//!
//! [`SearchSession`] is a plain state value. Each user event maps to one
//! synchronous method; the only suspension point is between
//! [`SearchSession::begin_search`] and [`SearchSession::finish_search`].
//!
//! Every action that replaces the result set (submit, synchronous facet
//! recompute, clear) bumps a generation counter. A completion carries the
//! generation it was issued under and is dropped if a newer action happened
//! in between, so a slow search can never overwrite fresher results.
//!
//! [`SessionHandle`] drives the lifecycle on tokio: it holds the session
//! behind a mutex, releases the lock across the latency delay, and re-takes
//! it only to apply the completion.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::history::SearchHistory;
use crate::model::types::{Corpus, Facet};
use crate::search::query::{ResultSet, evaluate};

/// Delay inserted between submit and results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latency {
    /// Complete inline, without a task or timer.
    Immediate,
    Fixed(Duration),
}

impl Latency {
    /// `0` maps to [`Latency::Immediate`].
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Latency::Immediate
        } else {
            Latency::Fixed(Duration::from_millis(ms))
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            Latency::Immediate => Duration::ZERO,
            Latency::Fixed(d) => d,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Pending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub text: String,
    pub facet: Facet,
}

/// Ticket for an in-flight search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    generation: u64,
    text: String,
    facet: Facet,
}

#[derive(Debug)]
pub struct SearchSession {
    corpus: Arc<Corpus>,
    query: QueryState,
    results: ResultSet,
    status: SessionStatus,
    generation: u64,
    history: SearchHistory,
}

impl SearchSession {
    pub fn new(corpus: Arc<Corpus>, history: SearchHistory) -> Self {
        let results = ResultSet::all(&corpus);
        Self {
            corpus,
            query: QueryState::default(),
            results,
            status: SessionStatus::Idle,
            generation: 0,
            history,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut SearchHistory {
        &mut self.history
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Edit the query text. Results and status are untouched.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    /// Record history and enter `Pending`. Blank text is ignored.
    pub fn begin_search(&mut self) -> Option<PendingSearch> {
        if self.query.text.trim().is_empty() {
            return None;
        }
        self.history.record(&self.query.text);
        self.generation += 1;
        self.status = SessionStatus::Pending;
        info!(
            generation = self.generation,
            query = %self.query.text,
            facet = %self.query.facet,
            "search submitted"
        );
        Some(PendingSearch {
            generation: self.generation,
            text: self.query.text.clone(),
            facet: self.query.facet.clone(),
        })
    }

    /// Apply a completed search. Returns `false` if it was superseded.
    pub fn finish_search(&mut self, pending: PendingSearch) -> bool {
        if pending.generation != self.generation {
            debug!(
                stale = pending.generation,
                current = self.generation,
                "discarding superseded search completion"
            );
            return false;
        }
        self.results = evaluate(&self.corpus, &pending.text, &pending.facet);
        self.status = SessionStatus::Idle;
        debug!(
            generation = pending.generation,
            hits = self.results.len(),
            "search completed"
        );
        true
    }

    /// Switch facet. Empty text recomputes the results immediately and
    /// returns `None`; any other text goes through [`Self::begin_search`],
    /// so whitespace-only text just stores the facet.
    pub fn set_facet(&mut self, facet: Facet) -> Option<PendingSearch> {
        self.query.facet = facet;
        if !self.query.text.is_empty() {
            return self.begin_search();
        }
        self.generation += 1;
        self.results = evaluate(&self.corpus, "", &self.query.facet);
        self.status = SessionStatus::Idle;
        None
    }

    /// Back to the initial state. Any outstanding search is superseded.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.query = QueryState::default();
        self.results = ResultSet::all(&self.corpus);
        self.status = SessionStatus::Idle;
        debug!(generation = self.generation, "session cleared");
    }

    /// Load a history entry into the query and submit it.
    pub fn activate_history(&mut self, text: &str) -> Option<PendingSearch> {
        self.set_text(text);
        self.begin_search()
    }
}

/// Outcome of a user event that may trigger a search.
#[derive(Debug)]
pub enum Submission {
    /// Blank query: nothing happened.
    Ignored,
    /// Results were updated before returning.
    Applied,
    /// Completed inline but a newer action had already replaced the results.
    Superseded,
    /// Results arrive when the task finishes; resolves to `false` if superseded.
    Scheduled(JoinHandle<bool>),
}

impl Submission {
    /// Wait for the search to settle. `true` when its results were applied.
    pub async fn settled(self) -> bool {
        match self {
            Submission::Ignored | Submission::Superseded => false,
            Submission::Applied => true,
            Submission::Scheduled(handle) => handle.await.unwrap_or(false),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, Submission::Scheduled(_))
    }
}

/// Shared handle mapping user events onto a [`SearchSession`].
///
/// With [`Latency::Fixed`] the handle must be used inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SearchSession>>,
    latency: Latency,
}

impl SessionHandle {
    pub fn new(session: SearchSession, latency: Latency) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
            latency,
        }
    }

    /// Read the session under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&SearchSession) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Mutate the session under the lock (history management, etc).
    pub fn update<R>(&self, f: impl FnOnce(&mut SearchSession) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    pub fn on_text_change(&self, text: impl Into<String>) {
        self.inner.lock().set_text(text);
    }

    pub fn on_submit(&self) -> Submission {
        let pending = self.inner.lock().begin_search();
        self.dispatch(pending)
    }

    pub fn on_facet_change(&self, facet: Facet) -> Submission {
        let (pending, recomputed) = {
            let mut session = self.inner.lock();
            let pending = session.set_facet(facet);
            (pending, session.query.text.is_empty())
        };
        match pending {
            Some(pending) => self.dispatch(Some(pending)),
            None if recomputed => Submission::Applied,
            None => Submission::Ignored,
        }
    }

    pub fn on_clear(&self) {
        self.inner.lock().clear();
    }

    pub fn on_history_item_click(&self, text: &str) -> Submission {
        let pending = self.inner.lock().activate_history(text);
        self.dispatch(pending)
    }

    fn dispatch(&self, pending: Option<PendingSearch>) -> Submission {
        let Some(pending) = pending else {
            return Submission::Ignored;
        };
        match self.latency {
            Latency::Immediate => {
                if self.inner.lock().finish_search(pending) {
                    Submission::Applied
                } else {
                    Submission::Superseded
                }
            }
            Latency::Fixed(delay) => {
                let inner = Arc::clone(&self.inner);
                Submission::Scheduled(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    inner.lock().finish_search(pending)
                }))
            }
        }
    }
}
