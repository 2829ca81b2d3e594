/// Session state for an integrating front end.
///
/// The guide collection is a single in-memory snapshot replaced wholesale
/// after ingestion; search results exist only for the last completed query.
/// Transitions are expressed reducer-style (explicit phase + events) rather
/// than ad hoc flags, and the contract is last-write-wins: there is no
/// cancellation, a later result simply overwrites an earlier one.
use crate::model::{Guide, SearchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingData,
    Searching,
    Success,
    Error,
}

#[derive(Debug)]
pub enum Event {
    LoadStarted,
    LoadFinished(Vec<Guide>),
    SearchStarted(String),
    SearchFinished(Vec<SearchResult>),
    SearchCleared,
    Failed(String),
}

#[derive(Debug)]
pub struct Session {
    pub guides: Vec<Guide>,
    pub results: Vec<SearchResult>,
    pub last_query: String,
    pub phase: Phase,
    pub last_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            guides: Vec::new(),
            results: Vec::new(),
            last_query: String::new(),
            phase: Phase::Idle,
            last_error: None,
        }
    }

    /// Apply one transition.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::LoadStarted => {
                self.phase = Phase::LoadingData;
            }
            Event::LoadFinished(guides) => {
                // A fresh load shows the whole collection, unranked.
                self.results = guides.iter().cloned().map(unranked).collect();
                self.guides = guides;
                self.last_query.clear();
                self.last_error = None;
                self.phase = Phase::Idle;
            }
            Event::SearchStarted(query) => {
                self.last_query = query;
                self.phase = Phase::Searching;
            }
            Event::SearchFinished(results) => {
                self.results = results;
                self.phase = Phase::Success;
            }
            Event::SearchCleared => {
                self.results = self.guides.iter().cloned().map(unranked).collect();
                self.last_query.clear();
                self.phase = Phase::Idle;
            }
            Event::Failed(message) => {
                self.last_error = Some(message);
                self.phase = Phase::Error;
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn unranked(guide: Guide) -> SearchResult {
    SearchResult {
        guide,
        relevance_score: 0.0,
        reasoning: String::new(),
    }
}
