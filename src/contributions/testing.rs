//! In-memory pull request lookup for tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::contributions::PrLocator;
use crate::github::{LookupError, PullRequestLookup, PullRequestSummary};

/// Answers lookups by pull request number. Unknown numbers are `NotFound`,
/// hanging numbers never answer, gated numbers wait for `release` and
/// panicking numbers panic inside the lookup.
#[derive(Default)]
pub struct StaticLookup {
    answers: HashMap<u64, Result<PullRequestSummary, LookupError>>,
    hanging: HashSet<u64>,
    gated: HashSet<u64>,
    panicking: HashSet<u64>,
    gate: Arc<Notify>,
    calls: AtomicUsize,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, number: u64, answer: Result<PullRequestSummary, LookupError>) -> Self {
        self.answers.insert(number, answer);
        self
    }

    pub fn hanging(mut self, number: u64) -> Self {
        self.hanging.insert(number);
        self
    }

    pub fn gated(mut self, number: u64, answer: Result<PullRequestSummary, LookupError>) -> Self {
        self.gated.insert(number);
        self.with(number, answer)
    }

    pub fn panicking(mut self, number: u64) -> Self {
        self.panicking.insert(number);
        self
    }

    pub fn release(&self) {
        self.gate.notify_waiters();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PullRequestLookup for StaticLookup {
    async fn fetch(&self, locator: &PrLocator) -> Result<PullRequestSummary, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking.contains(&locator.number) {
            panic!("lookup for #{} blew up", locator.number);
        }
        if self.hanging.contains(&locator.number) {
            std::future::pending::<()>().await;
        }
        if self.gated.contains(&locator.number) {
            self.gate.notified().await;
        }
        self.answers
            .get(&locator.number)
            .cloned()
            .unwrap_or(Err(LookupError::NotFound))
    }
}
