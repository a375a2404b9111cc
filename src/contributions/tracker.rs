use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::github::PullRequestLookup;

use super::enrich;
use super::types::{ContributionId, ContributionReference, EnrichedContribution, RepoKey};

/// What a view should draw for one contribution row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    /// Never requested (its group is still collapsed)
    Idle,
    Loading,
    Ready(EnrichedContribution),
}

impl RowState {
    /// The record to draw: a loading placeholder while in flight, nothing
    /// while idle.
    pub fn into_record(self, repo_key: Option<RepoKey>) -> Option<EnrichedContribution> {
        match self {
            RowState::Idle => None,
            RowState::Loading => Some(EnrichedContribution::loading(repo_key)),
            RowState::Ready(enriched) => Some(enriched),
        }
    }
}

enum Slot {
    Loading {
        handle: JoinHandle<()>,
        reference: ContributionReference,
    },
    Ready(EnrichedContribution),
}

type Completion = (ContributionId, EnrichedContribution);

/// How long `next_resolved` waits on the channel before checking for tasks
/// that ended without sending a result
const REAP_INTERVAL: Duration = Duration::from_millis(100);

/// Per-view registry of enrichment tasks keyed by contribution identity.
///
/// Each identity is resolved at most once per tracker. Results travel back
/// over a channel and are applied by `poll` or `next_resolved`, so the owner
/// decides when its state changes. A task that dies without a result (a
/// panicking lookup) settles to an `Unavailable` fallback. After `teardown`
/// (or drop) late results are discarded.
pub struct EnrichmentTracker {
    lookup: Arc<dyn PullRequestLookup>,
    timeout: Duration,
    slots: HashMap<ContributionId, Slot>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    alive: Arc<AtomicBool>,
}

impl EnrichmentTracker {
    pub fn new(lookup: Arc<dyn PullRequestLookup>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            lookup,
            timeout,
            slots: HashMap::new(),
            tx,
            rx,
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Start resolving `reference` unless it is already pending or resolved.
    ///
    /// Returns true when a new resolution was started. Must be called from
    /// within a tokio runtime.
    pub fn request(&mut self, id: ContributionId, reference: &ContributionReference) -> bool {
        if !self.is_alive() || self.slots.contains_key(&id) {
            return false;
        }

        if let Some(settled) = enrich::resolve_now(reference) {
            self.slots.insert(id, Slot::Ready(settled));
            return true;
        }

        let lookup = self.lookup.clone();
        let tx = self.tx.clone();
        let alive = self.alive.clone();
        let task_reference = reference.clone();
        let timeout = self.timeout;

        let handle = tokio::spawn(async move {
            let enriched = enrich::resolve(&task_reference, lookup.as_ref(), timeout).await;
            if alive.load(Ordering::Acquire) {
                let _ = tx.send((id, enriched));
            } else {
                log::debug!("Discarding late result for contribution {}", id);
            }
        });
        self.slots.insert(
            id,
            Slot::Loading {
                handle,
                reference: reference.clone(),
            },
        );
        true
    }

    pub fn state(&self, id: ContributionId) -> RowState {
        match self.slots.get(&id) {
            None => RowState::Idle,
            Some(Slot::Loading { .. }) => RowState::Loading,
            Some(Slot::Ready(enriched)) => RowState::Ready(enriched.clone()),
        }
    }

    pub fn resolved(&self, id: ContributionId) -> Option<&EnrichedContribution> {
        match self.slots.get(&id) {
            Some(Slot::Ready(enriched)) => Some(enriched),
            _ => None,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Loading { .. }))
            .count()
    }

    /// Apply every completion that has already arrived. Never blocks.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while self.settle_next().is_some() {
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` when nothing is pending or the tracker was torn down.
    pub async fn next_resolved(&mut self) -> Option<ContributionId> {
        loop {
            if !self.is_alive() || self.pending_count() == 0 {
                return None;
            }
            if let Some(id) = self.settle_next() {
                return Some(id);
            }
            match tokio::time::timeout(REAP_INTERVAL, self.rx.recv()).await {
                Ok(Some((id, enriched))) => {
                    if self.apply(id, enriched) {
                        return Some(id);
                    }
                }
                Ok(None) => return None,
                Err(_) => {}
            }
        }
    }

    /// Apply one queued completion, or settle one task that finished
    /// without sending anything.
    fn settle_next(&mut self) -> Option<ContributionId> {
        if let Some(id) = self.drain_one() {
            return Some(id);
        }
        let finished = self.slots.iter().find_map(|(id, slot)| match slot {
            Slot::Loading { handle, .. } if handle.is_finished() => Some(*id),
            _ => None,
        })?;
        // A finished task sends before it returns, so its result is queued by now
        if let Some(id) = self.drain_one() {
            return Some(id);
        }
        self.settle_lost(finished)
    }

    fn drain_one(&mut self) -> Option<ContributionId> {
        while let Ok((id, enriched)) = self.rx.try_recv() {
            if self.apply(id, enriched) {
                return Some(id);
            }
        }
        None
    }

    fn settle_lost(&mut self, id: ContributionId) -> Option<ContributionId> {
        if !self.is_alive() {
            return None;
        }
        let slot = self.slots.get_mut(&id)?;
        let Slot::Loading { reference, .. } = &*slot else {
            return None;
        };
        log::warn!("Lookup task for {} ended without a result", reference.pr_url);
        let settled = enrich::unavailable(reference);
        *slot = Slot::Ready(settled);
        Some(id)
    }

    fn apply(&mut self, id: ContributionId, enriched: EnrichedContribution) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.slots.get_mut(&id) {
            Some(slot @ Slot::Loading { .. }) => {
                *slot = Slot::Ready(enriched);
                true
            }
            _ => false,
        }
    }

    /// Abort in-flight resolutions and stop accepting results. Anything that
    /// still arrives is dropped; no state is written after this point.
    pub fn teardown(&mut self) {
        if !self.alive.swap(false, Ordering::AcqRel) {
            return;
        }
        self.rx.close();
        for (_, slot) in self.slots.drain() {
            if let Slot::Loading { handle, .. } = slot {
                handle.abort();
            }
        }
    }
}

impl Drop for EnrichmentTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributions::testing::StaticLookup;
    use crate::contributions::{ContributionStatus, Fallback, PrState, Resolution};
    use crate::github::{LookupError, PullRequestSummary};

    fn summary(title: &str) -> PullRequestSummary {
        PullRequestSummary {
            title: title.to_string(),
            state: "open".to_string(),
            merged: false,
        }
    }

    fn tracker(lookup: Arc<StaticLookup>) -> EnrichmentTracker {
        EnrichmentTracker::new(lookup, Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_request_resolves_remote_reference() {
        let lookup = Arc::new(StaticLookup::new().with(1, Ok(summary("Remote title"))));
        let mut tracker = tracker(lookup.clone());
        let reference = ContributionReference::public("https://github.com/o/r/pull/1");

        assert_eq!(tracker.state(ContributionId(0)), RowState::Idle);
        assert!(tracker.request(ContributionId(0), &reference));
        assert_eq!(tracker.state(ContributionId(0)), RowState::Loading);

        assert_eq!(tracker.next_resolved().await, Some(ContributionId(0)));
        let enriched = tracker.resolved(ContributionId(0)).unwrap();
        assert_eq!(enriched.display_title, "Remote title");
        assert_eq!(tracker.pending_count(), 0);
        assert_eq!(tracker.next_resolved().await, None);
    }

    #[tokio::test]
    async fn test_duplicate_requests_issue_one_lookup() {
        let lookup = Arc::new(StaticLookup::new().with(1, Ok(summary("Once"))));
        let mut tracker = tracker(lookup.clone());
        let reference = ContributionReference::public("https://github.com/o/r/pull/1");

        assert!(tracker.request(ContributionId(0), &reference));
        assert!(!tracker.request(ContributionId(0), &reference));
        tracker.next_resolved().await;
        assert!(!tracker.request(ContributionId(0), &reference));

        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_same_url_different_identity_resolves_separately() {
        let lookup = Arc::new(StaticLookup::new().with(1, Ok(summary("Dup"))));
        let mut tracker = tracker(lookup.clone());
        let reference = ContributionReference::public("https://github.com/o/r/pull/1");

        tracker.request(ContributionId(0), &reference);
        tracker.request(ContributionId(1), &reference);
        while tracker.next_resolved().await.is_some() {}

        assert!(tracker.resolved(ContributionId(0)).is_some());
        assert!(tracker.resolved(ContributionId(1)).is_some());
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_private_reference_settles_immediately() {
        let lookup = Arc::new(StaticLookup::new());
        let mut tracker = tracker(lookup.clone());
        let reference = ContributionReference::private(
            "https://github.com/o/r/pull/3",
            Some("Private work"),
            Some(PrState::Merged),
        );

        tracker.request(ContributionId(4), &reference);

        match tracker.state(ContributionId(4)) {
            RowState::Ready(enriched) => {
                assert_eq!(enriched.display_title, "Private work");
                assert_eq!(enriched.status, ContributionStatus::Merged);
            }
            other => panic!("expected ready row, got {:?}", other),
        }
        assert_eq!(tracker.pending_count(), 0);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_block_siblings() {
        let lookup = Arc::new(
            StaticLookup::new()
                .with(1, Err(LookupError::Status(502)))
                .with(2, Ok(summary("Fine"))),
        );
        let mut tracker = tracker(lookup);
        tracker.request(ContributionId(0), &ContributionReference::public("https://github.com/o/r/pull/1"));
        tracker.request(ContributionId(1), &ContributionReference::public("https://github.com/o/r/pull/2"));

        while tracker.next_resolved().await.is_some() {}

        assert_eq!(
            tracker.resolved(ContributionId(0)).unwrap().status,
            ContributionStatus::Unknown
        );
        assert_eq!(tracker.resolved(ContributionId(1)).unwrap().display_title, "Fine");
    }

    #[tokio::test]
    async fn test_teardown_discards_late_results() {
        let lookup = Arc::new(StaticLookup::new().gated(1, Ok(summary("Late"))));
        let mut tracker = tracker(lookup.clone());
        tracker.request(ContributionId(0), &ContributionReference::public("https://github.com/o/r/pull/1"));

        tracker.teardown();
        lookup.release();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(tracker.poll(), 0);
        assert_eq!(tracker.state(ContributionId(0)), RowState::Idle);
        assert!(!tracker.request(ContributionId(0), &ContributionReference::public("https://github.com/o/r/pull/1")));
        assert_eq!(tracker.next_resolved().await, None);
    }

    #[tokio::test]
    async fn test_poll_applies_finished_results() {
        let lookup = Arc::new(StaticLookup::new().with(1, Ok(summary("Polled"))));
        let mut tracker = tracker(lookup);
        tracker.request(ContributionId(0), &ContributionReference::public("https://github.com/o/r/pull/1"));

        let mut applied = 0;
        for _ in 0..50 {
            applied += tracker.poll();
            if applied > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(applied, 1);
        assert!(matches!(tracker.state(ContributionId(0)), RowState::Ready(_)));
    }

    #[tokio::test]
    async fn test_panicked_lookup_settles_to_fallback() {
        let lookup = Arc::new(
            StaticLookup::new()
                .panicking(1)
                .with(2, Ok(summary("Survivor"))),
        );
        let mut tracker = tracker(lookup);
        tracker.request(ContributionId(0), &ContributionReference::public("https://github.com/o/r/pull/1"));
        tracker.request(ContributionId(1), &ContributionReference::public("https://github.com/o/r/pull/2"));

        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            let mut seen = Vec::new();
            while let Some(id) = tracker.next_resolved().await {
                seen.push(id);
            }
            seen
        })
        .await
        .expect("next_resolved must not hang on a panicked task");

        assert_eq!(drained.len(), 2);
        let lost = tracker.resolved(ContributionId(0)).unwrap();
        assert_eq!(lost.status, ContributionStatus::Unknown);
        assert_eq!(lost.display_title, "Pull Request #1");
        assert_eq!(lost.source, Resolution::Fallback(Fallback::Unavailable));
        assert_eq!(tracker.resolved(ContributionId(1)).unwrap().display_title, "Survivor");
    }

    #[tokio::test]
    async fn test_poll_settles_panicked_lookup() {
        let lookup = Arc::new(StaticLookup::new().panicking(1));
        let mut tracker = tracker(lookup);
        tracker.request(ContributionId(0), &ContributionReference::public("https://github.com/o/r/pull/1"));

        let mut applied = 0;
        for _ in 0..50 {
            applied += tracker.poll();
            if applied > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(applied, 1);
        assert_eq!(tracker.pending_count(), 0);
        assert!(matches!(tracker.state(ContributionId(0)), RowState::Ready(_)));
    }

    #[test]
    fn test_row_state_into_record() {
        let key = RepoKey::new("o", "r");
        assert_eq!(RowState::Idle.into_record(Some(key.clone())), None);

        let loading = RowState::Loading.into_record(Some(key.clone())).unwrap();
        assert!(loading.is_loading);
        assert_eq!(loading.repo_key, Some(key));
        assert_eq!(loading.status, ContributionStatus::Unknown);
    }
}
