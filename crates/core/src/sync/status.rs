use nexora_market_data::FailureKind;

/// Phase of a view's sync state machine.
///
/// `Idle -> Fetching -> Idle` on success, `Fetching -> Stale` on a
/// rate-limited or failed fetch. A view in `Stale` keeps showing its last
/// values; the next scheduled fetch is the only way out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncPhase {
    #[default]
    Idle,
    Fetching,
    Stale,
}

/// Sync status of one view, including the passive stale indicator.
///
/// Overlapping fetches are allowed, so the phase reflects the most recent
/// resolution, not the oldest request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    pub last_failure: Option<FailureKind>,
    /// Fetches resolved while mounted, successful or not.
    pub resolved: u64,
}

impl SyncStatus {
    pub fn begin(&mut self) {
        self.phase = SyncPhase::Fetching;
    }

    pub fn succeed(&mut self) {
        self.phase = SyncPhase::Idle;
        self.last_failure = None;
        self.resolved += 1;
    }

    pub fn fail(&mut self, kind: FailureKind) {
        self.phase = SyncPhase::Stale;
        self.last_failure = Some(kind);
        self.resolved += 1;
    }

    /// The passive "stale data" indicator.
    pub fn is_stale(&self) -> bool {
        self.phase == SyncPhase::Stale
    }

    pub fn is_fetching(&self) -> bool {
        self.phase == SyncPhase::Fetching
    }
}

/// What became of a single fetch once it resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fresh data reached the view.
    Applied,
    /// The fetch failed; the view kept its last values and went stale.
    Stale(FailureKind),
    /// The view was unmounted (or remounted) before the fetch resolved.
    Discarded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let mut status = SyncStatus::default();
        assert_eq!(status.phase, SyncPhase::Idle);

        status.begin();
        assert!(status.is_fetching());

        status.fail(FailureKind::RateLimited);
        assert!(status.is_stale());
        assert_eq!(status.last_failure, Some(FailureKind::RateLimited));

        status.begin();
        status.succeed();
        assert_eq!(status.phase, SyncPhase::Idle);
        assert_eq!(status.last_failure, None);
        assert_eq!(status.resolved, 2);
    }
}
