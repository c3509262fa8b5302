use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-process success/failure counters shared between the poller and the
/// console surface. External resources carry their own atomicity; these only
/// feed the dashboard.
#[derive(Debug, Default)]
pub struct ProcessingStats {
    processed: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub processed: u64,
    pub failed: u64,
    pub total: u64,
}

impl ProcessingStats {
    pub fn record_success(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let processed = self.processed.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        StatsSnapshot {
            processed,
            failed,
            total: processed + failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let stats = ProcessingStats::default();
        stats.record_success();
        stats.record_success();
        stats.record_failure();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.processed, 2);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.total, 3);
    }
}
