use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Metric names recorded by the pipeline stages.
pub mod metrics {
    pub const PAGES_FOUND: &str = "pages_found";
    pub const CARDS_FOUND: &str = "cards_found";
    pub const PAGES_LOADED: &str = "pages_loaded";
    pub const CARDS_SKIPPED: &str = "cards_skipped";
    pub const CARDS_ACCEPTED: &str = "cards_accepted";
    pub const CARDS_ALREADY_PRESENT: &str = "cards_already_present";
    pub const CARDS_SAVED: &str = "cards_saved";
    pub const PAGE_ERRORS: &str = "page_errors";
    pub const CARD_ERRORS: &str = "card_errors";
}

/// Process-wide counter store, keyed by run identifier and metric name.
///
/// Any stage may increment from any worker; increments are monotonic and
/// runs never see each other's counters.
#[derive(Debug, Default)]
pub struct ProgressBoard {
    runs: Mutex<HashMap<String, HashMap<&'static str, u64>>>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `metric` for `run`. A zero amount records
    /// nothing, so untouched counters never materialize in snapshots.
    pub fn add(&self, run: &str, metric: &'static str, amount: u64) {
        if amount == 0 {
            return;
        }
        if let Ok(mut runs) = self.runs.lock() {
            let counters = runs.entry(run.to_string()).or_default();
            *counters.entry(metric).or_insert(0) += amount;
        }
    }

    /// Increments `metric` for `run` by one.
    pub fn bump(&self, run: &str, metric: &'static str) {
        self.add(run, metric, 1);
    }

    pub fn get(&self, run: &str, metric: &str) -> u64 {
        self.runs
            .lock()
            .ok()
            .and_then(|runs| runs.get(run).and_then(|c| c.get(metric).copied()))
            .unwrap_or(0)
    }

    /// Ordered snapshot of one run's counters.
    pub fn snapshot(&self, run: &str) -> BTreeMap<String, u64> {
        self.runs
            .lock()
            .ok()
            .and_then(|runs| {
                runs.get(run).map(|counters| {
                    counters
                        .iter()
                        .map(|(metric, value)| ((*metric).to_string(), *value))
                        .collect()
                })
            })
            .unwrap_or_default()
    }

    /// Drops one run's counters at teardown.
    pub fn clear_run(&self, run: &str) {
        if let Ok(mut runs) = self.runs.lock() {
            runs.remove(run);
        }
    }
}
