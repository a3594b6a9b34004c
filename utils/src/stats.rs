//! Process-local statistics counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A thread-safe named-counter collection. Unknown names are ignored so
/// call sites never fail on a counter that was not registered.
pub struct StatsCounter {
    counters: HashMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        let counters = names.iter().map(|&n| (n, AtomicU64::new(0))).collect();
        Self { counters }
    }

    pub fn increment(&self, name: &str) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> HashMap<&'static str, u64> {
        self.counters
            .iter()
            .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_and_get() {
        let stats = StatsCounter::new(&["accepted", "rejected"]);
        stats.increment("accepted");
        stats.increment("accepted");
        assert_eq!(stats.get("accepted"), 2);
        assert_eq!(stats.get("rejected"), 0);
    }

    #[test]
    fn unknown_counter_is_ignored() {
        let stats = StatsCounter::new(&["accepted"]);
        stats.increment("nope");
        assert_eq!(stats.get("nope"), 0);
    }
}
