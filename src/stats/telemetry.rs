// src/stats/telemetry.rs
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-worker hash attempt counters and engine event counters
///
/// Each slot is written only by the worker owning that index, so plain
/// relaxed atomics suffice; readers just need to see recent values.
/// Slots are never reset, which keeps rates continuous across a worker
/// respawn.
#[derive(Debug)]
pub struct HashRateTelemetry {
    slots: Box<[AtomicU64]>,
    solutions_found: AtomicU64,
    solutions_dropped: AtomicU64,
    primitive_failures: AtomicU64,
}

impl HashRateTelemetry {
    /// Creates zeroed counters for `workers` slots
    pub fn new(workers: usize) -> Self {
        HashRateTelemetry {
            slots: (0..workers).map(|_| AtomicU64::new(0)).collect(),
            solutions_found: AtomicU64::new(0),
            solutions_dropped: AtomicU64::new(0),
            primitive_failures: AtomicU64::new(0),
        }
    }

    /// Number of worker slots
    pub fn workers(&self) -> usize {
        self.slots.len()
    }

    /// Adds completed attempts to a worker's slot
    #[inline]
    pub fn record_attempts(&self, worker: usize, attempts: u64) {
        if let Some(slot) = self.slots.get(worker) {
            slot.fetch_add(attempts, Ordering::Relaxed);
        }
    }

    /// Current value of one slot
    pub fn attempts(&self, worker: usize) -> u64 {
        self.slots
            .get(worker)
            .map_or(0, |slot| slot.load(Ordering::Relaxed))
    }

    /// Copy of every slot, indexed by worker id
    pub fn snapshot(&self) -> Vec<u64> {
        self.slots
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect()
    }

    /// Sum of all slots
    pub fn total_attempts(&self) -> u64 {
        self.slots.iter().map(|slot| slot.load(Ordering::Relaxed)).sum()
    }

    pub(crate) fn record_solution(&self) {
        self.solutions_found.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped_solution(&self) {
        self.solutions_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_primitive_failure(&self) {
        self.primitive_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Solutions handed to the result channel
    pub fn solutions_found(&self) -> u64 {
        self.solutions_found.load(Ordering::Relaxed)
    }

    /// Solutions lost because the result channel was full or closed
    pub fn solutions_dropped(&self) -> u64 {
        self.solutions_dropped.load(Ordering::Relaxed)
    }

    /// Attempts skipped because the hash primitive reported an error
    pub fn primitive_failures(&self) -> u64 {
        self.primitive_failures.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_independent() {
        let telemetry = HashRateTelemetry::new(3);
        telemetry.record_attempts(0, 10);
        telemetry.record_attempts(2, 10);
        telemetry.record_attempts(2, 10);

        assert_eq!(telemetry.snapshot(), vec![10, 0, 20]);
        assert_eq!(telemetry.total_attempts(), 30);
        assert_eq!(telemetry.attempts(2), 20);
    }

    #[test]
    fn unknown_slot_is_ignored() {
        let telemetry = HashRateTelemetry::new(1);
        telemetry.record_attempts(5, 10);
        assert_eq!(telemetry.snapshot(), vec![0]);
        assert_eq!(telemetry.attempts(5), 0);
    }

    #[test]
    fn event_counters() {
        let telemetry = HashRateTelemetry::new(1);
        telemetry.record_solution();
        telemetry.record_dropped_solution();
        telemetry.record_dropped_solution();
        telemetry.record_primitive_failure();

        assert_eq!(telemetry.solutions_found(), 1);
        assert_eq!(telemetry.solutions_dropped(), 2);
        assert_eq!(telemetry.primitive_failures(), 1);
    }
}
