// src/stats/reporter.rs
use crate::stats::telemetry::HashRateTelemetry;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use sysinfo::{Components, System};

/// Statistics related to mining performance
#[derive(Debug, Clone, Default)]
pub struct MiningStats {
    /// Total number of hash attempts since the pool started
    pub hashes_total: u64,
    /// Per-worker hashrate since the previous sample (hashes per second)
    pub worker_hashrates: Vec<f64>,
    /// Combined hashrate since the previous sample (hashes per second)
    pub hashrate: f64,
    /// Solutions handed to the submitter
    pub solutions_found: u64,
    /// Solutions dropped because the channel was full or closed
    pub solutions_dropped: u64,
    /// Attempts skipped after a primitive failure
    pub primitive_failures: u64,
}

/// Statistics related to hardware performance
#[derive(Debug, Clone)]
pub struct HardwareStats {
    /// Current CPU usage percentage (0-100)
    pub cpu_usage: f32,
    /// Memory currently used on the system (in bytes)
    pub memory_used: u64,
    /// Current CPU temperature in Celsius
    pub temperature: f32,
}

/// Computes per-worker rates as Δcounter / Δtime
///
/// Slots missing from `previous` count from zero.
pub fn hashrates(previous: &[u64], current: &[u64], elapsed: Duration) -> Vec<f64> {
    let seconds = elapsed.as_secs_f64();
    current
        .iter()
        .enumerate()
        .map(|(i, &now)| {
            let before = previous.get(i).copied().unwrap_or(0);
            if seconds > 0.0 {
                now.saturating_sub(before) as f64 / seconds
            } else {
                0.0
            }
        })
        .collect()
}

/// Turns telemetry counters into hashrates and logs them with hardware stats
pub struct StatsReporter {
    /// Counters written by the search workers
    telemetry: Arc<HashRateTelemetry>,
    /// System information collector
    system: System,
    /// Hardware component information collector
    components: Components,
    /// Interval at which stats are reported
    report_interval: Duration,
    /// Counters and time of the previous sample
    last_sample: (Instant, Vec<u64>),
}

impl StatsReporter {
    /// Creates a reporter over `telemetry` with the given reporting interval
    pub fn new(telemetry: Arc<HashRateTelemetry>, report_interval: Duration) -> Self {
        let baseline = telemetry.snapshot();
        StatsReporter {
            telemetry,
            system: System::new_all(),
            components: Components::new_with_refreshed_list(),
            report_interval,
            last_sample: (Instant::now(), baseline),
        }
    }

    /// Samples the counters
    ///
    /// Rates cover the time since the previous call (or since construction).
    pub fn sample(&mut self) -> MiningStats {
        let now = Instant::now();
        let counters = self.telemetry.snapshot();
        let (then, previous) = &self.last_sample;

        let worker_hashrates = hashrates(previous, &counters, now.duration_since(*then));
        let stats = MiningStats {
            hashes_total: counters.iter().sum(),
            hashrate: worker_hashrates.iter().sum(),
            worker_hashrates,
            solutions_found: self.telemetry.solutions_found(),
            solutions_dropped: self.telemetry.solutions_dropped(),
            primitive_failures: self.telemetry.primitive_failures(),
        };

        self.last_sample = (now, counters);
        stats
    }

    /// Gets the current hardware statistics
    ///
    /// This refreshes system information before returning the stats.
    pub fn get_hardware_stats(&mut self) -> HardwareStats {
        self.system.refresh_cpu_all();
        self.system.refresh_memory();
        self.components.refresh(true);

        let cpu_usage = self
            .system
            .cpus()
            .iter()
            .map(|c| c.cpu_usage())
            .sum::<f32>()
            / self.system.cpus().len().max(1) as f32;

        let temperature = self
            .components
            .iter()
            .find(|c| c.label().contains("CPU"))
            .and_then(|c| c.temperature())
            .unwrap_or(0.0);

        HardwareStats {
            cpu_usage,
            memory_used: self.system.used_memory(),
            temperature,
        }
    }

    /// Starts periodic reporting on a background thread
    ///
    /// The thread logs one line per interval and exits when `stop` receives
    /// a message or its sender is dropped.
    pub fn start_reporting(mut self, stop: Receiver<()>) -> JoinHandle<()> {
        std::thread::spawn(move || {
            loop {
                match stop.recv_timeout(self.report_interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    _ => break,
                }

                let mining_stats = self.sample();
                let hw_stats = self.get_hardware_stats();

                log::info!(
                    "Hashrate: {:.2} H/s | Solutions: {} (dropped {}) | Primitive errors: {} | CPU: {:.1}% | Temp: {:.1}°C",
                    mining_stats.hashrate,
                    mining_stats.solutions_found,
                    mining_stats.solutions_dropped,
                    mining_stats.primitive_failures,
                    hw_stats.cpu_usage,
                    hw_stats.temperature
                );

                for (worker, rate) in mining_stats.worker_hashrates.iter().enumerate() {
                    log::debug!("Worker {}: {:.2} H/s", worker, rate);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_are_delta_over_time() {
        let rates = hashrates(&[100, 200], &[300, 200], Duration::from_secs(2));
        assert_eq!(rates, vec![100.0, 0.0]);
    }

    #[test]
    fn new_slots_count_from_zero() {
        let rates = hashrates(&[], &[50], Duration::from_secs(5));
        assert_eq!(rates, vec![10.0]);
    }

    #[test]
    fn zero_elapsed_gives_zero_rate() {
        assert_eq!(hashrates(&[0], &[10], Duration::ZERO), vec![0.0]);
    }

    #[test]
    fn sample_reports_counter_progress() {
        let telemetry = Arc::new(HashRateTelemetry::new(2));
        let mut reporter = StatsReporter::new(telemetry.clone(), Duration::from_secs(60));

        telemetry.record_attempts(0, 10);
        telemetry.record_attempts(1, 20);
        std::thread::sleep(Duration::from_millis(10));

        let stats = reporter.sample();
        assert_eq!(stats.hashes_total, 30);
        assert!(stats.hashrate > 0.0);
        assert!(stats.worker_hashrates[1] > stats.worker_hashrates[0]);

        // Nothing moved since the last sample
        let stats = reporter.sample();
        assert_eq!(stats.hashes_total, 30);
        assert_eq!(stats.hashrate, 0.0);
    }

    #[test]
    fn reporting_thread_stops_on_disconnect() {
        let telemetry = Arc::new(HashRateTelemetry::new(1));
        let reporter = StatsReporter::new(telemetry, Duration::from_secs(3600));
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(0);

        let handle = reporter.start_reporting(stop_rx);
        drop(stop_tx);
        handle.join().unwrap();
    }
}
