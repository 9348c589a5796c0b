// src/miner/worker.rs
//! Search worker
//!
//! Each worker owns one FIFO job queue and one dedicated thread. It idles on
//! the queue, then searches the dequeued job until the job is cancelled,
//! hashing one candidate per attempt.

use crate::miner::algorithm::{COST_M, COST_T, DigestFinalizer, HashPrimitive, PRIMITIVE_OUTPUT_LEN};
use crate::miner::candidate::{CandidateBuffer, TailFiller};
use crate::miner::job::Job;
use crate::miner::pause::PauseGate;
use crate::stats::HashRateTelemetry;
use crate::types::Solution;
use crossbeam_channel::{Receiver, Sender, TrySendError, select};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Attempts between telemetry updates and pause checks
pub const BATCH_SIZE: u64 = 10;

/// State shared by every worker of a pool
pub(crate) struct SearchContext {
    pub primitive: Arc<dyn HashPrimitive>,
    pub finalizer: Arc<dyn DigestFinalizer>,
    pub tail: Arc<dyn TailFiller>,
    pub gate: Arc<PauseGate>,
    pub telemetry: Arc<HashRateTelemetry>,
    /// Raised once on pool shutdown
    pub shutdown: AtomicBool,
    /// Disconnects when the pool drops its sender, waking idle workers
    pub shutdown_rx: Receiver<()>,
    /// Workers below this index sleep briefly every batch
    pub courtesy_workers: usize,
    pub courtesy_sleep: Duration,
}

impl SearchContext {
    #[inline]
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

/// How a search session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOutcome {
    /// The job was cancelled; go back to the queue
    Cancelled,
    /// The pool is shutting down
    Terminated,
}

/// Worker thread body bound to one queue and one telemetry slot
///
/// Each worker holds its own solution sender, so the stream disconnects
/// once every worker thread has exited.
pub(crate) struct Worker {
    index: usize,
    jobs: Receiver<Arc<Job>>,
    solutions: Sender<Solution>,
    ctx: Arc<SearchContext>,
}

impl Worker {
    pub(crate) fn new(
        index: usize,
        jobs: Receiver<Arc<Job>>,
        solutions: Sender<Solution>,
        ctx: Arc<SearchContext>,
    ) -> Self {
        Worker {
            index,
            jobs,
            solutions,
            ctx,
        }
    }

    /// Runs until pool shutdown or until the job queue disconnects
    pub fn run(self) {
        log::debug!("Search worker {} started", self.index);

        while let Some(job) = self.next_job() {
            if self.search(&job) == SearchOutcome::Terminated {
                break;
            }
        }

        log::debug!("Search worker {} terminated", self.index);
    }

    /// Blocks until a job arrives or the pool shuts down
    fn next_job(&self) -> Option<Arc<Job>> {
        if self.ctx.is_shutting_down() {
            return None;
        }

        select! {
            recv(self.jobs) -> job => job.ok(),
            recv(self.ctx.shutdown_rx) -> _ => None,
        }
    }

    /// Searches `job` until it is cancelled
    ///
    /// Cancellation is polled once per attempt. A solution found by an
    /// attempt that was already in flight when the job got cancelled is
    /// dropped by the second check before emission, so the window in which a
    /// superseded job can still publish is the time between that check and
    /// the `try_send` that follows it.
    fn search(&self, job: &Job) -> SearchOutcome {
        let ctx = &*self.ctx;
        let difficulty = job.difficulty();
        let courtesy = self.index < ctx.courtesy_workers;

        let mut candidate = CandidateBuffer::new(job, ctx.tail.as_ref());
        let mut output = [0u8; PRIMITIVE_OUTPUT_LEN];
        let mut batch = 0u64;

        log::trace!(
            "Worker {} searching {} from counter {}",
            self.index,
            difficulty,
            candidate.counter()
        );

        while !job.is_cancelled() {
            candidate.advance();

            match ctx
                .primitive
                .hash(candidate.as_bytes(), COST_T, COST_M, &mut output)
            {
                Ok(()) => {
                    let digest = ctx.finalizer.finalize(&output);
                    if difficulty.is_satisfied_by(&digest) && !job.is_cancelled() {
                        self.emit(candidate.solution());
                    }
                }
                Err(e) => {
                    ctx.telemetry.record_primitive_failure();
                    log::debug!(
                        "Worker {} skipped counter {}: {}",
                        self.index,
                        candidate.counter(),
                        e
                    );
                }
            }

            batch += 1;
            if batch == BATCH_SIZE {
                batch = 0;
                ctx.telemetry.record_attempts(self.index, BATCH_SIZE);

                if courtesy {
                    std::thread::sleep(ctx.courtesy_sleep);
                }

                if !ctx.gate.wait_until_running(&ctx.shutdown) {
                    return SearchOutcome::Terminated;
                }
            }
        }

        if ctx.is_shutting_down() {
            SearchOutcome::Terminated
        } else {
            SearchOutcome::Cancelled
        }
    }

    /// Publishes a solution without ever blocking the search loop
    fn emit(&self, solution: Solution) {
        match self.solutions.try_send(solution) {
            Ok(()) => {
                self.ctx.telemetry.record_solution();
                log::info!("Worker {} found solution {}", self.index, solution);
            }
            Err(TrySendError::Full(_)) => {
                self.ctx.telemetry.record_dropped_solution();
                log::warn!("Solution channel full, dropped {}", solution);
            }
            Err(TrySendError::Disconnected(_)) => {
                self.ctx.telemetry.record_dropped_solution();
                log::warn!("Solution channel closed, dropped {}", solution);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::difficulty::Difficulty;
    use crate::testing::{CopyPrimitive, FailingPrimitive, FixedDigest, ZeroTail};
    use crossbeam_channel::{bounded, unbounded};
    use std::thread;

    fn context(
        primitive: Arc<dyn HashPrimitive>,
        finalizer: Arc<dyn DigestFinalizer>,
        capacity: usize,
    ) -> (Arc<SearchContext>, Sender<Solution>, Receiver<Solution>, Sender<()>) {
        let (solutions_tx, solutions_rx) = bounded(capacity);
        let (shutdown_tx, shutdown_rx) = bounded(0);
        let ctx = Arc::new(SearchContext {
            primitive,
            finalizer,
            tail: Arc::new(ZeroTail),
            gate: Arc::new(PauseGate::new()),
            telemetry: Arc::new(HashRateTelemetry::new(1)),
            shutdown: AtomicBool::new(false),
            shutdown_rx,
            courtesy_workers: 0,
            courtesy_sleep: Duration::ZERO,
        });
        (ctx, solutions_tx, solutions_rx, shutdown_tx)
    }

    #[test]
    fn cancelled_job_is_not_searched() {
        let (ctx, solutions_tx, solutions, _shutdown) =
            context(Arc::new(CopyPrimitive), Arc::new(FixedDigest([0; 32])), 8);
        let (_tx, rx) = unbounded();
        let worker = Worker::new(0, rx, solutions_tx, ctx.clone());

        let job = Job::new([0; 32], Difficulty::default());
        job.cancel();

        assert_eq!(worker.search(&job), SearchOutcome::Cancelled);
        assert!(solutions.is_empty());
        assert_eq!(ctx.telemetry.attempts(0), 0);
    }

    #[test]
    fn full_channel_drops_without_blocking() {
        // Every attempt is a solution and nobody drains the channel
        let (ctx, solutions_tx, solutions, _shutdown) =
            context(Arc::new(CopyPrimitive), Arc::new(FixedDigest([0; 32])), 1);
        let (tx, rx) = unbounded();
        let worker = Worker::new(0, rx, solutions_tx, ctx.clone());
        let handle = thread::spawn(move || worker.run());

        let job = Arc::new(Job::new([0; 32], Difficulty::default()));
        tx.send(job.clone()).unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while ctx.telemetry.solutions_dropped() < 5 || ctx.telemetry.attempts(0) < 50 {
            assert!(std::time::Instant::now() < deadline, "worker stalled");
            thread::yield_now();
        }

        assert_eq!(solutions.len(), 1);
        assert_eq!(ctx.telemetry.solutions_found(), 1);

        drop(tx);
        job.cancel();
        handle.join().unwrap();
    }

    #[test]
    fn primitive_failures_are_counted_and_skipped() {
        let (ctx, solutions_tx, solutions, _shutdown) = context(
            Arc::new(FailingPrimitive::odd_counters()),
            Arc::new(FixedDigest([0; 32])),
            1024,
        );
        let (tx, rx) = unbounded();
        let worker = Worker::new(0, rx, solutions_tx, ctx.clone());
        let handle = thread::spawn(move || worker.run());

        let job = Arc::new(Job::new([0; 32], Difficulty::default()));
        tx.send(job.clone()).unwrap();

        let first = solutions.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = solutions.recv_timeout(Duration::from_secs(5)).unwrap();
        job.cancel();
        drop(tx);
        handle.join().unwrap();

        // Zero tail: counters run 1, 2, 3, ...; only even ones hash
        assert_eq!(first.as_bytes()[1], 2);
        assert_eq!(second.as_bytes()[1], 4);
        assert!(ctx.telemetry.primitive_failures() >= 2);
    }

    #[test]
    fn shutdown_wakes_idle_worker() {
        let (ctx, solutions_tx, _solutions, shutdown_tx) =
            context(Arc::new(CopyPrimitive), Arc::new(FixedDigest([0xff; 32])), 1);
        let (_tx, rx) = unbounded::<Arc<Job>>();
        let worker = Worker::new(0, rx, solutions_tx, ctx.clone());
        let handle = thread::spawn(move || worker.run());

        thread::sleep(Duration::from_millis(20));
        ctx.shutdown.store(true, Ordering::SeqCst);
        drop(shutdown_tx);

        handle.join().unwrap();
    }

    #[test]
    fn partial_batch_is_not_reported() {
        let (ctx, solutions_tx, _solutions, _shutdown) =
            context(Arc::new(CopyPrimitive), Arc::new(FixedDigest([0xff; 32])), 1);
        let (_tx, rx) = unbounded();
        let worker = Worker::new(0, rx, solutions_tx, ctx.clone());

        let job = Job::new([0; 32], Difficulty::new(255).unwrap());
        let token = job.cancellation();
        let handle = thread::spawn(move || {
            let outcome = worker.search(&job);
            (outcome, worker)
        });

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while ctx.telemetry.attempts(0) < 30 {
            assert!(std::time::Instant::now() < deadline);
            thread::yield_now();
        }
        token.cancel();

        let (outcome, _worker) = handle.join().unwrap();
        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(ctx.telemetry.attempts(0) % BATCH_SIZE, 0);
    }
}
