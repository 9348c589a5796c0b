// src/miner/scheduler.rs
//! Worker pool and job dispatch
//!
//! The pool owns a fixed set of search workers, each with its own FIFO
//! queue. Dispatching a job cancels the job it supersedes and broadcasts
//! the new one to every queue; every worker then searches the whole space
//! with its own random tail.

use crate::config::Config;
use crate::miner::algorithm::{DigestFinalizer, HashPrimitive, Sha256Finalizer};
use crate::miner::candidate::{RandomTail, TailFiller};
use crate::miner::job::Job;
use crate::miner::pause::PauseGate;
use crate::miner::worker::{SearchContext, Worker};
use crate::stats::HashRateTelemetry;
use crate::types::Solution;
use crate::utils::error::MinerError;
use arc_swap::ArcSwapOption;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Starts a named thread running the given body
pub(crate) type ThreadSpawner =
    dyn Fn(String, Box<dyn FnOnce() + Send>) -> io::Result<JoinHandle<()>> + Send + Sync;

fn os_thread(name: String, body: Box<dyn FnOnce() + Send>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name(name).spawn(body)
}

fn pool_closed() -> MinerError {
    MinerError::ChannelError("Worker pool is shut down".into())
}

/// Tunables for a [`WorkerPool`]
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Number of workers, already resolved against the core count
    pub workers: usize,
    /// Capacity of the solution channel
    pub solution_capacity: usize,
    /// Workers below this index sleep every batch
    pub courtesy_workers: usize,
    /// Length of the courtesy sleep
    pub courtesy_sleep: Duration,
    /// Interval between worker liveness checks
    pub supervise_interval: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        PoolOptions::from(&Config::default())
    }
}

impl From<&Config> for PoolOptions {
    fn from(config: &Config) -> Self {
        PoolOptions {
            workers: config.worker_count(),
            solution_capacity: config.solution_capacity,
            courtesy_workers: config.courtesy_workers,
            courtesy_sleep: config.courtesy_sleep(),
            supervise_interval: config.supervise_interval(),
        }
    }
}

/// One running worker: its queue and its thread
struct WorkerSlot {
    queue: Sender<Arc<Job>>,
    thread: JoinHandle<()>,
}

/// State shared between the pool, its dispatchers and its supervisor
struct PoolShared {
    workers: RwLock<Vec<WorkerSlot>>,
    current_job: ArcSwapOption<Job>,
    ctx: Arc<SearchContext>,
    /// Cloned into every worker; taken on shutdown so the stream disconnects
    /// once the last worker exits, whoever still holds a dispatcher
    solutions_tx: Mutex<Option<Sender<Solution>>>,
    /// Dropped on shutdown so every `select!` on the receiver wakes up
    shutdown_tx: Mutex<Option<Sender<()>>>,
    spawner: Arc<ThreadSpawner>,
}

impl PoolShared {
    fn is_shut_down(&self) -> bool {
        self.ctx.is_shutting_down()
    }

    fn dispatch(&self, job: Job) -> Result<(), MinerError> {
        if self.is_shut_down() {
            return Err(pool_closed());
        }

        let job = Arc::new(job);
        self.install(job.clone())?;

        log::debug!("Dispatching job with difficulty {}", job.difficulty());

        let workers = self.workers.read();
        workers.as_slice().par_iter().enumerate().for_each(|(index, slot)| {
            if let Err(e) = slot.queue.send(job.clone()) {
                // The supervisor redelivers the current job on respawn
                log::warn!("Worker {} queue unavailable: {}", index, e);
            }
        });

        Ok(())
    }

    /// Makes `job` the current job and cancels the one it replaces
    ///
    /// Fails, with `job` cancelled, when shutdown got in between the caller's
    /// check and the swap.
    fn install(&self, job: Arc<Job>) -> Result<(), MinerError> {
        if let Some(previous) = self.current_job.swap(Some(job.clone())) {
            previous.cancel();
        }

        if self.is_shut_down() {
            self.current_job.store(None);
            job.cancel();
            return Err(pool_closed());
        }
        Ok(())
    }

    fn spawn_worker(&self, index: usize) -> Result<WorkerSlot, MinerError> {
        let solutions = self
            .solutions_tx
            .lock()
            .clone()
            .ok_or_else(pool_closed)?;
        let (queue, jobs) = crossbeam_channel::unbounded();
        let worker = Worker::new(index, jobs, solutions, self.ctx.clone());

        let thread = (self.spawner)(format!("pf-worker-{}", index), Box::new(move || worker.run()))
            .map_err(|e| MinerError::StartupError(format!("worker {}: {}", index, e)))?;

        Ok(WorkerSlot { queue, thread })
    }

    /// Replaces every finished worker thread with a fresh one
    fn respawn_dead_workers(&self) -> Result<usize, MinerError> {
        if self.is_shut_down() {
            return Ok(0);
        }

        let mut workers = self.workers.write();
        let mut respawned = 0;

        for (index, slot) in workers.iter_mut().enumerate() {
            if !slot.thread.is_finished() {
                continue;
            }

            let fresh = self.spawn_worker(index)?;
            let dead = std::mem::replace(slot, fresh);
            if dead.thread.join().is_err() {
                log::error!("Worker {} panicked, respawning", index);
            } else {
                log::warn!("Worker {} exited unexpectedly, respawning", index);
            }

            if let Some(job) = self.current_job.load_full() {
                if !job.is_cancelled() {
                    slot.queue.send(job)?;
                }
            }
            respawned += 1;
        }

        Ok(respawned)
    }

    /// Signals shutdown to workers blocked anywhere
    fn signal_shutdown(&self) {
        if self.ctx.shutdown.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(job) = self.current_job.swap(None) {
            job.cancel();
        }
        self.solutions_tx.lock().take();
        self.shutdown_tx.lock().take();
        self.ctx.gate.wake_all();
    }
}

/// Cloneable handle that broadcasts jobs to a pool's workers
#[derive(Clone)]
pub struct JobDispatcher {
    shared: Arc<PoolShared>,
}

impl JobDispatcher {
    /// Broadcasts `job` to every worker
    ///
    /// The previously dispatched job is cancelled first, so workers still
    /// searching it stop by their next attempt. Never waits for workers to
    /// pick the job up.
    ///
    /// # Errors
    /// `MinerError::ChannelError` once the pool has shut down
    pub fn dispatch(&self, job: Job) -> Result<(), MinerError> {
        self.shared.dispatch(job)
    }
}

/// Builder for [`WorkerPool`]
///
/// Only the hash primitive is required; the finalizer defaults to SHA-256,
/// the tail filler to [`RandomTail`] and the pause gate to a fresh one.
pub struct WorkerPoolBuilder {
    primitive: Arc<dyn HashPrimitive>,
    finalizer: Arc<dyn DigestFinalizer>,
    tail: Arc<dyn TailFiller>,
    gate: Arc<PauseGate>,
    options: PoolOptions,
    spawner: Arc<ThreadSpawner>,
}

impl WorkerPoolBuilder {
    /// Sets pool tunables
    pub fn options(mut self, options: PoolOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the worker count
    pub fn workers(mut self, workers: usize) -> Self {
        self.options.workers = workers;
        self
    }

    /// Shares an externally controlled pause gate
    pub fn pause_gate(mut self, gate: Arc<PauseGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Replaces the digest finalizer
    pub fn finalizer(mut self, finalizer: Arc<dyn DigestFinalizer>) -> Self {
        self.finalizer = finalizer;
        self
    }

    /// Replaces the tail filler
    pub fn tail_filler(mut self, tail: Arc<dyn TailFiller>) -> Self {
        self.tail = tail;
        self
    }

    /// Replaces how worker threads are started
    #[cfg(test)]
    pub(crate) fn thread_spawner(mut self, spawner: Arc<ThreadSpawner>) -> Self {
        self.spawner = spawner;
        self
    }

    /// Spawns every worker and the supervisor
    ///
    /// # Errors
    /// - `MinerError::ConfigError` for a zero worker count or channel capacity
    /// - `MinerError::StartupError` if any thread cannot be spawned; workers
    ///   started before the failure are shut down again
    pub fn spawn(self) -> Result<WorkerPool, MinerError> {
        let options = self.options;
        if options.workers == 0 {
            return Err(MinerError::ConfigError("worker count must be at least 1".into()));
        }
        if options.solution_capacity == 0 {
            return Err(MinerError::ConfigError(
                "solution capacity must be at least 1".into(),
            ));
        }

        let (solutions_tx, solutions_rx) = crossbeam_channel::bounded(options.solution_capacity);
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(0);
        let telemetry = Arc::new(HashRateTelemetry::new(options.workers));

        let ctx = Arc::new(SearchContext {
            primitive: self.primitive,
            finalizer: self.finalizer,
            tail: self.tail,
            gate: self.gate,
            telemetry,
            shutdown: AtomicBool::new(false),
            shutdown_rx,
            courtesy_workers: options.courtesy_workers,
            courtesy_sleep: options.courtesy_sleep,
        });

        let shared = Arc::new(PoolShared {
            workers: RwLock::new(Vec::with_capacity(options.workers)),
            current_job: ArcSwapOption::empty(),
            ctx: ctx.clone(),
            solutions_tx: Mutex::new(Some(solutions_tx)),
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            spawner: self.spawner,
        });

        let mut pool = WorkerPool {
            shared,
            solutions: solutions_rx,
            supervisor: None,
        };

        for index in 0..options.workers {
            log::debug!("Starting search worker {}", index);
            // On error `pool` drops here and joins what was started
            let slot = pool.shared.spawn_worker(index)?;
            pool.shared.workers.write().push(slot);
        }

        pool.supervisor = Some(spawn_supervisor(
            pool.shared.clone(),
            options.supervise_interval,
        )?);

        log::info!(
            "Started {} search workers using {}",
            options.workers,
            ctx.primitive.name()
        );
        Ok(pool)
    }
}

fn spawn_supervisor(shared: Arc<PoolShared>, interval: Duration) -> Result<JoinHandle<()>, MinerError> {
    let shutdown = shared.ctx.shutdown_rx.clone();

    thread::Builder::new()
        .name("pf-supervisor".into())
        .spawn(move || loop {
            match shutdown.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = shared.respawn_dead_workers() {
                        log::error!("Failed to respawn worker: {}", e);
                    }
                }
                // Disconnected: the pool dropped its shutdown sender
                _ => break,
            }
        })
        .map_err(|e| MinerError::StartupError(format!("supervisor: {}", e)))
}

/// Fixed set of search workers sharing one pause gate and one solution stream
///
/// Dropping the pool shuts every worker down and joins the threads.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    solutions: Receiver<Solution>,
    supervisor: Option<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts building a pool around `primitive`
    pub fn builder(primitive: Arc<dyn HashPrimitive>) -> WorkerPoolBuilder {
        WorkerPoolBuilder {
            primitive,
            finalizer: Arc::new(Sha256Finalizer),
            tail: Arc::new(RandomTail),
            gate: Arc::new(PauseGate::new()),
            options: PoolOptions::default(),
            spawner: Arc::new(os_thread),
        }
    }

    /// Starts a pool sized and tuned from `config`
    pub fn from_config(config: &Config, primitive: Arc<dyn HashPrimitive>) -> Result<Self, MinerError> {
        Self::builder(primitive)
            .options(PoolOptions::from(config))
            .spawn()
    }

    /// Handle for broadcasting jobs from other threads
    pub fn dispatcher(&self) -> JobDispatcher {
        JobDispatcher {
            shared: self.shared.clone(),
        }
    }

    /// Broadcasts `job` to every worker, cancelling the previous job
    pub fn dispatch(&self, job: Job) -> Result<(), MinerError> {
        self.shared.dispatch(job)
    }

    /// Receiving end of the solution stream
    pub fn solutions(&self) -> Receiver<Solution> {
        self.solutions.clone()
    }

    /// Per-worker attempt counters
    pub fn telemetry(&self) -> Arc<HashRateTelemetry> {
        self.shared.ctx.telemetry.clone()
    }

    /// Gate shared by every worker of this pool
    pub fn pause_gate(&self) -> Arc<PauseGate> {
        self.shared.ctx.gate.clone()
    }

    /// Number of workers
    pub fn size(&self) -> usize {
        self.shared.workers.read().len()
    }

    /// Respawns workers whose thread has exited, returning how many
    ///
    /// The supervisor calls this periodically; it is exposed for callers
    /// that want an immediate check.
    pub fn respawn_dead_workers(&self) -> Result<usize, MinerError> {
        self.shared.respawn_dead_workers()
    }

    /// Stops every worker and waits for the threads to exit
    pub fn shutdown(self) {
        drop(self);
    }

    fn stop(&mut self) {
        self.shared.signal_shutdown();

        if let Some(supervisor) = self.supervisor.take() {
            if supervisor.join().is_err() {
                log::error!("Supervisor panicked during shutdown");
            }
        }

        let workers = std::mem::take(&mut *self.shared.workers.write());
        for (index, slot) in workers.into_iter().enumerate() {
            drop(slot.queue);
            if slot.thread.join().is_err() {
                log::error!("Worker {} panicked during shutdown", index);
            }
        }

        log::debug!("Worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}
