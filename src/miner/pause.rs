// src/miner/pause.rs
//! Process-wide pause gate
//!
//! One gate is shared by every worker of a pool. An external controller
//! (thermal manager, user input) flips it; workers block on it at batch
//! boundaries until it reads "run" again or the pool shuts down.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative run/pause signal, "run" by default
#[derive(Debug, Default)]
pub struct PauseGate {
    paused: AtomicBool,
    lock: Mutex<()>,
    changed: Condvar,
}

impl PauseGate {
    /// Creates a gate in the "run" state
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds workers at their next batch boundary
    pub fn pause(&self) {
        let _guard = self.lock.lock();
        if !self.paused.swap(true, Ordering::SeqCst) {
            log::info!("Mining paused");
        }
    }

    /// Releases every waiting worker
    pub fn resume(&self) {
        let _guard = self.lock.lock();
        if self.paused.swap(false, Ordering::SeqCst) {
            log::info!("Mining resumed");
        }
        self.changed.notify_all();
    }

    /// Current state of the gate
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Blocks while the gate is paused
    ///
    /// Returns `false` if `shutdown` was raised, in which case the caller
    /// must stop working. Whoever raises `shutdown` must call
    /// [`PauseGate::wake_all`] afterwards.
    pub fn wait_until_running(&self, shutdown: &AtomicBool) -> bool {
        if !self.paused.load(Ordering::SeqCst) {
            return !shutdown.load(Ordering::SeqCst);
        }

        let mut guard = self.lock.lock();
        while self.paused.load(Ordering::SeqCst) && !shutdown.load(Ordering::SeqCst) {
            self.changed.wait(&mut guard);
        }

        !shutdown.load(Ordering::SeqCst)
    }

    /// Wakes all waiters so they re-check their shutdown flag
    pub fn wake_all(&self) {
        let _guard = self.lock.lock();
        self.changed.notify_all();
    }
}
