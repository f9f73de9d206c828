//! Blocking primitives used by the worker-thread path.
//!
//! [`Semaphore`] is a plain counting semaphore. [`Handoff`] pairs a write-once
//! result slot with a permit counter under the same mutex, so the value a
//! waiter reads is always the one recorded before its permit was released.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::WaitError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Waits on `cond` until `ready` holds, failing on interruption or once the
/// deadline passes. Returns the guard so the caller can consume the state.
fn wait_until<'a, T>(
    cond: &Condvar,
    mut guard: MutexGuard<'a, T>,
    deadline: Option<Instant>,
    mut ready: impl FnMut(&mut T) -> bool,
    mut interrupted: impl FnMut(&mut T) -> bool,
) -> Result<MutexGuard<'a, T>, WaitError> {
    loop {
        if interrupted(&mut *guard) {
            return Err(WaitError::Interrupted);
        }
        if ready(&mut *guard) {
            return Ok(guard);
        }
        guard = match deadline {
            None => cond.wait(guard).unwrap_or_else(PoisonError::into_inner),
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(WaitError::TimedOut);
                }
                cond.wait_timeout(guard, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
        };
    }
}

// ============================================================================
// Semaphore
// ============================================================================

#[derive(Debug, Default)]
struct SemaphoreState {
    count: u32,
    interrupt_pending: bool,
}

/// Counting semaphore.
///
/// `acquire` blocks while the count is zero, `release` increments it and
/// wakes a waiter. Wake order is not guaranteed. Calling `acquire` and
/// `release` from the same thread deadlocks unless the release comes first.
#[derive(Debug, Default)]
pub struct Semaphore {
    state: Mutex<SemaphoreState>,
    cond: Condvar,
}

impl Semaphore {
    pub fn new(initial: u32) -> Self {
        Self {
            state: Mutex::new(SemaphoreState {
                count: initial,
                interrupt_pending: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Wait for one permit.
    pub fn acquire(&self) -> Result<(), WaitError> {
        self.acquire_inner(1, None)
    }

    /// Wait for `count` permits and consume them together.
    pub fn acquire_many(&self, count: u32) -> Result<(), WaitError> {
        self.acquire_inner(count, None)
    }

    /// Wait for one permit, giving up after `timeout`.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<(), WaitError> {
        self.acquire_inner(1, Some(Instant::now() + timeout))
    }

    /// Consume one permit if available, without blocking.
    pub fn try_acquire(&self) -> bool {
        let mut state = lock(&self.state);
        if state.count > 0 {
            state.count -= 1;
            true
        } else {
            false
        }
    }

    pub fn release(&self) {
        self.release_many(1);
    }

    pub fn release_many(&self, count: u32) {
        let mut state = lock(&self.state);
        state.count = state.count.saturating_add(count);
        drop(state);
        self.cond.notify_all();
    }

    /// Interrupt the current waiter, or the next one if nobody waits yet.
    pub fn interrupt(&self) {
        lock(&self.state).interrupt_pending = true;
        self.cond.notify_all();
    }

    /// Permits currently available
    pub fn available(&self) -> u32 {
        lock(&self.state).count
    }

    fn acquire_inner(&self, count: u32, deadline: Option<Instant>) -> Result<(), WaitError> {
        let guard = lock(&self.state);
        let mut guard = wait_until(
            &self.cond,
            guard,
            deadline,
            |s| s.count >= count,
            |s| std::mem::take(&mut s.interrupt_pending),
        )?;
        guard.count -= count;
        Ok(())
    }
}

// ============================================================================
// Handoff
// ============================================================================

#[derive(Debug)]
struct HandoffState<T> {
    value: Option<T>,
    permits: u32,
    interrupt_pending: bool,
}

/// Write-once result slot with a wake-up permit.
///
/// One side calls [`Handoff::complete`] exactly once; the other blocks in
/// [`Handoff::wait`] until the permit arrives and reads the recorded value.
#[derive(Debug)]
pub struct Handoff<T> {
    state: Mutex<HandoffState<T>>,
    cond: Condvar,
}

impl<T: Copy> Default for Handoff<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Handoff<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HandoffState {
                value: None,
                permits: 0,
                interrupt_pending: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Record `value` and release one permit.
    ///
    /// Returns false (and changes nothing) if a value was already recorded.
    pub fn complete(&self, value: T) -> bool {
        let mut state = lock(&self.state);
        if state.value.is_some() {
            return false;
        }
        state.value = Some(value);
        state.permits += 1;
        drop(state);
        self.cond.notify_all();
        true
    }

    /// Release a permit without recording a value.
    pub fn release_empty(&self) {
        lock(&self.state).permits += 1;
        self.cond.notify_all();
    }

    /// Block until a permit is available, then return the recorded value.
    ///
    /// On interruption or timeout the recorded value (if any) is still
    /// reachable through [`Handoff::peek`].
    pub fn wait(&self, timeout: Option<Duration>) -> Result<Option<T>, WaitError> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let guard = lock(&self.state);
        let mut guard = wait_until(
            &self.cond,
            guard,
            deadline,
            |s| s.permits > 0,
            |s| std::mem::take(&mut s.interrupt_pending),
        )?;
        guard.permits -= 1;
        Ok(guard.value)
    }

    pub fn peek(&self) -> Option<T> {
        lock(&self.state).value
    }

    pub fn interrupt(&self) {
        lock(&self.state).interrupt_pending = true;
        self.cond.notify_all();
    }
}
