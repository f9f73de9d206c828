//! Cooperative single-threaded dispatch loop.
//!
//! A [`DispatchLoop`] runs queued tasks on the thread that owns it. Calls to
//! [`DispatchLoop::run`] nest: a task may start an inner loop which pumps the
//! same queue until its own [`ExitToken`] is signalled. Signalling a token
//! only stops the loop that was started with it; outer loops keep running and
//! any tasks still queued are dispatched by them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::error::ToolkitError;

/// Unit of work dispatched on the loop thread
pub type Task = Box<dyn FnOnce() + Send + 'static>;

struct LoopQueue {
    tasks: VecDeque<Task>,
    closed: bool,
}

struct LoopShared {
    queue: Mutex<LoopQueue>,
    cond: Condvar,
    owner: Mutex<Option<ThreadId>>,
    depth: AtomicUsize,
}

impl LoopShared {
    fn queue(&self) -> MutexGuard<'_, LoopQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn owner(&self) -> MutexGuard<'_, Option<ThreadId>> {
        self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a dispatch loop. Clones share the same queue.
#[derive(Clone)]
pub struct DispatchLoop {
    shared: Arc<LoopShared>,
}

impl Default for DispatchLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DispatchLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchLoop")
            .field("depth", &self.depth())
            .field("pending", &self.pending())
            .finish()
    }
}

impl DispatchLoop {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(LoopShared {
                queue: Mutex::new(LoopQueue {
                    tasks: VecDeque::new(),
                    closed: false,
                }),
                cond: Condvar::new(),
                owner: Mutex::new(None),
                depth: AtomicUsize::new(0),
            }),
        }
    }

    /// Make the calling thread the loop thread.
    ///
    /// Returns false if another thread already owns the loop.
    pub fn bind_current_thread(&self) -> bool {
        let current = thread::current().id();
        let mut owner = self.shared.owner();
        match *owner {
            Some(id) => id == current,
            None => {
                *owner = Some(current);
                true
            }
        }
    }

    pub fn is_loop_thread(&self) -> bool {
        *self.shared.owner() == Some(thread::current().id())
    }

    /// Queue a task for the loop thread.
    pub fn post(&self, task: Task) -> Result<(), ToolkitError> {
        let mut queue = self.shared.queue();
        if queue.closed {
            return Err(ToolkitError::Unavailable(
                "dispatch loop is closed".to_string(),
            ));
        }
        queue.tasks.push_back(task);
        drop(queue);
        self.shared.cond.notify_all();
        Ok(())
    }

    /// Refuse further tasks. Tasks already queued are still dispatched.
    pub fn close(&self) {
        self.shared.queue().closed = true;
        self.shared.cond.notify_all();
    }

    pub fn exit_token(&self) -> ExitToken {
        ExitToken {
            signalled: Arc::new(AtomicBool::new(false)),
            shared: self.shared.clone(),
        }
    }

    /// Number of loops currently running (0 when idle, 2 inside a nested loop)
    pub fn depth(&self) -> usize {
        self.shared.depth.load(Ordering::SeqCst)
    }

    /// Number of queued tasks
    pub fn pending(&self) -> usize {
        self.shared.queue().tasks.len()
    }

    /// Dispatch tasks until `exit` is signalled.
    ///
    /// The first call binds the loop to the calling thread; calling from any
    /// other thread afterwards fails without dispatching anything.
    pub fn run(&self, exit: &ExitToken) -> Result<(), ToolkitError> {
        if !self.bind_current_thread() {
            return Err(ToolkitError::Unavailable(
                "dispatch loop is owned by another thread".to_string(),
            ));
        }

        let _depth = DepthGuard::enter(&self.shared.depth);
        tracing::debug!(depth = self.depth(), "Entering dispatch loop");

        while let Some(task) = self.next_task(exit) {
            task();
        }

        tracing::debug!(depth = self.depth(), "Leaving dispatch loop");
        Ok(())
    }

    /// Wait for the next task, or None once `exit` is signalled.
    fn next_task(&self, exit: &ExitToken) -> Option<Task> {
        let mut queue = self.shared.queue();
        loop {
            if exit.is_signalled() {
                return None;
            }
            if let Some(task) = queue.tasks.pop_front() {
                return Some(task);
            }
            queue = self
                .shared
                .cond
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

struct DepthGuard<'a>(&'a AtomicUsize);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a AtomicUsize) -> Self {
        depth.fetch_add(1, Ordering::SeqCst);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Stop condition for one [`DispatchLoop::run`] call
#[derive(Clone)]
pub struct ExitToken {
    signalled: Arc<AtomicBool>,
    shared: Arc<LoopShared>,
}

impl std::fmt::Debug for ExitToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExitToken")
            .field("signalled", &self.is_signalled())
            .finish()
    }
}

impl ExitToken {
    /// Ask the loop running with this token to return. Idempotent.
    pub fn signal(&self) {
        // hold the queue lock so a loop about to wait cannot miss the wakeup
        let queue = self.shared.queue();
        self.signalled.store(true, Ordering::SeqCst);
        drop(queue);
        self.shared.cond.notify_all();
    }

    pub fn is_signalled(&self) -> bool {
        self.signalled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_run_dispatches_in_order() {
        let event_loop = DispatchLoop::new();
        let exit = event_loop.exit_token();
        let (tx, rx) = channel();

        for i in 0..3 {
            let tx = tx.clone();
            event_loop.post(Box::new(move || tx.send(i).unwrap())).unwrap();
        }
        let stop = exit.clone();
        event_loop.post(Box::new(move || stop.signal())).unwrap();

        event_loop.run(&exit).unwrap();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(event_loop.depth(), 0);
    }

    #[test]
    fn test_nested_exit_only_unwinds_inner_loop() {
        let event_loop = DispatchLoop::new();
        let outer = event_loop.exit_token();
        let (tx, rx) = channel();

        let inner_loop = event_loop.clone();
        let outer_stop = outer.clone();
        let log = tx.clone();
        event_loop
            .post(Box::new(move || {
                let inner = inner_loop.exit_token();
                let inner_stop = inner.clone();
                let depth_check = inner_loop.clone();
                let nested_log = log.clone();
                inner_loop
                    .post(Box::new(move || {
                        nested_log.send(format!("nested depth {}", depth_check.depth())).unwrap();
                        inner_stop.signal();
                    }))
                    .unwrap();
                // queued behind the signal, must be run by the outer loop
                let late_log = log.clone();
                let late_check = inner_loop.clone();
                inner_loop
                    .post(Box::new(move || {
                        late_log.send(format!("late depth {}", late_check.depth())).unwrap();
                        outer_stop.signal();
                    }))
                    .unwrap();

                inner_loop.run(&inner).unwrap();
                log.send("inner returned".to_string()).unwrap();
            }))
            .unwrap();

        event_loop.run(&outer).unwrap();
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec!["nested depth 2", "inner returned", "late depth 1"]
        );
    }

    #[test]
    fn test_signal_from_other_thread_wakes_loop() {
        let event_loop = DispatchLoop::new();
        let exit = event_loop.exit_token();
        let stop = exit.clone();
        let signaller = thread::spawn(move || {
            thread::sleep(std::time::Duration::from_millis(20));
            stop.signal();
        });
        event_loop.run(&exit).unwrap();
        signaller.join().unwrap();
        assert!(exit.is_signalled());
    }

    #[test]
    fn test_closed_loop_rejects_tasks() {
        let event_loop = DispatchLoop::new();
        event_loop.close();
        assert!(matches!(
            event_loop.post(Box::new(|| {})),
            Err(ToolkitError::Unavailable(_))
        ));
    }

    #[test]
    fn test_loop_thread_binding() {
        let event_loop = DispatchLoop::new();
        assert!(!event_loop.is_loop_thread());
        assert!(event_loop.bind_current_thread());
        assert!(event_loop.is_loop_thread());

        let other = event_loop.clone();
        let result = thread::spawn(move || {
            let exit = other.exit_token();
            (other.is_loop_thread(), other.run(&exit).is_err())
        })
        .join()
        .unwrap();
        assert_eq!(result, (false, true));
    }
}
