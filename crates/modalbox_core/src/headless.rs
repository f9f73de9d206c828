//! Headless host toolkit.
//!
//! Runs a real [`DispatchLoop`] on a dedicated UI thread but never draws
//! anything: a [`Responder`] decides which button each dialog receives, or
//! leaves the dialog pending until [`HeadlessToolkit::press`] is called.
//! Button activations are posted to the loop like any other UI event.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::error::ToolkitError;
use crate::event_loop::{DispatchLoop, ExitToken};
use crate::model::ButtonSlot;
use crate::sync::Semaphore;
use crate::toolkit::{AlertDialog, DialogSnapshot, HostToolkit};

/// How the headless toolkit answers dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Responder {
    /// Activate this slot
    Press(ButtonSlot),
    /// Activate the n-th button (0-based, in action order)
    ByIndex(usize),
    /// Keep the dialog pending until `press` is called
    Manual,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct HeadlessToolkit {
    dispatch: DispatchLoop,
    responder: Mutex<Responder>,
    pending: Arc<Mutex<Vec<AlertDialog>>>,
    shown: Mutex<Vec<DialogSnapshot>>,
    fail_next: Mutex<Option<ToolkitError>>,
}

impl HeadlessToolkit {
    /// Create a toolkit whose loop is driven by the caller.
    pub fn new(responder: Responder) -> Self {
        Self {
            dispatch: DispatchLoop::new(),
            responder: Mutex::new(responder),
            pending: Arc::new(Mutex::new(Vec::new())),
            shown: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Create a toolkit and start its UI thread.
    pub fn spawn(responder: Responder) -> io::Result<(Arc<Self>, UiThread)> {
        let toolkit = Arc::new(Self::new(responder));
        let ui_thread = UiThread::start(toolkit.dispatch.clone())?;
        Ok((toolkit, ui_thread))
    }

    pub fn set_responder(&self, responder: Responder) {
        *lock(&self.responder) = responder;
    }

    /// Dialogs displayed so far, oldest first
    pub fn shown(&self) -> Vec<DialogSnapshot> {
        lock(&self.shown).clone()
    }

    /// Dialogs waiting for a manual press
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Make the next `show_dialog` call fail with `error`.
    pub fn fail_next(&self, error: ToolkitError) {
        *lock(&self.fail_next) = Some(error);
    }

    /// Activate `slot` on the most recent pending dialog, from the UI thread.
    pub fn press(&self, slot: ButtonSlot) -> Result<(), ToolkitError> {
        self.press_pending(None, slot)
    }

    /// Activate `slot` on the `index`-th pending dialog (oldest first), from
    /// the UI thread.
    pub fn press_at(&self, index: usize, slot: ButtonSlot) -> Result<(), ToolkitError> {
        self.press_pending(Some(index), slot)
    }

    fn press_pending(&self, index: Option<usize>, slot: ButtonSlot) -> Result<(), ToolkitError> {
        let pending = self.pending.clone();
        self.dispatch.post(Box::new(move || {
            let taken = {
                let mut pending = lock(&pending);
                match index.or_else(|| pending.len().checked_sub(1)) {
                    Some(i) if i < pending.len() => Some((i, pending.remove(i))),
                    _ => None,
                }
            };
            let Some((i, dialog)) = taken else {
                tracing::warn!(?slot, ?index, "No pending dialog to press");
                return;
            };
            if let Err(dialog) = dialog.press(slot) {
                tracing::warn!(?slot, title = %dialog.title, "Dialog has no such button");
                let mut pending = lock(&pending);
                let at = i.min(pending.len());
                pending.insert(at, dialog);
            }
        }))
    }

    /// Try to close the most recent pending dialog without an action, as an
    /// outside tap or back navigation would.
    ///
    /// Returns false when the dialog is non-cancelable or nothing is pending.
    pub fn try_dismiss(&self) -> bool {
        let mut pending = lock(&self.pending);
        match pending.last() {
            Some(dialog) if dialog.cancelable => {
                pending.pop();
                true
            }
            Some(dialog) => {
                tracing::warn!(title = %dialog.title, "Refusing to dismiss non-cancelable dialog");
                false
            }
            None => false,
        }
    }

    fn choose(&self, dialog: &AlertDialog) -> Option<ButtonSlot> {
        match *lock(&self.responder) {
            Responder::Press(slot) => Some(slot),
            Responder::ByIndex(index) => dialog.buttons().get(index).map(|b| b.slot),
            Responder::Manual => None,
        }
    }
}

impl HostToolkit for HeadlessToolkit {
    fn dispatch_loop(&self) -> &DispatchLoop {
        &self.dispatch
    }

    fn show_dialog(&self, dialog: AlertDialog) -> Result<(), ToolkitError> {
        if let Some(error) = lock(&self.fail_next).take() {
            return Err(error);
        }
        lock(&self.shown).push(dialog.snapshot());

        match self.choose(&dialog) {
            Some(slot) if dialog.has_slot(slot) => {
                tracing::debug!(?slot, title = %dialog.title, "Scheduling scripted button press");
                self.dispatch.post(Box::new(move || {
                    // slot presence was checked above
                    let _ = dialog.press(slot);
                }))
            }
            choice => {
                if let Some(slot) = choice {
                    tracing::warn!(?slot, "Scripted slot missing, leaving dialog pending");
                }
                lock(&self.pending).push(dialog);
                Ok(())
            }
        }
    }
}

/// Dedicated thread running a dispatch loop. Stops the loop when dropped.
pub struct UiThread {
    dispatch: DispatchLoop,
    exit: ExitToken,
    handle: Option<JoinHandle<()>>,
}

impl UiThread {
    /// Start a thread that owns `dispatch` and pumps it until dropped.
    pub fn start(dispatch: DispatchLoop) -> io::Result<Self> {
        let exit = dispatch.exit_token();
        let ready = Arc::new(Semaphore::new(0));

        let handle = {
            let dispatch = dispatch.clone();
            let exit = exit.clone();
            let ready = ready.clone();
            thread::Builder::new()
                .name("modalbox-ui".to_string())
                .spawn(move || {
                    dispatch.bind_current_thread();
                    ready.release();
                    if let Err(e) = dispatch.run(&exit) {
                        tracing::error!("UI thread loop failed: {e}");
                    }
                })?
        };

        // the loop must be bound before anyone asks `is_ui_thread`
        if let Err(e) = ready.acquire() {
            tracing::warn!("UI thread start-up wait failed: {e}");
        }

        Ok(Self {
            dispatch,
            exit,
            handle: Some(handle),
        })
    }

    pub fn dispatch_loop(&self) -> &DispatchLoop {
        &self.dispatch
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        self.dispatch.close();
        self.exit.signal();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
