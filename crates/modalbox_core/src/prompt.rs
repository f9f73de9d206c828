//! Synchronous modal prompt.
//!
//! [`ModalPrompt::show`] blocks the calling flow until the user picks one of
//! the dialog's actions. How it blocks depends on the calling thread:
//!
//! - On the UI thread it cannot wait on a lock, since the button callback is
//!   delivered by the same thread. It pumps a nested dispatch loop instead,
//!   which the callback stops through an [`ExitToken`](crate::event_loop::ExitToken).
//! - On any other thread it schedules the dialog on the UI thread and blocks
//!   on a [`Handoff`] until the callback records the result.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::{PromptError, ToolkitError, WaitError, set_last_error};
use crate::labels::{ActionType, custom_labels};
use crate::model::{ExecutionContext, IconType, PromptResult, PromptSpec, slot_layout};
use crate::sync::Handoff;
use crate::toolkit::{AlertDialog, HostToolkit};

/// Tuning for the worker-thread wait
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptOptions {
    /// Give up waiting after this long (None = wait forever)
    pub wait_timeout: Option<Duration>,
    /// Return [`PromptResult::Interrupted`] instead of the recorded result
    /// when the wait is interrupted
    pub report_interruption: bool,
}

/// Modal message box with up to three actions
pub struct ModalPrompt {
    toolkit: Arc<dyn HostToolkit>,
    spec: Arc<PromptSpec>,
    options: PromptOptions,
    active: ActiveWait,
}

/// Handoff of the `show()` call in progress, if any
type ActiveWait = Arc<Mutex<Option<Arc<Handoff<u32>>>>>;

impl std::fmt::Debug for ModalPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalPrompt")
            .field("spec", &self.spec)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Handle that interrupts a prompt blocked on a worker thread
#[derive(Clone)]
pub struct Interrupter {
    active: ActiveWait,
}

impl Interrupter {
    /// Interrupt the `show()` call in progress. Does nothing when no call is
    /// in progress.
    pub fn interrupt(&self) {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.as_ref() {
            Some(handoff) => handoff.interrupt(),
            None => tracing::debug!("No prompt in progress, interrupt ignored"),
        }
    }
}

impl ModalPrompt {
    /// Create a prompt with custom action labels (1 to 3).
    pub fn new(
        toolkit: Arc<dyn HostToolkit>,
        caption: impl Into<String>,
        message: impl Into<String>,
        icon: IconType,
        actions: Vec<String>,
    ) -> Result<Self, PromptError> {
        let spec = PromptSpec::new(caption, message, icon, actions)?;
        Ok(Self::from_spec(toolkit, spec))
    }

    /// Create a prompt from a predefined set of actions
    pub fn from_preset(
        toolkit: Arc<dyn HostToolkit>,
        caption: impl Into<String>,
        message: impl Into<String>,
        icon: IconType,
        actions: ActionType,
    ) -> Self {
        Self::from_spec(toolkit, PromptSpec::from_preset(caption, message, icon, actions))
    }

    /// Create a prompt with up to three custom button labels.
    ///
    /// Gaps before the last given label are filled as [`custom_labels`] does.
    pub fn with_custom_labels(
        toolkit: Arc<dyn HostToolkit>,
        caption: impl Into<String>,
        message: impl Into<String>,
        icon: IconType,
        buttons: [Option<&str>; 3],
    ) -> Result<Self, PromptError> {
        let [button1, button2, button3] = buttons;
        Self::new(
            toolkit,
            caption,
            message,
            icon,
            custom_labels(button1, button2, button3),
        )
    }

    pub fn from_spec(toolkit: Arc<dyn HostToolkit>, spec: PromptSpec) -> Self {
        Self {
            toolkit,
            spec: Arc::new(spec),
            options: PromptOptions::default(),
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_options(mut self, options: PromptOptions) -> Self {
        self.options = options;
        self
    }

    pub fn spec(&self) -> &PromptSpec {
        &self.spec
    }

    pub fn interrupter(&self) -> Interrupter {
        Interrupter {
            active: self.active.clone(),
        }
    }

    /// Display the dialog and wait for the user's choice.
    pub fn show(&self) -> PromptResult {
        let context = if self.toolkit.is_ui_thread() {
            ExecutionContext::UiThread
        } else {
            ExecutionContext::Worker
        };
        tracing::info!(
            caption = self.spec.caption(),
            actions = self.spec.actions().len(),
            ?context,
            "Showing modal prompt"
        );

        // dialogs left open by earlier calls keep their own handoff
        let handoff = Arc::new(Handoff::new());
        self.set_active(Some(handoff.clone()));
        let result = match context {
            ExecutionContext::UiThread => self.show_nested(&handoff),
            ExecutionContext::Worker => self.show_blocking(&handoff),
        };
        self.set_active(None);

        tracing::info!(code = result.code(), ?result, "Modal prompt resolved");
        result
    }

    fn set_active(&self, handoff: Option<Arc<Handoff<u32>>>) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = handoff;
    }

    fn show_nested(&self, handoff: &Arc<Handoff<u32>>) -> PromptResult {
        let exit = self.toolkit.exit_token();
        let sink = handoff.clone();
        let stop = exit.clone();
        let dialog = build_dialog(&self.spec, move |code| {
            sink.complete(code);
            stop.signal();
        });

        if let Err(e) = self.toolkit.show_dialog(dialog) {
            report_failure(&e);
            return PromptResult::NoAction;
        }
        if let Err(e) = self.toolkit.run_nested_loop(&exit) {
            report_failure(&e);
        }
        self.recorded(handoff)
    }

    fn show_blocking(&self, waiter: &Arc<Handoff<u32>>) -> PromptResult {
        let spec = self.spec.clone();
        let handoff = waiter.clone();
        let toolkit = self.toolkit.clone();
        let scheduled = self.toolkit.run_on_ui_thread(Box::new(move || {
            let on_choice = {
                let handoff = handoff.clone();
                move |code| {
                    handoff.complete(code);
                }
            };
            if let Err(e) = toolkit.show_dialog(build_dialog(&spec, on_choice)) {
                report_failure(&e);
                handoff.release_empty();
            }
        }));
        if let Err(e) = scheduled {
            report_failure(&e);
            return PromptResult::NoAction;
        }

        match waiter.wait(self.options.wait_timeout) {
            Ok(Some(code)) => PromptResult::from_code(code, self.spec.actions().len()),
            Ok(None) => PromptResult::NoAction,
            Err(WaitError::Interrupted) => {
                // swallowed: the caller gets whatever was recorded so far
                tracing::warn!(
                    caption = self.spec.caption(),
                    "Prompt wait interrupted before a choice was made"
                );
                if self.options.report_interruption {
                    PromptResult::Interrupted
                } else {
                    self.recorded(waiter)
                }
            }
            Err(WaitError::TimedOut) => {
                tracing::warn!(
                    caption = self.spec.caption(),
                    timeout_ms = self.options.wait_timeout.map(whole_millis),
                    "Prompt wait timed out"
                );
                PromptResult::TimedOut
            }
        }
    }

    fn recorded(&self, handoff: &Handoff<u32>) -> PromptResult {
        handoff
            .peek()
            .map(|code| PromptResult::from_code(code, self.spec.actions().len()))
            .unwrap_or_default()
    }
}

fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn report_failure(error: &ToolkitError) {
    tracing::error!("Failed to display modal prompt: {error}");
    set_last_error(error.to_string());
}

/// Build a non-cancelable dialog whose buttons report their action code.
fn build_dialog(
    spec: &PromptSpec,
    on_choice: impl Fn(u32) + Clone + Send + 'static,
) -> AlertDialog {
    let mut builder = AlertDialog::builder(spec.caption(), spec.message())
        .icon(spec.icon().stock_icon())
        .cancelable(false);

    for (&(slot, code), label) in slot_layout(spec.actions().len()).iter().zip(spec.actions()) {
        let on_choice = on_choice.clone();
        builder = builder.button(slot, label.clone(), move || on_choice(code));
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ButtonSlot, StockIcon};

    #[test]
    fn test_whole_millis_saturates() {
        assert_eq!(whole_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_build_dialog_three_actions() {
        let spec = PromptSpec::new(
            "Choose",
            "Pick one",
            IconType::Question,
            vec!["Yes".into(), "Maybe".into(), "No".into()],
        )
        .unwrap();
        let dialog = build_dialog(&spec, |_| {});
        let snapshot = dialog.snapshot();
        assert_eq!(snapshot.icon, Some(StockIcon::MenuHelp));
        assert!(!snapshot.cancelable);
        assert_eq!(
            snapshot.buttons,
            vec![
                (ButtonSlot::Positive, "Yes".to_string()),
                (ButtonSlot::Neutral, "Maybe".to_string()),
                (ButtonSlot::Negative, "No".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_dialog_reports_codes() {
        let spec = PromptSpec::new(
            "Confirm",
            "Delete file?",
            IconType::Warning,
            vec!["Delete".into(), "Cancel".into()],
        )
        .unwrap();
        let handoff = Arc::new(Handoff::new());
        let sink = handoff.clone();
        let dialog = build_dialog(&spec, move |code| {
            sink.complete(code);
        });
        assert!(!dialog.has_slot(ButtonSlot::Neutral));
        dialog.press(ButtonSlot::Negative).unwrap();
        assert_eq!(handoff.peek(), Some(2));
    }
}
