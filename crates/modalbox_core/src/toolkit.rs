//! Host UI toolkit seam.
//!
//! This module defines the [`HostToolkit`] trait a UI backend implements to
//! host modal prompts, and the [`AlertDialog`] it is asked to display.
//! Toolkits built around a [`DispatchLoop`] only need to provide
//! [`HostToolkit::dispatch_loop`] and [`HostToolkit::show_dialog`].

use crate::error::ToolkitError;
use crate::event_loop::{DispatchLoop, ExitToken, Task};
use crate::model::{ButtonSlot, StockIcon};

/// Callback run when a dialog button is activated
pub type ButtonHandler = Box<dyn FnOnce() + Send + 'static>;

/// Platform-independent UI toolkit interface.
pub trait HostToolkit: Send + Sync {
    /// Loop that dispatches UI events
    fn dispatch_loop(&self) -> &DispatchLoop;

    /// Display a modal dialog. Must be called on the UI thread.
    fn show_dialog(&self, dialog: AlertDialog) -> Result<(), ToolkitError>;

    /// Check if the calling thread is the UI thread
    fn is_ui_thread(&self) -> bool {
        self.dispatch_loop().is_loop_thread()
    }

    /// Schedule a task on the UI thread
    fn run_on_ui_thread(&self, task: Task) -> Result<(), ToolkitError> {
        self.dispatch_loop().post(task)
    }

    /// Create a stop condition for a nested loop
    fn exit_token(&self) -> ExitToken {
        self.dispatch_loop().exit_token()
    }

    /// Pump UI events on the current thread until `exit` is signalled
    fn run_nested_loop(&self, exit: &ExitToken) -> Result<(), ToolkitError> {
        self.dispatch_loop().run(exit)
    }
}

/// One labeled dialog button
pub struct DialogButton {
    pub slot: ButtonSlot,
    pub label: String,
    handler: ButtonHandler,
}

impl std::fmt::Debug for DialogButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogButton")
            .field("slot", &self.slot)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Modal alert dialog handed to a toolkit
#[derive(Debug)]
pub struct AlertDialog {
    pub title: String,
    pub message: String,
    pub icon: Option<StockIcon>,
    /// Whether outside taps / back navigation may close the dialog
    pub cancelable: bool,
    buttons: Vec<DialogButton>,
}

/// Display-only copy of a dialog, without handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSnapshot {
    pub title: String,
    pub message: String,
    pub icon: Option<StockIcon>,
    pub cancelable: bool,
    pub buttons: Vec<(ButtonSlot, String)>,
}

impl AlertDialog {
    pub fn builder(title: impl Into<String>, message: impl Into<String>) -> AlertDialogBuilder {
        AlertDialogBuilder {
            dialog: AlertDialog {
                title: title.into(),
                message: message.into(),
                icon: None,
                cancelable: true,
                buttons: Vec::new(),
            },
        }
    }

    /// Buttons ordered positive, neutral, negative
    pub fn buttons(&self) -> &[DialogButton] {
        &self.buttons
    }

    pub fn has_slot(&self, slot: ButtonSlot) -> bool {
        self.buttons.iter().any(|b| b.slot == slot)
    }

    /// Activate the button in `slot`, consuming the dialog.
    ///
    /// Gives the dialog back if it has no such button.
    pub fn press(mut self, slot: ButtonSlot) -> Result<(), AlertDialog> {
        match self.buttons.iter().position(|b| b.slot == slot) {
            Some(index) => {
                let button = self.buttons.swap_remove(index);
                (button.handler)();
                Ok(())
            }
            None => Err(self),
        }
    }

    pub fn snapshot(&self) -> DialogSnapshot {
        DialogSnapshot {
            title: self.title.clone(),
            message: self.message.clone(),
            icon: self.icon,
            cancelable: self.cancelable,
            buttons: self
                .buttons
                .iter()
                .map(|b| (b.slot, b.label.clone()))
                .collect(),
        }
    }
}

/// Fluent builder for [`AlertDialog`]
pub struct AlertDialogBuilder {
    dialog: AlertDialog,
}

impl AlertDialogBuilder {
    pub fn icon(mut self, icon: Option<StockIcon>) -> Self {
        self.dialog.icon = icon;
        self
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.dialog.cancelable = cancelable;
        self
    }

    /// Set the button for `slot`, replacing any previous one.
    pub fn button(
        mut self,
        slot: ButtonSlot,
        label: impl Into<String>,
        handler: impl FnOnce() + Send + 'static,
    ) -> Self {
        self.dialog.buttons.retain(|b| b.slot != slot);
        self.dialog.buttons.push(DialogButton {
            slot,
            label: label.into(),
            handler: Box::new(handler),
        });
        self
    }

    pub fn build(mut self) -> AlertDialog {
        self.dialog.buttons.sort_by_key(|b| b.slot);
        self.dialog
    }
}
