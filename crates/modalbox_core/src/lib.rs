//! Synchronous modal message boxes
//!
//! This crate turns a callback-driven alert dialog into a blocking call:
//! [`ModalPrompt::show`] returns the action the user picked, whether it is
//! called from the UI thread or from a worker thread.
//!
//! ```ignore
//! use modalbox_core::{ActionType, HeadlessToolkit, IconType, ModalPrompt, Responder};
//!
//! let (toolkit, _ui) = HeadlessToolkit::spawn(Responder::ByIndex(1))?;
//! let prompt = ModalPrompt::from_preset(toolkit, "Confirm", "Delete file?", IconType::Warning, ActionType::YesNo);
//! assert_eq!(prompt.show().code(), 2);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod event_loop;
pub mod prompt;
pub mod sync;
pub mod toolkit;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod headless;
pub mod labels;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{PromptError, ToolkitError, WaitError, last_error};
pub use event_loop::{DispatchLoop, ExitToken, Task};
pub use headless::{HeadlessToolkit, Responder, UiThread};
pub use labels::{ActionType, custom_labels};
pub use model::{ButtonSlot, ExecutionContext, IconType, PromptResult, PromptSpec, StockIcon};
pub use prompt::{Interrupter, ModalPrompt, PromptOptions};
pub use sync::{Handoff, Semaphore};
pub use toolkit::{AlertDialog, DialogButton, DialogSnapshot, HostToolkit};
