use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Errors raised while building a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// Action list is empty or holds more than three labels
    InvalidArgument(String),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for PromptError {}

/// Outcome of a blocking wait that did not receive a permit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// Another thread interrupted the waiter
    Interrupted,
    /// The configured timeout elapsed first
    TimedOut,
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitError::Interrupted => write!(f, "wait interrupted"),
            WaitError::TimedOut => write!(f, "wait timed out"),
        }
    }
}

impl std::error::Error for WaitError {}

/// Errors reported by a host toolkit when it cannot present a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolkitError {
    /// The UI side is gone (loop stopped, window closed...)
    Unavailable(String),
    /// The dialog could not be drawn
    Render(String),
}

impl fmt::Display for ToolkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolkitError::Unavailable(msg) => write!(f, "toolkit unavailable: {msg}"),
            ToolkitError::Render(msg) => write!(f, "dialog rendering failed: {msg}"),
        }
    }
}

impl std::error::Error for ToolkitError {}

static LAST_ERROR: Mutex<String> = Mutex::new(String::new());

/// Record the message of the latest dialog failure.
pub(crate) fn set_last_error(message: impl Into<String>) {
    let mut last = LAST_ERROR.lock().unwrap_or_else(PoisonError::into_inner);
    *last = message.into();
}

/// Message of the latest dialog failure, or an empty string if none occurred.
///
/// The store is process-wide: a prompt that returned `NoAction` because the
/// toolkit failed can be diagnosed from any thread afterwards.
pub fn last_error() -> String {
    LAST_ERROR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
