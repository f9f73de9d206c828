//! Prompt data model
//!
//! A prompt is described by an immutable [`PromptSpec`] and resolves to a
//! [`PromptResult`]. Icons and buttons are expressed in logical terms here and
//! translated to toolkit resources ([`StockIcon`], [`ButtonSlot`]) when the
//! dialog is built.

use crate::error::PromptError;
use crate::labels::ActionType;

/// Maximum number of action buttons a dialog can carry
pub const MAX_ACTIONS: usize = 3;

// ============================================================================
// Icons
// ============================================================================

/// Symbol displayed next to the message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IconType {
    #[default]
    None,
    Info,
    Question,
    Warning,
    Error,
}

impl IconType {
    /// Map an integer icon category. Unknown categories render no icon.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => IconType::Info,
            2 => IconType::Question,
            3 => IconType::Warning,
            4 => IconType::Error,
            _ => IconType::None,
        }
    }

    /// Stock resource used to render this category, if any
    pub fn stock_icon(self) -> Option<StockIcon> {
        match self {
            IconType::None => None,
            IconType::Info => Some(StockIcon::DialogInfo),
            IconType::Question => Some(StockIcon::MenuHelp),
            IconType::Warning | IconType::Error => Some(StockIcon::DialogAlert),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(IconType::None),
            "info" => Some(IconType::Info),
            "question" => Some(IconType::Question),
            "warning" | "warn" => Some(IconType::Warning),
            "error" => Some(IconType::Error),
            _ => None,
        }
    }
}

/// Platform stock icon resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockIcon {
    DialogInfo,
    MenuHelp,
    DialogAlert,
}

// ============================================================================
// Buttons
// ============================================================================

/// Position of a button in an alert dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ButtonSlot {
    Positive,
    Neutral,
    Negative,
}

/// Slot and result code assigned to each action, in action order.
///
/// | actions | 1st | 2nd | 3rd |
/// |---|---|---|---|
/// | 1 | positive → 1 | | |
/// | 2 | positive → 1 | negative → 2 | |
/// | 3 | positive → 1 | neutral → 2 | negative → 3 |
pub fn slot_layout(action_count: usize) -> &'static [(ButtonSlot, u32)] {
    match action_count {
        0 => &[],
        1 => &[(ButtonSlot::Positive, 1)],
        2 => &[(ButtonSlot::Positive, 1), (ButtonSlot::Negative, 2)],
        _ => &[
            (ButtonSlot::Positive, 1),
            (ButtonSlot::Neutral, 2),
            (ButtonSlot::Negative, 3),
        ],
    }
}

// ============================================================================
// Results
// ============================================================================

/// Action chosen to close a prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PromptResult {
    /// No action recorded (initial state, or the dialog could not be shown)
    #[default]
    NoAction,
    Action1,
    Action2,
    Action3,
    /// The blocking wait was interrupted (only with `report_interruption`)
    Interrupted,
    /// The optional wait timeout elapsed
    TimedOut,
}

impl PromptResult {
    /// Integer outcome: 0 for no action, 1-3 for the chosen action.
    pub fn code(self) -> u32 {
        match self {
            PromptResult::Action1 => 1,
            PromptResult::Action2 => 2,
            PromptResult::Action3 => 3,
            PromptResult::NoAction | PromptResult::Interrupted | PromptResult::TimedOut => 0,
        }
    }

    /// Convert a recorded action code, rejecting codes beyond `max_actions`.
    pub fn from_code(code: u32, max_actions: usize) -> Self {
        if code as usize > max_actions {
            return PromptResult::NoAction;
        }
        match code {
            1 => PromptResult::Action1,
            2 => PromptResult::Action2,
            3 => PromptResult::Action3,
            _ => PromptResult::NoAction,
        }
    }

    pub fn is_action(self) -> bool {
        matches!(
            self,
            PromptResult::Action1 | PromptResult::Action2 | PromptResult::Action3
        )
    }
}

/// Which logical thread invoked `show()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    UiThread,
    Worker,
}

// ============================================================================
// Spec
// ============================================================================

/// Immutable description of a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    caption: String,
    message: String,
    icon: IconType,
    actions: Vec<String>,
}

impl PromptSpec {
    /// Build a spec, validating that 1 to 3 action labels are present.
    pub fn new(
        caption: impl Into<String>,
        message: impl Into<String>,
        icon: IconType,
        actions: Vec<String>,
    ) -> Result<Self, PromptError> {
        if actions.is_empty() {
            return Err(PromptError::InvalidArgument(
                "at least one action label is required".to_string(),
            ));
        }
        if actions.len() > MAX_ACTIONS {
            return Err(PromptError::InvalidArgument(format!(
                "at most {MAX_ACTIONS} action labels are supported, got {}",
                actions.len()
            )));
        }
        Ok(Self {
            caption: caption.into(),
            message: message.into(),
            icon,
            actions,
        })
    }

    /// Build from a preset, which always holds a valid label count.
    pub fn from_preset(
        caption: impl Into<String>,
        message: impl Into<String>,
        icon: IconType,
        actions: ActionType,
    ) -> Self {
        Self {
            caption: caption.into(),
            message: message.into(),
            icon,
            actions: actions.to_labels(),
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn icon(&self) -> IconType {
        self.icon
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }
}
