use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use modalbox_core::ButtonSlot;

use super::view::{DialogView, KeyOutcome};

/// Result of routing a key to the innermost dialog
#[derive(Debug)]
pub enum Routed {
    /// The innermost dialog was removed from the stack
    Closed {
        view: DialogView,
        /// Button to activate, None when dismissed
        slot: Option<ButtonSlot>,
    },
    /// Something visible changed
    Changed,
    Unchanged,
}

/// Open dialogs, innermost last. Only the innermost one receives keys.
#[derive(Debug, Default)]
pub struct DialogStack {
    dialogs: Vec<DialogView>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, view: DialogView) {
        self.dialogs.push(view);
    }

    pub fn pop(&mut self) -> Option<DialogView> {
        self.dialogs.pop()
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    pub fn top(&self) -> Option<&DialogView> {
        self.dialogs.last()
    }

    pub fn route_key(&mut self, key: KeyEvent) -> Routed {
        let Some(top) = self.dialogs.last_mut() else {
            return Routed::Unchanged;
        };
        let slot = match top.handle_key(key) {
            KeyOutcome::Activate(slot) => Some(slot),
            KeyOutcome::Dismiss => None,
            KeyOutcome::Redraw => return Routed::Changed,
            KeyOutcome::Ignored => return Routed::Unchanged,
        };
        match self.dialogs.pop() {
            Some(view) => Routed::Closed { view, slot },
            None => Routed::Unchanged,
        }
    }

    /// Draw every dialog, outermost first
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        for dialog in &self.dialogs {
            dialog.render(frame, area);
        }
    }
}

/// Run the handler for a closed dialog. Must be called without holding the
/// screen lock, since handlers may show further dialogs.
pub fn finish(view: DialogView, slot: Option<ButtonSlot>) {
    match slot {
        Some(slot) => {
            tracing::debug!(?slot, "Dialog button activated");
            if view.into_dialog().press(slot).is_err() {
                tracing::warn!(?slot, "Activated slot has no handler");
            }
        }
        None => {
            tracing::debug!(title = %view.dialog().title, "Dialog dismissed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use modalbox_core::AlertDialog;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::{Arc, Mutex};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn recording_view(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> DialogView {
        let yes = log.clone();
        let no = log.clone();
        DialogView::new(
            AlertDialog::builder(name, "Continue?")
                .cancelable(false)
                .button(ButtonSlot::Positive, "Yes", move || {
                    yes.lock().unwrap().push(format!("{name}: yes"));
                })
                .button(ButtonSlot::Negative, "No", move || {
                    no.lock().unwrap().push(format!("{name}: no"));
                })
                .build(),
        )
    }

    #[test]
    fn test_key_goes_to_innermost_dialog() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut stack = DialogStack::new();
        stack.push(recording_view("Outer", &log));
        stack.push(recording_view("Inner", &log));

        let Routed::Closed { view, slot } = stack.route_key(key(KeyCode::Char('2'))) else {
            panic!("expected the inner dialog to close");
        };
        assert_eq!(view.dialog().title, "Inner");
        assert!(log.lock().unwrap().is_empty());

        finish(view, slot);
        assert_eq!(*log.lock().unwrap(), vec!["Inner: no".to_string()]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().unwrap().dialog().title, "Outer");
    }

    #[test]
    fn test_ignored_keys_keep_stack() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut stack = DialogStack::new();
        stack.push(recording_view("Outer", &log));
        stack.push(recording_view("Inner", &log));

        assert!(matches!(stack.route_key(key(KeyCode::Esc)), Routed::Unchanged));
        assert!(matches!(stack.route_key(key(KeyCode::Char('x'))), Routed::Unchanged));
        assert!(matches!(stack.route_key(key(KeyCode::Tab)), Routed::Changed));
        assert_eq!(stack.len(), 2);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_stack_ignores_keys() {
        let mut stack = DialogStack::new();
        assert!(stack.is_empty());
        assert!(matches!(stack.route_key(key(KeyCode::Enter)), Routed::Unchanged));
    }

    #[test]
    fn test_render_draws_innermost_on_top() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut stack = DialogStack::new();
        stack.push(recording_view("Outer", &log));
        stack.push(recording_view("Inner", &log));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| stack.render(frame, frame.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        // both have the same size and position, so only the inner one shows
        assert!(text.contains("Inner"));
        assert!(!text.contains("Outer"));
    }
}
