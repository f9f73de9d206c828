use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use modalbox_core::{AlertDialog, ButtonSlot, StockIcon};

const MODAL_WIDTH: u16 = 60;
const MODAL_MIN_HEIGHT: u16 = 8;

/// What a key press does to the dialog on top of the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Activate the button in this slot
    Activate(ButtonSlot),
    /// Close without an action (cancelable dialogs only)
    Dismiss,
    /// Focus moved, redraw needed
    Redraw,
    Ignored,
}

/// A displayed dialog plus its keyboard focus
#[derive(Debug)]
pub struct DialogView {
    dialog: AlertDialog,
    focus: usize,
}

impl DialogView {
    pub fn new(dialog: AlertDialog) -> Self {
        Self { dialog, focus: 0 }
    }

    pub fn dialog(&self) -> &AlertDialog {
        &self.dialog
    }

    pub fn into_dialog(self) -> AlertDialog {
        self.dialog
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Handle key events for the dialog
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let count = self.dialog.buttons().len();
        if count == 0 {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Left | KeyCode::BackTab => {
                self.focus = (self.focus + count - 1) % count;
                KeyOutcome::Redraw
            }
            KeyCode::Right | KeyCode::Tab => {
                self.focus = (self.focus + 1) % count;
                KeyOutcome::Redraw
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                KeyOutcome::Activate(self.dialog.buttons()[self.focus].slot)
            }
            KeyCode::Char(c @ '1'..='3') => {
                let index = (c as u8 - b'1') as usize;
                match self.dialog.buttons().get(index) {
                    Some(button) => KeyOutcome::Activate(button.slot),
                    None => KeyOutcome::Ignored,
                }
            }
            KeyCode::Esc if self.dialog.cancelable => KeyOutcome::Dismiss,
            KeyCode::Esc => {
                tracing::debug!(title = %self.dialog.title, "Esc ignored on non-cancelable dialog");
                KeyOutcome::Ignored
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Render the dialog centered in `area`
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let modal_area = centered_rect(MODAL_WIDTH, modal_height(&self.dialog.message), area);

        // Clear the area behind the modal
        frame.render_widget(Clear, modal_area);

        let (glyph, color) = icon_style(self.dialog.icon);
        let title = match glyph {
            Some(glyph) => format!(" [{glyph}] {} ", self.dialog.title),
            None => format!(" {} ", self.dialog.title),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title);

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Spacing
                Constraint::Min(1),    // Message
                Constraint::Length(1), // Buttons
                Constraint::Length(1), // Spacing
                Constraint::Length(1), // Help text
            ])
            .split(inner);

        let message = Paragraph::new(self.dialog.message.as_str()).wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[1]);

        frame.render_widget(Paragraph::new(self.button_row()), chunks[2]);

        let help = Line::from(vec![
            Span::styled("[←/→]", Style::default().fg(Color::Yellow)),
            Span::raw(" Move  "),
            Span::styled("[Enter]", Style::default().fg(Color::Green)),
            Span::raw(" Select  "),
            Span::styled("[1-3]", Style::default().fg(Color::Yellow)),
            Span::raw(" Shortcut"),
        ]);
        frame.render_widget(Paragraph::new(help), chunks[4]);
    }

    fn button_row(&self) -> Line<'_> {
        let mut spans = Vec::new();
        for (index, button) in self.dialog.buttons().iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw("   "));
            }
            let style = if index == self.focus {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            spans.push(Span::styled(format!(" {}. {} ", index + 1, button.label), style));
        }
        Line::from(spans).centered()
    }
}

fn icon_style(icon: Option<StockIcon>) -> (Option<char>, Color) {
    match icon {
        Some(StockIcon::DialogInfo) => (Some('i'), Color::Cyan),
        Some(StockIcon::MenuHelp) => (Some('?'), Color::Blue),
        Some(StockIcon::DialogAlert) => (Some('!'), Color::Red),
        None => (None, Color::Gray),
    }
}

/// Rows needed for `message` wrapped at the dialog width, plus chrome
fn modal_height(message: &str) -> u16 {
    let message_lines = message.chars().count() / (MODAL_WIDTH as usize - 4) + 1;
    MODAL_MIN_HEIGHT.saturating_add(u16::try_from(message_lines).unwrap_or(u16::MAX))
}

/// Create a centered rectangle within the given area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn three_button_view(cancelable: bool) -> DialogView {
        DialogView::new(
            AlertDialog::builder("Question", "Proceed?")
                .icon(Some(StockIcon::MenuHelp))
                .cancelable(cancelable)
                .button(ButtonSlot::Positive, "Yes", || {})
                .button(ButtonSlot::Neutral, "Maybe", || {})
                .button(ButtonSlot::Negative, "No", || {})
                .build(),
        )
    }

    #[test]
    fn test_focus_wraps_around() {
        let mut view = three_button_view(false);
        assert_eq!(view.handle_key(key(KeyCode::Left)), KeyOutcome::Redraw);
        assert_eq!(view.focus(), 2);
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.focus(), 0);
        view.handle_key(key(KeyCode::Right));
        assert_eq!(
            view.handle_key(key(KeyCode::Enter)),
            KeyOutcome::Activate(ButtonSlot::Neutral)
        );
    }

    #[test]
    fn test_digit_shortcuts() {
        let mut view = three_button_view(false);
        assert_eq!(
            view.handle_key(key(KeyCode::Char('3'))),
            KeyOutcome::Activate(ButtonSlot::Negative)
        );
        assert_eq!(
            view.handle_key(key(KeyCode::Char('1'))),
            KeyOutcome::Activate(ButtonSlot::Positive)
        );
    }

    #[test]
    fn test_digit_beyond_buttons_ignored() {
        let mut view = DialogView::new(
            AlertDialog::builder("Info", "Done")
                .button(ButtonSlot::Positive, "OK", || {})
                .build(),
        );
        assert_eq!(view.handle_key(key(KeyCode::Char('2'))), KeyOutcome::Ignored);
    }

    #[test]
    fn test_escape_respects_cancelable() {
        let mut locked = three_button_view(false);
        assert_eq!(locked.handle_key(key(KeyCode::Esc)), KeyOutcome::Ignored);

        let mut open = three_button_view(true);
        assert_eq!(open.handle_key(key(KeyCode::Esc)), KeyOutcome::Dismiss);
    }

    #[test]
    fn test_render_shows_labels() {
        let view = three_button_view(false);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("[?] Question"));
        assert!(text.contains("1. Yes"));
        assert!(text.contains("3. No"));
    }

    #[test]
    fn test_modal_height_counts_chars_and_saturates() {
        assert_eq!(modal_height("short"), MODAL_MIN_HEIGHT + 1);
        // 55 two-byte chars stay on one line
        assert_eq!(modal_height(&"é".repeat(55)), MODAL_MIN_HEIGHT + 1);
        assert_eq!(modal_height(&"x".repeat(56 * u16::MAX as usize)), u16::MAX);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(60, 12, area);
        assert_eq!(rect, Rect::new(0, 0, 40, 10));
    }
}
