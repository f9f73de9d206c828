//! Terminal host toolkit.
//!
//! The thread that creates the [`TerminalToolkit`] becomes the UI thread: it
//! owns the dispatch loop and is the only thread that draws. A reader thread
//! forwards key presses to the loop as tasks, so dialogs receive input even
//! while the UI thread is inside a nested loop.

mod stack;
mod view;

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{
    DefaultTerminal,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};

use modalbox_core::{AlertDialog, DispatchLoop, HostToolkit, ToolkitError};

pub use stack::{DialogStack, Routed, finish};
pub use view::{DialogView, KeyOutcome, centered_rect};

struct Screen {
    terminal: DefaultTerminal,
    dialogs: DialogStack,
}

impl Screen {
    fn draw(&mut self) -> io::Result<()> {
        let dialogs = &self.dialogs;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let hint = Line::styled(" modalbox", Style::default().fg(Color::DarkGray));
            frame.render_widget(Paragraph::new(hint), area);
            dialogs.render(frame, area);
        })?;
        Ok(())
    }
}

pub struct TerminalToolkit {
    dispatch: DispatchLoop,
    screen: Arc<Mutex<Screen>>,
}

fn lock(screen: &Mutex<Screen>) -> MutexGuard<'_, Screen> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TerminalToolkit {
    /// Take over the terminal and make the calling thread the UI thread.
    pub fn new(terminal: DefaultTerminal) -> Self {
        let dispatch = DispatchLoop::new();
        dispatch.bind_current_thread();
        Self {
            dispatch,
            screen: Arc::new(Mutex::new(Screen {
                terminal,
                dialogs: DialogStack::new(),
            })),
        }
    }

    /// Start the thread that forwards terminal input to the UI loop.
    ///
    /// The thread ends on the first event after the loop is closed.
    pub fn spawn_input_reader(&self) -> io::Result<()> {
        let dispatch = self.dispatch.clone();
        let screen = self.screen.clone();
        thread::Builder::new()
            .name("modalbox-input".to_string())
            .spawn(move || {
                loop {
                    let event = match event::read() {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::error!("Failed to read terminal event: {e}");
                            break;
                        }
                    };
                    let screen = screen.clone();
                    let task: modalbox_core::Task = match event {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            Box::new(move || handle_key(&screen, key))
                        }
                        Event::Resize(_, _) => Box::new(move || redraw(&screen)),
                        _ => continue,
                    };
                    if dispatch.post(task).is_err() {
                        break;
                    }
                }
            })?;
        Ok(())
    }

    /// Draw the current state once
    pub fn redraw(&self) {
        redraw(&self.screen);
    }

    /// Stop accepting input events
    pub fn close(&self) {
        self.dispatch.close();
    }
}

impl HostToolkit for TerminalToolkit {
    fn dispatch_loop(&self) -> &DispatchLoop {
        &self.dispatch
    }

    fn show_dialog(&self, dialog: AlertDialog) -> Result<(), ToolkitError> {
        tracing::debug!(title = %dialog.title, buttons = dialog.buttons().len(), "Opening dialog");
        let mut screen = lock(&self.screen);
        screen.dialogs.push(DialogView::new(dialog));
        if let Err(e) = screen.draw() {
            screen.dialogs.pop();
            return Err(ToolkitError::Render(e.to_string()));
        }
        Ok(())
    }
}

fn redraw(screen: &Mutex<Screen>) {
    if let Err(e) = lock(screen).draw() {
        tracing::error!("Failed to draw terminal: {e}");
    }
}

/// Route a key press to the innermost dialog. Runs on the UI thread.
fn handle_key(screen: &Mutex<Screen>, key: KeyEvent) {
    let routed = {
        let mut screen = lock(screen);
        let routed = screen.dialogs.route_key(key);
        if !matches!(routed, Routed::Unchanged) {
            if let Err(e) = screen.draw() {
                tracing::error!("Failed to draw terminal: {e}");
            }
        }
        routed
    };

    // the screen lock is released before user handlers run
    if let Routed::Closed { view, slot } = routed {
        finish(view, slot);
    }
}
