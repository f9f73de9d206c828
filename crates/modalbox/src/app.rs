//! Runs one prompt from the command line on the chosen toolkit and thread.

use std::sync::{Arc, mpsc};
use std::thread;

use color_eyre::eyre::eyre;

use modalbox_core::{
    HeadlessToolkit, HostToolkit, ModalPrompt, PromptOptions, PromptResult, PromptSpec, Responder,
};

use crate::cli::Args;
use crate::config::AppConfig;
use crate::terminal::TerminalToolkit;

/// Fold command-line overrides into the loaded config.
pub fn effective_config(args: &Args, mut config: AppConfig) -> AppConfig {
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if args.timeout_ms.is_some() {
        config.wait_timeout_ms = args.timeout_ms;
    }
    config
}

/// Everything needed to show one prompt
#[derive(Debug, Clone)]
pub struct Invocation {
    pub spec: PromptSpec,
    pub options: PromptOptions,
    /// Call `show()` from a worker thread
    pub worker: bool,
    /// Answer automatically with this button (0-based) instead of drawing
    pub headless_press: Option<usize>,
}

impl Invocation {
    pub fn from_args(args: &Args, config: &AppConfig) -> color_eyre::Result<Self> {
        let spec = if args.actions.is_empty() {
            PromptSpec::from_preset(
                args.caption.as_str(),
                args.message.as_str(),
                args.icon,
                args.preset.unwrap_or_default(),
            )
        } else {
            PromptSpec::new(
                args.caption.as_str(),
                args.message.as_str(),
                args.icon,
                args.actions.clone(),
            )?
        };

        let headless_press = match args.headless_press {
            Some(n) if n as usize > spec.actions().len() => {
                return Err(eyre!(
                    "--headless-press {n} is out of range: the dialog has {} button(s)",
                    spec.actions().len()
                ));
            }
            Some(n) => Some(n as usize - 1),
            None => None,
        };

        Ok(Self {
            spec,
            options: config.prompt_options(),
            worker: args.worker,
            headless_press,
        })
    }

    pub fn run(self) -> color_eyre::Result<PromptResult> {
        tracing::info!(
            caption = self.spec.caption(),
            actions = self.spec.actions().len(),
            worker = self.worker,
            headless = self.headless_press.is_some(),
            "Running prompt"
        );
        match self.headless_press {
            Some(index) => self.run_headless(index),
            None => self.run_terminal(),
        }
    }

    fn run_headless(self, index: usize) -> color_eyre::Result<PromptResult> {
        let (toolkit, ui) = HeadlessToolkit::spawn(Responder::ByIndex(index))?;
        let prompt = ModalPrompt::from_spec(toolkit.clone(), self.spec).with_options(self.options);

        let result = if self.worker {
            prompt.show()
        } else {
            let (tx, rx) = mpsc::channel();
            toolkit.run_on_ui_thread(Box::new(move || {
                let _ = tx.send(prompt.show());
            }))?;
            rx.recv()?
        };

        drop(ui);
        Ok(result)
    }

    fn run_terminal(self) -> color_eyre::Result<PromptResult> {
        let terminal = ratatui::try_init()?;
        let outcome = self.drive_terminal(terminal);

        if let Err(err) = ratatui::try_restore() {
            tracing::error!("Failed to restore terminal: {err}");
        }
        outcome
    }

    /// Pump the UI loop on this thread until the prompt has resolved.
    fn drive_terminal(self, terminal: ratatui::DefaultTerminal) -> color_eyre::Result<PromptResult> {
        let toolkit = Arc::new(TerminalToolkit::new(terminal));
        toolkit.redraw();
        toolkit.spawn_input_reader()?;

        let exit = toolkit.exit_token();
        let prompt = ModalPrompt::from_spec(toolkit.clone(), self.spec).with_options(self.options);
        let (tx, rx) = mpsc::channel();
        let done = exit.clone();
        let show = move || {
            let _ = tx.send(prompt.show());
            done.signal();
        };

        let worker = if self.worker {
            Some(
                thread::Builder::new()
                    .name("modalbox-worker".to_string())
                    .spawn(show)?,
            )
        } else {
            toolkit.run_on_ui_thread(Box::new(show))?;
            None
        };

        let pumped = toolkit.dispatch_loop().run(&exit);
        toolkit.close();
        if let Some(handle) = worker {
            if handle.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }
        pumped?;

        Ok(rx.recv()?)
    }
}
