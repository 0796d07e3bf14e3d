//! The "thinking..." spinner shown while a turn runs.
//!
//! Shared between the response stream and the interactive prompts: a prompt
//! that fires mid-turn (organization pick list, token entry) must draw with
//! the spinner hidden, and marks itself open so Ctrl+C does not cancel the
//! turn underneath a blocking terminal read.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

#[derive(Clone, Default)]
pub struct Activity {
    current: Arc<Mutex<Option<ProgressBar>>>,
    prompting: Arc<AtomicBool>,
    hidden: bool,
}

/// Marks an interactive prompt as open until dropped.
pub struct PromptGuard {
    prompting: Arc<AtomicBool>,
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        self.prompting.store(false, Ordering::Release);
    }
}

impl Activity {
    pub fn new() -> Self {
        Self::default()
    }

    /// An activity that never draws, for `--quiet` and `--json` output.
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a fresh spinner, replacing any running one.
    pub fn start(&self, message: &str) {
        if self.hidden {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        if let Some(previous) = self.slot().replace(spinner) {
            previous.finish_and_clear();
        }
    }

    /// Change the spinner text, starting one if none is running.
    pub fn set_message(&self, message: &str) {
        let running = self.slot().clone();
        match running {
            Some(spinner) => spinner.set_message(message.to_string()),
            None => self.start(message),
        }
    }

    pub fn stop(&self) {
        if let Some(spinner) = self.slot().take() {
            spinner.finish_and_clear();
        }
    }

    /// Run `f` with the spinner hidden.
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        let running = self.slot().clone();
        match running {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }

    /// Mark a prompt as open. Holds until the guard is dropped.
    pub fn begin_prompt(&self) -> PromptGuard {
        self.prompting.store(true, Ordering::Release);
        PromptGuard {
            prompting: Arc::clone(&self.prompting),
        }
    }

    /// Run a blocking prompt: spinner hidden, prompt marked open.
    pub fn prompt<R>(&self, f: impl FnOnce() -> R) -> R {
        let _open = self.begin_prompt();
        self.suspend(f)
    }

    pub fn is_prompting(&self) -> bool {
        self.prompting.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.slot().is_some()
    }
}
