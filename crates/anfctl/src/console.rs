//! Timestamped console output and the wait spinner

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anfctl_core::{PollCallback, PollEvent, SampleStep};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Prints progress lines and owns the spinner shown during waits
///
/// Each wait gets its own spinner, started on the first attempt and cleared
/// once the wait resolves. Lines printed while a spinner is active are
/// written above it.
#[derive(Clone, Default)]
pub struct Console {
    spinner: Arc<Mutex<Option<ProgressBar>>>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a timestamped line to stdout
    pub fn message(&self, text: &str) {
        let line = format!("{}: {}", timestamp(), text);
        self.with_spinner_suspended(|| println!("{line}"));
    }

    /// Print a timestamped red line to stderr
    ///
    /// A wait that failed never reports `Satisfied` or `Exhausted`, so any
    /// spinner still running is cleared first.
    pub fn error(&self, text: &str) {
        if let Some(bar) = self.spinner.lock().ok().and_then(|mut slot| slot.take()) {
            bar.finish_and_clear();
        }
        eprintln!("{}: {}", timestamp(), text.red());
    }

    pub fn header(&self, title: &str) {
        let rule = "-".repeat(title.len());
        self.with_spinner_suspended(|| {
            println!("{}", title.bold());
            println!("{rule}");
        });
    }

    /// Report a sample milestone
    pub fn step(&self, step: &SampleStep) {
        match step {
            SampleStep::Creating { id } => {
                self.message(&format!("Requesting {} to be created", id.describe()));
            }
            SampleStep::Created { id } => {
                self.message(&format!("\t{} created: {}", capitalize(&id.kind().to_string()), id));
            }
            SampleStep::ChangingPool { volume, to } => {
                self.message(&format!(
                    "Performing pool change. Moving {} to {}",
                    volume.describe(),
                    to.describe()
                ));
            }
            SampleStep::PoolChanged { volume, from, to } => {
                self.message(&format!(
                    "\tPool change is successful. Moved {} from '{}' to '{}'",
                    volume.describe(),
                    from,
                    to
                ));
            }
            SampleStep::CleanupStarted => {
                self.header("Cleaning up");
            }
            SampleStep::Deleting { id } => {
                self.message(&format!("Deleting {}", id.describe()));
            }
            SampleStep::Deleted { id } => {
                self.message(&format!("\tDeleted: {id}"));
            }
        }
    }

    /// Callback that drives the spinner from poll events
    pub fn poll_callback(&self) -> PollCallback {
        let spinner = Arc::clone(&self.spinner);
        Box::new(move |event| {
            let Ok(mut slot) = spinner.lock() else {
                return;
            };
            match event {
                PollEvent::Attempt {
                    resource,
                    attempt,
                    max_attempts,
                } => {
                    let bar = slot.get_or_insert_with(new_spinner);
                    bar.set_message(format!(
                        "Waiting for {resource} (attempt {attempt}/{max_attempts})"
                    ));
                }
                PollEvent::Waiting {
                    resource, next_in, ..
                } => {
                    if let Some(bar) = slot.as_ref() {
                        bar.set_message(format!(
                            "Waiting for {resource}, retrying in {}s",
                            next_in.as_secs()
                        ));
                    }
                }
                PollEvent::Satisfied { .. } | PollEvent::Exhausted { .. } => {
                    if let Some(bar) = slot.take() {
                        bar.finish_and_clear();
                    }
                }
            }
        })
    }

    fn with_spinner_suspended<F: FnOnce()>(&self, print: F) {
        let active = self.spinner.lock().ok().and_then(|slot| slot.clone());
        match active {
            Some(bar) => bar.suspend(print),
            None => print(),
        }
    }
}

fn new_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
