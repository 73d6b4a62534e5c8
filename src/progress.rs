//! Progress reporting with indicatif.
//!
//! [`Progress`] implements [`ProgressCallback`] with a spinner for the scan
//! and a bar for the resolution phase. indicatif draws nothing when stderr
//! is not a terminal, so piping the output stays clean.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Phases of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Walking the library roots
    Scan,
    /// Looking up titles
    Resolve,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Scan => "Scanning library",
            Phase::Resolve => "Resolving titles",
        }
    }
}

/// Receives progress updates from the build pipeline.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts. `total` is 0 when unknown.
    fn on_phase_start(&self, phase: Phase, total: usize);

    /// Called after each item, with the 1-based position and its title.
    fn on_progress(&self, current: usize, title: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: Phase);

    /// Free-form status line.
    fn on_message(&self, _message: &str) {}
}

/// Callback that ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_phase_start(&self, _phase: Phase, _total: usize) {}
    fn on_progress(&self, _current: usize, _title: &str) {}
    fn on_phase_end(&self, _phase: Phase) {}
}

/// Terminal progress reporter.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a reporter. With `quiet` nothing is drawn.
    ///
    /// ```
    /// use franchise_builder::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: Phase, total: usize) {
        if self.quiet {
            return;
        }

        let pb = match phase {
            Phase::Scan => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
            Phase::Resolve => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(Self::bar_style());
                pb
            }
        };
        pb.set_message(phase.label());

        if let Ok(mut guard) = self.bar.lock() {
            if let Some(previous) = guard.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_progress(&self, current: usize, title: &str) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| {
            pb.set_position(current as u64);
            pb.set_message(truncate_title(title, 30));
        });
    }

    fn on_phase_end(&self, phase: Phase) {
        if self.quiet {
            return;
        }
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message(format!("{} complete", phase.label()));
            }
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| pb.set_message(message.to_string()));
    }
}

/// Shorten a title for the progress line, counting characters.
fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let kept: String = title.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
