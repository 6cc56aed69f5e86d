//! Stage spinner for CLI verification runs.

use console::Term;
use console::style;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use keyvet_core::Stage;
use keyvet_core::VerifyObserver;
use std::time::Duration;

/// CLI spinner implementing `VerifyObserver`.
///
/// Shows the check currently running and prints a ✓ line as each one
/// passes. Inactive when progress display is disabled or stderr is not a
/// terminal, so scripted runs get clean output.
pub struct CliStageSpinner {
    bar: Option<ProgressBar>,
}

impl CliStageSpinner {
    /// Creates a spinner; `enabled` is false for quiet or JSON runs.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        if !enabled || !Term::stderr().is_term() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar: Some(bar) }
    }

    /// Stops the spinner and clears its line.
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl VerifyObserver for CliStageSpinner {
    fn stage_started(&mut self, stage: Stage) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("Checking: {}", stage.describe()));
        }
    }

    fn stage_passed(&mut self, stage: Stage) {
        if let Some(bar) = &self.bar {
            bar.println(format!("{} {}", style("✓").green(), stage.describe()));
        }
    }
}

impl Drop for CliStageSpinner {
    fn drop(&mut self) {
        self.finish();
    }
}
