//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use keyvet_core::DetectedType;
use keyvet_core::StoreType;
use keyvet_core::VerifyReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_check_report(&self, report: &VerifyReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Keystore is ready for signing",
                style("✓").green().bold()
            ));
        } else {
            let _ = self.term.write_line("Keystore is ready for signing");
        }

        let _ = self
            .term
            .write_line(&format!("  Type: {}", report.store_type));
        let _ = self.term.write_line(&format!(
            "  Checks passed: {}",
            report.stages_passed.len()
        ));

        if self.verbose {
            for stage in &report.stages_passed {
                let _ = self.term.write_line(&format!("    {}", stage.describe()));
            }
        }

        for warning in &report.warnings {
            self.format_warning(warning);
        }

        Ok(())
    }

    fn format_store_type(&self, detected: DetectedType) -> Result<()> {
        let _ = self.term.write_line(&detected.store_type.to_string());
        if detected.store_type == StoreType::Unknown && !self.quiet {
            self.format_warning("the keystore type was not recognized");
        }
        Ok(())
    }

    fn format_aliases(&self, aliases: &[String]) -> Result<()> {
        if aliases.is_empty() {
            if !self.quiet {
                let _ = self.term.write_line("(no aliases)");
            }
            return Ok(());
        }
        for alias in aliases {
            let _ = self.term.write_line(alias);
        }
        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("Warning: {message}"));
        }
    }
}
