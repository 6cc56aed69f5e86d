//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use keyvet_core::DetectedType;
use keyvet_core::VerifyReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_check_report(&self, report: &VerifyReport) -> Result<()> {
        #[derive(Serialize)]
        struct CheckOutput {
            store_type: String,
            stages_passed: Vec<&'static str>,
            warnings: Vec<String>,
        }

        let data = CheckOutput {
            store_type: report.store_type.to_string(),
            stages_passed: report.stages_passed.iter().map(|s| s.name()).collect(),
            warnings: report.warnings.clone(),
        };

        let output = JsonOutput::success("check", data);
        Self::output(&output)
    }

    fn format_store_type(&self, detected: DetectedType) -> Result<()> {
        #[derive(Serialize)]
        struct TypeOutput {
            store_type: String,
            reported: bool,
        }

        let data = TypeOutput {
            store_type: detected.store_type.to_string(),
            reported: detected.reported,
        };

        let output = JsonOutput::success("type", data);
        Self::output(&output)
    }

    fn format_aliases(&self, aliases: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct AliasesOutput {
            count: usize,
            aliases: Vec<String>,
        }

        let data = AliasesOutput {
            count: aliases.len(),
            aliases: aliases.to_vec(),
        };

        let output = JsonOutput::success("aliases", data);
        Self::output(&output)
    }

    fn format_warning(&self, _message: &str) {
        // Warnings are carried inside the JSON payloads.
    }
}
