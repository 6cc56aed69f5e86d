//! Output formatter trait for CLI results.

use anyhow::Result;
use keyvet_core::DetectedType;
use keyvet_core::VerifyReport;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the outcome of a full verification run
    fn format_check_report(&self, report: &VerifyReport) -> Result<()>;

    /// Format a detected keystore type
    fn format_store_type(&self, detected: DetectedType) -> Result<()>;

    /// Format an alias listing
    fn format_aliases(&self, aliases: &[String]) -> Result<()>;

    /// Format warning message
    #[allow(dead_code)]
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    #[allow(dead_code)]
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}
