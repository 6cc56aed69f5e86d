//! Configuration for keystore verification.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a verification run.
///
/// # Examples
///
/// ```
/// use keyvet_core::VerifyConfig;
///
/// // Use the `keytool` found on PATH
/// let config = VerifyConfig::default();
///
/// // Point at a specific JDK
/// let custom = VerifyConfig::with_keytool("/opt/jdk/bin/keytool");
/// ```
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Path to the keystore inspection tool binary.
    pub keytool_path: PathBuf,

    /// Wall-clock cap per tool invocation.
    pub tool_timeout: Duration,

    /// Truncation bound for tool diagnostics captured into errors.
    pub stderr_limit: usize,

    /// Keep probe scratch files instead of deleting them.
    ///
    /// Off by default; the discarded probe keystore is only useful for
    /// post-mortem inspection of a failing probe.
    pub keep_probe_artifacts: bool,

    /// Directory for probe scratch files. `None` uses the system temp
    /// directory.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for VerifyConfig {
    /// Creates a `VerifyConfig` with default settings.
    ///
    /// Default values:
    /// - `keytool_path`: `keytool` (resolved via PATH)
    /// - `tool_timeout`: 30 seconds
    /// - `stderr_limit`: 2048 bytes
    /// - `keep_probe_artifacts`: false
    /// - `scratch_dir`: `None` (system temp directory)
    fn default() -> Self {
        Self {
            keytool_path: PathBuf::from("keytool"),
            tool_timeout: Duration::from_secs(30),
            stderr_limit: 2048,
            keep_probe_artifacts: false,
            scratch_dir: None,
        }
    }
}

impl VerifyConfig {
    /// Creates a configuration using the given tool binary.
    #[must_use]
    pub fn with_keytool<P: AsRef<Path>>(path: P) -> Self {
        Self {
            keytool_path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }
}
