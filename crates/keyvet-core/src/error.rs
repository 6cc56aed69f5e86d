//! Error types for keystore verification.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for verification operations.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Errors raised while verifying a keystore.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifyError {
    /// Neither a keystore path nor a base64 blob was supplied.
    #[error("no keystore input: provide a file path or a base64-encoded blob")]
    MissingInput,

    /// The base64 keystore blob did not decode.
    #[error("keystore blob is not valid base64: {detail}")]
    InvalidBase64 {
        /// Decoder diagnostic.
        detail: String,
    },

    /// The keystore reference does not resolve to a readable file.
    #[error("keystore file is not readable: {path}")]
    FileNotReadable {
        /// Path that failed to open.
        path: PathBuf,
    },

    /// The keystore could not be opened with the store password.
    #[error("keystore could not be opened with the store password: {detail}")]
    StorePassword {
        /// Tool diagnostic output.
        detail: String,
    },

    /// The type-detection listing itself failed.
    ///
    /// Distinct from a recognized-but-foreign type, which is reported as
    /// [`StoreType::Unknown`](crate::StoreType::Unknown) and is not fatal.
    #[error("keystore type detection failed: {detail}")]
    TypeDetection {
        /// Tool diagnostic output.
        detail: String,
    },

    /// The requested alias is not present in the keystore.
    #[error("alias '{alias}' not found in keystore")]
    AliasNotFound {
        /// Alias that was requested.
        alias: String,
        /// Aliases the keystore does contain (best-effort, may be empty).
        available: Vec<String>,
    },

    /// PKCS12 keystores encrypt every entry under the store password, so a
    /// differing key password can never be correct. Rejected before any
    /// probe subprocess is launched.
    #[error(
        "PKCS12 keystores require the key password to equal the store password; \
         use identical passwords or convert the keystore to JKS"
    )]
    PasswordMismatchPolicy,

    /// The key-access probe ran and the private key did not unlock.
    #[error("private key for alias '{alias}' could not be unlocked: {detail}")]
    KeyAccess {
        /// Alias whose key was probed.
        alias: String,
        /// Tool diagnostic output.
        detail: String,
    },

    /// The external keystore tool failed at the transport level: it could
    /// not be launched, timed out, or exited abnormally.
    #[error("keystore tool failed ({}): {stderr}", exit_label(*status))]
    ExternalTool {
        /// Exit code, if the process ran to completion.
        status: Option<i32>,
        /// Truncated stderr (or stdout when stderr was empty).
        stderr: String,
    },

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn exit_label(status: Option<i32>) -> String {
    status.map_or_else(
        || "did not run to completion".to_string(),
        |code| format!("exit status {code}"),
    )
}

impl VerifyError {
    /// Maps the error to the pipeline stage it fails, if any.
    ///
    /// Input-resolution errors (`MissingInput`, `InvalidBase64`) occur
    /// before the stage machine starts and have no stage.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::FileNotReadable { .. } => Some(Stage::FileExists),
            Self::StorePassword { .. } => Some(Stage::StorePassword),
            Self::TypeDetection { .. } => Some(Stage::TypeDetection),
            Self::AliasNotFound { .. } => Some(Stage::AliasExists),
            Self::PasswordMismatchPolicy | Self::KeyAccess { .. } => Some(Stage::KeyPassword),
            _ => None,
        }
    }
}

/// The ordered checks of the verification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The keystore reference resolves to a readable file.
    FileExists,
    /// The store password opens the keystore.
    StorePassword,
    /// The keystore type is detected from a verbose listing.
    TypeDetection,
    /// The requested alias exists in the keystore.
    AliasExists,
    /// The key password actually unlocks the alias's private key.
    KeyPassword,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Self; 5] = [
        Self::FileExists,
        Self::StorePassword,
        Self::TypeDetection,
        Self::AliasExists,
        Self::KeyPassword,
    ];

    /// Stable machine-readable stage name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FileExists => "file-exists",
            Self::StorePassword => "store-password",
            Self::TypeDetection => "type-detection",
            Self::AliasExists => "alias-exists",
            Self::KeyPassword => "key-password",
        }
    }

    /// Human-readable description of what the stage checks.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::FileExists => "keystore file is readable",
            Self::StorePassword => "store password opens the keystore",
            Self::TypeDetection => "keystore type is recognized",
            Self::AliasExists => "alias exists in the keystore",
            Self::KeyPassword => "key password unlocks the private key",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal failure of a verification run: the stage that stopped the
/// pipeline plus the underlying error.
#[derive(Debug, Error)]
#[error("{stage} check failed: {error}")]
pub struct StageFailure {
    /// Stage at which the pipeline stopped.
    pub stage: Stage,
    /// The error that stopped it.
    #[source]
    pub error: VerifyError,
}

impl StageFailure {
    /// Pairs a stage with the error that stopped it.
    #[must_use]
    pub fn new(stage: Stage, error: VerifyError) -> Self {
        Self { stage, error }
    }
}
