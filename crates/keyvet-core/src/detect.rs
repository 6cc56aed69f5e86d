//! Keystore type detection.

use std::path::Path;

use crate::Inspect;
use crate::Password;
use crate::Result;
use crate::VerifyConfig;
use crate::VerifyError;
use crate::keytool::ToolArgs;

/// Keystore formats the verifier knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// PKCS#12: every entry is encrypted under the store password, so the
    /// key password must equal it.
    Pkcs12,
    /// Java KeyStore: store and key passwords are independent.
    Jks,
    /// A type the tool reported but the verifier does not recognize.
    Unknown,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pkcs12 => "PKCS12",
            Self::Jks => "JKS",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Result of a type-detection listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedType {
    /// The detected keystore type.
    pub store_type: StoreType,
    /// Whether the listing contained a type line at all. A listing without
    /// one indicates an unexpected tool output format.
    pub reported: bool,
}

/// Detects the keystore type from a verbose listing.
///
/// Runs once per verification, after the store password has already been
/// validated. A tool failure here surfaces as
/// [`VerifyError::TypeDetection`], which is distinct from a successful
/// listing that names a foreign type ([`StoreType::Unknown`]).
pub fn detect_store_type(
    inspector: &dyn Inspect,
    keystore: &Path,
    storepass: &Password,
    config: &VerifyConfig,
) -> Result<DetectedType> {
    let output = inspector.run(&ToolArgs::list_verbose(keystore, storepass))?;
    if !output.success() {
        return Err(VerifyError::TypeDetection {
            detail: output.diagnostic(config.stderr_limit),
        });
    }

    Ok(parse_store_type(&output.stdout).map_or(
        DetectedType {
            store_type: StoreType::Unknown,
            reported: false,
        },
        |store_type| DetectedType {
            store_type,
            reported: true,
        },
    ))
}

/// Scans listing output for a case-insensitive `keystore type: <token>`
/// line. Returns `None` when no such line is present.
#[must_use]
pub fn parse_store_type(listing: &str) -> Option<StoreType> {
    for line in listing.lines() {
        let lower = line.to_ascii_lowercase();
        let Some(idx) = lower.find("keystore type:") else {
            continue;
        };
        let token = line[idx + "keystore type:".len()..].trim();
        let token = token.split_whitespace().next().unwrap_or_default();
        return Some(match token.to_ascii_uppercase().as_str() {
            "PKCS12" => StoreType::Pkcs12,
            "JKS" => StoreType::Jks,
            _ => StoreType::Unknown,
        });
    }
    None
}
