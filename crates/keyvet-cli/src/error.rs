//! Error conversion utilities for CLI.
//!
//! Converts keyvet-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use keyvet_core::StageFailure;
use keyvet_core::VerifyError;
use std::path::Path;

/// Converts `VerifyError` to a user-friendly anyhow error with context
pub fn convert_verify_error(err: VerifyError, keystore: Option<&Path>) -> anyhow::Error {
    let shown = keystore.map_or_else(|| "<keystore>".to_string(), |p| p.display().to_string());
    match err {
        VerifyError::MissingInput => {
            anyhow!(
                "No keystore input was given\n\
                 HINT: Pass a keystore path, or --keystore-base64 / KEYVET_KEYSTORE_BASE64."
            )
        }
        VerifyError::InvalidBase64 { detail } => {
            anyhow!(
                "The keystore blob is not valid base64: {detail}\n\
                 HINT: Check that the variable holds the raw base64 text, without quoting."
            )
        }
        VerifyError::FileNotReadable { path } => {
            anyhow!(
                "Keystore file is not readable: {}\n\
                 HINT: Check the path and file permissions.",
                path.display()
            )
        }
        VerifyError::StorePassword { detail } => {
            anyhow!(
                "'{shown}' could not be opened with the store password: {detail}\n\
                 HINT: The store password may have a typo, or the keystore file is corrupted."
            )
        }
        VerifyError::TypeDetection { detail } => {
            anyhow!(
                "Keystore type detection failed for '{shown}': {detail}\n\
                 HINT: The tool produced unexpected output; check the keytool version."
            )
        }
        VerifyError::AliasNotFound { alias, available } => {
            let listing = if available.is_empty() {
                "no aliases could be enumerated".to_string()
            } else {
                format!("available aliases: {}", available.join(", "))
            };
            anyhow!(
                "Alias '{alias}' was not found in '{shown}' ({listing})\n\
                 HINT: Alias names are case-sensitive in some keystore formats."
            )
        }
        VerifyError::PasswordMismatchPolicy => {
            anyhow!(
                "The key password differs from the store password\n\
                 HINT: PKCS12 keystores encrypt every entry under the store password, so the \
                 key password must be identical. Use the same password for both, or convert \
                 the keystore to JKS."
            )
        }
        VerifyError::KeyAccess { alias, detail } => {
            anyhow!(
                "The private key for alias '{alias}' could not be unlocked: {detail}\n\
                 HINT: The key password may have a typo, or the alias is not a private-key entry."
            )
        }
        VerifyError::ExternalTool { .. } => {
            anyhow::Error::from(err).context(format!(
                "Could not inspect '{shown}'\n\
                 HINT: Is a JDK installed? Use --keytool to point at a specific binary."
            ))
        }
        _ => anyhow::Error::from(err).context(format!("Error verifying keystore '{shown}'")),
    }
}

/// Converts a pipeline stage failure, naming the stage that stopped the run
pub fn convert_stage_failure(failure: StageFailure, keystore: &Path) -> anyhow::Error {
    let stage = failure.stage;
    convert_verify_error(failure.error, Some(keystore))
        .context(format!("Verification failed at the {stage} check"))
}
