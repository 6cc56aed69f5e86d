//! Type-aware key-access policy.
//!
//! The underlying tool accepts a `-keypass` argument for PKCS12 keystores
//! and silently ignores it, so a naive "list with both passwords" check
//! passes with a wrong key password. The policy below models that quirk as
//! an explicit precondition instead of discovering it through an
//! accidental probe.

use std::path::Path;

use crate::Credentials;
use crate::Inspect;
use crate::Result;
use crate::StoreType;
use crate::VerifyConfig;
use crate::VerifyError;
use crate::keytool::ToolArgs;

/// Verifies that the key password actually unlocks the alias's private
/// key, using the probe strategy appropriate for the keystore type.
pub fn verify_key_access(
    inspector: &dyn Inspect,
    keystore: &Path,
    creds: &Credentials,
    store_type: StoreType,
    config: &VerifyConfig,
) -> Result<()> {
    match store_type {
        StoreType::Pkcs12 => {
            if creds.store_password != creds.key_password {
                return Err(VerifyError::PasswordMismatchPolicy);
            }
            export_probe(inspector, keystore, creds, config)
        }
        // Unknown falls back to the most permissive strategy; the pipeline
        // has already flagged the reduced confidence.
        StoreType::Jks | StoreType::Unknown => certreq_probe(inspector, keystore, creds, config),
    }
}

/// PKCS12 probe: re-export the alias into a discarded keystore.
///
/// The export has to decrypt the source private key, so a zero exit is
/// proof the key material is accessible. The destination keystore is
/// created under a unique temporary directory and removed whether or not
/// the probe succeeds.
fn export_probe(
    inspector: &dyn Inspect,
    keystore: &Path,
    creds: &Credentials,
    config: &VerifyConfig,
) -> Result<()> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("keyvet-probe-");
    let scratch = match &config.scratch_dir {
        Some(dir) => builder.tempdir_in(dir)?,
        None => builder.tempdir()?,
    };
    let probe_dest = scratch.path().join("probe.p12");

    let output = inspector.run(&ToolArgs::export_probe(
        keystore,
        &probe_dest,
        &creds.alias,
        &creds.store_password,
    ));

    if config.keep_probe_artifacts {
        let _ = scratch.keep();
    }

    let output = output?;
    if output.success() {
        Ok(())
    } else {
        Err(VerifyError::KeyAccess {
            alias: creds.alias.clone(),
            detail: output.diagnostic(config.stderr_limit),
        })
    }
}

/// JKS probe: generate a certificate signing request for the alias.
///
/// CSR generation signs with the private key, so it only succeeds when
/// the key password decrypts it. Nothing is written to disk; the CSR goes
/// to the tool's stdout and is discarded.
fn certreq_probe(
    inspector: &dyn Inspect,
    keystore: &Path,
    creds: &Credentials,
    config: &VerifyConfig,
) -> Result<()> {
    let output = inspector.run(&ToolArgs::certreq_probe(
        keystore,
        &creds.alias,
        &creds.store_password,
        &creds.key_password,
    ))?;

    if output.success() {
        Ok(())
    } else {
        Err(VerifyError::KeyAccess {
            alias: creds.alias.clone(),
            detail: output.diagnostic(config.stderr_limit),
        })
    }
}
