//! The ordered verification pipeline.
//!
//! Five checks run in a fixed order, each only attempted when the previous
//! one passed. Every stage returns an explicit result; the orchestrator
//! short-circuits on the first failure and reports the stage it stopped
//! at. A run produces exactly one outcome.

use std::fs;
use std::path::Path;

use crate::Inspect;
use crate::Password;
use crate::Result;
use crate::Stage;
use crate::StageFailure;
use crate::StoreType;
use crate::VerifyConfig;
use crate::VerifyError;
use crate::detect::detect_store_type;
use crate::keytool::ToolArgs;
use crate::policy::verify_key_access;

/// The credentials under test.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Password protecting the keystore as a whole.
    pub store_password: Password,
    /// Name of the entry that will be used for signing.
    pub alias: String,
    /// Password protecting the entry's private key.
    pub key_password: Password,
}

/// Callback seam for observing pipeline progress.
///
/// All methods default to no-ops; implement the ones you need.
pub trait VerifyObserver {
    /// A stage is about to run.
    fn stage_started(&mut self, stage: Stage) {
        let _ = stage;
    }

    /// A stage passed.
    fn stage_passed(&mut self, stage: Stage) {
        let _ = stage;
    }

    /// A non-fatal warning was raised.
    fn warning(&mut self, message: &str) {
        let _ = message;
    }
}

/// Observer that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl VerifyObserver for NullObserver {}

/// Successful outcome of a verification run.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// The detected keystore type.
    pub store_type: StoreType,
    /// Stages that passed, in execution order. Always all five.
    pub stages_passed: Vec<Stage>,
    /// Non-fatal warnings raised along the way.
    pub warnings: Vec<String>,
}

impl VerifyReport {
    /// Whether any warnings were raised.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

struct Ctx<'a> {
    inspector: &'a dyn Inspect,
    keystore: &'a Path,
    creds: &'a Credentials,
    config: &'a VerifyConfig,
    observer: &'a mut dyn VerifyObserver,
    store_type: StoreType,
    warnings: Vec<String>,
}

impl Ctx<'_> {
    fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.observer.warning(&message);
        self.warnings.push(message);
    }
}

/// Runs the full verification pipeline against one keystore.
///
/// # Examples
///
/// ```no_run
/// use keyvet_core::Credentials;
/// use keyvet_core::Keytool;
/// use keyvet_core::NullObserver;
/// use keyvet_core::Password;
/// use keyvet_core::VerifyConfig;
/// use keyvet_core::verify;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VerifyConfig::default();
/// let keytool = Keytool::from_config(&config);
/// let creds = Credentials {
///     store_password: Password::new("secret123"),
///     alias: "release".to_string(),
///     key_password: Password::new("secret123"),
/// };
///
/// let report = verify(
///     &keytool,
///     "release.p12".as_ref(),
///     &creds,
///     &config,
///     &mut NullObserver,
/// )?;
/// println!("keystore type: {}", report.store_type);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`StageFailure`] naming the first stage that failed; no later
/// stage is attempted.
pub fn verify(
    inspector: &dyn Inspect,
    keystore: &Path,
    creds: &Credentials,
    config: &VerifyConfig,
    observer: &mut dyn VerifyObserver,
) -> std::result::Result<VerifyReport, StageFailure> {
    let mut ctx = Ctx {
        inspector,
        keystore,
        creds,
        config,
        observer,
        store_type: StoreType::Unknown,
        warnings: Vec::new(),
    };

    let mut stages_passed = Vec::with_capacity(Stage::ALL.len());
    for stage in Stage::ALL {
        ctx.observer.stage_started(stage);
        let result = match stage {
            Stage::FileExists => stage_file_exists(&mut ctx),
            Stage::StorePassword => stage_store_password(&mut ctx),
            Stage::TypeDetection => stage_type_detection(&mut ctx),
            Stage::AliasExists => stage_alias_exists(&mut ctx),
            Stage::KeyPassword => stage_key_password(&mut ctx),
        };
        match result {
            Ok(()) => {
                ctx.observer.stage_passed(stage);
                stages_passed.push(stage);
            }
            Err(error) => return Err(StageFailure::new(stage, error)),
        }
    }

    Ok(VerifyReport {
        store_type: ctx.store_type,
        stages_passed,
        warnings: ctx.warnings,
    })
}

fn stage_file_exists(ctx: &mut Ctx<'_>) -> Result<()> {
    let not_readable = || VerifyError::FileNotReadable {
        path: ctx.keystore.to_path_buf(),
    };
    let file = fs::File::open(ctx.keystore).map_err(|_| not_readable())?;
    let meta = file.metadata().map_err(|_| not_readable())?;
    if meta.is_file() { Ok(()) } else { Err(not_readable()) }
}

fn stage_store_password(ctx: &mut Ctx<'_>) -> Result<()> {
    let output = ctx
        .inspector
        .run(&ToolArgs::list(ctx.keystore, &ctx.creds.store_password))?;
    if output.success() {
        Ok(())
    } else {
        Err(VerifyError::StorePassword {
            detail: output.diagnostic(ctx.config.stderr_limit),
        })
    }
}

fn stage_type_detection(ctx: &mut Ctx<'_>) -> Result<()> {
    let detected = detect_store_type(
        ctx.inspector,
        ctx.keystore,
        &ctx.creds.store_password,
        ctx.config,
    )?;
    ctx.store_type = detected.store_type;

    // The store password was already validated, so a malformed listing
    // points at an unexpected tool output format, not a credential
    // problem.
    if !detected.reported {
        ctx.warn("listing did not report a keystore type; output format was not recognized");
    }
    if ctx.store_type == StoreType::Unknown {
        ctx.warn(
            "keystore type is not recognized; key-password verification may not be accurate",
        );
    }
    Ok(())
}

fn stage_alias_exists(ctx: &mut Ctx<'_>) -> Result<()> {
    let output = ctx.inspector.run(&ToolArgs::list_alias(
        ctx.keystore,
        &ctx.creds.store_password,
        &ctx.creds.alias,
    ))?;
    if output.success() {
        return Ok(());
    }

    // Best-effort diagnosis; a failure of the enumeration itself is
    // ignored.
    let available = enumerate_aliases(ctx.inspector, ctx.keystore, &ctx.creds.store_password)
        .unwrap_or_default();
    Err(VerifyError::AliasNotFound {
        alias: ctx.creds.alias.clone(),
        available,
    })
}

fn stage_key_password(ctx: &mut Ctx<'_>) -> Result<()> {
    verify_key_access(
        ctx.inspector,
        ctx.keystore,
        ctx.creds,
        ctx.store_type,
        ctx.config,
    )
}

fn enumerate_aliases(
    inspector: &dyn Inspect,
    keystore: &Path,
    storepass: &Password,
) -> Option<Vec<String>> {
    let output = inspector.run(&ToolArgs::list(keystore, storepass)).ok()?;
    output.success().then(|| parse_alias_names(&output.stdout))
}

/// Lists the aliases a keystore contains.
///
/// # Errors
///
/// Returns [`VerifyError::StorePassword`] when the keystore cannot be
/// opened with the given password.
pub fn list_aliases(
    inspector: &dyn Inspect,
    keystore: &Path,
    storepass: &Password,
    config: &VerifyConfig,
) -> Result<Vec<String>> {
    let output = inspector.run(&ToolArgs::list(keystore, storepass))?;
    if !output.success() {
        return Err(VerifyError::StorePassword {
            detail: output.diagnostic(config.stderr_limit),
        });
    }
    Ok(parse_alias_names(&output.stdout))
}

/// Extracts alias names from listing output.
///
/// Entry lines look like `release, Jan 5, 2024, PrivateKeyEntry,`; the
/// alias is everything before the first comma.
#[must_use]
pub fn parse_alias_names(listing: &str) -> Vec<String> {
    const ENTRY_MARKERS: [&str; 3] = ["privatekeyentry", "trustedcertentry", "secretkeyentry"];

    listing
        .lines()
        .filter_map(|line| {
            let lower = line.to_ascii_lowercase();
            if !ENTRY_MARKERS.iter().any(|marker| lower.contains(marker)) {
                return None;
            }
            line.split(',')
                .next()
                .map(str::trim)
                .filter(|alias| !alias.is_empty())
                .map(ToString::to_string)
        })
        .collect()
}
