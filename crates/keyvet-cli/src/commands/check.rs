//! Check command implementation

use crate::cli::CheckArgs;
use crate::error::convert_stage_failure;
use crate::error::convert_verify_error;
use crate::output::OutputFormatter;
use crate::progress::CliStageSpinner;
use anyhow::Result;
use keyvet_core::ArchiveSource;
use keyvet_core::Credentials;
use keyvet_core::Keytool;
use keyvet_core::Password;
use keyvet_core::verify;

pub fn execute(
    args: &CheckArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let mut config = args.tool.to_config();
    config.keep_probe_artifacts = args.keep_probe;

    // Resolve the input before touching the tool: a missing input or a bad
    // blob must fail without any subprocess.
    let archive = ArchiveSource::resolve(args.keystore.clone(), args.keystore_base64.clone())
        .map_err(|e| convert_verify_error(e, None))?;

    let creds = Credentials {
        store_password: Password::new(args.storepass.as_str()),
        alias: args.alias.clone(),
        key_password: Password::new(args.keypass.as_str()),
    };

    let keytool = Keytool::from_config(&config);
    let mut spinner = CliStageSpinner::new(show_progress);
    let outcome = verify(&keytool, archive.path(), &creds, &config, &mut spinner);
    spinner.finish();

    match outcome {
        Ok(report) => {
            formatter.format_check_report(&report)?;
            Ok(())
        }
        Err(failure) => Err(convert_stage_failure(failure, archive.path())),
    }
}
