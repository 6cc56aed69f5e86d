//! Alias listing command implementation

use crate::cli::AliasesArgs;
use crate::error::convert_verify_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use keyvet_core::Keytool;
use keyvet_core::Password;
use keyvet_core::list_aliases;

pub fn execute(args: &AliasesArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = args.tool.to_config();
    let keytool = Keytool::from_config(&config);
    let storepass = Password::new(args.storepass.as_str());

    let aliases = list_aliases(&keytool, &args.keystore, &storepass, &config)
        .map_err(|e| convert_verify_error(e, Some(&args.keystore)))?;

    formatter.format_aliases(&aliases)
}
