//! Type detection command implementation

use crate::cli::TypeArgs;
use crate::error::convert_verify_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use keyvet_core::Keytool;
use keyvet_core::Password;
use keyvet_core::detect_store_type;

pub fn execute(args: &TypeArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = args.tool.to_config();
    let keytool = Keytool::from_config(&config);
    let storepass = Password::new(args.storepass.as_str());

    let detected = detect_store_type(&keytool, &args.keystore, &storepass, &config)
        .map_err(|e| convert_verify_error(e, Some(&args.keystore)))?;

    formatter.format_store_type(detected)
}
