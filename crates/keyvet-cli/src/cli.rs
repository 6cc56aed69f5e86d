//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use keyvet_core::VerifyConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "keyvet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a keystore is ready for signing
    Check(CheckArgs),
    /// Detect and print the keystore type
    #[command(name = "type")]
    StoreType(TypeArgs),
    /// List the aliases a keystore contains
    Aliases(AliasesArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to the keystore file
    ///
    /// When both a path and --keystore-base64 are given, the path wins and
    /// the blob is ignored.
    #[arg(value_name = "KEYSTORE")]
    pub keystore: Option<PathBuf>,

    /// Base64-encoded keystore blob, decoded into a temporary file
    #[arg(
        long,
        value_name = "BASE64",
        env = "KEYVET_KEYSTORE_BASE64",
        hide_env_values = true
    )]
    pub keystore_base64: Option<String>,

    /// Store password (prefer the environment variable over the flag so
    /// the secret stays out of shell history)
    #[arg(long, value_name = "PASSWORD", env = "KEYVET_STOREPASS", hide_env_values = true)]
    pub storepass: String,

    /// Alias of the signing entry
    #[arg(long, value_name = "NAME")]
    pub alias: String,

    /// Key password for the alias (prefer the environment variable)
    #[arg(long, value_name = "PASSWORD", env = "KEYVET_KEYPASS", hide_env_values = true)]
    pub keypass: String,

    /// Keep the probe scratch keystore for post-mortem inspection
    #[arg(long)]
    pub keep_probe: bool,

    #[command(flatten)]
    pub tool: ToolOpts,
}

#[derive(clap::Args)]
pub struct TypeArgs {
    /// Path to the keystore file
    #[arg(value_name = "KEYSTORE")]
    pub keystore: PathBuf,

    /// Store password
    #[arg(long, value_name = "PASSWORD", env = "KEYVET_STOREPASS", hide_env_values = true)]
    pub storepass: String,

    #[command(flatten)]
    pub tool: ToolOpts,
}

#[derive(clap::Args)]
pub struct AliasesArgs {
    /// Path to the keystore file
    #[arg(value_name = "KEYSTORE")]
    pub keystore: PathBuf,

    /// Store password
    #[arg(long, value_name = "PASSWORD", env = "KEYVET_STOREPASS", hide_env_values = true)]
    pub storepass: String,

    #[command(flatten)]
    pub tool: ToolOpts,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

/// Options selecting and bounding the external keystore tool.
#[derive(clap::Args)]
pub struct ToolOpts {
    /// Path to the keytool binary (default: keytool on PATH)
    #[arg(long, value_name = "PATH")]
    pub keytool: Option<PathBuf>,

    /// Per-invocation timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

impl ToolOpts {
    /// Builds the core configuration from the CLI options.
    pub fn to_config(&self) -> VerifyConfig {
        let mut config = self
            .keytool
            .as_ref()
            .map_or_else(VerifyConfig::default, VerifyConfig::with_keytool);
        config.tool_timeout = Duration::from_secs(self.timeout);
        config
    }
}
