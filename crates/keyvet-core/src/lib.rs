//! Keystore signing pre-flight verification.
//!
//! `keyvet-core` checks that a password-protected keystore is actually
//! usable for signing before a release pipeline commits to it: the file
//! exists, the store password opens it, the signing alias is present, and
//! the key password really decrypts the private key — not merely "is
//! accepted", which for PKCS12 keystores the underlying tool does even
//! when the key password is wrong.
//!
//! All keystore access is delegated to the JDK `keytool` binary, invoked
//! with discrete arguments and captured output.
//!
//! # Examples
//!
//! ```no_run
//! use keyvet_core::Credentials;
//! use keyvet_core::Keytool;
//! use keyvet_core::NullObserver;
//! use keyvet_core::Password;
//! use keyvet_core::VerifyConfig;
//! use keyvet_core::verify;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VerifyConfig::default();
//! let keytool = Keytool::from_config(&config);
//! let creds = Credentials {
//!     store_password: Password::new("secret123"),
//!     alias: "release".to_string(),
//!     key_password: Password::new("secret123"),
//! };
//!
//! let report = verify(&keytool, "release.p12".as_ref(), &creds, &config, &mut NullObserver)?;
//! println!("ready for signing ({})", report.store_type);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod detect;
pub mod error;
pub mod input;
pub mod keytool;
pub mod pipeline;
pub mod policy;
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use config::VerifyConfig;
pub use detect::DetectedType;
pub use detect::StoreType;
pub use detect::detect_store_type;
pub use error::Result;
pub use error::Stage;
pub use error::StageFailure;
pub use error::VerifyError;
pub use input::ArchiveSource;
pub use input::ResolvedArchive;
pub use keytool::Inspect;
pub use keytool::Keytool;
pub use keytool::ToolArgs;
pub use keytool::ToolOutput;
pub use pipeline::Credentials;
pub use pipeline::NullObserver;
pub use pipeline::VerifyObserver;
pub use pipeline::VerifyReport;
pub use pipeline::list_aliases;
pub use pipeline::verify;
pub use types::Password;
