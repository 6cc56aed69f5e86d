//! Test utilities for scripting keystore tool behavior.
//!
//! The verification state machine is exercised against a scripted
//! [`FakeInspector`] so the tests need no JDK. Responses are keyed by the
//! invocation kind (the keytool operation plus its distinguishing flag).
//!
//! # Panics
//!
//! The fake panics on unscripted invocations; it is designed for test use
//! only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Mutex;

use crate::Inspect;
use crate::Result;
use crate::VerifyError;
use crate::keytool::ToolArgs;
use crate::keytool::ToolOutput;

/// One scripted reaction to an invocation kind.
#[derive(Debug, Clone)]
enum Reaction {
    Respond {
        stdout: String,
        stderr: String,
        code: i32,
    },
    TransportError,
}

/// Scripted stand-in for the external keystore tool.
///
/// # Examples
///
/// ```
/// use keyvet_core::test_utils::FakeInspector;
///
/// let fake = FakeInspector::new()
///     .on_success("-list", "Your keystore contains 1 entry")
///     .on_failure("-certreq", "keytool error: Cannot recover key");
/// ```
#[derive(Debug, Default)]
pub struct FakeInspector {
    reactions: HashMap<String, Reaction>,
    log: Mutex<Vec<String>>,
}

impl FakeInspector {
    /// Creates a fake with no scripted invocations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a zero-exit response with the given stdout.
    #[must_use]
    pub fn on_success(mut self, kind: &str, stdout: &str) -> Self {
        self.reactions.insert(
            kind.to_string(),
            Reaction::Respond {
                stdout: stdout.to_string(),
                stderr: String::new(),
                code: 0,
            },
        );
        self
    }

    /// Scripts an exit-status-1 response with the given stderr.
    #[must_use]
    pub fn on_failure(mut self, kind: &str, stderr: &str) -> Self {
        self.reactions.insert(
            kind.to_string(),
            Reaction::Respond {
                stdout: String::new(),
                stderr: stderr.to_string(),
                code: 1,
            },
        );
        self
    }

    /// Scripts a transport-level failure (tool missing, timeout).
    #[must_use]
    pub fn on_transport_error(mut self, kind: &str) -> Self {
        self.reactions
            .insert(kind.to_string(), Reaction::TransportError);
        self
    }

    /// Number of invocations the fake has served.
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    /// Invocation kinds in the order they were run.
    #[must_use]
    pub fn commands_run(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Classifies an argument list into the invocation kinds used as
    /// scripting keys.
    #[must_use]
    pub fn kind_of(args: &ToolArgs) -> String {
        let redacted = args.redacted();
        let has = |flag: &str| redacted.iter().any(|a| a == flag);
        if has("-importkeystore") {
            "-importkeystore".to_string()
        } else if has("-certreq") {
            "-certreq".to_string()
        } else if has("-list") && has("-v") {
            "-list -v".to_string()
        } else if has("-list") && has("-alias") {
            "-list -alias".to_string()
        } else if has("-list") {
            "-list".to_string()
        } else {
            redacted.first().cloned().unwrap_or_default()
        }
    }
}

impl Inspect for FakeInspector {
    fn run(&self, args: &ToolArgs) -> Result<ToolOutput> {
        let kind = Self::kind_of(args);
        self.log.lock().unwrap().push(kind.clone());

        match self.reactions.get(&kind) {
            Some(Reaction::Respond {
                stdout,
                stderr,
                code,
            }) => Ok(ToolOutput {
                stdout: stdout.clone(),
                stderr: stderr.clone(),
                code: Some(*code),
            }),
            Some(Reaction::TransportError) => Err(VerifyError::ExternalTool {
                status: None,
                stderr: "scripted transport failure".to_string(),
            }),
            None => panic!("unscripted tool invocation: {kind} ({:?})", args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Password;
    use std::path::Path;

    #[test]
    fn test_kind_classification() {
        let storepass = Password::new("s");
        let keystore = Path::new("store.p12");
        assert_eq!(
            FakeInspector::kind_of(&ToolArgs::list(keystore, &storepass)),
            "-list"
        );
        assert_eq!(
            FakeInspector::kind_of(&ToolArgs::list_verbose(keystore, &storepass)),
            "-list -v"
        );
        assert_eq!(
            FakeInspector::kind_of(&ToolArgs::list_alias(keystore, &storepass, "release")),
            "-list -alias"
        );
        assert_eq!(
            FakeInspector::kind_of(&ToolArgs::export_probe(
                keystore,
                Path::new("probe.p12"),
                "release",
                &storepass
            )),
            "-importkeystore"
        );
    }

    #[test]
    fn test_scripted_responses_and_log() {
        let fake = FakeInspector::new().on_success("-list", "ok");
        let out = fake
            .run(&ToolArgs::list(Path::new("s.p12"), &Password::new("p")))
            .unwrap();
        assert!(out.success());
        assert_eq!(fake.commands_run(), vec!["-list".to_string()]);
    }
}
