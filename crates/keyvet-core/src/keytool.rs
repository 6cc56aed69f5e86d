//! External keystore tool invocation.
//!
//! The verification pipeline never parses keystore bytes itself; every
//! check is delegated to the JDK `keytool` binary, invoked non-interactively
//! with discrete arguments. Passwords are handed over as separate argv
//! entries, never interpolated into a shell string.

use std::ffi::OsString;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use crate::Password;
use crate::Result;
use crate::VerifyConfig;
use crate::VerifyError;

/// How often the child process is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// An argument list for one tool invocation.
///
/// Arguments that carry secrets are tracked so that `Debug` output and
/// verbose logging can never leak them.
#[derive(Clone)]
pub struct ToolArgs {
    args: Vec<(OsString, bool)>,
}

impl ToolArgs {
    fn new() -> Self {
        Self { args: Vec::new() }
    }

    fn push(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push((arg.into(), false));
        self
    }

    fn push_secret(mut self, arg: &Password) -> Self {
        self.args.push((OsString::from(arg.expose()), true));
        self
    }

    /// Listing with only the store password. Succeeds iff the password
    /// opens the keystore.
    #[must_use]
    pub fn list(keystore: &Path, storepass: &Password) -> Self {
        Self::new()
            .push("-list")
            .push("-keystore")
            .push(keystore)
            .push("-storepass")
            .push_secret(storepass)
    }

    /// Verbose listing; its output carries the `Keystore type:` line.
    #[must_use]
    pub fn list_verbose(keystore: &Path, storepass: &Password) -> Self {
        Self::new()
            .push("-list")
            .push("-v")
            .push("-keystore")
            .push(keystore)
            .push("-storepass")
            .push_secret(storepass)
    }

    /// Listing filtered to a single alias. Non-zero exit means the alias
    /// is absent.
    #[must_use]
    pub fn list_alias(keystore: &Path, storepass: &Password, alias: &str) -> Self {
        Self::list(keystore, storepass).push("-alias").push(alias)
    }

    /// Re-export of one alias into a discarded PKCS12 keystore.
    ///
    /// The export decrypts the source private key, so success proves the
    /// key material is accessible under `storepass`.
    #[must_use]
    pub fn export_probe(
        keystore: &Path,
        probe_dest: &Path,
        alias: &str,
        storepass: &Password,
    ) -> Self {
        Self::new()
            .push("-importkeystore")
            .push("-srckeystore")
            .push(keystore)
            .push("-destkeystore")
            .push(probe_dest)
            .push("-deststoretype")
            .push("PKCS12")
            .push("-srcalias")
            .push(alias)
            .push("-srcstorepass")
            .push_secret(storepass)
            .push("-srckeypass")
            .push_secret(storepass)
            .push("-deststorepass")
            .push_secret(storepass)
            .push("-destkeypass")
            .push_secret(storepass)
            .push("-noprompt")
    }

    /// Certificate-signing-request generation against an alias.
    ///
    /// CSR generation signs with the entry's private key, so success
    /// proves `keypass` decrypts it.
    #[must_use]
    pub fn certreq_probe(
        keystore: &Path,
        alias: &str,
        storepass: &Password,
        keypass: &Password,
    ) -> Self {
        Self::new()
            .push("-certreq")
            .push("-keystore")
            .push(keystore)
            .push("-storepass")
            .push_secret(storepass)
            .push("-alias")
            .push(alias)
            .push("-keypass")
            .push_secret(keypass)
    }

    /// Returns the argument list with secret values replaced by `***`.
    #[must_use]
    pub fn redacted(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|(arg, secret)| {
                if *secret {
                    "***".to_string()
                } else {
                    arg.to_string_lossy().into_owned()
                }
            })
            .collect()
    }

    fn apply(&self, cmd: &mut Command) {
        for (arg, _) in &self.args {
            cmd.arg(arg);
        }
    }
}

impl fmt::Debug for ToolArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ToolArgs").field(&self.redacted()).finish()
    }
}

/// Captured result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ToolOutput {
    /// Whether the invocation exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Tool diagnostic for error messages: stderr when present, stdout
    /// otherwise, truncated to `limit` bytes.
    #[must_use]
    pub fn diagnostic(&self, limit: usize) -> String {
        let raw = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        truncate(raw.trim(), limit)
    }

    /// Converts a non-zero exit into an [`VerifyError::ExternalTool`].
    pub fn require_success(&self, stderr_limit: usize) -> Result<()> {
        if self.success() {
            Ok(())
        } else {
            Err(VerifyError::ExternalTool {
                status: self.code,
                stderr: self.diagnostic(stderr_limit),
            })
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

/// The seam between the verification pipeline and the external tool.
///
/// Production code uses [`Keytool`]; tests script expected invocations
/// through a fake implementation.
pub trait Inspect {
    /// Runs one tool invocation and captures its output.
    ///
    /// Returns `Ok` for any invocation that ran to completion, including
    /// non-zero exits; callers classify those per stage. `Err` is reserved
    /// for transport-level failures (tool missing, timeout).
    fn run(&self, args: &ToolArgs) -> Result<ToolOutput>;
}

/// Production inspector invoking the JDK `keytool` binary.
#[derive(Debug, Clone)]
pub struct Keytool {
    binary: PathBuf,
    timeout: Duration,
}

impl Keytool {
    /// Creates an inspector from the verification configuration.
    #[must_use]
    pub fn from_config(config: &VerifyConfig) -> Self {
        Self {
            binary: config.keytool_path.clone(),
            timeout: config.tool_timeout,
        }
    }
}

impl Inspect for Keytool {
    fn run(&self, args: &ToolArgs) -> Result<ToolOutput> {
        let mut cmd = Command::new(&self.binary);
        args.apply(&mut cmd);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| VerifyError::ExternalTool {
            status: None,
            stderr: format!("failed to launch '{}': {e}", self.binary.display()),
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(VerifyError::ExternalTool {
                        status: None,
                        stderr: format!(
                            "'{}' timed out after {:?}",
                            self.binary.display(),
                            self.timeout
                        ),
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&stdout.join().unwrap_or_default()).into_owned(),
            stderr: String::from_utf8_lossy(&stderr.join().unwrap_or_default()).into_owned(),
            code: status.code(),
        })
    }
}

// Readers run on their own threads so a chatty tool cannot deadlock on a
// full pipe while we poll for exit.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}
