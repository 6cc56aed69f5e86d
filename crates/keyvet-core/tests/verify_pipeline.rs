//! End-to-end pipeline tests against a scripted tool.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::io::Write;
use std::path::PathBuf;

use keyvet_core::Credentials;
use keyvet_core::Password;
use keyvet_core::Stage;
use keyvet_core::StoreType;
use keyvet_core::VerifyConfig;
use keyvet_core::VerifyError;
use keyvet_core::VerifyObserver;
use keyvet_core::test_utils::FakeInspector;
use keyvet_core::verify;
use tempfile::NamedTempFile;
use tempfile::TempDir;

const PKCS12_LISTING: &str = "Keystore type: PKCS12\n\
                              Keystore provider: SUN\n\
                              \n\
                              Your keystore contains 1 entry\n\
                              \n\
                              release, Jan 5, 2024, PrivateKeyEntry, \n";

const JKS_LISTING: &str = "Keystore type: JKS\n\
                           Keystore provider: SUN\n\
                           \n\
                           Your keystore contains 2 entries\n\
                           \n\
                           release, Jan 5, 2024, PrivateKeyEntry, \n\
                           upload, Jan 5, 2024, trustedCertEntry, \n";

fn keystore_file() -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".p12").unwrap();
    file.write_all(b"not a real keystore, the tool is scripted")
        .unwrap();
    file.flush().unwrap();
    file
}

fn creds(storepass: &str, alias: &str, keypass: &str) -> Credentials {
    Credentials {
        store_password: Password::new(storepass),
        alias: alias.to_string(),
        key_password: Password::new(keypass),
    }
}

fn pkcs12_fake() -> FakeInspector {
    FakeInspector::new()
        .on_success("-list", PKCS12_LISTING)
        .on_success("-list -v", PKCS12_LISTING)
        .on_success("-list -alias", "release, Jan 5, 2024, PrivateKeyEntry, \n")
        .on_success("-importkeystore", "")
}

#[derive(Default)]
struct RecordingObserver {
    events: Vec<String>,
}

impl VerifyObserver for RecordingObserver {
    fn stage_started(&mut self, stage: Stage) {
        self.events.push(format!("start:{stage}"));
    }

    fn stage_passed(&mut self, stage: Stage) {
        self.events.push(format!("pass:{stage}"));
    }

    fn warning(&mut self, message: &str) {
        self.events.push(format!("warn:{message}"));
    }
}

/// Scenario A: PKCS12, store password equals key password, alias present.
#[test]
fn test_pkcs12_valid_credentials_succeed() {
    let keystore = keystore_file();
    let fake = pkcs12_fake();

    let report = verify(
        &fake,
        keystore.path(),
        &creds("secret123", "release", "secret123"),
        &VerifyConfig::default(),
        &mut keyvet_core::NullObserver,
    )
    .unwrap();

    assert_eq!(report.store_type, StoreType::Pkcs12);
    assert_eq!(report.stages_passed, Stage::ALL.to_vec());
    assert!(!report.has_warnings());
    assert_eq!(
        fake.commands_run(),
        vec!["-list", "-list -v", "-list -alias", "-importkeystore"]
    );
}

/// Scenario B: PKCS12 with differing passwords fails on policy, before any
/// probe invocation.
#[test]
fn test_pkcs12_password_mismatch_fails_without_probe() {
    let keystore = keystore_file();
    let fake = pkcs12_fake();

    let failure = verify(
        &fake,
        keystore.path(),
        &creds("secret123", "release", "different"),
        &VerifyConfig::default(),
        &mut keyvet_core::NullObserver,
    )
    .unwrap_err();

    assert_eq!(failure.stage, Stage::KeyPassword);
    assert!(matches!(failure.error, VerifyError::PasswordMismatchPolicy));
    assert!(
        !fake
            .commands_run()
            .contains(&"-importkeystore".to_string()),
        "no probe archive may be created for a rejected password pair"
    );
}

/// Scenario C: alias absent; the failure carries the available aliases.
#[test]
fn test_missing_alias_reports_available_aliases() {
    let keystore = keystore_file();
    let fake = FakeInspector::new()
        .on_success("-list", JKS_LISTING)
        .on_success("-list -v", JKS_LISTING)
        .on_failure(
            "-list -alias",
            "keytool error: java.lang.Exception: Alias <nope> does not exist",
        );

    let failure = verify(
        &fake,
        keystore.path(),
        &creds("storepass", "nope", "keypass"),
        &VerifyConfig::default(),
        &mut keyvet_core::NullObserver,
    )
    .unwrap_err();

    assert_eq!(failure.stage, Stage::AliasExists);
    match failure.error {
        VerifyError::AliasNotFound { alias, available } => {
            assert_eq!(alias, "nope");
            assert_eq!(available, vec!["release".to_string(), "upload".to_string()]);
        }
        other => panic!("expected AliasNotFound, got {other:?}"),
    }
}

/// Scenario D: wrong store password stops the run before type detection.
#[test]
fn test_wrong_store_password_short_circuits() {
    let keystore = keystore_file();
    let fake = FakeInspector::new().on_failure(
        "-list",
        "keytool error: java.io.IOException: keystore password was incorrect",
    );

    let failure = verify(
        &fake,
        keystore.path(),
        &creds("wrong", "release", "wrong"),
        &VerifyConfig::default(),
        &mut keyvet_core::NullObserver,
    )
    .unwrap_err();

    assert_eq!(failure.stage, Stage::StorePassword);
    assert!(matches!(failure.error, VerifyError::StorePassword { .. }));
    assert_eq!(
        fake.commands_run(),
        vec!["-list"],
        "type detection must never run after a store-password failure"
    );
}

/// JKS accepts independent store and key passwords.
#[test]
fn test_jks_independent_passwords_succeed() {
    let keystore = keystore_file();
    let fake = FakeInspector::new()
        .on_success("-list", JKS_LISTING)
        .on_success("-list -v", JKS_LISTING)
        .on_success("-list -alias", "release, Jan 5, 2024, PrivateKeyEntry, \n")
        .on_success("-certreq", "-----BEGIN NEW CERTIFICATE REQUEST-----");

    let report = verify(
        &fake,
        keystore.path(),
        &creds("storepass", "release", "keypass"),
        &VerifyConfig::default(),
        &mut keyvet_core::NullObserver,
    )
    .unwrap();

    assert_eq!(report.store_type, StoreType::Jks);
    assert!(fake.commands_run().contains(&"-certreq".to_string()));
}

/// Unrecognized types fall back to the JKS probe and carry a warning.
#[test]
fn test_unknown_type_warns_and_uses_certreq() {
    let keystore = keystore_file();
    let bks_listing = "Keystore type: BKS\n\nrelease, Jan 5, 2024, PrivateKeyEntry, \n";
    let fake = FakeInspector::new()
        .on_success("-list", bks_listing)
        .on_success("-list -v", bks_listing)
        .on_success("-list -alias", "release, Jan 5, 2024, PrivateKeyEntry, \n")
        .on_success("-certreq", "");

    let mut observer = RecordingObserver::default();
    let report = verify(
        &fake,
        keystore.path(),
        &creds("a", "release", "b"),
        &VerifyConfig::default(),
        &mut observer,
    )
    .unwrap();

    assert_eq!(report.store_type, StoreType::Unknown);
    assert!(report.has_warnings());
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("may not be accurate"))
    );
    assert!(observer.events.iter().any(|e| e.starts_with("warn:")));
    assert!(fake.commands_run().contains(&"-certreq".to_string()));
}

/// A listing with no type line at all is unknown plus a format warning.
#[test]
fn test_type_line_missing_warns_about_format() {
    let keystore = keystore_file();
    let listing = "Your keystore contains 1 entry\n\nrelease, Jan 5, 2024, PrivateKeyEntry, \n";
    let fake = FakeInspector::new()
        .on_success("-list", listing)
        .on_success("-list -v", listing)
        .on_success("-list -alias", "release, Jan 5, 2024, PrivateKeyEntry, \n")
        .on_success("-certreq", "");

    let report = verify(
        &fake,
        keystore.path(),
        &creds("a", "release", "a"),
        &VerifyConfig::default(),
        &mut keyvet_core::NullObserver,
    )
    .unwrap();

    assert_eq!(report.store_type, StoreType::Unknown);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("output format was not recognized"))
    );
}

/// Missing file fails the first stage; no subprocess runs.
#[test]
fn test_missing_file_fails_first_stage() {
    let fake = FakeInspector::new();

    let failure = verify(
        &fake,
        &PathBuf::from("/nonexistent/release.p12"),
        &creds("a", "release", "a"),
        &VerifyConfig::default(),
        &mut keyvet_core::NullObserver,
    )
    .unwrap_err();

    assert_eq!(failure.stage, Stage::FileExists);
    assert!(matches!(failure.error, VerifyError::FileNotReadable { .. }));
    assert_eq!(fake.invocation_count(), 0);
}

/// A transport-level tool failure surfaces at the stage it interrupted.
#[test]
fn test_transport_failure_maps_to_current_stage() {
    let keystore = keystore_file();
    let fake = FakeInspector::new().on_transport_error("-list");

    let failure = verify(
        &fake,
        keystore.path(),
        &creds("a", "release", "a"),
        &VerifyConfig::default(),
        &mut keyvet_core::NullObserver,
    )
    .unwrap_err();

    assert_eq!(failure.stage, Stage::StorePassword);
    assert!(matches!(
        failure.error,
        VerifyError::ExternalTool { status: None, .. }
    ));
}

/// Stage callbacks fire in order for a passing run.
#[test]
fn test_observer_sees_ordered_stages() {
    let keystore = keystore_file();
    let fake = pkcs12_fake();
    let mut observer = RecordingObserver::default();

    verify(
        &fake,
        keystore.path(),
        &creds("secret123", "release", "secret123"),
        &VerifyConfig::default(),
        &mut observer,
    )
    .unwrap();

    let expected: Vec<String> = Stage::ALL
        .iter()
        .flat_map(|s| [format!("start:{s}"), format!("pass:{s}")])
        .collect();
    assert_eq!(observer.events, expected);
}

/// Two identical runs produce identical outcomes and leave no probe
/// scratch files behind.
#[test]
fn test_idempotent_runs_leave_no_scratch_files() {
    let keystore = keystore_file();
    let scratch = TempDir::new().unwrap();
    let config = VerifyConfig {
        scratch_dir: Some(scratch.path().to_path_buf()),
        ..VerifyConfig::default()
    };

    for _ in 0..2 {
        let fake = pkcs12_fake();
        let report = verify(
            &fake,
            keystore.path(),
            &creds("secret123", "release", "secret123"),
            &config,
            &mut keyvet_core::NullObserver,
        )
        .unwrap();
        assert_eq!(report.store_type, StoreType::Pkcs12);
        assert_eq!(
            fake.commands_run(),
            vec!["-list", "-list -v", "-list -alias", "-importkeystore"]
        );
    }

    let leftovers: Vec<_> = std::fs::read_dir(scratch.path()).unwrap().collect();
    assert!(
        leftovers.is_empty(),
        "probe scratch files must be removed: {leftovers:?}"
    );
}

/// A failing probe still cleans up its scratch directory.
#[test]
fn test_failed_probe_cleans_up_scratch() {
    let keystore = keystore_file();
    let scratch = TempDir::new().unwrap();
    let config = VerifyConfig {
        scratch_dir: Some(scratch.path().to_path_buf()),
        ..VerifyConfig::default()
    };
    let fake = FakeInspector::new()
        .on_success("-list", PKCS12_LISTING)
        .on_success("-list -v", PKCS12_LISTING)
        .on_success("-list -alias", "release, Jan 5, 2024, PrivateKeyEntry, \n")
        .on_failure("-importkeystore", "keytool error: Get Key failed");

    let failure = verify(
        &fake,
        keystore.path(),
        &creds("secret123", "release", "secret123"),
        &config,
        &mut keyvet_core::NullObserver,
    )
    .unwrap_err();

    assert_eq!(failure.stage, Stage::KeyPassword);
    assert!(matches!(failure.error, VerifyError::KeyAccess { .. }));
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

/// `keep_probe_artifacts` retains the scratch directory.
#[test]
fn test_keep_probe_artifacts_retains_scratch() {
    let keystore = keystore_file();
    let scratch = TempDir::new().unwrap();
    let config = VerifyConfig {
        scratch_dir: Some(scratch.path().to_path_buf()),
        keep_probe_artifacts: true,
        ..VerifyConfig::default()
    };

    verify(
        &pkcs12_fake(),
        keystore.path(),
        &creds("secret123", "release", "secret123"),
        &config,
        &mut keyvet_core::NullObserver,
    )
    .unwrap();

    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 1);
}
