//! End-to-end runs of the `statusbot` binary.
//!
//! Each run is a fresh process, so the revision override is read from the
//! environment exactly as a deployment would set it.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Output;

use pretty_assertions::assert_eq;
use statusbot_config::AppConfig;
use statusbot_test_utils::config::TestConfigBuilder;
use statusbot_test_utils::manifest::TempManifest;
use tempfile::TempDir;

const OVERRIDE_VAR: &str = "STATUSBOT_IT_COMMIT_HASH";

/// Config file in an owned temp directory.
struct TempConfig {
    path: PathBuf,
    _temp_dir: TempDir,
}

async fn write_config(config: &AppConfig) -> TempConfig {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("statusbot.toml");
    tokio::fs::write(&path, toml::to_string(config).unwrap())
        .await
        .unwrap();
    TempConfig {
        path,
        _temp_dir: temp_dir,
    }
}

async fn run(config: &TempConfig, args: &[&str], revision: Option<&OsStr>) -> Output {
    let mut command = tokio::process::Command::new(env!("CARGO_BIN_EXE_statusbot"));
    command
        .arg("--config")
        .arg(&config.path)
        .args(args)
        .env_remove(OVERRIDE_VAR);
    if let Some(revision) = revision {
        command.env(OVERRIDE_VAR, revision);
    }
    let output = command.output().await.unwrap();
    assert!(output.status.success(), "statusbot {args:?} failed: {output:?}");
    output
}

#[tokio::test]
async fn test_identity_reads_override_variable() {
    let manifest = TempManifest::json(r#"{"version": "1.2.3"}"#).await;
    let config = write_config(
        &TestConfigBuilder::new()
            .manifest_path(manifest.path())
            .revision_env(OVERRIDE_VAR)
            .build(),
    )
    .await;

    let output = run(&config, &["identity"], Some(OsStr::new("abc123"))).await;
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "version: 1.2.3\ncommit: abc123\n"
    );
}

#[tokio::test]
async fn test_identity_without_any_revision_source() {
    let config = write_config(&TestConfigBuilder::new().revision_env(OVERRIDE_VAR).build()).await;

    let output = run(&config, &["identity"], None).await;
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "version: unknown\ncommit: unknown\n"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_utf8_override_is_kept_lossily() {
    use std::os::unix::ffi::OsStrExt;

    let config = write_config(&TestConfigBuilder::new().revision_env(OVERRIDE_VAR).build()).await;

    let output = run(&config, &["identity"], Some(OsStr::from_bytes(b"abc\xff"))).await;
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "version: unknown\ncommit: abc\u{FFFD}\n"
    );
}

#[tokio::test]
async fn test_info_omits_commit_without_revision() {
    let manifest = TempManifest::json(r#"{"version": "2.0.0"}"#).await;
    let config = write_config(
        &TestConfigBuilder::new()
            .manifest_path(manifest.path())
            .revision_env(OVERRIDE_VAR)
            .build(),
    )
    .await;

    let output = run(&config, &["info", "--latency", "15"], None).await;
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("**Version:** 2.0.0\n"));
    assert!(!stdout.contains("**Commit:**"));
    assert!(stdout.contains("**Ping:** 15ms\n"));
}

#[tokio::test]
async fn test_config_show_prints_resolved_config() {
    let config = write_config(&TestConfigBuilder::new().log_level("warn").build()).await;

    let output = run(&config, &["config", "--show"], None).await;
    let shown = AppConfig::parse(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(shown.logging.level, "warn");
}
