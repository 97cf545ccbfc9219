//! Unit tests for CLI module
//!
//! Tests argument parsing, formatting, and the non-interactive commands.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::fs;

use clap::Parser;
use tempfile::TempDir;

use crate::cli::{Cli, CliError, Command, formatting::format_change_header, run};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn parses_watch_with_interval_and_global_flags() {
    let cli = parse(&[
        "livecfg",
        "watch",
        "app.yaml",
        "--interval-ms",
        "250",
        "--defaults",
        "defaults.json",
    ]);

    assert_eq!(cli.defaults.as_deref(), Some(std::path::Path::new("defaults.json")));
    match cli.command {
        Command::Watch { path, interval_ms } => {
            assert_eq!(path, std::path::PathBuf::from("app.yaml"));
            assert_eq!(interval_ms, 250);
        }
        other => panic!("expected watch, got {other:?}"),
    }
}

#[test]
fn watch_interval_defaults_to_one_second() {
    let cli = parse(&["livecfg", "watch", "app.json"]);
    assert!(matches!(cli.command, Command::Watch { interval_ms: 1000, .. }));
}

#[test]
fn rejects_missing_subcommand() {
    assert!(Cli::try_parse_from(["livecfg"]).is_err());
}

#[test]
fn change_header_labels_initial_bind_and_reload() {
    assert!(format_change_header(false).contains("loaded"));
    assert!(format_change_header(true).contains("changed"));
}

#[tokio::test]
async fn show_merges_defaults_file_into_output() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("app.yaml");
    let defaults = dir.path().join("defaults.json");
    fs::write(&config, "list: [\"1\", \"2\"]\n").unwrap();
    fs::write(&defaults, r#"{"hello": "default", "list": ["1"]}"#).unwrap();

    let cli = parse(&[
        "livecfg",
        "show",
        config.to_str().unwrap(),
        "--defaults",
        defaults.to_str().unwrap(),
    ]);
    let output = run(cli).await.unwrap();

    let shown: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();
    let expected: serde_yaml::Value =
        serde_yaml::from_str("hello: default\nlist: [\"1\", \"2\"]\n").unwrap();
    assert_eq!(shown, expected);
}

#[tokio::test]
async fn normalize_writes_defaults_into_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("app.json");
    let defaults = dir.path().join("defaults.yaml");
    fs::write(&config, r#"{"port": 1}"#).unwrap();
    fs::write(&defaults, "port: 80\nhost: localhost\n").unwrap();

    let cli = parse(&[
        "livecfg",
        "--defaults",
        defaults.to_str().unwrap(),
        "normalize",
        config.to_str().unwrap(),
    ]);
    run(cli).await.unwrap();

    let written: serde_json::Value = serde_json::from_slice(&fs::read(&config).unwrap()).unwrap();
    assert_eq!(written, serde_json::json!({"port": 1, "host": "localhost"}));
}

#[tokio::test]
async fn unreadable_defaults_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("app.json");
    fs::write(&config, "{}").unwrap();

    let cli = parse(&[
        "livecfg",
        "show",
        config.to_str().unwrap(),
        "--defaults",
        dir.path().join("missing.yaml").to_str().unwrap(),
    ]);

    assert!(matches!(
        run(cli).await,
        Err(CliError::InvalidDefaults { .. })
    ));
}

#[tokio::test]
async fn missing_config_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let cli = parse(&["livecfg", "show", dir.path().join("absent.json").to_str().unwrap()]);

    assert!(matches!(run(cli).await, Err(CliError::Config(_))));
}
