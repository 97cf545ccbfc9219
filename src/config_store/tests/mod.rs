//! Unit tests for config_store module.
//! Filesystem access goes through per-test temp directories; the poll loop
//! timing is covered by the integration tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::{
    collections::BTreeMap,
    fs,
    sync::{
        Arc, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::{
    codec::Format,
    config_store::{ConfigStore, store::lock, watermark::Watermark},
    core::ConfigError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Listen {
    port: u16,
    cert: String,
}

fn listen_defaults() -> Arc<RwLock<Listen>> {
    Arc::new(RwLock::new(Listen {
        port: 9999,
        cert: String::new(),
    }))
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn yaml_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.yaml", "port: 8888\ncert: \"\"\n");

    let model = listen_defaults();
    let store = ConfigStore::new(&path, Arc::clone(&model)).unwrap();

    assert_eq!(store.format(), Format::Yaml);
    assert_eq!(model.read().unwrap().port, 8888);
}

#[test]
fn empty_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", "");

    let store = ConfigStore::new(&path, listen_defaults()).unwrap();

    assert_eq!(
        store.current(),
        Listen {
            port: 9999,
            cert: String::new()
        }
    );
}

#[test]
fn map_model_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", r#"{"hello": "world"}"#);

    let model = Arc::new(RwLock::new(BTreeMap::<String, String>::new()));
    let store = ConfigStore::new(&path, Arc::clone(&model)).unwrap();

    assert_eq!(store.current().get("hello").map(String::as_str), Some("world"));
}

#[test]
fn non_record_model_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", "[]");

    let model = Arc::new(RwLock::new(vec!["a".to_string()]));
    let err = ConfigStore::new(&path, model).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidModelKind { kind: "array" }));
}

#[test]
fn unknown_extension_is_rejected_before_touching_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let err = ConfigStore::new(&path, listen_defaults()).unwrap_err();

    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    assert!(!path.exists());
}

#[test]
fn missing_file_fails_by_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let err = ConfigStore::new(&path, listen_defaults()).unwrap_err();

    match err {
        ConfigError::FileNotFound { path: missing } => assert_eq!(missing, path),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn missing_file_is_created_when_requested() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/config.yaml");

    let store = ConfigStore::builder(&path)
        .create_if_missing(true)
        .build(listen_defaults())
        .unwrap();

    assert!(path.exists());
    assert_eq!(fs::read(&path).unwrap(), b"");
    assert_eq!(store.current().port, 9999);
}

#[test]
fn decode_error_names_path_and_format() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", r#"{"port": "eighty"}"#);

    let err = ConfigStore::new(&path, listen_defaults()).unwrap_err();

    match err {
        ConfigError::Decode {
            path: failed,
            format,
            ..
        } => {
            assert_eq!(failed, path);
            assert_eq!(format, Format::Json);
        }
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[test]
fn failed_reload_keeps_previous_model() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", r#"{"port": 1234}"#);

    let store = ConfigStore::new(&path, listen_defaults()).unwrap();
    fs::write(&path, r#"{"port": "#).unwrap();

    assert!(matches!(store.load(), Err(ConfigError::Decode { .. })));
    assert_eq!(store.current().port, 1234);
}

#[test]
fn save_overwrites_instead_of_appending() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "config.json",
        r#"{"port": 1, "cert": "a very long certificate path that is longer than the output"}"#,
    );

    let store = ConfigStore::new(&path, listen_defaults()).unwrap();
    store.model().write().unwrap().cert = "c.pem".to_string();
    store.save().unwrap();

    let written: Listen = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        Listen {
            port: 1,
            cert: "c.pem".to_string()
        }
    );
}

#[test]
fn load_records_watermark_of_loaded_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let store = ConfigStore::builder(&path)
        .create_if_missing(true)
        .build(listen_defaults())
        .unwrap();
    let recorded = *lock(&store.inner.watermark);
    assert_eq!(recorded, Some(Watermark::observe(&path).unwrap()));

    fs::write(&path, r#"{"port": 4321}"#).unwrap();
    assert_ne!(*lock(&store.inner.watermark), Some(Watermark::observe(&path).unwrap()));

    store.load().unwrap();
    assert_eq!(*lock(&store.inner.watermark), Some(Watermark::observe(&path).unwrap()));
    assert_eq!(store.current().port, 4321);
}

#[test]
fn save_writes_model_as_of_acquiring_file_lock() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", r#"{"port": 1}"#);
    let store = ConfigStore::new(&path, listen_defaults()).unwrap();

    let io_guard = lock(&store.inner.watermark);
    let saver = {
        let store = store.clone();
        thread::spawn(move || store.save())
    };
    thread::sleep(Duration::from_millis(100));
    store.model().write().unwrap().port = 2;
    drop(io_guard);

    saver.join().unwrap().unwrap();
    let written: Listen = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(written.port, 2);
}

#[test]
fn save_error_reports_io_failure() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", "{}");

    let store = ConfigStore::new(&path, listen_defaults()).unwrap();
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    assert!(matches!(store.save(), Err(ConfigError::Io { .. })));
}

#[test]
fn model_accessor_returns_bound_reference() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", "{}");

    let model = listen_defaults();
    let store = ConfigStore::new(&path, Arc::clone(&model)).unwrap();

    assert!(Arc::ptr_eq(&store.model(), &model));
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn display_and_debug_name_the_binding() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.yaml", "");

    let store = ConfigStore::new(&path, listen_defaults()).unwrap();

    assert_eq!(
        store.to_string(),
        format!("ConfigStore({}, yaml)", path.display())
    );
    assert!(format!("{store:?}").contains("watching: false"));
}

#[test]
fn watch_outside_runtime_registers_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", "{}");
    let store = ConfigStore::new(&path, listen_defaults()).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let err = store
        .watch(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            true,
        )
        .unwrap_err();

    assert!(matches!(err, ConfigError::RuntimeUnavailable));
    store.emit_change(true);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!store.is_watching());
}

#[tokio::test]
async fn rewatching_replaces_callback_without_second_loop() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", "{}");
    let store = ConfigStore::builder(&path)
        .poll_interval(Duration::from_secs(60))
        .build(listen_defaults())
        .unwrap();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&first);
    store
        .watch(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            false,
        )
        .unwrap();

    let counter = Arc::clone(&second);
    store
        .watch(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            false,
        )
        .unwrap();

    store.emit_change(true);
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert!(store.is_watching());

    store.stop_watch_and_wait().await;
    assert!(!store.is_watching());
}

#[tokio::test]
async fn must_bind_invokes_callback_for_initial_bind() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.json", r#"{"port": 7000}"#);

    let seen = Arc::new(RwLock::new(Vec::new()));
    let log = Arc::clone(&seen);
    let store = ConfigStore::must_bind(&path, listen_defaults(), move |changed| {
        log.write().unwrap().push(changed);
    });

    assert_eq!(*seen.read().unwrap(), vec![false]);
    assert_eq!(store.current().port, 7000);
    store.stop_watch_and_wait().await;
}

#[test]
#[should_panic(expected = "failed to bind config")]
fn must_bind_panics_on_bad_format() {
    let _store = ConfigStore::must_bind("config.ini", listen_defaults(), |_| {});
}
