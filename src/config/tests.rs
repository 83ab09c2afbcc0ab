use super::settings::Settings;
use super::{ClockKind, load_config};

use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.logging.level, "info");
    assert_eq!(settings.broker.request_timeout_ms, 500);
    assert_eq!(settings.broker.process_batch, 0);
    assert_eq!(settings.broker.clock, ClockKind::System);
}

#[test]
#[serial]
fn load_config_without_sources_uses_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    let cfg = temp_env::with_vars_unset(
        [
            "FIXBUS__LOGGING__LEVEL",
            "FIXBUS__BROKER__REQUEST_TIMEOUT_MS",
            "FIXBUS__BROKER__PROCESS_BATCH",
            "FIXBUS__BROKER__CLOCK",
        ],
        load_config,
    );

    env::set_current_dir(orig).expect("restore cwd");
    assert_eq!(cfg.expect("load_config failed"), Settings::default());
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    // load_config reads config/default.toml relative to the working directory
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [logging]
        level = "debug"

        [broker]
        request_timeout_ms = 50
        clock = "tick"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();

    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.broker.request_timeout_ms, 50);
    assert_eq!(cfg.broker.clock, ClockKind::Tick);
    // not in the file
    assert_eq!(cfg.broker.process_batch, 0);
}

#[test]
#[serial]
fn load_config_from_env_overrides_defaults() {
    let cfg = temp_env::with_vars(
        [
            ("FIXBUS__LOGGING__LEVEL", Some("warn")),
            ("FIXBUS__BROKER__PROCESS_BATCH", Some("4")),
        ],
        load_config,
    )
    .expect("load_config failed");

    assert_eq!(cfg.logging.level, "warn");
    assert_eq!(cfg.broker.process_batch, 4);
    assert_eq!(cfg.broker.request_timeout_ms, 500);
}
