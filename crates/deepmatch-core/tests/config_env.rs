//! Configuration sources: environment overrides and config files.

use std::io::Write;

use deepmatch_core::config::{ENV_BE_LAX, ENV_BOOLEAN_ONLY, ENV_MAX_DEPTH, ENV_ROOT_NAME};
use deepmatch_core::value::IntKind;
use deepmatch_core::{cmp_deeply_with, ContextConfig, Value};
use serial_test::serial;

fn clear_env() {
    for var in [ENV_ROOT_NAME, ENV_BE_LAX, ENV_BOOLEAN_ONLY, ENV_MAX_DEPTH] {
        std::env::remove_var(var);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
#[serial]
fn env_overrides_defaults() {
    init_tracing();
    clear_env();
    std::env::set_var(ENV_ROOT_NAME, "RESP");
    std::env::set_var(ENV_BE_LAX, "true");
    std::env::set_var(ENV_MAX_DEPTH, "8");

    let cfg = ContextConfig::from_env();
    assert_eq!(cfg.root_name, "RESP");
    assert!(cfg.be_lax);
    assert!(!cfg.boolean_only);
    assert_eq!(cfg.max_depth, Some(8));

    // Lax from the environment lets an int32 match an int literal.
    let got = Value::Int(3, IntKind::I32);
    assert!(cmp_deeply_with(&cfg, &got, &Value::int(3)).is_ok());
    clear_env();
}

#[test]
#[serial]
fn env_garbage_is_ignored() {
    init_tracing();
    clear_env();
    std::env::set_var(ENV_BOOLEAN_ONLY, "sometimes");
    std::env::set_var(ENV_MAX_DEPTH, "deep");

    let cfg = ContextConfig::from_env();
    assert_eq!(cfg, ContextConfig::default());
    clear_env();
}

#[test]
#[serial]
fn env_boolean_only_drops_detail() {
    clear_env();
    std::env::set_var(ENV_BOOLEAN_ONLY, "1");
    let cfg = ContextConfig::from_env();
    let err = cmp_deeply_with(&cfg, &Value::int(1), &Value::int(2)).unwrap_err();
    assert!(err.is_boolean());
    clear_env();
}

#[test]
fn load_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "root_name: ITEMS\nmax_depth: 4").unwrap();

    let cfg = ContextConfig::load(file.path()).unwrap();
    assert_eq!(cfg.root_name, "ITEMS");
    assert_eq!(cfg.max_depth, Some(4));
    assert!(!cfg.be_lax);
}

#[test]
fn load_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deepmatch.json");
    std::fs::write(&path, r#"{"be_lax": true, "boolean_only": true}"#).unwrap();

    let cfg = ContextConfig::load(&path).unwrap();
    assert!(cfg.be_lax);
    assert!(cfg.boolean_only);
    assert_eq!(cfg.root_name, "DATA");
}

#[test]
fn load_reports_path_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yml");
    std::fs::write(&path, "root_name: [unterminated").unwrap();

    let err = ContextConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.yml"));

    let missing = dir.path().join("absent.yaml");
    let err = ContextConfig::load(&missing).unwrap_err();
    assert!(err.to_string().contains("failed to read config"));
}
