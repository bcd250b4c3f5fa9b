// Config loading, environment overrides and validation tests

use std::collections::HashMap;

use srm_exporter::config::{AppConfig, MAX_CACHE_TTL_SECS, parse_bool};

const VALID_CONFIG: &str = r#"
[server]
port = 9922
host = "0.0.0.0"
worker_threads = 2

[router]
host = "10.0.0.1"
port = 8001
https = true
username = "admin"
password = "hunter2"
verify_tls = false
request_timeout_secs = 5

[cache]
ttl_secs = 30
"#;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 9922);
    assert_eq!(config.server.worker_threads, 2);
    assert_eq!(config.router.host, "10.0.0.1");
    assert!(!config.router.verify_tls);
    assert_eq!(config.router.request_timeout().as_secs(), 5);
    assert_eq!(config.cache.ttl().as_secs(), 30);
}

#[test]
fn test_config_defaults_apply_to_missing_keys() {
    let config = AppConfig::load_from_str("[router]\npassword = \"x\"\n").expect("defaults");
    assert_eq!(config.server.port, 9922);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.router.host, "192.168.1.1");
    assert_eq!(config.router.port, 8001);
    assert!(config.router.https);
    assert_eq!(config.router.username, "admin");
    assert_eq!(config.cache.ttl_secs, 0);
}

#[test]
fn test_config_debug_redacts_password() {
    let config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    let debug = format!("{config:?}");
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_env_overrides() {
    let mut config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    config
        .apply_overrides(env(&[
            ("SRM_HOST", "router.lan"),
            ("SRM_PORT", "8443"),
            ("USE_HTTPS", "False"),
            ("SRM_USERNAME", "monitor"),
            ("SRM_PASSWORD", "s3cret"),
            ("DISABLE_HTTPS_VERIFY", "TRUE"),
            ("EXPORTER_CACHE_FOR", "15"),
            ("EXPORTER_PORT", "9100"),
        ]))
        .unwrap();
    assert_eq!(config.router.host, "router.lan");
    assert_eq!(config.router.port, 8443);
    assert!(!config.router.https);
    assert_eq!(config.router.username, "monitor");
    assert_eq!(config.router.password, "s3cret");
    assert!(!config.router.verify_tls);
    assert_eq!(config.cache.ttl_secs, 15);
    assert_eq!(config.server.port, 9100);
    config.validate().unwrap();
}

#[test]
fn test_env_override_rejects_bad_number() {
    let mut config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    let err = config
        .apply_overrides(env(&[("EXPORTER_CACHE_FOR", "soon")]))
        .unwrap_err();
    assert!(err.to_string().contains("EXPORTER_CACHE_FOR"));
}

#[test]
fn test_parse_bool_only_true_is_true() {
    assert!(parse_bool("true"));
    assert!(parse_bool(" True "));
    assert!(!parse_bool("1"));
    assert!(!parse_bool("yes"));
    assert!(!parse_bool(""));
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 9922", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_zero_workers() {
    let bad = VALID_CONFIG.replace("worker_threads = 2", "worker_threads = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("worker_threads"));
}

#[test]
fn test_config_validation_rejects_empty_password() {
    let bad = VALID_CONFIG.replace("password = \"hunter2\"", "password = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("router.password"));
}

#[test]
fn test_config_validation_rejects_empty_router_host() {
    let bad = VALID_CONFIG.replace("host = \"10.0.0.1\"", "host = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("router.host"));
}

#[test]
fn test_config_validation_rejects_zero_timeout() {
    let bad = VALID_CONFIG.replace("request_timeout_secs = 5", "request_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("request_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("srm.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    // SAFETY: only this test touches these variables
    unsafe {
        std::env::set_var("CONFIG_FILE", path.to_str().unwrap());
        std::env::remove_var("SRM_HOST");
        std::env::remove_var("EXPORTER_PORT");
        std::env::remove_var("EXPORTER_CACHE_FOR");
    }
    let config = AppConfig::load().unwrap();
    unsafe {
        std::env::remove_var("CONFIG_FILE");
    }
    assert_eq!(config.router.host, "10.0.0.1");
    assert_eq!(config.cache.ttl_secs, 30);
}

#[test]
fn test_config_validation_rejects_unbounded_cache_ttl() {
    let bad = VALID_CONFIG.replace("ttl_secs = 30", &format!("ttl_secs = {}", MAX_CACHE_TTL_SECS + 1));
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("cache.ttl_secs"));

    let ok = VALID_CONFIG.replace("ttl_secs = 30", &format!("ttl_secs = {MAX_CACHE_TTL_SECS}"));
    assert!(AppConfig::load_from_str(&ok).is_ok());
}

#[test]
fn test_env_cache_ttl_at_u64_max_fails_validation() {
    let mut config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    config
        .apply_overrides(env(&[("EXPORTER_CACHE_FOR", "18446744073709551615")]))
        .unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("cache.ttl_secs"));
}
