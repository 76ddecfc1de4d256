//! # Configuration Tests
//!
//! Tests for configuration loading: defaults, file values, `${VAR}`
//! substitution, environment overrides and required-key validation.
//!
//! Environment variables are process-global, so every test here is `#[serial]`.

use serial_test::serial;
use std::{env, io::Write, path::PathBuf};
use tempfile::NamedTempFile;
use tenderlens_server::{
    config::{get_config, AppConfig, ConfigError, CONFIG_PATH_ENV},
    state::build_app_state,
};

const ENV_VARS: &[&str] = &[
    "XAI_API_KEY",
    "OPENAI_API_KEY",
    "PORT",
    "HOST",
    "PERSIST_DIRECTORY",
    "UPLOAD_DIR",
    "MAX_UPLOAD_BYTES",
    "TENDERLENS_LLM__MODEL",
    "TENDERLENS_LLM__TIMEOUT_SECS",
    "TENDERLENS_EMBEDDING__API_URL",
    "TEST_SUBSTITUTED_KEY",
    CONFIG_PATH_ENV,
];

/// Clears every variable `get_config` reads so each test starts clean.
fn clear_env_vars() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yml")
        .tempfile()
        .expect("temp config");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

/// Points the default lookup at a path that does not exist.
fn without_config_file() {
    env::set_var(CONFIG_PATH_ENV, "/nonexistent/tenderlens/config.yml");
}

#[test]
#[serial]
fn test_defaults_without_config_file() {
    clear_env_vars();
    without_config_file();

    let config = get_config(None).expect("defaults should load");

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8000);
    assert_eq!(config.persist_directory, PathBuf::from("./vector_db"));
    assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    assert_eq!(config.llm.api_url, "https://api.x.ai/v1/chat/completions");
    assert_eq!(config.llm.model, "grok-3");
    assert_eq!(config.llm.timeout_secs, 120);
    assert_eq!(config.embedding.api_url, "https://api.openai.com/v1/embeddings");
    assert_eq!(config.embedding.model_name, "text-embedding-ada-002");
    assert_eq!(config.embedding.timeout_secs, 30);
    assert!(config.xai_api_key.is_none());
    assert_eq!(config.upload_dir(), env::temp_dir());

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_keys_fail_validation() {
    clear_env_vars();
    without_config_file();

    let config = get_config(None).unwrap();
    assert!(matches!(
        config.require_keys(),
        Err(ConfigError::MissingApiKey("XAI_API_KEY"))
    ));

    env::set_var("XAI_API_KEY", "xai");
    let config = get_config(None).unwrap();
    assert!(matches!(
        config.require_keys(),
        Err(ConfigError::MissingApiKey("OPENAI_API_KEY"))
    ));

    env::set_var("OPENAI_API_KEY", "openai");
    let config = get_config(None).unwrap();
    assert_eq!(config.require_keys().unwrap(), ("xai", "openai"));

    clear_env_vars();
}

#[test]
fn test_blank_key_counts_as_missing() {
    let config = AppConfig {
        xai_api_key: Some("   ".to_string()),
        openai_api_key: Some("openai".to_string()),
        ..AppConfig::default()
    };
    assert!(matches!(
        config.require_keys(),
        Err(ConfigError::MissingApiKey("XAI_API_KEY"))
    ));
}

#[tokio::test]
#[serial]
async fn test_state_construction_fails_without_keys() {
    clear_env_vars();
    let persist = tempfile::tempdir().unwrap();
    let config = AppConfig {
        persist_directory: persist.path().join("db"),
        openai_api_key: Some("openai".to_string()),
        ..AppConfig::default()
    };

    let err = build_app_state(config).await.err().expect("must fail");
    assert!(err.to_string().contains("XAI_API_KEY"), "{err}");
    assert!(!persist.path().join("db").exists(), "no index should be opened");
}

#[test]
#[serial]
fn test_file_values_and_substitution() {
    clear_env_vars();
    env::set_var("TEST_SUBSTITUTED_KEY", "from-env");
    let file = write_config(
        r#"
port: 9100
xai_api_key: "${TEST_SUBSTITUTED_KEY}"
openai_api_key: "file-openai"
persist_directory: "/tmp/tenderlens-test-index"
llm:
  model: "grok-3-mini"
"#,
    );

    let config = get_config(file.path().to_str()).expect("file config should load");

    assert_eq!(config.port, 9100);
    assert_eq!(config.xai_api_key.as_deref(), Some("from-env"));
    assert_eq!(config.openai_api_key.as_deref(), Some("file-openai"));
    assert_eq!(
        config.persist_directory,
        PathBuf::from("/tmp/tenderlens-test-index")
    );
    assert_eq!(config.llm.model, "grok-3-mini");
    // Unset nested fields keep their defaults.
    assert_eq!(config.llm.timeout_secs, 120);

    clear_env_vars();
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env_vars();
    let file = write_config("port: 9100\nllm:\n  model: \"from-file\"\n");
    env::set_var("PORT", "9200");
    env::set_var("XAI_API_KEY", "env-xai");
    env::set_var("TENDERLENS_LLM__MODEL", "from-env");
    env::set_var("TENDERLENS_LLM__TIMEOUT_SECS", "7");
    env::set_var("TENDERLENS_EMBEDDING__API_URL", "http://localhost:9999/embed");

    let config = get_config(file.path().to_str()).unwrap();

    assert_eq!(config.port, 9200);
    assert_eq!(config.xai_api_key.as_deref(), Some("env-xai"));
    assert_eq!(config.llm.model, "from-env");
    assert_eq!(config.llm.timeout_secs, 7);
    assert_eq!(config.embedding.api_url, "http://localhost:9999/embed");

    clear_env_vars();
}

#[test]
#[serial]
fn test_config_path_from_environment() {
    clear_env_vars();
    let file = write_config("port: 9300\n");
    env::set_var(CONFIG_PATH_ENV, file.path());

    assert_eq!(get_config(None).unwrap().port, 9300);

    clear_env_vars();
}

#[test]
#[serial]
fn test_explicit_missing_file_is_an_error() {
    clear_env_vars();
    let err = get_config(Some("/nonexistent/config.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)), "{err}");
}
