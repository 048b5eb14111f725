use std::io::Write;
use std::time::Duration;

use assert_matches::assert_matches;

use webin_sample_client::config::{
    Config, ConfigLoader, ConfigOverrides, Credentials, RetryConfig,
};
use webin_sample_client::domain::Environment;
use webin_sample_client::error::WebinError;

#[test]
fn resolve_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "test": true,
            "username": "Webin-42",
            "password": "hunter2",
            "timeout_secs": 5,
            "retry": {{ "max_attempts": 2 }}
        }}"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let resolved = ConfigLoader::resolve(Some(path), ConfigOverrides::default()).unwrap();

    assert_eq!(resolved.environment, Environment::Test);
    assert_eq!(
        resolved.base_uri,
        "https://wwwdev.ebi.ac.uk/ena/submit/drop-box/"
    );
    assert_eq!(
        resolved.credentials,
        Some(Credentials {
            username: "Webin-42".to_string(),
            password: "hunter2".to_string(),
        })
    );
    assert_eq!(resolved.timeout, Duration::from_secs(5));
    assert_eq!(resolved.retry.max_attempts(), 2);
    assert_eq!(resolved.retry.base_delay(), Duration::from_millis(200));
}

#[test]
fn overrides_take_precedence() {
    let config = Config {
        username: Some("Webin-1".to_string()),
        password: Some("from-file".to_string()),
        base_uri: Some("http://localhost:8080/drop-box/".to_string()),
        retry: Some(RetryConfig {
            max_attempts: None,
            base_delay_ms: Some(0),
        }),
        ..Config::default()
    };
    let overrides = ConfigOverrides {
        test: true,
        username: None,
        password: Some("from-env".to_string()),
    };

    let resolved = ConfigLoader::resolve_config(config, overrides).unwrap();
    assert_eq!(resolved.environment, Environment::Test);
    assert_eq!(resolved.base_uri, "http://localhost:8080/drop-box/");
    let credentials = resolved.credentials.unwrap();
    assert_eq!(credentials.username, "Webin-1");
    assert_eq!(credentials.password, "from-env");
    assert_eq!(resolved.retry.max_attempts(), 4);
    assert_eq!(resolved.retry.base_delay(), Duration::ZERO);
}

#[test]
fn partial_credentials_are_dropped() {
    let config = Config {
        username: Some("Webin-1".to_string()),
        ..Config::default()
    };
    let resolved = ConfigLoader::resolve_config(config, ConfigOverrides::default()).unwrap();
    assert_eq!(resolved.credentials, None);
}

#[test]
fn invalid_base_uri() {
    let config = Config {
        base_uri: Some("not a uri".to_string()),
        ..Config::default()
    };
    let err = ConfigLoader::resolve_config(config, ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, WebinError::InvalidBaseUri(_));
}

#[test]
fn explicit_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err =
        ConfigLoader::resolve(path.to_str(), ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, WebinError::MissingConfig(_));
}

#[test]
fn malformed_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ \"test\": \"yes\" }}").unwrap();
    let err = ConfigLoader::resolve(file.path().to_str(), ConfigOverrides::default())
        .unwrap_err();
    assert_matches!(err, WebinError::ConfigParse(_));
}
