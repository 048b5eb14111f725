use std::fs;
use std::time::Duration;

use camino::Utf8PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::Environment;
use crate::error::WebinError;
use crate::retry::RetryPolicy;

pub const CONFIG_FILE_NAME: &str = "webin-sample.json";
pub const USERNAME_ENV: &str = "WEBIN_USERNAME";
pub const PASSWORD_ENV: &str = "WEBIN_PASSWORD";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub test: bool,
    #[serde(default)]
    pub base_uri: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default)]
    pub max_attempts: Option<usize>,
    #[serde(default)]
    pub base_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub environment: Environment,
    pub base_uri: String,
    pub credentials: Option<Credentials>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub test: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConfigOverrides {
    /// Credentials from `WEBIN_USERNAME` / `WEBIN_PASSWORD`. Blank values are
    /// ignored, anything else is passed through untouched.
    pub fn from_env(test: bool) -> Self {
        Self {
            test,
            username: non_blank_env(USERNAME_ENV),
            password: non_blank_env(PASSWORD_ENV),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, WebinError> {
        let config = match path {
            Some(path) => Self::load(Utf8PathBuf::from(path))?,
            None => match Self::default_locations().into_iter().find(|p| p.exists()) {
                Some(found) => Self::load(found)?,
                None => Config::default(),
            },
        };
        Self::resolve_config(config, overrides)
    }

    pub fn load(path: Utf8PathBuf) -> Result<Config, WebinError> {
        if !path.exists() {
            return Err(WebinError::MissingConfig(path.into_std_path_buf()));
        }
        let content = fs::read_to_string(&path)
            .map_err(|_| WebinError::ConfigRead(path.clone().into_std_path_buf()))?;
        serde_json::from_str(&content).map_err(|err| WebinError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(
        config: Config,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, WebinError> {
        let environment = if config.test || overrides.test {
            Environment::Test
        } else {
            Environment::Production
        };

        let base_uri = config
            .base_uri
            .map(|uri| uri.trim().to_string())
            .filter(|uri| !uri.is_empty())
            .unwrap_or_else(|| environment.default_base_uri().to_string());
        reqwest::Url::parse(&base_uri)
            .map_err(|err| WebinError::InvalidBaseUri(format!("{base_uri}: {err}")))?;

        let username = overrides.username.or(config.username);
        let password = overrides.password.or(config.password);
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        let defaults = RetryPolicy::default();
        let retry = match config.retry {
            Some(retry) => RetryPolicy::new(
                retry.max_attempts.unwrap_or(defaults.max_attempts()),
                retry
                    .base_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.base_delay()),
            ),
            None => defaults,
        };

        Ok(ResolvedConfig {
            environment,
            base_uri,
            credentials,
            timeout: Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            retry,
        })
    }

    fn default_locations() -> Vec<Utf8PathBuf> {
        let mut locations = vec![Utf8PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = ProjectDirs::from("uk.ac", "EBI", "webin-sample")
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok())
        {
            locations.push(dir.join(CONFIG_FILE_NAME));
        }
        locations
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    non_blank(std::env::var(key).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_production_defaults() {
        let resolved =
            ConfigLoader::resolve_config(Config::default(), ConfigOverrides::default()).unwrap();
        assert_eq!(resolved.environment, Environment::Production);
        assert_eq!(
            resolved.base_uri,
            "https://www.ebi.ac.uk/ena/submit/drop-box/"
        );
        assert_eq!(resolved.credentials, None);
        assert_eq!(resolved.retry, RetryPolicy::default());
        assert_eq!(resolved.timeout, Duration::from_secs(30));
    }

    #[test]
    fn non_blank_keeps_surrounding_whitespace() {
        assert_eq!(
            non_blank(Some("  pass word ".to_string())).as_deref(),
            Some("  pass word ")
        );
        assert_eq!(non_blank(Some(" \t ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
