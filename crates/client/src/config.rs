use std::time::Duration;

/// How `delete_entity` removes records on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// `DELETE /{entity}/{id}/hard`: the row is gone.
    Hard,
    /// `DELETE /{entity}/{id}`: the backend deactivates the row.
    Soft,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Remote store client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API root, without trailing slash.
    pub base_url: String,
    /// Bearer token forwarded on every request, if any. Issuing and
    /// refreshing it is the host application's job.
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    pub delete_mode: DeleteMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delete_mode: DeleteMode::Hard,
        }
    }
}

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `API_BASE_URL`         | `http://localhost:8000/api/v1` |
    /// | `API_TOKEN`            | unset                          |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                           |
    /// | `DELETE_MODE`          | `hard` (`hard` or `soft`)      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading variables through
    /// `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("API_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let api_token = lookup("API_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid {
                    var: "REQUEST_TIMEOUT_SECS",
                    expected: "a number of seconds",
                    value: raw,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let delete_mode = match lookup("DELETE_MODE").as_deref().map(str::trim) {
            None | Some("hard") => DeleteMode::Hard,
            Some("soft") => DeleteMode::Soft,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "DELETE_MODE",
                    expected: "'hard' or 'soft'",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            base_url,
            api_token,
            request_timeout: Duration::from_secs(request_timeout_secs),
            delete_mode,
        })
    }
}
