//! Run settings resolved from the config file and the environment.
//!
//! Precedence, highest first: CLI flags (applied by the caller), environment
//! (`IBD_USERNAME`, `IBD_PASSWORD`), config file, built-in defaults.

use crate::domain::error::ScoutError;
use crate::domain::session::Credentials;
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_USERNAME: &str = "IBD_USERNAME";
pub const ENV_PASSWORD: &str = "IBD_PASSWORD";

const DEFAULT_TIMEOUT_SECS: i64 = 30;
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Yahoo,
    Csv,
}

impl FromStr for PriceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Ok(PriceSource::Yahoo),
            "csv" => Ok(PriceSource::Csv),
            other => Err(format!("unknown price source '{}', expected yahoo or csv", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub stocks_dir: PathBuf,
    pub lists_dir: PathBuf,
    pub pulse_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub credentials: Option<Credentials>,
    pub http: HttpSettings,
    pub output: OutputSettings,
    pub price_source: PriceSource,
    pub csv_dir: Option<PathBuf>,
}

impl Settings {
    /// Builds settings from `config`, letting `env` override credentials.
    pub fn resolve(
        config: &dyn ConfigPort,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ScoutError> {
        let username = env(ENV_USERNAME).or_else(|| config.get_string("ibd", "username"));
        let password = env(ENV_PASSWORD).or_else(|| config.get_string("ibd", "password"));
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        let timeout_secs = config.get_int("http", "timeout_secs", DEFAULT_TIMEOUT_SECS);
        if timeout_secs <= 0 {
            return Err(invalid("http", "timeout_secs", "timeout_secs must be positive"));
        }
        let http = HttpSettings {
            timeout: Duration::from_secs(timeout_secs.unsigned_abs()),
            user_agent: config
                .get_string("http", "user_agent")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        };

        let dir = |key: &str, default: &str| {
            PathBuf::from(config.get_string("output", key).unwrap_or_else(|| default.to_string()))
        };
        let output = OutputSettings {
            stocks_dir: dir("stocks_dir", "stocks"),
            lists_dir: dir("lists_dir", "lists"),
            pulse_dir: dir("pulse_dir", "pulse"),
        };

        let price_source = match config.get_string("prices", "source") {
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| invalid("prices", "source", &reason))?,
            None => PriceSource::Yahoo,
        };
        let csv_dir = config.get_string("prices", "csv_dir").map(PathBuf::from);

        Ok(Self {
            credentials,
            http,
            output,
            price_source,
            csv_dir,
        })
    }

    pub fn require_credentials(&self) -> Result<&Credentials, ScoutError> {
        self.credentials
            .as_ref()
            .ok_or_else(|| ScoutError::ConfigMissing {
                section: "ibd".to_string(),
                key: format!("username/password (or {} / {})", ENV_USERNAME, ENV_PASSWORD),
            })
    }

    pub fn require_csv_dir(&self) -> Result<&PathBuf, ScoutError> {
        self.csv_dir.as_ref().ok_or_else(|| ScoutError::ConfigMissing {
            section: "prices".to_string(),
            key: "csv_dir".to_string(),
        })
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> ScoutError {
    ScoutError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
