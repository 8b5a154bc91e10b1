//! Shared blocking HTTP client construction.

use crate::domain::error::ScoutError;
use crate::domain::settings::HttpSettings;
use reqwest::blocking::{Client, Response};

pub fn build_client(settings: &HttpSettings) -> Result<Client, ScoutError> {
    Client::builder()
        .timeout(settings.timeout)
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|e| ScoutError::Http {
            reason: format!("failed to build HTTP client: {}", e),
        })
}

pub fn request_error(url: &str, err: reqwest::Error) -> ScoutError {
    ScoutError::Http {
        reason: format!("{}: {}", url, err),
    }
}

/// Fails with `Http` unless the response status is 2xx.
pub fn ensure_success(url: &str, response: Response) -> Result<Response, ScoutError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ScoutError::Http {
            reason: format!("HTTP {} for {}", status, url),
        })
    }
}

pub fn read_text(url: &str, response: Response) -> Result<String, ScoutError> {
    ensure_success(url, response)?
        .text()
        .map_err(|e| request_error(url, e))
}
