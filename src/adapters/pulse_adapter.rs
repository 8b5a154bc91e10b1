//! Market Pulse image download over HTTP.

use crate::adapters::http::{build_client, request_error};
use crate::domain::error::ScoutError;
use crate::domain::settings::HttpSettings;
use crate::ports::pulse_port::PulsePort;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

pub struct HttpPulseAdapter {
    client: Client,
}

impl HttpPulseAdapter {
    pub fn new(settings: &HttpSettings) -> Result<Self, ScoutError> {
        Ok(Self {
            client: build_client(settings)?,
        })
    }
}

impl PulsePort for HttpPulseAdapter {
    fn fetch_image(&self, url: &str) -> Result<Option<Vec<u8>>, ScoutError> {
        let response = self.client.get(url).send().map_err(|e| request_error(url, e))?;
        let status = response.status();
        debug!(url, %status, "pulse image request");
        if status != StatusCode::OK {
            return Ok(None);
        }
        let bytes = response.bytes().map_err(|e| request_error(url, e))?;
        Ok(Some(bytes.to_vec()))
    }
}
