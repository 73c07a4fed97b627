use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, VaxError};

/// Anything that can hand back a JSON document for a URL.
pub trait JsonSource {
    fn get_json(&self, url: &str) -> Result<Value>;
}

#[derive(Clone)]
pub struct HttpSource {
    http: Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| VaxError::Network {
                url: String::new(),
                source,
            })?;
        Ok(Self { http })
    }
}

impl JsonSource for HttpSource {
    fn get_json(&self, url: &str) -> Result<Value> {
        let network = |source: reqwest::Error| VaxError::Network {
            url: url.to_string(),
            source,
        };

        debug!(url, "source.get");
        let resp = self.http.get(url).send().map_err(network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(VaxError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        resp.json().map_err(network)
    }
}
