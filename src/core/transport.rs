use crate::core::errors::{Error, Result};
use log::info;

/*-------------------------------------------------------------------------------------------------
  Transport
-------------------------------------------------------------------------------------------------*/

/// Retrieves the body of a resource. Implementations report network failures and non-success
/// responses as [Error::Fetch].
pub trait Transport {
    fn get(&self, url: &str) -> Result<String>;
}

/*--------------------------------------------------------------------------------------
  HTTP Transport
--------------------------------------------------------------------------------------*/

/// Blocking HTTP(S) transport. Timeouts are the `reqwest` defaults; there are no retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| Error::Config(format!("Failed to build HTTP client: {error}")))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        info!("Making request to {url}");

        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|error| Error::Fetch {
                url: url.to_string(),
                reason: error.to_string(),
            })
    }
}
