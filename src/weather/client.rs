/// Ambient Weather REST API access
use log::debug;
use std::time::Duration;
use url::Url;

use crate::config::Credentials;
use crate::error::PollError;

/// Application key identifying this bridge to the Ambient Weather API.
pub const APPLICATION_KEY: &str = "5644719c27144e3a9b0341238344c7a4bf11a7c5023f4b4cbc1538b834b80037";

/// Something that can fetch the raw body of a device-data request.
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    async fn fetch(&self, url: &Url) -> Result<String, PollError>;
}

/// Build `<endpoint>/v1/devices/<mac>?apiKey=..&applicationKey=..&limit=1`.
pub fn device_data_url(endpoint: &Url, credentials: &Credentials) -> Url {
    let mut url = endpoint.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["v1", "devices", credentials.mac_address.as_str()]);
    }
    url.query_pairs_mut()
        .clear()
        .append_pair("apiKey", &credentials.api_key)
        .append_pair("applicationKey", APPLICATION_KEY)
        .append_pair("limit", "1");
    url
}

/// Copy of `url` safe to log: the API key is masked.
pub fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apiKey" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

/// Fetches readings over HTTP with reqwest.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, PollError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ambient-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl WeatherSource for HttpSource {
    async fn fetch(&self, url: &Url) -> Result<String, PollError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::HttpStatus(status));
        }

        let body = response.text().await?;
        debug!("Received {} bytes from weather service", body.len());
        Ok(body)
    }
}
