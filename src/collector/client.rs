//! Kafka Connect REST 클라이언트
//!
//! Connection pooling과 타임아웃을 지원하는 비동기 HTTP 클라이언트입니다.
//! Only the two read-only status endpoints are used.

use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::parser::{parse_connectors, parse_status, ConnectorStatus};
use crate::error::{CollectResult, CollectorError};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Kafka Connect REST client
#[derive(Clone)]
pub struct ConnectClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ConnectClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `base_url` - Kafka Connect REST URL (예: "http://localhost:8083")
    /// * `timeout` - Timeout applied to every request
    ///
    /// # Example
    /// ```ignore
    /// let url = Url::parse("http://localhost:8083")?;
    /// let client = ConnectClient::new(&url, DEFAULT_TIMEOUT)?;
    /// ```
    pub fn new(base_url: &Url, timeout: Duration) -> CollectResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(CollectorError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = ClientBuilder::new()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(CollectorError::HttpClientInit)?;

        Ok(Self {
            client,
            base_url: base_url.clone(),
            timeout,
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>`, percent-encoding every segment
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base() was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// List connector names, in the order the server returns them
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_connectors(&self) -> CollectResult<Vec<String>> {
        let url = self.endpoint(&["connectors"]);
        debug!(url = %url, "Fetching connector list");

        let body = self.get(url).await?;
        parse_connectors(&body)
    }

    /// Fetch the status document of one connector
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_connector_status(&self, name: &str) -> CollectResult<ConnectorStatus> {
        if !is_path_segment_safe(name) {
            return Err(CollectorError::InvalidConnectorName(name.to_string()));
        }

        let url = self.endpoint(&["connectors", name, "status"]);
        debug!(url = %url, "Fetching connector status");

        let body = self.get(url).await?;
        parse_status(&body)
    }

    /// GET `url` and read the whole body.
    ///
    /// The response is either read to the end or dropped before returning,
    /// which hands the connection back to the pool (or closes it) on every path.
    async fn get(&self, url: Url) -> CollectResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = check_status(response)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        Ok(body.to_vec())
    }

    fn map_transport_error(&self, err: reqwest::Error) -> CollectorError {
        if err.is_timeout() {
            CollectorError::timeout_with_duration(self.timeout.as_millis() as u64)
        } else {
            CollectorError::from(err)
        }
    }
}

/// Empty names and the dot segments `.` / `..` can't be addressed as a single
/// path segment: URL parsing collapses dot segments, encoded (`%2E`) or not.
fn is_path_segment_safe(name: &str) -> bool {
    !matches!(name, "" | "." | "..")
}

fn check_status(response: Response) -> CollectResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(CollectorError::UnexpectedStatus {
        status: status.as_u16(),
        url: response.url().to_string(),
    })
}
