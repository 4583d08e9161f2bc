//! [`Backend`] over HTTP.
//!
//! Requests go to `{api_url}/poll/...`. Path segments are percent-encoded,
//! so poll ids and option keys may contain any character.


use pollsync::errors::NetworkError;
use pollsync::errors::PollError;
use pollsync::errors::Rejected;
use pollsync::Backend;
use pollsync::Config;
use pollsync::NewPoll;
use pollsync::PollSnapshot;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::Url;
use tracing::debug;
use tracing::warn;

/// A client of the HTTP poll service.
///
/// Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_url: Url,
}

impl HttpBackend {
    /// Build a client for `config.api_url`, with `config.request_timeout` as
    /// the timeout of every request.
    pub fn new(config: &Config) -> Result<Self, NetworkError> {
        let api_url = Url::parse(&config.api_url).map_err(|e| NetworkError::new(&e))?;

        if api_url.cannot_be_a_base() {
            return Err(NetworkError::from_message(format!(
                "api_url can not be a base: {}",
                config.api_url
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| NetworkError::new(&e))?;

        Ok(Self { client, api_url })
    }

    /// `{api_url}/poll/{segments...}`, every segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();

        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.push("poll");
            path.extend(segments);
        }

        url
    }

    /// Send a request and decode the poll snapshot in the response.
    async fn send(&self, req: RequestBuilder) -> Result<PollSnapshot, PollError> {
        let resp = req.send().await.map_err(|e| NetworkError::new(&e))?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| NetworkError::new(&e))?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!("poll service rejected: {}: {}", status, message);
            return Err(Rejected::new(status.as_u16(), message).into());
        }

        let snapshot = PollSnapshot::from_json(&body)?;
        debug!("received snapshot: {}", snapshot);
        Ok(snapshot)
    }
}

/// Extract the error text from a response body.
///
/// The poll service answers errors with `{"detail": "..."}`; anything else
/// is returned as is.
fn error_message(body: &[u8]) -> String {
    if let Ok(serde_json::Value::Object(m)) = serde_json::from_slice(body) {
        if let Some(serde_json::Value::String(detail)) = m.get("detail") {
            return detail.clone();
        }
    }
    String::from_utf8_lossy(body).to_string()
}

impl Backend for HttpBackend {
    async fn latest(&mut self) -> Result<PollSnapshot, PollError> {
        let url = self.endpoint(&["latest"]);
        debug!("GET {}", url);

        self.send(self.client.get(url)).await
    }

    async fn vote(
        &mut self,
        poll_id: &str,
        option_key: &str,
    ) -> Result<PollSnapshot, PollError> {
        let url = self.endpoint(&["vote", poll_id, option_key]);
        debug!("POST {}", url);

        self.send(self.client.post(url)).await
    }

    async fn create(
        &mut self,
        poll: &NewPoll,
    ) -> Result<PollSnapshot, PollError> {
        let url = self.endpoint(&["create"]);
        debug!("POST {}: {:?}", url, poll);

        self.send(self.client.post(url).json(poll)).await
    }
}
