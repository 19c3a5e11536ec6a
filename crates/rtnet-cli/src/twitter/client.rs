use std::time::Duration;

use rtnet_core::config::ApiConfig;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::oauth::{self, Credentials};
use super::types::{AccountWire, SearchWire};
use super::{Account, ApiError, Post, SearchQuery};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the read-only endpoints we use.
#[derive(Debug)]
pub struct TwitterClient {
    agent: ureq::Agent,
    base_url: String,
    credentials: Credentials,
}

impl TwitterClient {
    /// Build a client from the `[api]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredentials`] if any credential is unset.
    pub fn from_config(api: &ApiConfig) -> Result<Self, ApiError> {
        let credentials = Credentials::from_config(api)?;
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("rtnet/", env!("CARGO_PKG_VERSION")))
            .build();
        Ok(Self {
            agent,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// `GET account/verify_credentials.json`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub fn verify_credentials(&self) -> Result<Account, ApiError> {
        let wire: AccountWire = self.get_json("account/verify_credentials.json", &[])?;
        Ok(Account::from(wire))
    }

    /// `GET search/tweets.json`, hits in the order the server returns them.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub fn search(&self, query: &SearchQuery, count: u32) -> Result<Vec<Post>, ApiError> {
        let wire: SearchWire = self.get_json("search/tweets.json", &query.params(count))?;
        Ok(wire.statuses.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self, query), fields(params = query.len()))]
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{path}", self.base_url);
        let header = oauth::authorization_header(&self.credentials, &url, query);

        // Encode the query ourselves so the wire bytes match what was signed.
        let full_url = if query.is_empty() {
            url.clone()
        } else {
            let qs = query
                .iter()
                .map(|(k, v)| format!("{}={}", oauth::encode(k), oauth::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            format!("{url}?{qs}")
        };

        debug!(url = %url, "GET");
        let response = self
            .agent
            .get(&full_url)
            .set("Authorization", &header)
            .set("Accept", "application/json")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => ApiError::Status {
                    url: url.clone(),
                    status,
                    body: response.into_string().unwrap_or_default(),
                },
                ureq::Error::Transport(transport) => ApiError::Transport {
                    url: url.clone(),
                    message: transport.to_string(),
                },
            })?;

        response
            .into_json::<T>()
            .map_err(|source| ApiError::Decode { url, source })
    }
}
