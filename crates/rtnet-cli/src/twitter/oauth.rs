//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Signing is done by `oauth1-request`; this module only maps the `[api]`
//! credentials onto its token type and hands it the query parameters. The
//! URL passed in must not carry a query string: the parameters are signed
//! separately and appended by the caller with [`encode`].

use std::fmt;

use oauth1_request as oauth;
use oauth1_request::request::ParameterList;
use rtnet_core::config::ApiConfig;

use super::ApiError;

/// The four strings that identify an app and the account it acts for.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Take credentials from the `[api]` section (environment already applied).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredentials`] naming every unset field.
    pub fn from_config(api: &ApiConfig) -> Result<Self, ApiError> {
        let missing = api.missing_credentials();
        if !missing.is_empty() {
            return Err(ApiError::MissingCredentials(missing));
        }
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        Ok(Self {
            consumer_key: field(&api.consumer_key),
            consumer_secret: field(&api.consumer_secret),
            access_token: field(&api.access_token),
            access_secret: field(&api.access_secret),
        })
    }

    fn token(&self) -> oauth::Token<&str, &str> {
        oauth::Token::from_parts(
            self.consumer_key.as_str(),
            self.consumer_secret.as_str(),
            self.access_token.as_str(),
            self.access_secret.as_str(),
        )
    }
}

/// RFC 3986 percent-encoding, the same one the signature uses.
pub fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// `Authorization` header value for a GET of `url` with `query`.
///
/// A fresh nonce and timestamp are drawn for every call.
pub fn authorization_header(
    credentials: &Credentials,
    url: &str,
    query: &[(&str, String)],
) -> String {
    let mut params: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    params.sort_unstable();
    let request = ParameterList::new(params);
    oauth::get(url, &request, &credentials.token(), oauth::HMAC_SHA1)
}
