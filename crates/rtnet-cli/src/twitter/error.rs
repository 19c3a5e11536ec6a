use std::io;

/// Errors raised by the social API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// One or more of the four OAuth credentials is unset.
    #[error("missing API credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, TLS, connection).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body was not the JSON we expected.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid geocode {0:?}: expected LAT,LONG,RADIUS (e.g. 15.5,-88.03,20km)")]
    InvalidGeocode(String),
}

impl ApiError {
    /// Stable machine-readable code for JSON error output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => "credentials_missing",
            Self::Status { status: 401, .. } => "auth_failed",
            Self::Status { status: 429, .. } => "rate_limited",
            Self::Status { .. } => "http_status",
            Self::Transport { .. } => "network",
            Self::Decode { .. } => "bad_response",
            Self::InvalidGeocode(_) => "invalid_geocode",
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => {
                "set them under [api] in rtnet.toml or via RTNET_CONSUMER_KEY, \
                 RTNET_CONSUMER_SECRET, RTNET_ACCESS_TOKEN and RTNET_ACCESS_SECRET"
            }
            Self::Status { status: 401, .. } => "check that all four credentials belong to the same app",
            Self::Status { status: 429, .. } => "wait for the rate-limit window to reset",
            Self::Status { .. } | Self::Decode { .. } => "check [api] base_url in rtnet.toml",
            Self::Transport { .. } => "check network connectivity",
            Self::InvalidGeocode(_) => "pass --geocode as LAT,LONG,RADIUS with a mi or km radius",
        }
    }
}
