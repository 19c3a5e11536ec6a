use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ApiError;

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct UserWire {
    pub screen_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusWire {
    #[serde(alias = "full_text")]
    pub text: String,
    #[serde(default)]
    pub user: Option<UserWire>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AccountWire {
    pub name: String,
    pub screen_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<StatusWire>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchWire {
    #[serde(default)]
    pub statuses: Vec<StatusWire>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub name: String,
    pub screen_name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Text of the account's most recent post.
    pub recent_post: Option<String>,
}

impl From<AccountWire> for Account {
    fn from(wire: AccountWire) -> Self {
        Self {
            name: wire.name,
            screen_name: wire.screen_name,
            location: wire.location,
            description: wire.description,
            recent_post: wire.status.map(|s| s.text),
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub handle: String,
    pub text: String,
}

impl From<StatusWire> for Post {
    fn from(wire: StatusWire) -> Self {
        Self {
            handle: wire.user.map(|u| u.screen_name).unwrap_or_default(),
            text: wire.text,
        }
    }
}

/// A circle on the map: `LAT,LONG,RADIUS` with a `km` or `mi` radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Geocode {
    pub lat: f64,
    pub long: f64,
    pub radius: String,
}

impl FromStr for Geocode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ApiError::InvalidGeocode(s.to_string());

        let mut parts = s.split(',').map(str::trim);
        let (Some(lat), Some(long), Some(radius), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let lat: f64 = lat.parse().map_err(|_| invalid())?;
        let long: f64 = long.parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&long) {
            return Err(invalid());
        }

        let distance = radius
            .strip_suffix("km")
            .or_else(|| radius.strip_suffix("mi"))
            .ok_or_else(invalid)?;
        if !distance.parse::<f64>().is_ok_and(|d| d > 0.0) {
            return Err(invalid());
        }

        Ok(Self {
            lat,
            long,
            radius: radius.to_string(),
        })
    }
}

impl fmt::Display for Geocode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.lat, self.long, self.radius)
    }
}

/// What to search for; at least one of the two is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub term: Option<String>,
    pub geocode: Option<Geocode>,
}

impl SearchQuery {
    /// Query-string parameters for `search/tweets.json`.
    pub fn params(&self, count: u32) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(term) = &self.term {
            params.push(("q", term.clone()));
        }
        if let Some(geocode) = &self.geocode {
            params.push(("geocode", geocode.to_string()));
        }
        params.push(("count", count.to_string()));
        params
    }
}
