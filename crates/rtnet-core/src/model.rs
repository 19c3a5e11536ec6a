//! Node and edge records for the retweet graph.
//!
//! Attributes come straight from spreadsheet cells, so every field is
//! optional: a handle that is only ever seen as a retweet *source* has no
//! profile data at all.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Author
// ---------------------------------------------------------------------------

/// A Twitter handle in the retweet graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Unique handle, without the leading `@`.
    pub handle: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form profile location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Influence score exported alongside the tweet (Klout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub influence: Option<f64>,
    /// Gender label as exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl Author {
    /// Create an author with no profile attributes.
    #[must_use]
    pub fn bare(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            ..Self::default()
        }
    }

    /// Overwrite profile attributes with `profile`'s (last write wins).
    ///
    /// The handle is left untouched.
    pub fn apply_profile(&mut self, profile: &AuthorProfile) {
        self.name.clone_from(&profile.name);
        self.location.clone_from(&profile.location);
        self.influence = profile.influence;
        self.gender.clone_from(&profile.gender);
    }

    /// Return `true` if no profile attribute has been recorded.
    #[must_use]
    pub const fn is_bare(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.influence.is_none()
            && self.gender.is_none()
    }
}

/// Profile attributes read from one spreadsheet row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorProfile {
    pub name: Option<String>,
    pub location: Option<String>,
    pub influence: Option<f64>,
    pub gender: Option<String>,
}

// ---------------------------------------------------------------------------
// Retweet
// ---------------------------------------------------------------------------

/// A retweet relation `source → author`.
///
/// When the same pair retweets more than once the edge keeps only the
/// last-seen occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retweet {
    /// Date cell as exported (format is not normalized).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Full text of the retweet, including the `RT @source:` prefix.
    pub content: String,
}
