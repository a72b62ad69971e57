use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::LastfmError;

/// Opaque session credential issued by `auth.getSession`.
///
/// Never blank. `Debug` output is redacted so the key does not end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Result<Self, LastfmError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(LastfmError::Argument(
                "session key cannot be empty".to_string(),
            ));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

impl TryFrom<String> for SessionKey {
    type Error = LastfmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SessionKey::new(value)
    }
}

impl From<SessionKey> for String {
    fn from(key: SessionKey) -> Self {
        key.0
    }
}

/// Result of a completed handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub key: SessionKey,
    /// Last.fm username that approved access. Empty when the service omits it.
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub mbid: String,
    pub played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub now_playing: bool,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub date: String,
    pub track: String,
    pub artist: String,
    pub album: String,
}
