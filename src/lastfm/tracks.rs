use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    error::Result,
    lastfm::envelope::{self, text},
    types::Track,
};

/// Track listings offered by the user API, each with its own method name and
/// response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackCollection {
    Recent,
    Loved,
}

impl TrackCollection {
    pub fn method(&self) -> &'static str {
        match self {
            TrackCollection::Recent => "user.getrecenttracks",
            TrackCollection::Loved => "user.getlovedtracks",
        }
    }

    /// Top-level key wrapping the `track` array in the response.
    pub fn envelope_key(&self) -> &'static str {
        match self {
            TrackCollection::Recent => "recenttracks",
            TrackCollection::Loved => "lovedtracks",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackCollection::Recent => "recent tracks",
            TrackCollection::Loved => "loved tracks",
        }
    }
}

/// Extracts the tracks under `<collection>.track` from a response body.
///
/// Missing fields become empty strings and a missing collection yields an
/// empty list. Only a body that is not JSON (or is a Last.fm error envelope)
/// is an error.
pub fn parse_tracks(body: &[u8], collection: &str) -> Result<Vec<Track>> {
    let root = envelope::decode(body)?;

    let tracks = match root.get(collection).and_then(|c| c.get("track")) {
        Some(Value::Array(items)) => items.iter().map(parse_track).collect(),
        // Last.fm collapses a single result into a bare object.
        Some(item @ Value::Object(_)) => vec![parse_track(item)],
        _ => Vec::new(),
    };

    Ok(tracks)
}

fn parse_track(node: &Value) -> Track {
    Track {
        name: text(node.get("name")),
        artist: nested_text(node.get("artist")),
        album: nested_text(node.get("album")),
        mbid: text(node.get("mbid")),
        played_at: played_at(node),
        now_playing: node
            .get("@attr")
            .and_then(|a| a.get("nowplaying"))
            .and_then(Value::as_str)
            == Some("true"),
    }
}

/// Artist and album are `{"#text": ..}` objects in recent tracks, but
/// `{"name": ..}` objects in loved tracks.
fn nested_text(node: Option<&Value>) -> String {
    match node {
        Some(Value::String(s)) => s.clone(),
        Some(obj @ Value::Object(_)) => obj
            .get("#text")
            .or_else(|| obj.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn played_at(node: &Value) -> Option<DateTime<Utc>> {
    let uts = node.get("date")?.get("uts")?;
    let secs = match uts {
        Value::String(s) => s.parse::<i64>().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0)
}
