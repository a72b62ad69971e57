use crate::{
    error::LastfmError,
    types::{Session, SessionKey, Track, TrackTableRow},
};

pub fn format_played_at(track: &Track) -> String {
    if track.now_playing {
        return "now playing".to_string();
    }
    match track.played_at {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

pub fn track_table_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .map(|t| TrackTableRow {
            date: format_played_at(t),
            track: t.name.clone(),
            artist: t.artist.clone(),
            album: t.album.clone(),
        })
        .collect()
}

/// Picks the user whose tracks to fetch: the explicit argument, then the
/// configured default, then whoever approved the cached session.
pub fn resolve_username(
    explicit: Option<String>,
    configured: Option<&str>,
    session: Option<&Session>,
) -> Result<String, LastfmError> {
    explicit
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .or_else(|| configured.map(str::to_string))
        .or_else(|| {
            session
                .map(|s| s.name.clone())
                .filter(|name| !name.is_empty())
        })
        .ok_or_else(|| {
            LastfmError::Argument(
                "no username given. Pass --user or set LASTFM_USER".to_string(),
            )
        })
}

/// Session key to start with: a cached session wins over a preset key.
pub fn initial_session_key(cached: Option<&Session>, preset: Option<&str>) -> Option<SessionKey> {
    cached
        .map(|s| s.key.clone())
        .or_else(|| preset.and_then(|k| SessionKey::new(k).ok()))
}
