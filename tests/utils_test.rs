use chrono::DateTime;
use lfmcli::{
    types::{Session, SessionKey, Track},
    utils::{format_played_at, initial_session_key, resolve_username, track_table_rows},
};

fn session(name: &str) -> Session {
    Session {
        key: SessionKey::new("CACHED").unwrap(),
        name: name.to_string(),
    }
}

#[test]
fn test_format_played_at() {
    let played = Track {
        played_at: DateTime::from_timestamp(1_700_000_000, 0),
        ..Default::default()
    };
    assert_eq!(format_played_at(&played), "2023-11-14 22:13");

    let playing = Track {
        now_playing: true,
        ..Default::default()
    };
    assert_eq!(format_played_at(&playing), "now playing");

    assert_eq!(format_played_at(&Track::default()), "-");
}

#[test]
fn test_track_table_rows() {
    let tracks = vec![Track {
        name: "Airbag".to_string(),
        artist: "Radiohead".to_string(),
        album: "OK Computer".to_string(),
        now_playing: true,
        ..Default::default()
    }];

    let rows = track_table_rows(&tracks);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "now playing");
    assert_eq!(rows[0].track, "Airbag");
    assert_eq!(rows[0].artist, "Radiohead");
    assert_eq!(rows[0].album, "OK Computer");
}

#[test]
fn test_resolve_username_precedence() {
    let cached = session("carol");

    let user = resolve_username(Some("alice".to_string()), Some("bob"), Some(&cached));
    assert_eq!(user.unwrap(), "alice");

    let user = resolve_username(Some("  ".to_string()), Some("bob"), Some(&cached));
    assert_eq!(user.unwrap(), "bob");

    let user = resolve_username(None, None, Some(&cached));
    assert_eq!(user.unwrap(), "carol");

    assert!(resolve_username(None, None, Some(&session(""))).is_err());
    assert!(resolve_username(None, None, None).is_err());
}

#[test]
fn test_initial_session_key_precedence() {
    let cached = session("carol");

    let key = initial_session_key(Some(&cached), Some("PRESET")).unwrap();
    assert_eq!(key.as_str(), "CACHED");

    let key = initial_session_key(None, Some("PRESET")).unwrap();
    assert_eq!(key.as_str(), "PRESET");

    assert!(initial_session_key(None, Some("")).is_none());
    assert!(initial_session_key(None, None).is_none());
}
