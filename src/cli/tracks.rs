use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    cli::{build_client, load_config},
    error,
    error::LastfmError,
    lastfm::TrackCollection,
    management::SessionManager,
    success, utils, warning,
};

pub async fn recent(user: Option<String>, limit: Option<u32>, json: bool) {
    list_tracks(TrackCollection::Recent, user, limit, json).await
}

pub async fn loved(user: Option<String>, limit: Option<u32>, json: bool) {
    list_tracks(TrackCollection::Loved, user, limit, json).await
}

async fn list_tracks(
    collection: TrackCollection,
    user: Option<String>,
    limit: Option<u32>,
    json: bool,
) {
    let config = load_config();
    let cached = SessionManager::load().await.ok();
    let cached_session = cached.as_ref().map(|mgr| mgr.current_session());

    let username = match utils::resolve_username(user, config.user.as_deref(), cached_session) {
        Ok(username) => username,
        Err(e) => error!("{}", e),
    };

    let client = build_client(&config, cached_session).await;

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Fetching {} for {}...", collection.label(), username));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = client.fetch_tracks(collection, &username, limit).await;
    pb.finish_and_clear();

    let tracks = match result {
        Ok(tracks) => tracks,
        Err(LastfmError::Unauthenticated) => {
            error!("Not authenticated. Please run lfmcli auth")
        }
        Err(e) => error!(
            "Failed to fetch {} ({} error): {}",
            collection.label(),
            e.kind(),
            e
        ),
    };

    if json {
        match serde_json::to_string_pretty(&tracks) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot serialize tracks. Err: {}", e),
        }
        return;
    }

    if tracks.is_empty() {
        warning!("No {} found for {}.", collection.label(), username);
        return;
    }

    let table = Table::new(utils::track_table_rows(&tracks));
    println!("{}", table);
    success!("Fetched {} {} for {}.", tracks.len(), collection.label(), username);
}
