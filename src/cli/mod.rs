//! # CLI Module
//!
//! This module provides the command-line interface layer for lfmcli. It
//! implements all user-facing commands and coordinates between the Last.fm
//! client, session persistence and user interaction.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - Runs the Last.fm desktop handshake and caches the session
//!
//! ### Track Listings
//!
//! - [`recent`] - Shows the user's recently scrobbled tracks
//! - [`loved`] - Shows the user's loved tracks
//!
//! ### Information Commands
//!
//! - [`info`] - Shows configuration and session status
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Management Layer (Session Persistence)
//!     ↓
//! Last.fm Layer (Signing, Handshake, Parsing)
//!     ↓
//! Network Layer (HTTP Requests)
//! ```
//!
//! ## Session Resolution
//!
//! Commands that need a session use, in order: the session cached by
//! `lfmcli auth`, then `LASTFM_SESSION_KEY`. Without either the library
//! refuses to send the request and the user is told to authenticate.
//!
//! ## Usage Patterns
//!
//! ```bash
//! lfmcli auth                         # Approve access in the browser
//! lfmcli recent --user alice          # Last 50 scrobbles
//! lfmcli loved --limit 10 --json      # Loved tracks as JSON
//! lfmcli info                         # Check configuration
//! ```

mod auth;
mod info;
mod tracks;

pub use auth::auth;
pub use info::info;
pub use tracks::loved;
pub use tracks::recent;

use crate::{
    config::Config,
    error,
    lastfm::LastfmClient,
    types::Session,
    utils,
};

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}\nAdd it to {}", e, crate::config::env_path().display()),
    }
}

async fn build_client(config: &Config, cached: Option<&Session>) -> LastfmClient {
    let client = match LastfmClient::from_config(config) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Last.fm client. Err: {}", e),
    };

    if let Some(key) = utils::initial_session_key(cached, config.session_key.as_deref()) {
        client.session_store().set(key).await;
    }
    client
}
