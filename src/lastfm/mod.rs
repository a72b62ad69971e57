//! # Last.fm Integration Module
//!
//! This module is the integration layer between lfmcli and the Last.fm web
//! API. It implements request signing, the desktop authentication handshake
//! and the user track listings.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Management)
//!          ↓
//! LastfmClient
//!     ├── Handshake (auth.getToken → user approval → auth.getSession)
//!     ├── RequestBuilder (parameters, session key, api_sig)
//!     └── Track parsing (recenttracks / lovedtracks envelopes)
//!          ↓
//! Transport (reqwest by default)
//!          ↓
//! Last.fm API
//! ```
//!
//! ## Signing
//!
//! Every request carries an `api_sig`: the MD5 of all parameters sorted by
//! name and concatenated as `<name><value>`, followed by the shared secret.
//! The `format` parameter is sent but never signed. See [`signature::sign`].
//!
//! ## Authentication Flow
//!
//! 1. **Request Token**: `auth.getToken` returns an unapproved token
//! 2. **Authorization URL**: the user opens `<auth url>?api_key=..&token=..`
//! 3. **User Approval**: happens in the browser, outside this process
//! 4. **Session Exchange**: `auth.getSession` turns the approved token into a
//!    session key, which lands in the [`session::SessionStore`]
//!
//! The wait in step 3 is up to the caller: either call the
//! [`auth::Handshake`] steps individually or pass an
//! [`auth::AuthorizationWaiter`] to [`client::LastfmClient::authenticate`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = LastfmClient::from_config(&config)?;
//! client.authenticate(&waiter).await?;
//! let tracks = client.fetch_recent_tracks("alice", None).await?;
//! ```
//!
//! ## Error Handling
//!
//! Nothing here retries. Every failure surfaces as a
//! [`crate::error::LastfmError`] whose kind tells configuration, network and
//! protocol problems apart.

pub mod auth;
pub mod client;
mod envelope;
pub mod request;
pub mod session;
pub mod signature;
pub mod tracks;
pub mod transport;

pub use auth::{AuthState, AuthorizationWaiter, Handshake, HandshakeStep};
pub use client::LastfmClient;
pub use request::{RequestBuilder, SignedRequest};
pub use session::SessionStore;
pub use tracks::{TrackCollection, parse_tracks};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
