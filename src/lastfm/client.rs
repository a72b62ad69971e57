use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::{
    config::Config,
    error::{LastfmError, Result},
    lastfm::{
        auth::{AuthorizationWaiter, Handshake},
        request::{RequestBuilder, SignedRequest},
        session::SessionStore,
        tracks::{TrackCollection, parse_tracks},
        transport::{ReqwestTransport, Transport, ensure_success},
    },
    types::{Session, Track},
};

/// Entry point for talking to Last.fm.
///
/// Owns the transport and a [`RequestBuilder`]; the [`SessionStore`] inside
/// is shared with every clone handed out by [`session_store`](Self::session_store).
pub struct LastfmClient<T = ReqwestTransport> {
    api_url: String,
    auth_url: Option<String>,
    builder: RequestBuilder,
    transport: T,
}

impl LastfmClient<ReqwestTransport> {
    /// Client using reqwest with the configured timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config.http_timeout)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> LastfmClient<T> {
    /// Client over any [`Transport`], starting without a session.
    ///
    /// # Example
    ///
    /// ```
    /// let client = LastfmClient::new(&config, MockTransport::default());
    /// assert!(!client.session_store().is_authenticated().await);
    /// ```
    pub fn new(config: &Config, transport: T) -> Self {
        Self::with_session(config, transport, SessionStore::new())
    }

    /// Client sharing an existing [`SessionStore`], e.g. one seeded with a
    /// cached or preset session key.
    pub fn with_session(config: &Config, transport: T, session: SessionStore) -> Self {
        Self {
            api_url: config.api_url.clone(),
            auth_url: config.auth_url.clone(),
            builder: RequestBuilder::new(
                config.api_key.clone(),
                config.api_secret.clone(),
                config.default_limit,
                session,
            ),
            transport,
        }
    }

    pub fn session_store(&self) -> &SessionStore {
        self.builder.session()
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn auth_url(&self) -> Option<&str> {
        self.auth_url.as_deref()
    }

    /// Starts a new handshake. Use this to drive the steps one at a time.
    pub fn handshake(&self) -> Handshake<'_, T> {
        Handshake::new(self)
    }

    /// Runs the full desktop handshake and stores the resulting session key.
    ///
    /// # Arguments
    ///
    /// * `waiter` - Receives the authorization URL and returns once the user
    ///   has approved access (or with an error if they gave up)
    ///
    /// # Errors
    ///
    /// Any error from [`Handshake::run`]. The session store is only written
    /// when the whole flow succeeds.
    ///
    /// # Example
    ///
    /// ```
    /// let session = client.authenticate(&ConsoleWaiter).await?;
    /// println!("Signed in as {}", session.name);
    /// ```
    pub async fn authenticate<W>(&self, waiter: &W) -> Result<Session>
    where
        W: AuthorizationWaiter + ?Sized,
    {
        self.handshake().run(waiter).await
    }

    /// Fetches the user's most recent scrobbles via `user.getrecenttracks`.
    ///
    /// A track that is playing right now comes first, with `now_playing` set
    /// and no `played_at`. See [`fetch_tracks`](Self::fetch_tracks) for the
    /// arguments and errors.
    pub async fn fetch_recent_tracks(
        &self,
        username: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Track>> {
        self.fetch_tracks(TrackCollection::Recent, username, limit)
            .await
    }

    /// Fetches the user's loved tracks via `user.getlovedtracks`.
    pub async fn fetch_loved_tracks(&self, username: &str, limit: Option<u32>) -> Result<Vec<Track>> {
        self.fetch_tracks(TrackCollection::Loved, username, limit)
            .await
    }

    /// Fetches one of the user track listings. Requires a session.
    ///
    /// # Arguments
    ///
    /// * `collection` - Which listing to fetch
    /// * `username` - Last.fm user whose tracks to list
    /// * `limit` - Maximum number of tracks, defaulting to the configured limit
    ///
    /// # Errors
    ///
    /// - [`LastfmError::Argument`] for a blank username or a zero limit
    /// - [`LastfmError::Unauthenticated`] when no session key is stored, in
    ///   which case no request is sent
    /// - [`LastfmError::Transport`] or [`LastfmError::Status`] on network or
    ///   HTTP failure
    /// - [`LastfmError::Protocol`] or [`LastfmError::Api`] for a malformed
    ///   body or a Last.fm error envelope
    ///
    /// An absent or empty listing is not an error; it yields an empty vec.
    ///
    /// # Example
    ///
    /// ```
    /// let loved = client
    ///     .fetch_tracks(TrackCollection::Loved, "alice", Some(10))
    ///     .await?;
    /// for track in loved {
    ///     println!("{} - {}", track.artist, track.name);
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn fetch_tracks(
        &self,
        collection: TrackCollection,
        username: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Track>> {
        if username.trim().is_empty() {
            return Err(LastfmError::Argument("username cannot be empty".to_string()));
        }

        let params = BTreeMap::from([("user".to_string(), username.to_string())]);
        let request = self
            .builder
            .build_paged_request(collection.method(), params, limit, true)
            .await?;

        let body = self.send(&request).await?;
        let tracks = parse_tracks(&body, collection.envelope_key())?;
        debug!(count = tracks.len(), "Fetched {}", collection.label());
        Ok(tracks)
    }

    pub(crate) async fn send(&self, request: &SignedRequest) -> Result<Vec<u8>> {
        debug!(method = request.method(), "Sending Last.fm request");
        let response = self.transport.get(&self.api_url, &request.query()).await?;
        ensure_success(response)
    }
}
