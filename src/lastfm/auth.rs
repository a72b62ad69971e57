//! Last.fm desktop authentication.
//!
//! The flow has three steps, with the user acting in the middle one:
//!
//! 1. `auth.getToken` issues an unapproved request token
//! 2. The user opens the authorization page and approves the token
//! 3. `auth.getSession` exchanges the approved token for a session key
//!
//! [`Handshake`] tracks where a run is in that flow through [`AuthState`].
//! Once a session key is obtained it is stored in the client's
//! [`SessionStore`](crate::lastfm::SessionStore) and never expires.

use std::{collections::BTreeMap, fmt};

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::{
    error::{LastfmError, Result},
    lastfm::{
        client::LastfmClient,
        envelope::{self, text},
        transport::Transport,
    },
    types::{Session, SessionKey},
};

const GET_TOKEN: &str = "auth.getToken";
const GET_SESSION: &str = "auth.getSession";

/// The step a handshake failed at, as recorded in [`AuthState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStep {
    RequestToken,
    AuthorizationUrl,
    UserAuthorization,
    SessionExchange,
}

impl fmt::Display for HandshakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandshakeStep::RequestToken => "request token",
            HandshakeStep::AuthorizationUrl => "authorization url",
            HandshakeStep::UserAuthorization => "user authorization",
            HandshakeStep::SessionExchange => "session exchange",
        };
        f.write_str(name)
    }
}

/// Progress of a single [`Handshake`].
///
/// States only move forward:
///
/// ```text
/// Unauthenticated → TokenObtained → AwaitingUserAuthorization → SessionObtained
///        └──────────────┴──────────────────┴──────→ Failed { step, error }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    TokenObtained {
        token: String,
    },
    /// The authorization URL has been handed out; waiting on the user.
    AwaitingUserAuthorization {
        token: String,
        url: String,
    },
    SessionObtained {
        session: Session,
    },
    Failed {
        step: HandshakeStep,
        error: LastfmError,
    },
}

impl AuthState {
    /// True once the handshake can make no further progress.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AuthState::SessionObtained { .. } | AuthState::Failed { .. }
        )
    }
}

/// Decides how to wait while the user approves access in a browser.
///
/// The handshake calls [`wait_for_user`](Self::wait_for_user) between the
/// authorization URL and the session exchange. Returning an error aborts the
/// handshake without touching the session store.
#[async_trait]
pub trait AuthorizationWaiter: Send + Sync {
    async fn wait_for_user(&self, authorization_url: &str) -> Result<()>;
}

/// Builds the page URL where the user approves `token` for `api_key`.
///
/// Both values are percent-encoded and appended to `auth_url` as
/// `?api_key=<key>&token=<token>`.
///
/// # Arguments
///
/// * `auth_url` - Base authorization page, e.g. `https://www.last.fm/api/auth/`
/// * `api_key` - Public API key of the application
/// * `token` - Request token obtained from `auth.getToken`
///
/// # Errors
///
/// - [`LastfmError::Argument`] when `token` is blank
/// - [`LastfmError::Configuration`] when `auth_url` is missing or blank
///
/// # Example
///
/// ```
/// let url = authorization_url(Some("https://www.last.fm/api/auth/"), "KEY", "TOK")?;
/// assert_eq!(url, "https://www.last.fm/api/auth/?api_key=KEY&token=TOK");
/// ```
pub fn authorization_url(auth_url: Option<&str>, api_key: &str, token: &str) -> Result<String> {
    if token.trim().is_empty() {
        return Err(LastfmError::Argument("token cannot be empty".to_string()));
    }
    let auth_url = auth_url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            LastfmError::Configuration("authorization URL is not configured".to_string())
        })?;

    Ok(format!(
        "{auth_url}?api_key={api_key}&token={token}",
        auth_url = auth_url,
        api_key = urlencoding::encode(api_key),
        token = urlencoding::encode(token),
    ))
}

/// One run of the desktop authentication flow.
///
/// Steps are called in order: [`request_token`](Self::request_token),
/// [`authorization_url`](Self::authorization_url), then, once the user has
/// approved access, [`complete`](Self::complete). Control returns to the
/// caller between steps, so the wait for the user can happen anywhere.
/// [`run`](Self::run) strings all of it together.
///
/// The session store is written only when the final step succeeds.
pub struct Handshake<'a, T: Transport> {
    client: &'a LastfmClient<T>,
    state: AuthState,
}

impl<'a, T: Transport> Handshake<'a, T> {
    pub(crate) fn new(client: &'a LastfmClient<T>) -> Self {
        Self {
            client,
            state: AuthState::Unauthenticated,
        }
    }

    /// Where this run currently stands.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Step A: asks Last.fm for a fresh request token via `auth.getToken`.
    ///
    /// The request is signed but carries no session key. On success the
    /// state moves to [`AuthState::TokenObtained`].
    ///
    /// # Errors
    ///
    /// - [`LastfmError::Argument`] when the handshake has already started
    /// - [`LastfmError::Transport`] or [`LastfmError::Status`] when the call
    ///   fails on the wire
    /// - [`LastfmError::Protocol`] or [`LastfmError::Api`] when the response
    ///   is not JSON, carries a Last.fm error or has no `token`
    ///
    /// Every error except the first one moves the state to
    /// [`AuthState::Failed`] with [`HandshakeStep::RequestToken`].
    ///
    /// # Example
    ///
    /// ```
    /// let mut handshake = client.handshake();
    /// let token = handshake.request_token().await?;
    /// ```
    #[instrument(skip(self))]
    pub async fn request_token(&mut self) -> Result<String> {
        if !matches!(self.state, AuthState::Unauthenticated) {
            return Err(self.out_of_order(HandshakeStep::RequestToken));
        }

        let result = self.fetch_token().await;
        match result {
            Ok(token) => {
                debug!("Obtained request token");
                self.state = AuthState::TokenObtained {
                    token: token.clone(),
                };
                Ok(token)
            }
            Err(e) => Err(self.fail(HandshakeStep::RequestToken, e)),
        }
    }

    /// Step B: returns the page where the user approves the request token.
    ///
    /// Makes no network call. Calling it again while waiting on the user
    /// returns the same URL.
    ///
    /// # Errors
    ///
    /// - [`LastfmError::Argument`] when no token has been obtained yet
    /// - [`LastfmError::Configuration`] when no authorization page is
    ///   configured, which also fails the handshake at
    ///   [`HandshakeStep::AuthorizationUrl`]
    ///
    /// # Example
    ///
    /// ```
    /// handshake.request_token().await?;
    /// let url = handshake.authorization_url()?;
    /// println!("Open {} and approve access", url);
    /// ```
    pub fn authorization_url(&mut self) -> Result<String> {
        let token = match &self.state {
            AuthState::TokenObtained { token } => token.clone(),
            AuthState::AwaitingUserAuthorization { url, .. } => return Ok(url.clone()),
            _ => return Err(self.out_of_order(HandshakeStep::AuthorizationUrl)),
        };

        let api_key = self.client.request_builder().api_key();
        match authorization_url(self.client.auth_url(), api_key, &token) {
            Ok(url) => {
                self.state = AuthState::AwaitingUserAuthorization {
                    token,
                    url: url.clone(),
                };
                Ok(url)
            }
            Err(e) => Err(self.fail(HandshakeStep::AuthorizationUrl, e)),
        }
    }

    /// Step C: exchanges the approved token for a session key via
    /// `auth.getSession` and stores it.
    ///
    /// Only call this once the user has approved access. Any key already in
    /// the store is replaced on success and left alone on failure.
    ///
    /// # Errors
    ///
    /// - [`LastfmError::Argument`] when the authorization URL step has not
    ///   run yet
    /// - [`LastfmError::Status`] when Last.fm refuses the token (commonly
    ///   because it was never approved)
    /// - [`LastfmError::Protocol`] when the response has no `session.key`
    ///
    /// # Example
    ///
    /// ```
    /// let session = handshake.complete().await?;
    /// println!("Signed in as {}", session.name);
    /// ```
    #[instrument(skip(self))]
    pub async fn complete(&mut self) -> Result<Session> {
        let token = match &self.state {
            AuthState::AwaitingUserAuthorization { token, .. } => token.clone(),
            _ => return Err(self.out_of_order(HandshakeStep::SessionExchange)),
        };

        let result = self.fetch_session(&token).await;
        match result {
            Ok(session) => {
                self.client.session_store().set(session.key.clone()).await;
                debug!(user = %session.name, "Session obtained");
                self.state = AuthState::SessionObtained {
                    session: session.clone(),
                };
                Ok(session)
            }
            Err(e) => Err(self.fail(HandshakeStep::SessionExchange, e)),
        }
    }

    /// Runs the whole flow, handing the authorization URL to `waiter` and
    /// exchanging the token once it returns.
    ///
    /// # Arguments
    ///
    /// * `waiter` - Decides how to wait for the user. An error from it fails
    ///   the handshake at [`HandshakeStep::UserAuthorization`] and skips the
    ///   session exchange.
    ///
    /// # Errors
    ///
    /// Whatever the individual steps or the waiter return.
    pub async fn run<W>(&mut self, waiter: &W) -> Result<Session>
    where
        W: AuthorizationWaiter + ?Sized,
    {
        self.request_token().await?;
        let url = self.authorization_url()?;

        if let Err(e) = waiter.wait_for_user(&url).await {
            return Err(self.fail(HandshakeStep::UserAuthorization, e));
        }

        self.complete().await
    }

    async fn fetch_token(&self) -> Result<String> {
        let request = self
            .client
            .request_builder()
            .build_signed_request(GET_TOKEN, BTreeMap::new(), false)
            .await?;
        let body = self.client.send(&request).await?;
        let json = envelope::decode(&body)?;

        let token = text(json.get("token"));
        if token.trim().is_empty() {
            return Err(LastfmError::protocol(
                "auth.getToken response",
                "missing token field",
            ));
        }
        Ok(token)
    }

    async fn fetch_session(&self, token: &str) -> Result<Session> {
        let params = BTreeMap::from([("token".to_string(), token.to_string())]);
        let request = self
            .client
            .request_builder()
            .build_signed_request(GET_SESSION, params, false)
            .await?;
        let body = self.client.send(&request).await?;
        let json = envelope::decode(&body)?;

        let session = json.get("session");
        let key = SessionKey::new(text(session.and_then(|s| s.get("key")))).map_err(|_| {
            LastfmError::protocol("auth.getSession response", "missing session.key field")
        })?;

        Ok(Session {
            key,
            name: text(session.and_then(|s| s.get("name"))),
        })
    }

    fn fail(&mut self, step: HandshakeStep, error: LastfmError) -> LastfmError {
        warn!(%step, %error, "Authentication handshake failed");
        self.state = AuthState::Failed {
            step,
            error: error.clone(),
        };
        error
    }

    fn out_of_order(&self, step: HandshakeStep) -> LastfmError {
        LastfmError::Argument(format!(
            "cannot run the {} step from state {:?}",
            step, self.state
        ))
    }
}
