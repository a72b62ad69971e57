//! Request assembly for the Last.fm API.
//!
//! Every call goes through [`RequestBuilder`], which merges the call's own
//! parameters with `method`, `api_key` and (when required) the session key,
//! signs the result and adds the response format.

use std::{collections::BTreeMap, fmt};

use crate::{
    error::{LastfmError, Result},
    lastfm::{session::SessionStore, signature::sign},
};

/// Response-format parameter. Sent with every request, never signed.
pub const FORMAT_KEY: &str = "format";
pub const SIGNATURE_KEY: &str = "api_sig";
pub const SESSION_KEY: &str = "sk";
pub const LIMIT_KEY: &str = "limit";

const RESPONSE_FORMAT: &str = "json";

/// A request that is ready to be sent.
///
/// Produced only by [`RequestBuilder`], so the signature always matches the
/// parameters it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: String,
    params: BTreeMap<String, String>,
    signature: String,
}

impl SignedRequest {
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Every parameter that is sent, except `api_sig`.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Query pairs in the order they go on the wire, `api_sig` last.
    ///
    /// # Example
    ///
    /// ```
    /// let query = request.query();
    /// assert_eq!(query.last().map(|(k, _)| k.as_str()), Some("api_sig"));
    /// ```
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        query.push((SIGNATURE_KEY.to_string(), self.signature.clone()));
        query
    }
}

/// Assembles signed requests for every Last.fm call.
///
/// Holds the API credentials and a handle on the [`SessionStore`], so any
/// number of callers can build requests concurrently. The shared secret is
/// left out of `Debug` output.
#[derive(Clone)]
pub struct RequestBuilder {
    api_key: String,
    api_secret: String,
    default_limit: u32,
    session: SessionStore,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("default_limit", &self.default_limit)
            .field("session", &self.session)
            .finish()
    }
}

impl RequestBuilder {
    /// Creates a builder for one API account.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Public API key, sent with every request
    /// * `api_secret` - Shared secret used only to compute `api_sig`
    /// * `default_limit` - Page size used when a paged call names none
    /// * `session` - Store the session key is read from on authenticated calls
    ///
    /// # Example
    ///
    /// ```
    /// let builder = RequestBuilder::new("KEY", "SECRET", 50, SessionStore::new());
    /// ```
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        default_limit: u32,
        session: SessionStore,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            default_limit,
            session,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Builds a signed request for `method`.
    ///
    /// `base_params` are merged with `method` and `api_key`, plus `sk` when
    /// `require_session` is set. Everything is signed, then `format=json` is
    /// added unsigned. A `format` or `api_sig` passed in `base_params` is
    /// discarded.
    ///
    /// # Arguments
    ///
    /// * `method` - Last.fm method name, e.g. `auth.getToken`
    /// * `base_params` - Call-specific parameters
    /// * `require_session` - Whether the call needs the stored session key
    ///
    /// # Errors
    ///
    /// - [`LastfmError::Argument`] when `method` is blank
    /// - [`LastfmError::Unauthenticated`] when a session is required but none
    ///   is stored. Nothing is signed in that case.
    ///
    /// # Example
    ///
    /// ```
    /// let request = builder
    ///     .build_signed_request("auth.getToken", BTreeMap::new(), false)
    ///     .await?;
    /// assert_eq!(request.get("format"), Some("json"));
    /// ```
    pub async fn build_signed_request(
        &self,
        method: &str,
        base_params: BTreeMap<String, String>,
        require_session: bool,
    ) -> Result<SignedRequest> {
        if method.trim().is_empty() {
            return Err(LastfmError::Argument("method cannot be empty".to_string()));
        }

        let mut params = base_params;
        params.remove(FORMAT_KEY);
        params.remove(SIGNATURE_KEY);
        params.insert("method".to_string(), method.to_string());
        params.insert("api_key".to_string(), self.api_key.clone());

        if require_session {
            let key = self
                .session
                .get()
                .await
                .ok_or(LastfmError::Unauthenticated)?;
            params.insert(SESSION_KEY.to_string(), key.as_str().to_string());
        }

        let signature = sign(&params, &self.api_secret);
        params.insert(FORMAT_KEY.to_string(), RESPONSE_FORMAT.to_string());

        Ok(SignedRequest {
            method: method.to_string(),
            params,
            signature,
        })
    }

    /// Like [`build_signed_request`](Self::build_signed_request) for methods
    /// that take a `limit`.
    ///
    /// Without an explicit limit the default given to [`new`](Self::new) is
    /// used. Either way `limit` is part of the signature.
    ///
    /// # Errors
    ///
    /// [`LastfmError::Argument`] for a limit of zero, plus everything
    /// [`build_signed_request`](Self::build_signed_request) can return.
    pub async fn build_paged_request(
        &self,
        method: &str,
        base_params: BTreeMap<String, String>,
        limit: Option<u32>,
        require_session: bool,
    ) -> Result<SignedRequest> {
        let limit = limit.unwrap_or(self.default_limit);
        if limit == 0 {
            return Err(LastfmError::Argument(
                "limit must be at least 1".to_string(),
            ));
        }

        let mut params = base_params;
        params.insert(LIMIT_KEY.to_string(), limit.to_string());
        self.build_signed_request(method, params, require_session)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionKey;

    fn builder(session: SessionStore) -> RequestBuilder {
        RequestBuilder::new("AK", "AS", 50, session)
    }

    #[tokio::test]
    async fn test_format_is_sent_but_not_signed() {
        let request = builder(SessionStore::new())
            .build_signed_request("auth.getToken", BTreeMap::new(), false)
            .await
            .unwrap();

        assert_eq!(request.get(FORMAT_KEY), Some("json"));
        // md5("api_keyAKmethodauth.getTokenAS")
        assert_eq!(request.signature(), "906c3919dba6512ae1f3173670989c16");
    }

    #[tokio::test]
    async fn test_caller_supplied_format_and_sig_are_replaced() {
        let base = BTreeMap::from([
            (FORMAT_KEY.to_string(), "xml".to_string()),
            (SIGNATURE_KEY.to_string(), "forged".to_string()),
        ]);
        let request = builder(SessionStore::new())
            .build_signed_request("auth.getToken", base, false)
            .await
            .unwrap();

        assert_eq!(request.get(FORMAT_KEY), Some("json"));
        assert_eq!(request.get(SIGNATURE_KEY), None);
        assert_eq!(request.signature(), "906c3919dba6512ae1f3173670989c16");
    }

    #[tokio::test]
    async fn test_session_required_but_missing() {
        let err = builder(SessionStore::new())
            .build_signed_request("user.getrecenttracks", BTreeMap::new(), true)
            .await
            .unwrap_err();
        assert_eq!(err, LastfmError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_session_key_is_signed() {
        let store = SessionStore::with_key(SessionKey::new("SESS1").unwrap());
        let request = builder(store)
            .build_signed_request("user.getrecenttracks", BTreeMap::new(), true)
            .await
            .unwrap();

        assert_eq!(request.get(SESSION_KEY), Some("SESS1"));
        let mut signed = request.params().clone();
        signed.remove(FORMAT_KEY);
        assert_eq!(request.signature(), sign(&signed, "AS"));
    }

    #[tokio::test]
    async fn test_paged_request_uses_default_limit() {
        let request = builder(SessionStore::new())
            .build_paged_request("user.getlovedtracks", BTreeMap::new(), None, false)
            .await
            .unwrap();
        assert_eq!(request.get(LIMIT_KEY), Some("50"));

        let request = builder(SessionStore::new())
            .build_paged_request("user.getlovedtracks", BTreeMap::new(), Some(7), false)
            .await
            .unwrap();
        assert_eq!(request.get(LIMIT_KEY), Some("7"));
    }

    #[tokio::test]
    async fn test_zero_limit_is_rejected() {
        let err = builder(SessionStore::new())
            .build_paged_request("user.getlovedtracks", BTreeMap::new(), Some(0), false)
            .await
            .unwrap_err();
        assert!(matches!(err, LastfmError::Argument(_)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let out = format!("{:?}", RequestBuilder::new("AK", "s3cr3t", 50, SessionStore::new()));
        assert!(out.contains("AK"));
        assert!(!out.contains("s3cr3t"));
    }

    #[tokio::test]
    async fn test_query_puts_signature_last() {
        let request = builder(SessionStore::new())
            .build_signed_request("auth.getToken", BTreeMap::new(), false)
            .await
            .unwrap();
        let query = request.query();
        let (last_key, last_value) = query.last().unwrap();
        assert_eq!(last_key, SIGNATURE_KEY);
        assert_eq!(last_value, request.signature());
    }
}
