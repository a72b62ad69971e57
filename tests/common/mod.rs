#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use lfmcli::{
    config::{self, Config},
    error::LastfmError,
    lastfm::{HttpResponse, Transport},
};

pub const AUTH_URL: &str = "https://www.last.fm/api/auth/";
pub const API_URL: &str = "https://api.example/";

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl Call {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.query.iter().map(|(k, _)| k.as_str()).collect();
        keys.sort();
        keys
    }
}

/// In-memory transport that replays queued responses in order and records
/// every call.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, LastfmError>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, error: LastfmError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, LastfmError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            query: query.to_vec(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LastfmError::Transport("no response queued".to_string())))
    }
}

pub fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = [
        (config::API_KEY, "AK"),
        (config::API_SECRET, "AS"),
        (config::API_URL, API_URL),
        (config::AUTH_URL, AUTH_URL),
        (config::DEFAULT_LIMIT, "50"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (k, v) in pairs {
        map.insert(k.to_string(), v.to_string());
    }
    map
}

pub fn test_config() -> Config {
    Config::from_source(&settings(&[])).unwrap()
}
