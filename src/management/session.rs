use std::path::PathBuf;

use crate::types::Session;

/// Keeps the Last.fm session between runs.
///
/// Session keys do not expire, so the key obtained by `lfmcli auth` is written
/// to the local data directory and reused until the user authenticates again.
pub struct SessionManager {
    session: Session,
    path: PathBuf,
}

impl SessionManager {
    pub fn new(session: Session) -> Self {
        Self::with_path(session, Self::session_path())
    }

    pub fn with_path(session: Session, path: PathBuf) -> Self {
        SessionManager { session, path }
    }

    pub async fn load() -> Result<Self, String> {
        Self::load_from(Self::session_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self, String> {
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let session: Session = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { session, path })
    }

    pub async fn persist(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.session).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    pub fn current_session(&self) -> &Session {
        &self.session
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn session_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("lfmcli/cache/session.json");
        path
    }
}
