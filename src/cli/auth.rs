use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    cli::{build_client, load_config},
    error,
    error::LastfmError,
    info,
    lastfm::AuthorizationWaiter,
    management::SessionManager,
    success, warning,
};

/// Opens the authorization page and waits for the user to press Enter.
struct ConsoleWaiter;

#[async_trait]
impl AuthorizationWaiter for ConsoleWaiter {
    async fn wait_for_user(&self, authorization_url: &str) -> Result<(), LastfmError> {
        if webbrowser::open(authorization_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                authorization_url
            );
        } else {
            info!("Opened the Last.fm authorization page in your browser.");
        }
        info!("Approve access for lfmcli, then press Enter to continue...");

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());

        tokio::select! {
            read = reader.read_line(&mut line) => match read {
                Ok(0) => Err(LastfmError::Cancelled(
                    "input closed before confirmation".to_string(),
                )),
                Ok(_) => Ok(()),
                Err(e) => Err(LastfmError::Cancelled(e.to_string())),
            },
            _ = tokio::signal::ctrl_c() => {
                Err(LastfmError::Cancelled("interrupted".to_string()))
            }
        }
    }
}

pub async fn auth() {
    let config = load_config();
    let client = build_client(&config, None).await;

    match client.authenticate(&ConsoleWaiter).await {
        Ok(session) => {
            let session_mgr = SessionManager::new(session.clone());
            if let Err(e) = session_mgr.persist().await {
                error!("Failed to save session to cache: {}", e);
            }

            if session.name.is_empty() {
                success!("Authentication successful!");
            } else {
                success!("Authentication successful! Signed in as {}.", session.name);
            }
        }
        Err(e) => error!("Authentication failed ({} error): {}", e.kind(), e),
    }
}
