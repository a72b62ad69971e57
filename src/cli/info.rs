use crate::{
    config::{self, Config},
    info,
    management::SessionManager,
    success, warning,
};

pub async fn info() {
    info!("Configuration file: {}", config::env_path().display());

    let config = match Config::from_env() {
        Ok(config) => {
            info!("API endpoint: {}", config.api_url);
            info!(
                "Authorization page: {}",
                config.auth_url.as_deref().unwrap_or("(not configured)")
            );
            info!("Default limit: {}", config.default_limit);
            if let Some(user) = &config.user {
                info!("Default user: {}", user);
            }
            Some(config)
        }
        Err(e) => {
            warning!("{}", e);
            None
        }
    };

    match SessionManager::load().await {
        Ok(mgr) => {
            let name = &mgr.current_session().name;
            success!(
                "Authenticated as {} (session cached at {})",
                if name.is_empty() { "unknown user" } else { name.as_str() },
                mgr.path().display()
            );
        }
        Err(_) if config.as_ref().is_some_and(|c| c.session_key.is_some()) => {
            info!("Using the session key from {}", config::SESSION_KEY);
        }
        Err(_) => warning!("Not authenticated. Run lfmcli auth."),
    }
}
