use crate::conf::types::AppConfig;
use crate::conf::ConfigError;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

/// Load configuration from an optional TOML file plus the process environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let mut cfg = match path {
        Some(path) => parse_file(path)?,
        None => AppConfig::default(),
    };

    //--------------------------------------------------------------------------
    // Environment overrides
    //--------------------------------------------------------------------------
    apply_env_overrides(&mut cfg, env)?;

    //--------------------------------------------------------------------------
    // Validation
    //--------------------------------------------------------------------------
    validate(&cfg)?;

    Ok(cfg)
}

fn parse_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::parse(path, e))
}

fn apply_env_overrides<F>(cfg: &mut AppConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Blank variables are treated as unset.
    let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(listen) = var("LISTEN_ADDR") {
        cfg.server.listen = listen;
    }

    if let Some(port) = var("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidPort {
            var: "PORT".to_string(),
            value: port.clone(),
        })?;
        let mut addr: SocketAddr =
            cfg.server
                .listen
                .parse()
                .map_err(|_| ConfigError::InvalidListen {
                    addr: cfg.server.listen.clone(),
                })?;
        addr.set_port(port);
        cfg.server.listen = addr.to_string();
    }

    if let Some(from) = var("EMAIL_FROM") {
        cfg.mail.from = from;
    }
    if let Some(to) = var("ALERT_EMAIL") {
        cfg.mail.to = Some(to);
    }
    if let Some(key) = var("MAIL_API_KEY") {
        cfg.mail.api_key = Some(key);
    }
    if let Some(url) = var("MAIL_API_URL") {
        cfg.mail.api_url = url;
    }
    if let Some(key) = var("STRIPE_SECRET_KEY") {
        cfg.stripe.secret_key = Some(key);
    }
    if let Some(base) = var("STRIPE_API_BASE") {
        cfg.stripe.api_base = base;
    }

    Ok(())
}

fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    if cfg.server.listen.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::InvalidListen {
            addr: cfg.server.listen.clone(),
        });
    }

    if cfg.server.threads == Some(0) {
        return Err(ConfigError::InvalidThreads);
    }

    if cfg.mail.from.trim().is_empty() {
        return Err(ConfigError::MissingSender);
    }

    Ok(())
}
