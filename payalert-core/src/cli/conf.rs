use crate::conf::{ConfigError, load_config};
use serde::Serialize;
use std::path::PathBuf;

/// Print the resolved configuration with credentials masked.
pub fn dump(path: Option<PathBuf>) -> anyhow::Result<()> {
    let cfg = load_config(path.as_deref())?;
    dump_json(&cfg.redacted())
}

pub fn check(path: Option<PathBuf>) -> anyhow::Result<()> {
    match load_config(path.as_deref()) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            println!("✔ listen on {}", cfg.server.listen);
            println!("✔ alerts from {} to {}", cfg.mail.from, cfg.mail.recipient());

            if cfg.mail.api_key.is_none() {
                println!("⚠ MAIL_API_KEY is not set; alert emails will fail to send");
            }
            if cfg.stripe.secret_key.is_none() {
                println!("⚠ STRIPE_SECRET_KEY is not set; customer details will be omitted");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            if let Some(hint) = config_error_hint(&err) {
                eprintln!();
                eprintln!("{hint}");
            }
            std::process::exit(1);
        }
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::InvalidPort { .. } => Some("PORT must be a number between 0 and 65535."),

        ConfigError::InvalidListen { .. } => Some(
            "The listen address must be an IP and port.\n\
             \n\
             Example:\n\
             \n\
             [server]\n\
             listen = \"0.0.0.0:3000\"",
        ),

        ConfigError::MissingSender => Some(
            "Set a sender address with EMAIL_FROM or in the config file.\n\
             \n\
             Example:\n\
             \n\
             [mail]\n\
             from = \"alerts@example.com\"",
        ),

        ConfigError::InvalidThreads => Some("Remove server.threads or set it to 1 or more."),

        ConfigError::ReadFile { .. } | ConfigError::Parse { .. } => None,
    }
}

fn dump_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}
