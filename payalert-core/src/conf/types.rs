use serde::{Deserialize, Serialize};

const REDACTED: &str = "<redacted>";

/// Fully resolved service configuration.
///
/// Every section is optional in the TOML file; missing values take the
/// defaults below and may then be overridden from the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mail: MailConfig,
    pub stripe: StripeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// e.g. "0.0.0.0:3000"
    pub listen: String,

    /// Worker thread override for the HTTP server.
    pub threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            threads: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailConfig {
    /// Sender address on every alert.
    pub from: String,

    /// Alert recipient. Falls back to `from` when unset.
    pub to: Option<String>,

    /// Mail delivery API endpoint accepting `{from, to, subject, html}`.
    pub api_url: String,

    pub api_key: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: "payalert@localhost".to_string(),
            to: None,
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: None,
        }
    }
}

impl MailConfig {
    pub fn recipient(&self) -> &str {
        self.to.as_deref().unwrap_or(&self.from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StripeConfig {
    pub api_base: String,
    pub secret_key: Option<String>,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.stripe.com".to_string(),
            secret_key: None,
        }
    }
}

impl AppConfig {
    /// Copy with credentials masked, safe to print or log.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.mail.api_key.is_some() {
            cfg.mail.api_key = Some(REDACTED.to_string());
        }
        if cfg.stripe.secret_key.is_some() {
            cfg.stripe.secret_key = Some(REDACTED.to_string());
        }
        cfg
    }
}
