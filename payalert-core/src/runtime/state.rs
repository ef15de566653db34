use crate::conf::AppConfig;
use crate::event::EventRouter;
use crate::notify::{
    Addresses, CustomerDirectory, HttpMailer, Mailer, Notifier, StripeCustomerDirectory,
};
use crate::store::{FailureStore, LogStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Process-lifetime state shared by every request handler.
///
/// Built once at startup and torn down at exit; nothing here is persisted.
pub struct AppState {
    pub logs: Arc<LogStore>,
    pub failures: Arc<FailureStore>,
    pub notifier: Arc<Notifier>,
    pub router: EventRouter,
    pub mailer: Arc<dyn Mailer>,
    started_at: Instant,
}

impl AppState {
    pub fn new(
        addresses: Addresses,
        mailer: Arc<dyn Mailer>,
        customers: Arc<dyn CustomerDirectory>,
    ) -> Self {
        let logs = Arc::new(LogStore::new());
        let failures = Arc::new(FailureStore::new());
        let notifier = Arc::new(Notifier::new(
            mailer.clone(),
            customers,
            logs.clone(),
            addresses,
        ));
        let router = EventRouter::new(logs.clone(), failures.clone(), notifier.clone());

        Self {
            logs,
            failures,
            notifier,
            router,
            mailer,
            started_at: Instant::now(),
        }
    }

    /// Wire the production collaborators from configuration.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let mailer = HttpMailer::new(&cfg.mail).context("failed to build mail client")?;
        let customers = StripeCustomerDirectory::new(&cfg.stripe)
            .context("failed to build payment provider client")?;

        if cfg.mail.api_key.is_none() {
            tracing::warn!("MAIL_API_KEY is not set; alert emails will fail to send");
        }
        if cfg.stripe.secret_key.is_none() {
            tracing::warn!("STRIPE_SECRET_KEY is not set; customer details will be omitted");
        }

        Ok(Self::new(
            Addresses::from_config(&cfg.mail),
            Arc::new(mailer),
            Arc::new(customers),
        ))
    }

    pub fn addresses(&self) -> &Addresses {
        self.notifier.addresses()
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
