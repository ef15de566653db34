use crate::api::ApiHandler;
use crate::conf::AppConfig;
use crate::runtime::AppState;
use crate::server::AlertGateway;
use anyhow::{Error, Result, anyhow};
use pingora::prelude::*;
use pingora::server::Server;
use pingora::server::configuration::ServerConf;
use serde_json::json;
use std::sync::Arc;

/// Run the Pingora server with the given configuration.
pub fn run(config: AppConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);

    let server = build_pingora_server(&config, state.clone())?;

    state.logs.info(
        "Payment failure notifier started",
        Some(json!({
            "listen": config.server.listen,
            "recipient": state.addresses().recipient,
        })),
    );

    // run_forever blocks the main thread as intended
    server.run_forever();
}

/// Build the Pingora server around already-constructed state.
pub fn build_pingora_server(config: &AppConfig, state: Arc<AppState>) -> Result<Server, Error> {
    let mut server = if let Some(threads) = config.server.threads {
        tracing::debug!(
            threads,
            "Creating Pingora server with overridden worker threads"
        );
        let mut conf =
            ServerConf::new().ok_or_else(|| anyhow!("could not construct server configuration"))?;
        conf.threads = threads;
        Server::new_with_opt_and_conf(None, conf)
    } else {
        // "None" is required here to truly tell Pingora to use its default settings.
        Server::new(None)?
    };

    server.bootstrap();

    let gateway = AlertGateway::new(ApiHandler::new(state));

    let mut svc = http_proxy_service(&server.configuration, gateway);
    svc.add_tcp(&config.server.listen);

    server.add_service(svc);

    Ok(server)
}
