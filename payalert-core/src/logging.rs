use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system with JSON formatting and environment-based filtering
///
/// - Uses `RUST_LOG` for level filtering (defaults to "info" if not set)
/// - Emits one flattened JSON object per event
pub fn init_normal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .init();
}

pub fn init_logging() {
    // If tokio-console is enabled, DO NOT install the normal subscriber
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        init_console_logging();
    } else {
        init_normal_logging();
    }
}

fn init_console_logging() {
    console_subscriber::init();
}
