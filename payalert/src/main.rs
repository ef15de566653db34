use clap::{Parser, Subcommand};
use payalert_core::cli;
use payalert_core::conf::load_config;
use payalert_core::logging::init_logging;
use payalert_core::server;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "payalert",
    version,
    about = "payalert: Stripe payment failure notifier"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },

    /// Run the notifier (default)
    Run {
        /// Optional TOML config file; environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCmd {
    /// Validate the configuration
    Check {
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the resolved configuration as JSON (secrets redacted)
    Dump {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { cmd }) => {
            let result = match cmd {
                ConfigCmd::Check { config } => cli::conf::check(config),
                ConfigCmd::Dump { config } => cli::conf::dump(config),
            };
            if let Err(e) = result {
                eprintln!("config error: {e}");
                std::process::exit(1);
            }
        }

        Some(Command::Run { config }) => start(config),

        None => start(None),
    }
}

fn start(config: Option<PathBuf>) {
    init_logging();

    let cfg = match load_config(config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "failed to load payalert config");
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(cfg) {
        tracing::error!(error = %e, "failed to start payalert server");
        std::process::exit(1);
    }
}
