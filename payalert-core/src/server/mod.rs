mod gateway;
pub mod setup;

pub use gateway::AlertGateway;
pub use setup::{build_pingora_server, run};
