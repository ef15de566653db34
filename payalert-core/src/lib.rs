pub mod api;
pub mod cli;
pub mod conf;
pub mod event;
pub mod logging;
pub mod notify;
pub mod runtime;
pub mod server;
pub mod store;
