mod endpoint;
mod error;
mod handler;
mod response;


pub use endpoint::{Endpoint, parse_limit};
pub use error::ApiError;
pub use handler::{ApiHandler, ApiRequest, SERVICE_NAME};
pub use response::ApiResponse;
