pub mod auth;
pub mod response;

pub use auth::{authenticate, Principal};
pub use response::{ApiResponse, ApiResult};
