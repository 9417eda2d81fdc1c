//! Business API: the `/api/hello` route and its error mapping.

pub mod error;
pub mod hello;
pub mod work;

pub use error::ApiError;
pub use hello::HelloHandler;
