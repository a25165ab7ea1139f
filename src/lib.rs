pub mod catalog;
pub mod config;
pub mod error;
pub mod gate;
pub mod proxy;
pub mod server;
pub mod stream;
pub mod subscription;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, FallbackMode};
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
