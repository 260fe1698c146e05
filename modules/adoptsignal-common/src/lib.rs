pub mod config;
pub mod error;
pub mod scoring;
pub mod types;

pub use config::Config;
pub use error::AdoptSignalError;
pub use scoring::*;
pub use types::*;
