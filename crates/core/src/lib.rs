pub mod config;
pub mod error;
pub mod record;

pub use config::EngineConfig;
pub use error::*;
pub use record::*;
