pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod record;
pub mod sync;
pub mod types;

pub use error::{Result, SlaError};
