// zipkeep-common/src/lib.rs
pub mod config;
pub mod error;
pub mod format;

// Re-export key types
pub use config::{Config, RetentionMode, RetentionPolicy};
pub use error::{Result, ZipkeepError};
