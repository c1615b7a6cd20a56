pub mod completion;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod patent;
pub mod time;

// Re-export common error type
pub use error::PatentError;
pub use dispatch::dispatch_all;
