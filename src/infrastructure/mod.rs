//! Infrastructure layer
//!
//! Console-facing concerns the core stays independent of: log message
//! text and the terminal progress bar.

pub mod log_messages;
pub mod progress;

pub use progress::ConsoleProgress;
