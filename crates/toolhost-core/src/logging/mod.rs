//! Logging abstractions
//!
//! Loggers are handed to each component at construction as `Arc<dyn Logger>`;
//! nothing in the crate logs through global state.

mod traits;
mod console;
mod sinks;

pub use traits::{Logger, LogLevel};
pub use console::ConsoleLogger;
pub use sinks::{NoOpLogger, MemoryLogger, LogEntry};
