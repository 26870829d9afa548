//! Dispatch engine: validates, routes and wraps every tool call

mod builder;
mod engine;
mod error;

pub use builder::{build_engine, build_engine_with};
pub use engine::DispatchEngine;
pub use error::{DispatchError, DispatchResult};
