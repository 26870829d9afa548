//! Tool backends
//!
//! Each backend implements `Backend` for a fixed set of tools:
//!
//! - `FileBackend`: `read_file`, `write_file`, `list_files`, `delete_file`
//! - `HttpProxyBackend`: `call_api`
//! - `DataTransformBackend`: `process_data`
//! - `InferenceBackend`: the `lm_studio_*` tools

mod data;
mod error;
mod file;
mod filter;
mod http;
mod inference;
mod path_guard;
mod traits;

pub use data::DataTransformBackend;
pub use error::{BackendError, BackendResult};
pub use file::{EntryKind, FileBackend, FileEntry};
pub use filter::{Condition, Operator};
pub use http::HttpProxyBackend;
pub use inference::InferenceBackend;
pub use path_guard::PathGuard;
pub use traits::{Backend, ToolOutput};
