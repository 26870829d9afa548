//! Capability catalog and the enablement-filtered registry

mod catalog;
#[allow(clippy::module_inception)]
mod registry;

pub use catalog::{data_resource, tool_catalog, tool_descriptor, DATA_RESOURCE_NAME};
pub use registry::CapabilityRegistry;
