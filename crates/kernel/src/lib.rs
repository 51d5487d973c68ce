//! Core traits, settings, pagination and the module registry.

pub mod module;
pub mod pagination;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Migration, Module};
pub use pagination::{PageRequest, Pagination};
pub use registry::ModuleRegistry;
