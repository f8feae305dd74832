pub mod app_config;
pub mod identity_toolkit;
pub mod local_storage;
pub mod memory;
pub mod rest_store;

pub use app_config::{BackendMode, Config};
pub use identity_toolkit::IdentityToolkit;
pub use local_storage::{FileStorage, MemoryStorage};
pub use memory::{MemoryAuth, MemoryStore};
pub use rest_store::RestDocumentStore;
