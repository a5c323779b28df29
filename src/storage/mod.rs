pub mod file;
pub mod memory;
pub mod traits;

use std::sync::Arc;

use crate::config::GeneratorConfig;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Slot holding the last API key that produced an image.
pub const API_KEY_STORAGE_KEY: &str = "runware_api_key";

pub fn open_store(config: &GeneratorConfig) -> Arc<dyn KeyValueStore> {
    Arc::new(JsonFileStore::new(config.key_store_path.clone()))
}
