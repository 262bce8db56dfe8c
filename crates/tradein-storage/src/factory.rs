use crate::{LocalStorage, Storage, StorageError, StorageResult};
use std::sync::Arc;
use tradein_core::Config;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        "local" => {
            let storage = LocalStorage::new(
                config.local_storage_path().to_string(),
                config.local_storage_base_url().to_string(),
            )
            .await?;
            Ok(Arc::new(storage))
        }
        other => Err(StorageError::ConfigError(format!(
            "Unknown storage backend '{}' (expected 'local')",
            other
        ))),
    }
}
