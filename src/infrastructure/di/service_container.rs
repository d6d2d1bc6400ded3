//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::TreeService;
use crate::config::Settings;
use crate::infrastructure::file_store::FileTreeStore;
use crate::infrastructure::traits::SiteTreeStore;
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Site-tree store
    pub store: Arc<dyn SiteTreeStore>,

    /// Tree mutation service
    pub tree: TreeService,
}

impl ServiceContainer {
    /// Create a new service container with the file-backed store.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let store = Arc::new(FileTreeStore::new(&settings.store_dir)?);
        Ok(Self::with_deps(settings, store))
    }

    /// Create a service container with a custom store (for testing).
    pub fn with_deps(settings: Settings, store: Arc<dyn SiteTreeStore>) -> Self {
        let settings = Arc::new(settings);
        let tree = TreeService::new(store.clone(), settings.missing_delete);

        Self {
            settings,
            store,
            tree,
        }
    }
}
