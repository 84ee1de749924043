// Application state module
// Owns the catalog stores and runtime flags shared by every connection

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::model::{seed_categories, seed_products};
use crate::store::{CategoryStore, ProductStore};

/// Application state
pub struct AppState {
    pub config: Config,
    pub products: ProductStore,
    pub categories: CategoryStore,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Create `AppState`, loading the starter catalog when `store.seed` is set
    pub fn new(config: &Config) -> Self {
        let (products, categories) = if config.store.seed {
            (seed_products(), seed_categories())
        } else {
            (Vec::new(), Vec::new())
        };

        Self {
            config: config.clone(),
            products: ProductStore::new(products),
            categories: CategoryStore::new(categories),
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }
}
