//! One place to open both collections at startup.
//!
//! Open a [`Catalog`] once and hand its managers to whoever needs them. Every
//! manager it returns shares the catalog's stores, so building a fresh manager
//! per request is cheap and never forks the cache.

use crate::carts::CartManager;
use crate::error::Result;
use crate::notify::Broadcaster;
use crate::policy::{ListSource, SaveFailure};
use crate::products::ProductManager;
use crate::record::{Cart, Product};
use crate::store::{CollectionStore, StoreHandle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the product collection inside the data directory.
pub const PRODUCTS_FILE: &str = "products.json";
/// File name of the cart collection inside the data directory.
pub const CARTS_FILE: &str = "carts.json";

/// Where the collections live and how they're written.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    data_dir: PathBuf,
    pretty: bool,
    on_save_failure: SaveFailure,
    products_list_source: ListSource,
}

impl CatalogConfig {
    /// Defaults: pretty JSON, save errors returned, `list` from cache.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            pretty: true,
            on_save_failure: SaveFailure::default(),
            products_list_source: ListSource::default(),
        }
    }

    /// Write indented JSON.
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// What a failed save does, for both collections.
    pub fn on_save_failure(mut self, policy: SaveFailure) -> Self {
        self.on_save_failure = policy;
        self
    }

    /// Where product listings read from.
    pub fn products_list_source(mut self, source: ListSource) -> Self {
        self.products_list_source = source;
        self
    }

    /// The data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the product file.
    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(PRODUCTS_FILE)
    }

    /// Full path of the cart file.
    pub fn carts_path(&self) -> PathBuf {
        self.data_dir.join(CARTS_FILE)
    }
}

/// Both collections plus the broadcaster that follows product changes.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: StoreHandle<Product>,
    carts: StoreHandle<Cart>,
    broadcaster: Arc<Broadcaster>,
}

impl Catalog {
    /// Create the data directory if needed and open one store per file.
    pub fn open(config: &CatalogConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let products = CollectionStore::<Product>::builder(config.products_path())
            .pretty(config.pretty)
            .on_save_failure(config.on_save_failure)
            .list_source(config.products_list_source)
            .build();
        let carts = CollectionStore::<Cart>::builder(config.carts_path())
            .pretty(config.pretty)
            .on_save_failure(config.on_save_failure)
            .build();

        log::info!(
            "catalog open at {}: {} products, {} carts",
            config.data_dir.display(),
            products.len(),
            carts.len()
        );

        Ok(Self {
            products,
            carts,
            broadcaster: Arc::new(Broadcaster::new()),
        })
    }

    /// A product manager on the shared store, publishing to the broadcaster.
    pub fn products(&self) -> ProductManager {
        ProductManager::new(self.products.clone()).with_publisher(self.broadcaster.clone())
    }

    /// A cart manager on the shared store.
    pub fn carts(&self) -> CartManager {
        CartManager::new(self.carts.clone())
    }

    /// Subscribe here to follow product creates and deletes.
    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }
}
