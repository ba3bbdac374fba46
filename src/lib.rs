//! File-backed JSON collections for a small product catalog and its carts.
//!
//! Each collection is a JSON array on disk mirrored by an in-memory cache.
//! Every create, update or delete rewrites the whole file. A missing or
//! corrupt file opens as an empty collection.
//!
//! ```rust,no_run
//! use json_catalog::{Catalog, CatalogConfig, NewProduct};
//!
//! let catalog = Catalog::open(&CatalogConfig::new("data")).unwrap();
//! let product = catalog
//!     .products()
//!     .create(NewProduct {
//!         title: Some("Keychain".into()),
//!         description: Some("Keychain with a figure".into()),
//!         price: Some(2000.0),
//!         thumbnail: Some("no-image".into()),
//!         code: Some("st255".into()),
//!         stock: Some(133),
//!     })
//!     .unwrap();
//!
//! let cart = catalog.carts().create_cart().unwrap();
//! catalog.carts().add_product_to_cart(cart.id, product.id).unwrap();
//! ```
//!
//! **One store per file.** Two stores opened on the same path don't see each
//! other's writes and will overwrite each other's saves. Open a [`Catalog`]
//! (or a [`StoreHandle`]) once and clone it.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod carts;
pub mod catalog;
pub mod error;
pub mod notify;
pub mod persist;
pub mod policy;
pub mod products;
pub mod record;
pub mod serializer;
pub mod store;

pub use carts::CartManager;
pub use catalog::{Catalog, CatalogConfig};
pub use error::{Error, Result};
pub use notify::{Broadcaster, Event, Publisher};
pub use policy::{ListSource, SaveFailure};
pub use products::ProductManager;
pub use record::{Cart, CartEntry, NewProduct, Product, ProductPatch, Record};
pub use store::{CollectionStore, CollectionStoreBuilder, StoreHandle};
