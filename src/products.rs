//! CRUD over the product collection.

use crate::error::{Error, Result};
use crate::notify::{Event, Publisher};
use crate::record::{NewProduct, Product, ProductPatch, Record};
use crate::store::StoreHandle;
use std::sync::Arc;

/// Creates, reads, updates and deletes products on top of a store.
///
/// Keeps two invariants on the collection: ids are unique and only ever
/// assigned here, and no two products share a `code`.
#[derive(Clone)]
pub struct ProductManager {
    store: StoreHandle<Product>,
    publisher: Option<Arc<dyn Publisher>>,
}

impl ProductManager {
    /// Manage the products held by `store`.
    pub fn new(store: StoreHandle<Product>) -> Self {
        Self {
            store,
            publisher: None,
        }
    }

    /// Announce creates and deletes to `publisher`.
    pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &StoreHandle<Product> {
        &self.store
    }

    /// Validate `input`, give it the next id, append it and persist.
    ///
    /// Fails with [`Error::Validation`] if any field is missing or falsy and
    /// with [`Error::DuplicateKey`] if the code is taken. Neither touches the
    /// collection.
    pub fn create(&self, input: NewProduct) -> Result<Product> {
        let product = self.store.mutate(|state| {
            let missing = input.missing_fields();
            if !missing.is_empty() {
                return Err(Error::Validation { missing });
            }
            if let Some(code) = input.code.as_deref() {
                if state.records.iter().any(|p| p.code == code) {
                    return Err(duplicate_code(code));
                }
            }
            let id = state.allocate_id(0)?;
            let product = input.into_product(id)?;
            state.records.push(product.clone());
            Ok(product)
        })?;

        log::debug!("created product {} ({})", product.id, product.code);
        self.publish(Event::ProductAdded(product.clone()));
        Ok(product)
    }

    /// All products in insertion order, or the first `limit` of them.
    pub fn list(&self, limit: Option<i64>) -> Vec<Product> {
        self.store.list(limit)
    }

    /// Copy of the product with `id`.
    pub fn get(&self, id: u64) -> Result<Product> {
        self.store.get(id).ok_or_else(|| not_found(id))
    }

    /// Merge `patch` over the product with `id` and persist. The id in the
    /// patch, if any, is ignored.
    ///
    /// Field values aren't re-validated, but moving to a code another product
    /// already uses is rejected, and so is a `NaN` or infinite price.
    pub fn update(&self, id: u64, patch: ProductPatch) -> Result<Product> {
        let product = self.store.mutate(|state| {
            let idx = state.position(id).ok_or_else(|| not_found(id))?;
            let unstorable = patch.unstorable_fields();
            if !unstorable.is_empty() {
                return Err(Error::Validation {
                    missing: unstorable,
                });
            }
            if let Some(code) = patch.code.as_deref() {
                if state.records.iter().any(|p| p.code == code && p.id != id) {
                    return Err(duplicate_code(code));
                }
            }
            let product = &mut state.records[idx];
            patch.apply(product);
            Ok(product.clone())
        })?;

        log::debug!("updated product {id}");
        Ok(product)
    }

    /// Remove the product with `id`, keeping the order of the rest, and
    /// persist. Returns the removed product.
    pub fn delete(&self, id: u64) -> Result<Product> {
        let removed = self.store.mutate(|state| {
            let idx = state.position(id).ok_or_else(|| not_found(id))?;
            Ok(state.records.remove(idx))
        })?;

        log::debug!("deleted product {id}");
        self.publish(Event::ProductDeleted { id });
        Ok(removed)
    }

    fn publish(&self, event: Event) {
        if let Some(publisher) = &self.publisher {
            publisher.publish(&event);
        }
    }
}

impl std::fmt::Debug for ProductManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductManager")
            .field("store", &self.store)
            .field("publishes", &self.publisher.is_some())
            .finish()
    }
}

fn not_found(id: u64) -> Error {
    Error::NotFound {
        collection: Product::COLLECTION,
        id,
    }
}

fn duplicate_code(code: &str) -> Error {
    Error::DuplicateKey {
        field: "code",
        value: code.to_owned(),
    }
}
