//! Shopping carts.

use crate::error::{Error, Result};
use crate::record::{Cart, Record};
use crate::store::StoreHandle;
use std::time::{SystemTime, UNIX_EPOCH};

/// Creates carts and fills them with product ids.
///
/// Product ids are taken at face value; nothing checks them against the
/// product collection.
#[derive(Debug, Clone)]
pub struct CartManager {
    store: StoreHandle<Cart>,
}

impl CartManager {
    /// Manage the carts held by `store`.
    pub fn new(store: StoreHandle<Cart>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &StoreHandle<Cart> {
        &self.store
    }

    /// Start an empty cart and persist it.
    ///
    /// The id is the current time in milliseconds. When two carts are created
    /// within the same millisecond (or the clock goes backwards) the id is
    /// bumped past the highest one this store has issued, so ids stay unique
    /// within a store.
    pub fn create_cart(&self) -> Result<Cart> {
        let cart = self.store.mutate(|state| {
            let id = state.allocate_id(now_millis())?;
            let cart = Cart::new(id);
            state.records.push(cart.clone());
            Ok(cart)
        })?;

        log::debug!("created cart {}", cart.id);
        Ok(cart)
    }

    /// All carts in creation order.
    pub fn list_carts(&self) -> Vec<Cart> {
        self.store.list(None)
    }

    /// Copy of the cart with `id`.
    pub fn get_cart(&self, id: u64) -> Result<Cart> {
        self.store.get(id).ok_or_else(|| not_found(id))
    }

    /// Put one more of `product_id` into the cart and persist. Returns the
    /// updated cart.
    pub fn add_product_to_cart(&self, cart_id: u64, product_id: u64) -> Result<Cart> {
        let cart = self.store.mutate(|state| {
            let idx = state.position(cart_id).ok_or_else(|| not_found(cart_id))?;
            let cart = &mut state.records[idx];
            cart.add_one(product_id);
            Ok(cart.clone())
        })?;

        log::debug!(
            "cart {cart_id}: product {product_id} now x{}",
            cart.quantity_of(product_id)
        );
        Ok(cart)
    }

    /// Remove the cart with `id` and persist. Returns the removed cart.
    pub fn delete_cart(&self, id: u64) -> Result<Cart> {
        let removed = self.store.mutate(|state| {
            let idx = state.position(id).ok_or_else(|| not_found(id))?;
            Ok(state.records.remove(idx))
        })?;

        log::debug!("deleted cart {id}");
        Ok(removed)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

fn not_found(id: u64) -> Error {
    Error::NotFound {
        collection: Cart::COLLECTION,
        id,
    }
}
