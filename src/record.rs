//! Record types stored in the two collections, plus the input shapes used to
//! create and patch products.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Something that lives in a [`CollectionStore`](crate::CollectionStore).
///
/// Records are stored in insertion order and identified by a positive integer
/// id that never changes once assigned.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Collection name used in errors and logs ("product", "cart").
    const COLLECTION: &'static str;

    /// Primary key.
    fn id(&self) -> u64;
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A catalog entry. `code` is unique across the product collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by the store, never changes.
    pub id: u64,
    /// Display name.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Image path or URL.
    pub thumbnail: String,
    /// Business key, unique within the collection.
    pub code: String,
    /// Units available.
    pub stock: u64,
}

impl Record for Product {
    const COLLECTION: &'static str = "product";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Fields for a new product, as they arrive from a request body.
///
/// Every field is required. "Present" follows the loose truthiness rule:
/// an empty string, a zero number, `NaN` and an absent field all count as
/// missing. That means a product can't be created with `stock: 0` even
/// though zero stock is a perfectly valid state after an update.
///
/// An infinite price counts as missing too: JSON has no way to write it, and
/// a file holding one would no longer load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct NewProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub thumbnail: Option<String>,
    pub code: Option<String>,
    pub stock: Option<u64>,
}

impl NewProduct {
    /// Names of every field that is missing or falsy, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let text = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        if !text(&self.title) {
            missing.push("title");
        }
        if !text(&self.description) {
            missing.push("description");
        }
        if !self.price.is_some_and(|p| p != 0.0 && p.is_finite()) {
            missing.push("price");
        }
        if !text(&self.thumbnail) {
            missing.push("thumbnail");
        }
        if !text(&self.code) {
            missing.push("code");
        }
        if !self.stock.is_some_and(|s| s != 0) {
            missing.push("stock");
        }
        missing
    }

    /// Turn the input into a product carrying `id`, or fail with
    /// [`Error::Validation`] naming what's missing.
    pub(crate) fn into_product(self, id: u64) -> Result<Product> {
        let missing = self.missing_fields();
        match self {
            NewProduct {
                title: Some(title),
                description: Some(description),
                price: Some(price),
                thumbnail: Some(thumbnail),
                code: Some(code),
                stock: Some(stock),
            } if missing.is_empty() => Ok(Product {
                id,
                title,
                description,
                price,
                thumbnail,
                code,
                stock,
            }),
            _ => Err(Error::Validation { missing }),
        }
    }
}

/// Partial update for a product. Absent fields keep their current value.
///
/// `id` is accepted so a whole product can be sent back as a patch, but it is
/// always ignored: a product's id never changes. Values are not re-validated,
/// so a patch may set `stock` to 0 or `title` to an empty string. The one
/// exception is a `NaN` or infinite price, which is refused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ProductPatch {
    /// Ignored.
    pub id: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub thumbnail: Option<String>,
    pub code: Option<String>,
    pub stock: Option<u64>,
}

impl ProductPatch {
    /// Fields whose new value could not be written back to disk. Only a
    /// non-finite price qualifies; everything else is taken as is.
    pub fn unstorable_fields(&self) -> Vec<&'static str> {
        let mut bad = Vec::new();
        if self.price.is_some_and(|p| !p.is_finite()) {
            bad.push("price");
        }
        bad
    }

    /// Merge this patch over `product`, keeping its id.
    pub fn apply(self, product: &mut Product) {
        if let Some(v) = self.title {
            product.title = v;
        }
        if let Some(v) = self.description {
            product.description = v;
        }
        if let Some(v) = self.price {
            product.price = v;
        }
        if let Some(v) = self.thumbnail {
            product.thumbnail = v;
        }
        if let Some(v) = self.code {
            product.code = v;
        }
        if let Some(v) = self.stock {
            product.stock = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Carts
// ---------------------------------------------------------------------------

/// One line of a cart. Each product appears at most once per cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Id of the product. Not checked against the product collection.
    pub product: u64,
    /// Always at least 1.
    pub quantity: u64,
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Derived from the creation time in milliseconds.
    pub id: u64,
    /// Lines in the order they were first added.
    pub products: Vec<CartEntry>,
}

impl Cart {
    /// Empty cart with the given id.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            products: Vec::new(),
        }
    }

    /// Bump the quantity for `product_id`, adding a line if it's not there yet.
    pub fn add_one(&mut self, product_id: u64) {
        match self.products.iter_mut().find(|e| e.product == product_id) {
            Some(entry) => entry.quantity += 1,
            None => self.products.push(CartEntry {
                product: product_id,
                quantity: 1,
            }),
        }
    }

    /// Quantity of `product_id` in this cart, 0 if absent.
    pub fn quantity_of(&self, product_id: u64) -> u64 {
        self.products
            .iter()
            .find(|e| e.product == product_id)
            .map_or(0, |e| e.quantity)
    }
}

impl Record for Cart {
    const COLLECTION: &'static str = "cart";

    fn id(&self) -> u64 {
        self.id
    }
}
