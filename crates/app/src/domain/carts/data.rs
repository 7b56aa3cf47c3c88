//! Carts Data

use crate::domain::products::records::{ProductRecord, ProductUuid};

/// A buyer's request to add a product to their cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub variant: Option<String>,
    pub quantity: u32,
}

/// A line to merge into a cart, carrying the product snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_uuid: ProductUuid,
    pub variant: Option<String>,
    pub quantity: u32,
    pub unit_price: u64,
    pub name: String,
    pub image: Option<String>,
}

impl CartLine {
    /// Snapshot the product's current effective price, name and primary image.
    #[must_use]
    pub fn snapshot(product: &ProductRecord, variant: Option<String>, quantity: u32) -> Self {
        Self {
            product_uuid: product.uuid,
            variant,
            quantity,
            unit_price: product.effective_price(),
            name: product.name.clone(),
            image: product.primary_image().map(str::to_string),
        }
    }
}
