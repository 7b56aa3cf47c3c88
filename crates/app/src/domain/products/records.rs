//! Product Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Catalogue visibility of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Active,
    Draft,
    Inactive,
}

impl ProductStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = UnknownProductStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "draft" => Ok(Self::Draft),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownProductStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product status: {0}")]
pub struct UnknownProductStatus(pub String);

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: u64,
    pub sale_price: Option<u64>,
    pub stock_quantity: u32,
    pub track_inventory: bool,
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// The price a buyer pays right now.
    #[must_use]
    pub fn effective_price(&self) -> u64 {
        self.sale_price.unwrap_or(self.price)
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        !self.track_inventory || self.stock_quantity > 0
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn product(price: u64) -> ProductRecord {
        ProductRecord {
            uuid: ProductUuid::new(),
            slug: "word-cards".to_string(),
            name: "Word Cards".to_string(),
            description: None,
            category: Some("cards".to_string()),
            price,
            sale_price: None,
            stock_quantity: 10,
            track_inventory: true,
            images: vec!["/img/cards.png".to_string()],
            status: ProductStatus::Active,
            featured: false,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
