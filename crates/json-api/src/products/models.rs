//! Product response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::{
    domain::products::{
        records::ProductRecord,
        stock::{StockCheck, StockShortfall},
    },
    money,
};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// List price in major units
    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,

    pub stock_quantity: u32,
    pub track_inventory: bool,
    pub in_stock: bool,
    pub images: Vec<String>,
    pub status: String,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            in_stock: product.in_stock(),
            id: product.uuid.into(),
            slug: product.slug,
            name: product.name,
            description: product.description,
            category: product.category,
            price: money::to_major(product.price),
            sale_price: product.sale_price.map(money::to_major),
            stock_quantity: product.stock_quantity,
            track_inventory: product.track_inventory,
            images: product.images,
            status: product.status.as_str().to_string(),
            featured: product.featured,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Stock availability for one product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockCheckResponse {
    pub product_id: Uuid,
    pub requested: u32,
    pub available: bool,

    /// `not_found`, `inactive` or `insufficient`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Units on hand, reported when stock is insufficient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_quantity: Option<u32>,
}

impl From<StockCheck> for StockCheckResponse {
    fn from(check: StockCheck) -> Self {
        let (reason, available_quantity) = match check.shortfall {
            None => (None, None),
            Some(StockShortfall::NotFound) => (Some("not_found"), None),
            Some(StockShortfall::Inactive) => (Some("inactive"), None),
            Some(StockShortfall::Insufficient { available }) => {
                (Some("insufficient"), Some(available))
            }
        };

        Self {
            product_id: check.product_uuid.into(),
            requested: check.requested,
            available: check.is_available(),
            reason: reason.map(str::to_string),
            available_quantity,
        }
    }
}
