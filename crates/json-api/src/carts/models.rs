//! Cart response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::{
    domain::carts::records::{Cart, CartItem},
    money,
};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    /// Session the cart belongs to
    pub session_id: String,

    /// Lines in insertion order
    pub items: Vec<CartItemResponse>,

    /// Sum of line quantities
    pub item_count: u64,

    /// Sum of line totals in major units
    pub subtotal: f64,

    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            subtotal: money::to_major(cart.subtotal()),
            session_id: cart.session_id.to_string(),
            updated_at: cart.updated_at.to_string(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    /// Line id, used to update or remove the line
    pub id: Uuid,

    pub product_id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,

    pub quantity: u32,

    /// Price captured when the product was added, in major units
    pub unit_price: f64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub line_total: f64,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.uuid.into(),
            product_id: item.product_uuid.into(),
            line_total: money::to_major(item.line_total()),
            variant_id: item.variant,
            quantity: item.quantity,
            unit_price: money::to_major(item.unit_price),
            name: item.name,
            image: item.image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartEnvelope {
    pub cart: CartResponse,
}

impl From<Cart> for CartEnvelope {
    fn from(cart: Cart) -> Self {
        Self { cart: cart.into() }
    }
}
