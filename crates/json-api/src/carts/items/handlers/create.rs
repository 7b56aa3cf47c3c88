//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::data::NewCartItem;

use crate::{
    carts::{errors::into_status_error, models::CartEnvelope},
    extensions::*,
    state::State,
};

fn default_quantity() -> u32 {
    1
}

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCartItemRequest {
    pub product_id: Uuid,

    #[serde(default)]
    pub variant_id: Option<String>,

    /// Units to add (default 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl From<CreateCartItemRequest> for NewCartItem {
    fn from(request: CreateCartItemRequest) -> Self {
        NewCartItem {
            product_uuid: request.product_id.into(),
            variant: request.variant_id.filter(|variant| !variant.is_empty()),
            quantity: request.quantity,
        }
    }
}

/// Create Cart Item Handler
///
/// Adding a product and variant already in the cart increases that line's quantity.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or unavailable product"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_id_or_500()?;

    let cart = state
        .app
        .carts
        .add_item(session, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(cart.into()))
}
