//! Create Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::Deserialize;
use tracing::info;

use storefront_app::domain::orders::data::NewOrder;

use crate::{
    carts::errors::checkout_status_error,
    extensions::*,
    orders::models::{
        AddressBody, CustomerInfoBody, OrderItemBody, OrderSuccessResponse, expected_total,
    },
    state::State,
};

/// Direct order placement request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    #[serde(default)]
    pub customer_info: CustomerInfoBody,

    #[serde(default)]
    pub shipping_address: AddressBody,

    #[serde(default)]
    pub billing_address: Option<AddressBody>,

    #[serde(default)]
    pub items: Vec<OrderItemBody>,

    /// Total the client displayed, in major units
    #[serde(default)]
    pub total: Option<f64>,

    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, StatusError> {
        let items = self
            .items
            .into_iter()
            .map(OrderItemBody::into_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewOrder {
            customer: self.customer_info.into(),
            shipping_address: self.shipping_address.into(),
            billing_address: self.billing_address.map(Into::into),
            items,
            expected_total: expected_total(self.total)?,
            payment_intent_id: self.payment_intent_id,
        })
    }
}

/// Create Order Handler
///
/// Checks every line against stock, prices it from the catalogue, and stores the order as
/// `pending`. A `total` that disagrees with the catalogue prices is rejected.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order or items out of stock"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderSuccessResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let scope = depot.access_scope();

    let order = state
        .app
        .checkout
        .place_order(json.into_inner().into_new_order()?)
        .await
        .map_err(checkout_status_error)?;

    info!(order_number = %order.order_number, "order placed");

    res.status_code(StatusCode::CREATED);

    Ok(Json(OrderSuccessResponse {
        success: true,
        order: order.view(scope).into(),
    }))
}
