//! Checkout Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::Deserialize;
use tracing::{Span, info};

use storefront_app::domain::checkout::data::BuyerInfo;

use crate::{
    carts::errors::checkout_status_error,
    extensions::*,
    orders::models::{AddressBody, CustomerInfoBody, OrderSuccessResponse, expected_total},
    state::State,
};

/// Buyer details submitted at checkout.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutRequest {
    #[serde(default)]
    pub customer_info: CustomerInfoBody,

    #[serde(default)]
    pub shipping_address: AddressBody,

    #[serde(default)]
    pub billing_address: Option<AddressBody>,

    /// Total the buyer saw, in major units
    #[serde(default)]
    pub total: Option<f64>,

    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

impl CheckoutRequest {
    fn into_buyer(self) -> Result<BuyerInfo, StatusError> {
        Ok(BuyerInfo {
            customer: self.customer_info.into(),
            shipping_address: self.shipping_address.into(),
            billing_address: self.billing_address.map(Into::into),
            payment_intent_id: self.payment_intent_id,
            expected_total: expected_total(self.total)?,
        })
    }
}

/// Checkout Handler
///
/// Validates stock for the session cart, places a `pending` order from it and clears the
/// cart.
#[endpoint(
    tags("carts"),
    summary = "Checkout Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart, out of stock or invalid buyer details"),
    ),
)]
#[tracing::instrument(
    name = "carts.checkout",
    skip(json, depot, res),
    fields(session_id = tracing::field::Empty, order_number = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderSuccessResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_id_or_500()?;
    let buyer = json.into_inner().into_buyer()?;

    let span = Span::current();

    span.record("session_id", session.as_str());

    let order = state
        .app
        .checkout
        .checkout(session, buyer)
        .await
        .map_err(checkout_status_error)?;

    span.record("order_number", order.order_number.as_str());

    info!(total = order.total, "checkout completed");

    res.status_code(StatusCode::CREATED);

    Ok(Json(OrderSuccessResponse {
        success: true,
        order: order.view(depot.access_scope()).into(),
    }))
}
