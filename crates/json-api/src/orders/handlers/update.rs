//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::Deserialize;
use tracing::{Span, info};

use storefront_app::{
    auth::AccessScope,
    domain::orders::{
        data::{OrderLookup, StatusUpdate},
        status::OrderStatus,
    },
};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderEnvelope},
    state::State,
};

/// Status change request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateOrderRequest {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl UpdateOrderRequest {
    fn into_update(self) -> Result<StatusUpdate, StatusError> {
        let status = self
            .status
            .ok_or_else(|| StatusError::bad_request().brief("Status is required"))?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

        Ok(StatusUpdate {
            status,
            transaction_id: self.transaction_id.filter(|id| !id.trim().is_empty()),
        })
    }
}

/// Update Order Status Handler
///
/// Moves the order along its lifecycle. Transitions that skip a step or go backwards are
/// rejected.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid status or transition"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not an admin"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Concurrent modification"),
    ),
)]
#[tracing::instrument(
    name = "orders.update",
    skip(id, json, depot),
    fields(order = tracing::field::Empty, status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<UpdateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let lookup = OrderLookup::parse(&id.into_inner());
    let update = json.into_inner().into_update()?;

    let span = Span::current();

    span.record("order", tracing::field::display(&lookup));
    span.record("status", update.status.as_str());

    let order = state
        .app
        .orders
        .update_status(lookup, update)
        .await
        .map_err(into_status_error)?;

    info!(order_number = %order.order_number, status = %order.status, "order status updated");

    Ok(Json(OrderEnvelope {
        order: order.view(AccessScope::Admin).into(),
    }))
}
