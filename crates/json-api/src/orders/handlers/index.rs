//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToParameters, ToSchema},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::orders::data::OrderFilter;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderSummaryResponse},
    state::State,
};

/// Order listing filters.
#[derive(Debug, Deserialize, ToParameters)]
#[serde(rename_all = "camelCase")]
#[salvo(parameters(rename_all = "camelCase", default_parameter_in = Query))]
pub(crate) struct OrdersQuery {
    /// Customer email, matched case-insensitively
    pub email: Option<String>,

    /// Exact order number, e.g. `ISP-1000`. Narrows an email listing for public callers
    pub order_number: Option<String>,

    /// Page size (default 50, max 100)
    pub limit: Option<u32>,
}

impl From<OrdersQuery> for OrderFilter {
    fn from(query: OrdersQuery) -> Self {
        Self {
            email: query.email,
            order_number: query.order_number,
            limit: query.limit.unwrap_or(OrderFilter::DEFAULT_LIMIT),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Matching orders, newest first
    pub orders: Vec<OrderSummaryResponse>,
}

/// Order Index Handler
///
/// Public callers must filter by email; admins may list everything.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    responses(
        (status_code = StatusCode::OK, description = "Orders listed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing filter"),
    ),
)]
pub(crate) async fn handler(
    query: OrdersQuery,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let scope = depot.access_scope();

    let orders = state
        .app
        .orders
        .list_orders(query.into(), scope)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}
