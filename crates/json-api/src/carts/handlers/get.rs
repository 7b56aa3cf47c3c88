//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartEnvelope},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Unknown sessions get an empty cart.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid session id"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_id_or_500()?;

    let cart = state
        .app
        .carts
        .get_cart(session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
