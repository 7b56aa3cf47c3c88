//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartEnvelope},
    extensions::*,
    state::State,
};

/// Clear Cart Handler
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::CONFLICT, description = "Cart kept changing during the save"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_id_or_500()?;

    let cart = state
        .app
        .carts
        .clear_cart(session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext,
        domain::carts::{CartsServiceError, MockCartsService},
    };

    use crate::{
        carts::session::{SESSION_HEADER, cart_session},
        test_helpers::{make_cart, service, test_app},
    };

    use super::*;

    #[tokio::test]
    async fn test_clear_cart_returns_empty_cart() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .withf(|session| session.as_str() == "session-1")
            .return_once(|_| Ok(make_cart("session-1", &[])));

        let service = service(
            AppContext {
                carts: Arc::new(carts),
                ..test_app()
            },
            Router::with_path("cart").hoop(cart_session).delete(handler),
        );

        let body: serde_json::Value = TestClient::delete("http://example.com/cart")
            .add_header(SESSION_HEADER, "session-1", true)
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(body["cart"]["items"], json!([]));
        assert_eq!(body["cart"]["itemCount"], json!(0));
        assert_eq!(body["cart"]["subtotal"], json!(0.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_cart_that_keeps_changing_returns_409() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::Conflict));

        let service = service(
            AppContext {
                carts: Arc::new(carts),
                ..test_app()
            },
            Router::with_path("cart").hoop(cart_session).delete(handler),
        );

        let mut res = TestClient::delete("http://example.com/cart")
            .add_header(SESSION_HEADER, "session-1", true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "error": "Cart was modified, please retry" }));

        Ok(())
    }
}
