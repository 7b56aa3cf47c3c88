//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};

use storefront_app::domain::orders::data::OrderLookup;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderEnvelope},
    state::State,
};

/// Get Order Handler
///
/// Looks the order up by uuid or order number. Public lookups by number must pass the buyer's
/// `email`. Payment references are only shown to admins.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    email: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrderEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let scope = depot.access_scope();

    let order = state
        .app
        .orders
        .get_order(
            OrderLookup::parse(&id.into_inner()),
            scope,
            email.into_inner(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrderEnvelope {
        order: order.into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::{
        auth::AccessScope,
        context::AppContext,
        domain::orders::{
            MockOrdersService, OrdersServiceError, records::OrderUuid, status::OrderStatus,
        },
    };

    use crate::{
        extensions::*,
        test_helpers::{make_order, service, test_app},
    };

    use super::*;

    #[handler]
    async fn as_admin(depot: &mut Depot) {
        depot.insert_access_scope(AccessScope::Admin);
    }

    fn make_service(orders: MockOrdersService, admin: bool) -> Service {
        let route = Router::with_path("orders/{id}").get(handler);
        let route = if admin { route.hoop(as_admin) } else { route };

        service(
            AppContext {
                orders: Arc::new(orders),
                ..test_app()
            },
            route,
        )
    }

    #[tokio::test]
    async fn test_get_order_by_number_hides_payment_for_public() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(|lookup, scope, email| {
                *lookup == OrderLookup::Number("ISP-1000".to_string())
                    && *scope == AccessScope::Public
                    && email.as_deref() == Some("a@b.com")
            })
            .return_once(|_, scope, _| {
                Ok(make_order(OrderUuid::new(), OrderStatus::Pending).view(scope))
            });

        let body: serde_json::Value =
            TestClient::get("http://example.com/orders/ISP-1000?email=a@b.com")
                .send(&make_service(orders, false))
                .await
                .take_json()
                .await?;

        assert_eq!(body["order"]["orderNumber"], json!("ISP-1000"));
        assert!(body["order"].get("paymentIntentId").is_none());
        assert!(body["order"].get("transactionId").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_by_uuid_shows_payment_for_admin() -> TestResult {
        let uuid = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |lookup, scope, _| {
                *lookup == OrderLookup::Uuid(uuid) && *scope == AccessScope::Admin
            })
            .return_once(move |_, scope, _| Ok(make_order(uuid, OrderStatus::Processing).view(scope)));

        let body: serde_json::Value =
            TestClient::get(format!("http://example.com/orders/{uuid}"))
                .send(&make_service(orders, true))
                .await
                .take_json()
                .await?;

        assert_eq!(body["order"]["paymentIntentId"], json!("pi_123"));
        assert_eq!(body["order"]["transactionId"], json!("txn_456"));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::NotFound));

        let mut res = TestClient::get("http://example.com/orders/ISP-9999")
            .send(&make_service(orders, false))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "error": "Order not found" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_public_get_by_number_without_email_is_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(|_, scope, email| *scope == AccessScope::Public && email.is_none())
            .return_once(|_, _, _| Err(OrdersServiceError::NotFound));

        let mut res = TestClient::get("http://example.com/orders/ISP-1001")
            .send(&make_service(orders, false))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "error": "Order not found" }));

        Ok(())
    }
}
