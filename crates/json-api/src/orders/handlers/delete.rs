//! Delete Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;

use storefront_app::{auth::AccessScope, domain::orders::data::OrderLookup};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderSuccessResponse},
    state::State,
};

/// Delete Order Handler
#[endpoint(
    tags("orders"),
    summary = "Delete Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order deleted"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not an admin"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<OrderSuccessResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .delete_order(OrderLookup::parse(&id.into_inner()))
        .await
        .map_err(into_status_error)?;

    info!(order_number = %order.order_number, "order deleted");

    Ok(Json(OrderSuccessResponse {
        success: true,
        order: order.view(AccessScope::Admin).into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext,
        domain::orders::{
            MockOrdersService, OrdersServiceError, records::OrderUuid, status::OrderStatus,
        },
    };

    use crate::test_helpers::{make_order, service, test_app};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        service(
            AppContext {
                orders: Arc::new(orders),
                ..test_app()
            },
            Router::with_path("orders/{id}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_delete_order_returns_removed_order() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_delete_order()
            .once()
            .withf(|lookup| *lookup == OrderLookup::Number("ISP-1000".to_string()))
            .return_once(|_| Ok(make_order(OrderUuid::new(), OrderStatus::Cancelled)));

        let body: serde_json::Value = TestClient::delete("http://example.com/orders/ISP-1000")
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["order"]["status"], json!("cancelled"));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_delete_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = TestClient::delete("http://example.com/orders/ISP-4040")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
