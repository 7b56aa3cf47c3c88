//! Check Stock Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::data::StockRequest;

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::StockCheckResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckStockRequest {
    #[serde(default)]
    pub items: Vec<StockItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckStockResponse {
    /// True when every requested product can be fulfilled
    pub all_available: bool,

    /// One entry per distinct product
    pub items: Vec<StockCheckResponse>,
}

/// Check Stock Handler
///
/// Requests for the same product are summed before checking.
#[endpoint(
    tags("products"),
    summary = "Check Stock",
    responses(
        (status_code = StatusCode::OK, description = "Stock checked"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckStockRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckStockResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let requests = json
        .into_inner()
        .items
        .into_iter()
        .map(|item| StockRequest {
            product_uuid: item.product_id.into(),
            quantity: item.quantity,
        })
        .collect();

    let checks = state
        .app
        .products
        .check_stock(requests)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CheckStockResponse {
        all_available: checks.iter().all(|check| check.is_available()),
        items: checks.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext,
        domain::products::{
            MockProductsService,
            records::ProductUuid,
            stock::{StockCheck, StockShortfall},
        },
    };

    use crate::test_helpers::{service, test_app};

    use super::*;

    #[tokio::test]
    async fn test_check_stock_reports_shortfalls() -> TestResult {
        let plenty = ProductUuid::new();
        let scarce = ProductUuid::new();
        let mut products = MockProductsService::new();

        products
            .expect_check_stock()
            .once()
            .withf(move |items| {
                items.len() == 2 && items[0].product_uuid == plenty && items[1].quantity == 3
            })
            .return_once(move |_| {
                Ok(vec![
                    StockCheck {
                        product_uuid: plenty,
                        requested: 1,
                        shortfall: None,
                    },
                    StockCheck {
                        product_uuid: scarce,
                        requested: 3,
                        shortfall: Some(StockShortfall::Insufficient { available: 2 }),
                    },
                ])
            });

        let service = service(
            AppContext {
                products: Arc::new(products),
                ..test_app()
            },
            Router::with_path("products/check-stock").post(handler),
        );

        let body: serde_json::Value = TestClient::post("http://example.com/products/check-stock")
            .json(&json!({
                "items": [
                    { "productId": plenty.to_string(), "quantity": 1 },
                    { "productId": scarce.to_string(), "quantity": 3 }
                ]
            }))
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(body["allAvailable"], json!(false));
        assert_eq!(body["items"][0]["available"], json!(true));
        assert_eq!(body["items"][1]["reason"], json!("insufficient"));
        assert_eq!(body["items"][1]["availableQuantity"], json!(2));

        Ok(())
    }
}
