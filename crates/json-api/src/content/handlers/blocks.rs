//! Content Blocks Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;

use storefront_app::gateway::validate_asset_path;

use crate::{
    extensions::*,
    gateway::{forwarded_query, into_status_error},
    state::State,
};

/// Content Blocks Handler
///
/// Fetches the blocks stored under a page path, e.g. `home/hero`.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let path = req.param::<String>("path").unwrap_or_default();

    let path = validate_asset_path(&path)
        .map_err(|_invalid| StatusError::bad_request().brief("Invalid content block path"))?;

    let blocks = state
        .app
        .gateway
        .fetch_json(&format!("/api/content/blocks/{path}"), forwarded_query(req))
        .await
        .map_err(|error| into_status_error(&error, "Failed to fetch content blocks"))?;

    Ok(Json(blocks))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::gateway::{GatewayError, MockContentGateway};

    use crate::test_helpers::gateway_service;

    use super::*;

    fn route() -> Router {
        Router::with_path("content/blocks/{**path}").get(handler)
    }

    #[tokio::test]
    async fn test_blocks_are_fetched_by_nested_path() -> TestResult {
        let mut gateway = MockContentGateway::new();

        gateway
            .expect_fetch_json()
            .once()
            .withf(|path, query| {
                path == "/api/content/blocks/home/hero"
                    && query == &[("lang".to_string(), "ar".to_string())]
            })
            .return_once(|_, _| Ok(json!({ "blocks": [{ "key": "title" }] })));

        let body: serde_json::Value =
            TestClient::get("http://example.com/content/blocks/home/hero?lang=ar")
                .send(&gateway_service(gateway, route()))
                .await
                .take_json()
                .await?;

        assert_eq!(body["blocks"][0]["key"], json!("title"));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_block_path_is_rejected_before_the_backend() -> TestResult {
        let mut gateway = MockContentGateway::new();

        gateway.expect_fetch_json().never();

        let mut res = TestClient::get("http://example.com/content/blocks")
            .send(&gateway_service(gateway, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "error": "Invalid content block path" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_error_upstream_status_is_500_with_the_default_message() -> TestResult {
        let mut gateway = MockContentGateway::new();

        gateway.expect_fetch_json().once().return_once(|_, _| {
            Err(GatewayError::Upstream {
                status: 200,
                message: None,
            })
        });

        let mut res = TestClient::get("http://example.com/content/blocks/about")
            .send(&gateway_service(gateway, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "error": "Failed to fetch content blocks" }));

        Ok(())
    }
}
