//! Languages Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde_json::Value;

use crate::{
    extensions::*,
    gateway::{forwarded_query, into_status_error},
    state::State,
};

/// Languages Handler
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<Json<Value>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let languages = state
        .app
        .gateway
        .fetch_json("/api/content/languages", forwarded_query(req))
        .await
        .map_err(|error| into_status_error(&error, "Failed to fetch languages"))?;

    Ok(Json(languages))
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
        Router::with_path("content/languages").get(handler)
    }

    #[tokio::test]
    async fn test_languages_pass_through() -> TestResult {
        let mut gateway = MockContentGateway::new();

        gateway
            .expect_fetch_json()
            .once()
            .withf(|path, query| path == "/api/content/languages" && query.is_empty())
            .return_once(|_, _| Ok(json!({ "languages": [{ "code": "ar" }, { "code": "fr" }] })));

        let body: serde_json::Value = TestClient::get("http://example.com/content/languages")
            .send(&gateway_service(gateway, route()))
            .await
            .take_json()
            .await?;

        assert_eq!(body["languages"][1]["code"], json!("fr"));

        Ok(())
    }

    #[tokio::test]
    async fn test_backend_errors_keep_their_status() -> TestResult {
        let mut gateway = MockContentGateway::new();

        gateway.expect_fetch_json().once().return_once(|_, _| {
            Err(GatewayError::Upstream {
                status: 503,
                message: Some("   ".to_string()),
            })
        });

        let mut res = TestClient::get("http://example.com/content/languages")
            .send(&gateway_service(gateway, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "error": "Failed to fetch languages" }));

        Ok(())
    }
}
