//! Cart session middleware.
//!
//! Carts are keyed by an opaque client-chosen id carried in `X-Session-Id`. Requests without
//! one get a fresh id, which is echoed back so the client can keep using it.

use salvo::prelude::*;
use tracing::{debug, warn};

use storefront_app::domain::carts::records::SessionId;

use crate::extensions::*;

pub(crate) const SESSION_HEADER: &str = "x-session-id";

fn session_from(req: &Request) -> Result<SessionId, StatusError> {
    let Some(value) = req.headers().get(SESSION_HEADER) else {
        return Ok(SessionId::generate());
    };

    let value = value.to_str().or_400("Invalid session id")?;

    SessionId::parse(value).or_400("Invalid session id")
}

/// Resolve the cart session for the request and echo it in the response headers.
#[handler]
pub(crate) async fn cart_session(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let session = match session_from(req) {
        Ok(session) => session,
        Err(error) => {
            debug!(path = %req.uri().path(), "rejected cart session header");

            res.render(error);

            return;
        }
    };

    if let Err(error) = res.add_header(SESSION_HEADER, session.as_str(), true) {
        warn!("failed to echo session id: {error}");
    }

    depot.insert_session_id(session);

    ctrl.call_next(req, depot, res).await;
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn echo_session(depot: &mut Depot) -> Result<String, StatusError> {
        Ok(depot.session_id_or_500()?.to_string())
    }

    fn make_service() -> Service {
        Service::new(Router::with_path("cart").hoop(cart_session).get(echo_session))
    }

    #[tokio::test]
    async fn test_supplied_session_is_used_and_echoed() -> TestResult {
        let mut res = TestClient::get("http://example.com/cart")
            .add_header(SESSION_HEADER, "session-abc", true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            res.headers().get(SESSION_HEADER).and_then(|v| v.to_str().ok()),
            Some("session-abc")
        );
        assert_eq!(res.take_string().await?, "session-abc");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_session_is_generated() -> TestResult {
        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service())
            .await;

        let echoed = res
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or("session header missing")?;

        assert!(uuid::Uuid::parse_str(&echoed).is_ok(), "generated id: {echoed}");
        assert_eq!(res.take_string().await?, echoed);

        Ok(())
    }

    #[tokio::test]
    async fn test_overlong_session_is_rejected() -> TestResult {
        let res = TestClient::get("http://example.com/cart")
            .add_header(SESSION_HEADER, "s".repeat(SessionId::MAX_LEN + 1), true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
