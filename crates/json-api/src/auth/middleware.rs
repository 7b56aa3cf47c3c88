//! Admin session middleware.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;
use tracing::{debug, warn};

use storefront_app::auth::{AccessScope, AdminSessionError};

use crate::{
    auth::{ADMIN_SESSION_COOKIE, credentials::cookie_or_bearer},
    extensions::*,
    state::State,
};

fn verify(req: &Request, state: &State) -> Result<(), AdminSessionError> {
    let token =
        cookie_or_bearer(req, ADMIN_SESSION_COOKIE).ok_or(AdminSessionError::InvalidCredentials)?;

    state.app.sessions.verify(&token, Timestamp::now())?;

    Ok(())
}

/// Reject the request unless it carries a valid admin session.
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    if let Err(error) = verify(req, &state) {
        warn!(reason = %error, path = %req.uri().path(), "rejected admin request");

        res.render(StatusError::unauthorized().brief("Authentication required"));

        return;
    }

    depot.insert_access_scope(AccessScope::Admin);

    ctrl.call_next(req, depot, res).await;
}

/// Mark the request as admin-scoped when it carries a valid session. Never rejects.
#[salvo::handler]
pub(crate) async fn detect_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let scope = match depot.obtain::<Arc<State>>() {
        Ok(state) => match verify(req, state) {
            Ok(()) => AccessScope::Admin,
            Err(error) => {
                if !matches!(error, AdminSessionError::InvalidCredentials) {
                    debug!(reason = %error, "ignoring invalid admin session");
                }

                AccessScope::Public
            }
        },
        Err(_error) => AccessScope::Public,
    };

    depot.insert_access_scope(scope);

    ctrl.call_next(req, depot, res).await;
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::{AUTHORIZATION, COOKIE},
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use crate::test_helpers::{admin_token, service, test_app};

    use super::*;

    #[salvo::handler]
    async fn echo_scope(depot: &mut Depot, res: &mut Response) {
        res.render(if depot.access_scope().is_admin() {
            "admin"
        } else {
            "public"
        });
    }

    fn make_service(hoop: impl Handler) -> Service {
        service(test_app(), Router::new().hoop(hoop).get(echo_scope))
    }

    #[tokio::test]
    async fn test_missing_session_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&make_service(require_admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_forged_session_returns_401() -> TestResult {
        let mut forged = admin_token()?;
        let last = forged.pop();

        forged.push(if last == Some('0') { '1' } else { '0' });

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, format!("Bearer {forged}"), true)
            .send(&make_service(require_admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_session_cookie_grants_admin_scope() -> TestResult {
        let token = admin_token()?;

        let mut res = TestClient::get("http://example.com")
            .add_header(COOKIE, format!("{ADMIN_SESSION_COOKIE}={token}"), true)
            .send(&make_service(require_admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "admin");

        Ok(())
    }

    #[tokio::test]
    async fn test_detection_never_rejects() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer v1.garbage", true)
            .send(&make_service(detect_admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "public");

        Ok(())
    }

    #[tokio::test]
    async fn test_detection_recognises_valid_bearer() -> TestResult {
        let token = admin_token()?;

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
            .send(&make_service(detect_admin))
            .await;

        assert_eq!(res.take_string().await?, "admin");

        Ok(())
    }
}
