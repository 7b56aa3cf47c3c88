//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use storefront_app::{auth::AccessScope, domain::carts::records::SessionId};

const ACCESS_SCOPE_DEPOT_KEY: &str = "access_scope";
const SESSION_ID_DEPOT_KEY: &str = "session_id";

/// Typed access to values the middleware stores on the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_access_scope(&mut self, scope: AccessScope);

    /// The caller's scope; public unless an admin session was verified.
    fn access_scope(&self) -> AccessScope;

    fn insert_session_id(&mut self, session: SessionId);

    fn session_id_or_500(&self) -> Result<SessionId, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_access_scope(&mut self, scope: AccessScope) {
        self.insert(ACCESS_SCOPE_DEPOT_KEY, scope);
    }

    fn access_scope(&self) -> AccessScope {
        self.get::<AccessScope>(ACCESS_SCOPE_DEPOT_KEY)
            .copied()
            .unwrap_or_default()
    }

    fn insert_session_id(&mut self, session: SessionId) {
        self.insert(SESSION_ID_DEPOT_KEY, session);
    }

    fn session_id_or_500(&self) -> Result<SessionId, StatusError> {
        self.get::<SessionId>(SESSION_ID_DEPOT_KEY)
            .cloned()
            .map_err(|_ignored| StatusError::internal_server_error())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn access_scope_defaults_to_public() {
        let mut depot = Depot::new();

        assert_eq!(depot.access_scope(), AccessScope::Public);

        depot.insert_access_scope(AccessScope::Admin);

        assert_eq!(depot.access_scope(), AccessScope::Admin);
    }

    #[test]
    fn session_id_round_trips() -> TestResult {
        let mut depot = Depot::new();

        assert!(depot.session_id_or_500().is_err());

        depot.insert_session_id(SessionId::parse("session-1")?);

        assert_eq!(depot.session_id_or_500()?.as_str(), "session-1");

        Ok(())
    }
}
