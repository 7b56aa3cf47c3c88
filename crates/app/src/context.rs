//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::AdminSessions,
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        checkout::{CartCheckoutService, CheckoutService},
        donations::{DonationsService, PgDonationsService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
    },
    gateway::{ContentGateway, GatewayConfig, GatewayError, HttpContentGateway},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build upstream client")]
    Gateway(#[source] GatewayError),
}

/// Services shared by every request.
#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub donations: Arc<dyn DonationsService>,
    pub gateway: Arc<dyn ContentGateway>,
    pub sessions: Arc<AdminSessions>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wire the PostgreSQL-backed services around an existing pool.
    #[must_use]
    pub fn new(db: &Db, gateway: Arc<dyn ContentGateway>, sessions: AdminSessions) -> Self {
        let products: Arc<dyn ProductsService> = Arc::new(PgProductsService::new(db.clone()));
        let carts: Arc<dyn CartsService> =
            Arc::new(PgCartsService::new(db, Arc::clone(&products)));
        let orders: Arc<dyn OrdersService> = Arc::new(PgOrdersService::new(db));

        Self {
            checkout: Arc::new(CartCheckoutService::new(
                Arc::clone(&carts),
                Arc::clone(&orders),
                Arc::clone(&products),
            )),
            donations: Arc::new(PgDonationsService::new(db)),
            products,
            carts,
            orders,
            gateway,
            sessions: Arc::new(sessions),
        }
    }

    /// Build application context from a database URL and upstream settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or building the upstream
    /// client fails.
    pub async fn from_database_url(
        url: &str,
        gateway: GatewayConfig,
        sessions: AdminSessions,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let gateway = HttpContentGateway::new(gateway).map_err(AppInitError::Gateway)?;

        Ok(Self::new(&Db::new(pool), Arc::new(gateway), sessions))
    }
}
