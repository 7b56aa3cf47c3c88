//! Orders Service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    auth::AccessScope,
    database::Db,
    domain::orders::{
        data::{NewOrder, OrderFilter, OrderLookup, OrderValidationError, StatusUpdate},
        errors::OrdersServiceError,
        records::{Order, OrderSummary, OrderView},
        repository::{OrdersRepository, PgOrdersRepository},
    },
};

#[derive(Clone)]
pub struct PgOrdersService {
    repository: Arc<dyn OrdersRepository>,
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService").finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        Self {
            repository: Arc::new(PgOrdersRepository::new(db)),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(repository: impl OrdersRepository + 'static) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    async fn require(&self, lookup: &OrderLookup) -> Result<Order, OrdersServiceError> {
        self.repository
            .find_order(lookup)
            .await?
            .ok_or(OrdersServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validate and persist a new order with status `pending`.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Fetch an order by uuid or order number, shaped for the caller's scope.
    ///
    /// Order numbers are sequential, so a public lookup by number only succeeds when `email`
    /// matches the buyer. Any other outcome is reported as not found.
    async fn get_order(
        &self,
        lookup: OrderLookup,
        scope: AccessScope,
        email: Option<String>,
    ) -> Result<OrderView, OrdersServiceError>;

    /// List orders newest first. Public callers must narrow the listing by email.
    async fn list_orders(
        &self,
        filter: OrderFilter,
        scope: AccessScope,
    ) -> Result<Vec<OrderSummary>, OrdersServiceError>;

    /// Move an order to a new status.
    async fn update_status(
        &self,
        lookup: OrderLookup,
        update: StatusUpdate,
    ) -> Result<Order, OrdersServiceError>;

    /// Delete an order, returning what was removed.
    async fn delete_order(&self, lookup: OrderLookup) -> Result<Order, OrdersServiceError>;
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let draft = order.into_draft()?;

        let order = self.repository.create_order(&draft).await?;

        info!(
            order_uuid = %order.uuid,
            order_number = %order.order_number,
            total = order.total,
            "order created"
        );

        Ok(order)
    }

    async fn get_order(
        &self,
        lookup: OrderLookup,
        scope: AccessScope,
        email: Option<String>,
    ) -> Result<OrderView, OrdersServiceError> {
        let order = self.require(&lookup).await?;

        let proven = match (&lookup, scope) {
            (OrderLookup::Number(_), AccessScope::Public) => {
                email.as_deref().is_some_and(|email| order.placed_by(email))
            }
            (OrderLookup::Uuid(_), _) | (_, AccessScope::Admin) => true,
        };

        if !proven {
            debug!(%lookup, "public order lookup without matching email");

            return Err(OrdersServiceError::NotFound);
        }

        Ok(order.view(scope))
    }

    async fn list_orders(
        &self,
        filter: OrderFilter,
        scope: AccessScope,
    ) -> Result<Vec<OrderSummary>, OrdersServiceError> {
        if scope == AccessScope::Public && !filter.has_email() {
            return Err(OrderValidationError::MissingLookup.into());
        }

        let orders = self.repository.list_orders(&filter).await?;

        Ok(orders.iter().map(Order::summary).collect())
    }

    async fn update_status(
        &self,
        lookup: OrderLookup,
        update: StatusUpdate,
    ) -> Result<Order, OrdersServiceError> {
        let current = self.require(&lookup).await?;

        current.status.transition_to(update.status)?;

        let updated = self
            .repository
            .update_status(current.uuid, current.updated_at, &update)
            .await?;

        if let Some(order) = updated {
            info!(
                order_uuid = %order.uuid,
                from = %current.status,
                to = %order.status,
                "order status updated"
            );

            return Ok(order);
        }

        // No row matched: either someone else wrote first or the order is gone.
        match self
            .repository
            .find_order(&OrderLookup::Uuid(current.uuid))
            .await?
        {
            Some(_) => Err(OrdersServiceError::Conflict),
            None => Err(OrdersServiceError::NotFound),
        }
    }

    async fn delete_order(&self, lookup: OrderLookup) -> Result<Order, OrdersServiceError> {
        let order = self.require(&lookup).await?;

        if self.repository.delete_order(order.uuid).await? == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        info!(order_uuid = %order.uuid, "order deleted");

        Ok(order)
    }
}
