//! Carts service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{CartLine, NewCartItem},
            errors::{CartError, CartsServiceError},
            records::{Cart, CartItem, CartItemUuid, SessionId},
            repository::{CartsRepository, PgCartsRepository},
            store::CartStore,
        },
        products::{ProductsService, ProductsServiceError},
    },
};

#[derive(Clone)]
pub struct PgCartsService {
    repository: Arc<dyn CartsRepository>,
    products: Arc<dyn ProductsService>,
}

impl fmt::Debug for PgCartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgCartsService").finish_non_exhaustive()
    }
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: &Db, products: Arc<dyn ProductsService>) -> Self {
        Self {
            repository: Arc::new(PgCartsRepository::new(db)),
            products,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(
        repository: impl CartsRepository + 'static,
        products: impl ProductsService + 'static,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            products: Arc::new(products),
        }
    }

    async fn open(&self, session: SessionId) -> Result<CartStore, CartsServiceError> {
        Ok(CartStore::open(Arc::clone(&self.repository), session).await?)
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, session: SessionId) -> Result<Cart, CartsServiceError> {
        Ok(self.open(session).await?.into_cart())
    }

    async fn add_item(
        &self,
        session: SessionId,
        item: NewCartItem,
    ) -> Result<Cart, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity.into());
        }

        let product = match self.products.get_product(item.product_uuid).await {
            Ok(product) => product,
            Err(ProductsServiceError::NotFound) => return Err(CartsServiceError::ProductNotFound),
            Err(source) => return Err(CartsServiceError::Products(source)),
        };

        if !product.is_active() {
            return Err(CartsServiceError::ProductUnavailable);
        }

        let mut store = self.open(session).await?;

        let count = store
            .add_item(CartLine::snapshot(&product, item.variant, item.quantity))
            .await?;

        info!(
            session_id = %store.cart().session_id,
            product_uuid = %product.uuid,
            item_count = count,
            "added item to cart"
        );

        Ok(store.into_cart())
    }

    async fn update_quantity(
        &self,
        session: SessionId,
        line: CartItemUuid,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError> {
        let mut store = self.open(session).await?;

        store.update_quantity(line, quantity).await?;

        Ok(store.into_cart())
    }

    async fn remove_item(
        &self,
        session: SessionId,
        line: CartItemUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut store = self.open(session).await?;

        if !store.remove_item(line).await? {
            debug!(line_uuid = %line, "cart line already absent");
        }

        Ok(store.into_cart())
    }

    async fn clear_cart(&self, session: SessionId) -> Result<Cart, CartsServiceError> {
        let mut store = self.open(session).await?;

        store.clear().await?;

        Ok(store.into_cart())
    }

    async fn remove_ordered(
        &self,
        session: SessionId,
        ordered: Vec<CartItem>,
    ) -> Result<Cart, CartsServiceError> {
        let mut store = self.open(session).await?;

        if !store.remove_ordered(&ordered).await? {
            debug!(session_id = %store.cart().session_id, "ordered lines already gone from cart");
        }

        Ok(store.into_cart())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the session's cart; an unknown session yields an empty cart.
    async fn get_cart(&self, session: SessionId) -> Result<Cart, CartsServiceError>;

    /// Add a product to the session's cart, snapshotting its price.
    async fn add_item(
        &self,
        session: SessionId,
        item: NewCartItem,
    ) -> Result<Cart, CartsServiceError>;

    /// Set a line's quantity; zero or less removes it.
    async fn update_quantity(
        &self,
        session: SessionId,
        line: CartItemUuid,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line if present.
    async fn remove_item(
        &self,
        session: SessionId,
        line: CartItemUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Empty the session's cart.
    async fn clear_cart(&self, session: SessionId) -> Result<Cart, CartsServiceError>;

    /// Take the units of placed order lines out of the session's cart, keeping anything
    /// added since the order was taken.
    async fn remove_ordered(
        &self,
        session: SessionId,
        ordered: Vec<CartItem>,
    ) -> Result<Cart, CartsServiceError>;
}
