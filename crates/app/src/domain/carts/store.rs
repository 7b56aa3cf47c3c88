//! Cart store: a loaded cart plus its persistence and change notification.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::carts::{
    data::CartLine,
    errors::{CartError, CartsServiceError},
    records::{Cart, CartItem, CartItemUuid, SessionId},
    repository::{CartsRepository, VersionedCart},
};

/// How many times a mutation is replayed on a freshly loaded cart before giving up.
const SAVE_ATTEMPTS: usize = 3;

/// What the last mutation did, so a UI can decide whether to open the cart sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    Loaded,
    Added,
    Updated,
    Removed,
    Cleared,
}

/// Badge-sized view of a cart published after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub item_count: u64,
    pub subtotal: u64,
    pub change: CartChange,
}

impl CartSummary {
    fn of(cart: &Cart, change: CartChange) -> Self {
        Self {
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
            change,
        }
    }
}

pub struct CartStore {
    cart: Cart,
    version: Option<i64>,
    storage: Arc<dyn CartsRepository>,
    changes: watch::Sender<CartSummary>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart for a session, starting an empty one when none is stored.
    pub(crate) async fn open(
        storage: Arc<dyn CartsRepository>,
        session: SessionId,
    ) -> Result<Self, sqlx::Error> {
        let (cart, version) = match storage.find_cart(&session).await? {
            Some(VersionedCart { cart, version }) => (cart, Some(version)),
            None => (Cart::new(session), None),
        };

        let (changes, _receiver) = watch::channel(CartSummary::of(&cart, CartChange::Loaded));

        Ok(Self {
            cart,
            version,
            storage,
            changes,
        })
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.changes.subscribe()
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    /// Returns the new item count.
    ///
    /// # Errors
    ///
    /// Returns an error when the line is rejected or the cart keeps changing underneath;
    /// nothing is persisted then.
    pub async fn add_item(&mut self, line: CartLine) -> Result<u64, CartsServiceError> {
        self.apply(|cart| {
            cart.add_item(line.clone())?;

            Ok(Some(CartChange::Added))
        })
        .await?;

        Ok(self.cart.item_count())
    }

    /// # Errors
    ///
    /// Returns an error when the line does not exist, the quantity does not fit or the
    /// cart keeps changing underneath.
    pub async fn update_quantity(
        &mut self,
        line: CartItemUuid,
        quantity: i64,
    ) -> Result<(), CartsServiceError> {
        self.apply(|cart| {
            cart.update_quantity(line, quantity)?;

            Ok(Some(if quantity <= 0 {
                CartChange::Removed
            } else {
                CartChange::Updated
            }))
        })
        .await?;

        Ok(())
    }

    /// Returns whether a line was removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart keeps changing underneath.
    pub async fn remove_item(&mut self, line: CartItemUuid) -> Result<bool, CartsServiceError> {
        self.apply(|cart| Ok(cart.remove_item(line).then_some(CartChange::Removed)))
            .await
    }

    /// Take the units of an already placed order out of the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart keeps changing underneath.
    pub async fn remove_ordered(&mut self, ordered: &[CartItem]) -> Result<bool, CartsServiceError> {
        self.apply(|cart| Ok(cart.remove_ordered(ordered).then_some(CartChange::Removed)))
            .await
    }

    /// # Errors
    ///
    /// Returns an error when the cart keeps changing underneath.
    pub async fn clear(&mut self) -> Result<(), CartsServiceError> {
        self.apply(|cart| {
            cart.clear();

            Ok(Some(CartChange::Cleared))
        })
        .await?;

        Ok(())
    }

    /// Run a mutation on a copy of the cart, persist it against the version it was based
    /// on, then publish. When another writer saved first the cart is reloaded and the
    /// mutation replayed. A failed write is logged and swallowed: the in-memory cart
    /// remains the answer for this request.
    ///
    /// The mutation returns `None` when it left the cart unchanged. Returns whether
    /// anything was committed.
    async fn apply<F>(&mut self, mut mutate: F) -> Result<bool, CartsServiceError>
    where
        F: FnMut(&mut Cart) -> Result<Option<CartChange>, CartError> + Send,
    {
        for attempt in 1..=SAVE_ATTEMPTS {
            let mut next = self.cart.clone();

            let Some(change) = mutate(&mut next)? else {
                return Ok(false);
            };

            next.updated_at = Timestamp::now();

            match self.storage.save_cart(&next, self.version).await {
                Ok(Some(version)) => self.version = Some(version),
                Ok(None) => {
                    debug!(
                        session_id = %next.session_id,
                        attempt,
                        "cart changed since it was loaded; reloading"
                    );

                    self.reload().await?;

                    continue;
                }
                Err(source) => {
                    warn!(session_id = %next.session_id, "failed to persist cart: {source}");
                }
            }

            self.cart = next;
            self.changes
                .send_replace(CartSummary::of(&self.cart, change));

            return Ok(true);
        }

        warn!(
            session_id = %self.cart.session_id,
            attempts = SAVE_ATTEMPTS,
            "cart kept changing during save"
        );

        Err(CartsServiceError::Conflict)
    }

    async fn reload(&mut self) -> Result<(), sqlx::Error> {
        match self.storage.find_cart(&self.cart.session_id).await? {
            Some(VersionedCart { cart, version }) => {
                self.cart = cart;
                self.version = Some(version);
            }
            None => {
                self.cart = Cart::new(self.cart.session_id.clone());
                self.version = None;
            }
        }

        Ok(())
    }
}
