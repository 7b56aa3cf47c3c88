//! Cart Records

use std::fmt;

use jiff::Timestamp;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    domain::{carts::{data::CartLine, errors::CartError}, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Cart line UUID
pub type CartItemUuid = TypedUuid<CartItem>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidSessionId {
    #[error("session id is empty")]
    Empty,

    #[error("session id is longer than {} characters", SessionId::MAX_LEN)]
    TooLong,

    #[error("session id contains unsupported characters")]
    InvalidCharacters,
}

/// Opaque, client-chosen cart key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub const MAX_LEN: usize = 128;

    /// Validate a session id supplied by a client.
    ///
    /// # Errors
    ///
    /// Returns an error for empty, overlong or non-printable ids.
    pub fn parse(value: &str) -> Result<Self, InvalidSessionId> {
        let value = value.trim();

        if value.is_empty() {
            return Err(InvalidSessionId::Empty);
        }

        if value.len() > Self::MAX_LEN {
            return Err(InvalidSessionId::TooLong);
        }

        if !value.chars().all(|c| c.is_ascii_graphic()) {
            return Err(InvalidSessionId::InvalidCharacters);
        }

        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A product line in a cart. The price, name and image are snapshots taken when the
/// product was first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub variant: Option<String>,
    pub quantity: u32,
    pub unit_price: u64,
    pub name: String,
    pub image: Option<String>,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// Cart Record
///
/// Lines keep insertion order, which is also display order. No line ever has a zero
/// quantity: reducing a line to zero removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub session_id: SessionId,
    pub items: Vec<CartItem>,
    pub updated_at: Timestamp,
}

impl Cart {
    #[must_use]
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            items: Vec::new(),
            updated_at: Timestamp::now(),
        }
    }

    /// Add units of a product, merging into an existing line for the same product and
    /// variant. Returns the new item count.
    ///
    /// # Errors
    ///
    /// Returns an error when the quantity is zero or the merged quantity overflows.
    pub fn add_item(&mut self, line: CartLine) -> Result<u64, CartError> {
        if line.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let existing = self
            .items
            .iter_mut()
            .find(|item| item.product_uuid == line.product_uuid && item.variant == line.variant);

        match existing {
            Some(item) => {
                item.quantity = item
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(CartError::QuantityOverflow)?;
            }
            None => self.items.push(CartItem {
                uuid: CartItemUuid::new(),
                product_uuid: line.product_uuid,
                variant: line.variant,
                quantity: line.quantity,
                unit_price: line.unit_price,
                name: line.name,
                image: line.image,
            }),
        }

        Ok(self.item_count())
    }

    /// Set a line's quantity; zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error when the line does not exist or the quantity does not fit.
    pub fn update_quantity(&mut self, line: CartItemUuid, quantity: i64) -> Result<(), CartError> {
        let position = self
            .items
            .iter()
            .position(|item| item.uuid == line)
            .ok_or(CartError::ItemNotFound)?;

        if quantity <= 0 {
            self.items.remove(position);

            return Ok(());
        }

        let quantity = u32::try_from(quantity).map_err(|_overflow| CartError::QuantityOverflow)?;

        if let Some(item) = self.items.get_mut(position) {
            item.quantity = quantity;
        }

        Ok(())
    }

    /// Remove a line. Returns whether a line was removed.
    pub fn remove_item(&mut self, line: CartItemUuid) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.uuid != line);

        self.items.len() != before
    }

    /// Take the units of placed order lines out of the cart. Each matching line loses the
    /// ordered quantity, so units added after the order was taken stay behind. Returns
    /// whether anything changed.
    pub fn remove_ordered(&mut self, ordered: &[CartItem]) -> bool {
        let mut changed = false;

        for taken in ordered {
            if let Some(item) = self.items.iter_mut().find(|item| item.uuid == taken.uuid) {
                item.quantity = item.quantity.saturating_sub(taken.quantity);
                changed = true;
            }
        }

        self.items.retain(|item| item.quantity > 0);

        changed
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |total, item| total.saturating_add(item.line_total()))
    }
}
