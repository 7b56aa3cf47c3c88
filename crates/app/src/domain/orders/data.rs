//! Orders Data

use std::fmt;

use thiserror::Error;

use crate::domain::orders::{
    records::{Address, CustomerInfo, OrderItem, OrderUuid},
    status::OrderStatus,
};

/// Why an order was rejected. The messages are shown to buyers as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error("Customer information is required")]
    MissingCustomer,

    #[error("A valid email address is required")]
    InvalidEmail,

    #[error("Shipping address is required")]
    MissingShippingAddress,

    #[error("Order must contain at least one item")]
    NoItems,

    #[error("Item quantities must be at least 1")]
    InvalidItemQuantity,

    #[error("Valid order total is required")]
    InvalidTotal,

    #[error("Order total does not match items")]
    TotalMismatch,

    #[error("An email address is required to look up orders")]
    MissingLookup,
}

/// A cart snapshot plus buyer information, ready to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer: CustomerInfo,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub items: Vec<OrderItem>,
    /// Total the client displayed, if any. Must equal the computed total.
    pub expected_total: Option<u64>,
    pub payment_intent_id: Option<String>,
}

/// A validated order waiting for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub uuid: OrderUuid,
    pub customer: CustomerInfo,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub items: Vec<OrderItem>,
    pub total: u64,
    pub payment_intent_id: Option<String>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_plausible_email(email: &str) -> bool {
    email
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}

impl NewOrder {
    /// Validate the order and compute its total.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn into_draft(self) -> Result<OrderDraft, OrderValidationError> {
        let customer = &self.customer;

        if is_blank(&customer.email) || is_blank(&customer.first_name) || is_blank(&customer.last_name)
        {
            return Err(OrderValidationError::MissingCustomer);
        }

        if !is_plausible_email(&customer.email) {
            return Err(OrderValidationError::InvalidEmail);
        }

        let shipping = &self.shipping_address;

        if is_blank(&shipping.address) || is_blank(&shipping.city) || is_blank(&shipping.state) {
            return Err(OrderValidationError::MissingShippingAddress);
        }

        if self.items.is_empty() {
            return Err(OrderValidationError::NoItems);
        }

        if self.items.iter().any(|item| item.quantity == 0) {
            return Err(OrderValidationError::InvalidItemQuantity);
        }

        let total = self
            .items
            .iter()
            .try_fold(0_u64, |total, item| {
                item.unit_price
                    .checked_mul(u64::from(item.quantity))
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or(OrderValidationError::InvalidTotal)?;

        if total == 0 {
            return Err(OrderValidationError::InvalidTotal);
        }

        if self.expected_total.is_some_and(|expected| expected != total) {
            return Err(OrderValidationError::TotalMismatch);
        }

        Ok(OrderDraft {
            uuid: OrderUuid::new(),
            customer: CustomerInfo {
                email: self.customer.email.trim().to_string(),
                ..self.customer
            },
            shipping_address: self.shipping_address,
            billing_address: self.billing_address,
            items: self.items,
            total,
            payment_intent_id: self.payment_intent_id,
        })
    }
}

/// Identifies an order by uuid or by its human-readable number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderLookup {
    Uuid(OrderUuid),
    Number(String),
}

impl OrderLookup {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();

        value
            .parse::<OrderUuid>()
            .map_or_else(|_not_uuid| Self::Number(value.to_string()), Self::Uuid)
    }
}

impl fmt::Display for OrderLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(uuid) => write!(f, "{uuid}"),
            Self::Number(number) => f.write_str(number),
        }
    }
}

/// Requested status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub transaction_id: Option<String>,
}

/// Order listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    pub email: Option<String>,
    pub order_number: Option<String>,
    pub limit: u32,
}

impl OrderFilter {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 100;

    /// Public listings must be narrowed by the buyer's email; an order number alone is not
    /// proof of ownership.
    #[must_use]
    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|email| !is_blank(email))
    }

    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            email: None,
            order_number: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
