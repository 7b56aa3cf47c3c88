//! Order Records

use jiff::Timestamp;

use crate::{
    auth::AccessScope,
    domain::{
        carts::records::CartItem, orders::status::OrderStatus, products::records::ProductUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Marker for [`OrderUuid`].
#[derive(Debug)]
pub struct OrderRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub address: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// An order line, frozen when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub product_uuid: ProductUuid,
    pub variant: Option<String>,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub unit_price: u64,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_uuid: item.product_uuid,
            variant: item.variant.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// Payment references only admins may see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentDetails {
    pub payment_intent_id: Option<String>,
    pub transaction_id: Option<String>,
}

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub customer: CustomerInfo,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub items: Vec<OrderItem>,
    pub total: u64,
    pub status: OrderStatus,
    pub payment: PaymentDetails,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Render the order for a caller, dropping payment references unless they are an admin.
    #[must_use]
    pub fn view(self, scope: AccessScope) -> OrderView {
        let payment = match scope {
            AccessScope::Admin => Some(self.payment),
            AccessScope::Public => None,
        };

        OrderView {
            uuid: self.uuid,
            order_number: self.order_number,
            customer: self.customer,
            shipping_address: self.shipping_address,
            billing_address: self.billing_address,
            items: self.items,
            total: self.total,
            status: self.status,
            payment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Whether `email` is the address the order was placed with, ignoring case and padding.
    #[must_use]
    pub fn placed_by(&self, email: &str) -> bool {
        let email = email.trim();

        !email.is_empty() && self.customer.email.trim().eq_ignore_ascii_case(email)
    }

    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            uuid: self.uuid,
            order_number: self.order_number.clone(),
            customer_name: format!("{} {}", self.customer.first_name, self.customer.last_name),
            customer_email: self.customer.email.clone(),
            item_count: self.items.iter().map(|item| u64::from(item.quantity)).sum(),
            total: self.total,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// An order as returned to a caller. `payment` is `None` for public callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub customer: CustomerInfo,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub items: Vec<OrderItem>,
    pub total: u64,
    pub status: OrderStatus,
    pub payment: Option<PaymentDetails>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing row for order lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub item_count: u64,
    pub total: u64,
    pub status: OrderStatus,
    pub created_at: Timestamp,
}
