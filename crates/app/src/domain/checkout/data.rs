//! Checkout Data

use crate::domain::{
    carts::records::Cart,
    orders::{
        data::NewOrder,
        records::{Address, CustomerInfo, OrderItem},
    },
    products::{data::StockRequest, records::ProductRecord},
};

/// Everything checkout needs besides the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerInfo {
    pub customer: CustomerInfo,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub payment_intent_id: Option<String>,
    /// Total the buyer saw, checked against the cart.
    pub expected_total: Option<u64>,
}

impl NewOrder {
    /// Freeze the cart's lines into a new order.
    #[must_use]
    pub fn from_cart(cart: &Cart, buyer: BuyerInfo) -> Self {
        Self {
            customer: buyer.customer,
            shipping_address: buyer.shipping_address,
            billing_address: buyer.billing_address,
            items: cart.items.iter().map(OrderItem::from).collect(),
            expected_total: buyer.expected_total,
            payment_intent_id: buyer.payment_intent_id,
        }
    }
}

pub(crate) fn stock_requests(cart: &Cart) -> Vec<StockRequest> {
    cart.items
        .iter()
        .map(|item| StockRequest {
            product_uuid: item.product_uuid,
            quantity: item.quantity,
        })
        .collect()
}

pub(crate) fn order_stock_requests(items: &[OrderItem]) -> Vec<StockRequest> {
    items
        .iter()
        .map(|item| StockRequest {
            product_uuid: item.product_uuid,
            quantity: item.quantity,
        })
        .collect()
}

/// Replace whatever the caller sent for a line with the catalogue's current price, name and
/// image.
pub(crate) fn reprice(item: &mut OrderItem, product: &ProductRecord) {
    item.unit_price = product.effective_price();
    item.name.clone_from(&product.name);
    item.image = product.primary_image().map(str::to_string);
}
