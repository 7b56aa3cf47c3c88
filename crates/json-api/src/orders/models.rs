//! Order request and response bodies.

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::{
    domain::orders::records::{
        Address, CustomerInfo, OrderItem, OrderSummary, OrderView, PaymentDetails,
    },
    money,
};

/// Customer contact details.
///
/// Fields default to empty so missing data surfaces as a validation message rather than a
/// parse failure.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CustomerInfoBody {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl From<CustomerInfoBody> for CustomerInfo {
    fn from(body: CustomerInfoBody) -> Self {
        Self {
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone.filter(|phone| !phone.trim().is_empty()),
        }
    }
}

impl From<CustomerInfo> for CustomerInfoBody {
    fn from(customer: CustomerInfo) -> Self {
        Self {
            email: customer.email,
            first_name: customer.first_name,
            last_name: customer.last_name,
            phone: customer.phone,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AddressBody {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl From<AddressBody> for Address {
    fn from(body: AddressBody) -> Self {
        Self {
            address: body.address,
            address2: body.address2,
            city: body.city,
            state: body.state,
            postal_code: body.postal_code,
            country: body.country,
        }
    }
}

impl From<Address> for AddressBody {
    fn from(address: Address) -> Self {
        Self {
            address: address.address,
            address2: address.address2,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// A line of a directly placed order.
///
/// `name`, `image` and `price` are what the client displayed. The stored line takes them from
/// the catalogue instead.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemBody {
    pub product_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

impl OrderItemBody {
    pub(crate) fn into_item(self) -> Result<OrderItem, StatusError> {
        let unit_price = money::to_cents(self.price).map_err(|error| {
            StatusError::bad_request().brief(format!("Invalid item price: {error}"))
        })?;

        Ok(OrderItem {
            product_uuid: self.product_id.into(),
            variant: self.variant_id,
            name: self.name,
            image: self.image,
            quantity: self.quantity,
            unit_price,
        })
    }
}

/// Order line as rendered to callers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub product_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,

    /// Unit price in major units
    pub price: f64,

    pub line_total: f64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_uuid.into(),
            line_total: money::to_major(item.line_total()),
            variant_id: item.variant,
            name: item.name,
            image: item.image,
            quantity: item.quantity,
            price: money::to_major(item.unit_price),
        }
    }
}

/// Order Response
///
/// Payment references are only present for admin-scoped callers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub customer_info: CustomerInfoBody,
    pub shipping_address: AddressBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<AddressBody>,
    pub items: Vec<OrderItemResponse>,

    /// Order total in major units
    pub total: f64,

    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        let PaymentDetails {
            payment_intent_id,
            transaction_id,
        } = order.payment.unwrap_or_default();

        Self {
            id: order.uuid.into(),
            order_number: order.order_number,
            customer_info: order.customer.into(),
            shipping_address: order.shipping_address.into(),
            billing_address: order.billing_address.map(Into::into),
            items: order.items.into_iter().map(Into::into).collect(),
            total: money::to_major(order.total),
            status: order.status.to_string(),
            payment_intent_id,
            transaction_id,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order listing row.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderSummaryResponse {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub item_count: u64,
    pub total: f64,
    pub status: String,
    pub created_at: String,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(summary: OrderSummary) -> Self {
        Self {
            id: summary.uuid.into(),
            order_number: summary.order_number,
            customer_name: summary.customer_name,
            customer_email: summary.customer_email,
            item_count: summary.item_count,
            total: money::to_major(summary.total),
            status: summary.status.to_string(),
            created_at: summary.created_at.to_string(),
        }
    }
}

/// Envelope for a single order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderEnvelope {
    pub order: OrderResponse,
}

/// Envelope for a placed or deleted order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderSuccessResponse {
    pub success: bool,
    pub order: OrderResponse,
}

/// Parse an optional inbound total in major units.
pub(crate) fn expected_total(total: Option<f64>) -> Result<Option<u64>, StatusError> {
    total
        .map(money::to_cents)
        .transpose()
        .map_err(|_invalid| StatusError::bad_request().brief("Valid order total is required"))
}

#[cfg(test)]
mod tests {
    use storefront_app::{
        auth::AccessScope,
        domain::orders::{records::OrderUuid, status::OrderStatus},
    };
    use testresult::TestResult;

    use crate::test_helpers::make_order;

    use super::*;

    #[test]
    fn renders_major_units_and_camel_case() -> TestResult {
        let order = make_order(OrderUuid::new(), OrderStatus::Pending);

        let json = serde_json::to_value(OrderResponse::from(order.view(AccessScope::Public)))?;

        assert_eq!(json["orderNumber"], "ISP-1000");
        assert_eq!(json["total"], 20.0);
        assert_eq!(json["items"][0]["price"], 10.0);
        assert_eq!(json["customerInfo"]["firstName"], "Ada");
        assert!(json.get("paymentIntentId").is_none());
        assert!(json.get("transactionId").is_none());

        Ok(())
    }

    #[test]
    fn admin_view_keeps_payment_references() -> TestResult {
        let order = make_order(OrderUuid::new(), OrderStatus::Processing);

        let json = serde_json::to_value(OrderResponse::from(order.view(AccessScope::Admin)))?;

        assert_eq!(json["paymentIntentId"], "pi_123");
        assert_eq!(json["transactionId"], "txn_456");

        Ok(())
    }

    #[test]
    fn rejects_negative_totals() {
        assert!(expected_total(Some(-1.0)).is_err());
        assert_eq!(expected_total(Some(20.0)).ok(), Some(Some(2000)));
        assert_eq!(expected_total(None).ok(), Some(None));
    }
}
