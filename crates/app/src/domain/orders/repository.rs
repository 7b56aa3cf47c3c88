//! Orders Repository

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, types::Json};
use uuid::Uuid;

use crate::{
    database::{Db, amount_to_i64, try_get_amount, try_get_timestamp},
    domain::{
        orders::{
            data::{OrderDraft, OrderFilter, OrderLookup, StatusUpdate},
            records::{Address, CustomerInfo, Order, OrderItem, OrderUuid, PaymentDetails},
        },
        products::records::ProductUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_BY_NUMBER_SQL: &str = include_str!("sql/get_order_by_number.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const DELETE_ORDER_SQL: &str = include_str!("sql/delete_order.sql");

#[automock]
#[async_trait]
pub(crate) trait OrdersRepository: Send + Sync {
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, sqlx::Error>;

    async fn find_order(&self, lookup: &OrderLookup) -> Result<Option<Order>, sqlx::Error>;

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, sqlx::Error>;

    /// Apply a status change only if the order is still at `expected_updated_at`.
    /// Returns `None` when no row matched.
    async fn update_status(
        &self,
        order: OrderUuid,
        expected_updated_at: Timestamp,
        update: &StatusUpdate,
    ) -> Result<Option<Order>, sqlx::Error>;

    async fn delete_order(&self, order: OrderUuid) -> Result<u64, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub(crate) struct PgOrdersRepository {
    pool: PgPool,
}

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new(db: &Db) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, sqlx::Error> {
        let items: Vec<StoredOrderItem> = draft.items.iter().map(StoredOrderItem::from).collect();

        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(draft.uuid.into_uuid())
            .bind(&draft.customer.email)
            .bind(&draft.customer.first_name)
            .bind(&draft.customer.last_name)
            .bind(draft.customer.phone.as_deref())
            .bind(Json(StoredAddress::from(&draft.shipping_address)))
            .bind(draft.billing_address.as_ref().map(|a| Json(StoredAddress::from(a))))
            .bind(Json(items))
            .bind(amount_to_i64(draft.total)?)
            .bind(draft.payment_intent_id.as_deref())
            .fetch_one(&self.pool)
            .await
    }

    async fn find_order(&self, lookup: &OrderLookup) -> Result<Option<Order>, sqlx::Error> {
        match lookup {
            OrderLookup::Uuid(uuid) => {
                query_as::<Postgres, Order>(GET_ORDER_SQL)
                    .bind(uuid.into_uuid())
                    .fetch_optional(&self.pool)
                    .await
            }
            OrderLookup::Number(number) => {
                query_as::<Postgres, Order>(GET_ORDER_BY_NUMBER_SQL)
                    .bind(number)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(filter.email.as_deref().map(str::trim))
            .bind(filter.order_number.as_deref().map(str::trim))
            .bind(i64::from(filter.effective_limit()))
            .fetch_all(&self.pool)
            .await
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        expected_updated_at: Timestamp,
        update: &StatusUpdate,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(SqlxTimestamp::from(expected_updated_at))
            .bind(update.status.as_str())
            .bind(update.transaction_id.as_deref())
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_order(&self, order: OrderUuid) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredAddress {
    address: String,
    address2: Option<String>,
    city: String,
    state: String,
    postal_code: Option<String>,
    country: Option<String>,
}

impl From<&Address> for StoredAddress {
    fn from(address: &Address) -> Self {
        Self {
            address: address.address.clone(),
            address2: address.address2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }
}

impl From<StoredAddress> for Address {
    fn from(address: StoredAddress) -> Self {
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

#[derive(Debug, Serialize, Deserialize)]
struct StoredOrderItem {
    product_uuid: Uuid,
    variant: Option<String>,
    name: String,
    image: Option<String>,
    quantity: u32,
    unit_price: u64,
}

impl From<&OrderItem> for StoredOrderItem {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_uuid: item.product_uuid.into_uuid(),
            variant: item.variant.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

impl From<StoredOrderItem> for OrderItem {
    fn from(item: StoredOrderItem) -> Self {
        Self {
            product_uuid: ProductUuid::from_uuid(item.product_uuid),
            variant: item.variant,
            name: item.name,
            image: item.image,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let shipping: Json<StoredAddress> = row.try_get("shipping_address")?;
        let billing: Option<Json<StoredAddress>> = row.try_get("billing_address")?;
        let items: Json<Vec<StoredOrderItem>> = row.try_get("items")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            customer: CustomerInfo {
                email: row.try_get("customer_email")?,
                first_name: row.try_get("customer_first_name")?,
                last_name: row.try_get("customer_last_name")?,
                phone: row.try_get("customer_phone")?,
            },
            shipping_address: shipping.0.into(),
            billing_address: billing.map(|billing| billing.0.into()),
            items: items.0.into_iter().map(OrderItem::from).collect(),
            total: try_get_amount(row, "total")?,
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            payment: PaymentDetails {
                payment_intent_id: row.try_get("payment_intent_id")?,
                transaction_id: row.try_get("transaction_id")?,
            },
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
