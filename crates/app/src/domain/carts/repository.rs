//! Carts Repository
//!
//! A cart is one row keyed by session id with its lines stored as an ordered JSONB array.
//! Each row carries a version that every save must name, so a writer holding a stale copy
//! cannot overwrite lines added since it read the cart.

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as, query_scalar, types::Json};
use uuid::Uuid;

use crate::{
    database::{Db, try_get_timestamp},
    domain::{
        carts::records::{Cart, CartItem, CartItemUuid, SessionId},
        products::records::ProductUuid,
    },
};

const FIND_CART_SQL: &str = include_str!("sql/find_cart.sql");
const INSERT_CART_SQL: &str = include_str!("sql/insert_cart.sql");
const UPDATE_CART_SQL: &str = include_str!("sql/update_cart.sql");

/// A stored cart and the row version the next save must name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VersionedCart {
    pub(crate) cart: Cart,
    pub(crate) version: i64,
}

#[automock]
#[async_trait]
pub(crate) trait CartsRepository: Send + Sync {
    async fn find_cart(&self, session: &SessionId) -> Result<Option<VersionedCart>, sqlx::Error>;

    /// Write the cart if the stored row is still at `expected`, where `None` means no row
    /// exists yet. Returns the new version, or `None` when another writer got there first.
    async fn save_cart(&self, cart: &Cart, expected: Option<i64>)
    -> Result<Option<i64>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub(crate) struct PgCartsRepository {
    pool: PgPool,
}

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new(db: &Db) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl CartsRepository for PgCartsRepository {
    async fn find_cart(&self, session: &SessionId) -> Result<Option<VersionedCart>, sqlx::Error> {
        query_as::<Postgres, VersionedCart>(FIND_CART_SQL)
            .bind(session.as_str())
            .fetch_optional(&self.pool)
            .await
    }

    async fn save_cart(
        &self,
        cart: &Cart,
        expected: Option<i64>,
    ) -> Result<Option<i64>, sqlx::Error> {
        let items: Vec<StoredCartItem> = cart.items.iter().map(StoredCartItem::from).collect();

        let write = match expected {
            None => query_scalar::<Postgres, i64>(INSERT_CART_SQL)
                .bind(cart.session_id.as_str())
                .bind(Json(items))
                .bind(SqlxTimestamp::from(cart.updated_at)),
            Some(version) => query_scalar::<Postgres, i64>(UPDATE_CART_SQL)
                .bind(cart.session_id.as_str())
                .bind(Json(items))
                .bind(SqlxTimestamp::from(cart.updated_at))
                .bind(version),
        };

        write.fetch_optional(&self.pool).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCartItem {
    uuid: Uuid,
    product_uuid: Uuid,
    variant: Option<String>,
    quantity: u32,
    unit_price: u64,
    name: String,
    image: Option<String>,
}

impl From<&CartItem> for StoredCartItem {
    fn from(item: &CartItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            variant: item.variant.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            name: item.name.clone(),
            image: item.image.clone(),
        }
    }
}

impl From<StoredCartItem> for CartItem {
    fn from(item: StoredCartItem) -> Self {
        Self {
            uuid: CartItemUuid::from_uuid(item.uuid),
            product_uuid: ProductUuid::from_uuid(item.product_uuid),
            variant: item.variant,
            quantity: item.quantity,
            unit_price: item.unit_price,
            name: item.name,
            image: item.image,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let session_id: String = row.try_get("session_id")?;
        let items: Json<Vec<StoredCartItem>> = row.try_get("items")?;

        Ok(Self {
            session_id: SessionId::parse(&session_id).map_err(|e| sqlx::Error::ColumnDecode {
                index: "session_id".to_string(),
                source: Box::new(e),
            })?,
            items: items
                .0
                .into_iter()
                .filter(|item| item.quantity > 0)
                .map(CartItem::from)
                .collect(),
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for VersionedCart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            cart: Cart::from_row(row)?,
            version: row.try_get("version")?,
        })
    }
}
