//! Products Repository

use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as, types::Json};
use uuid::Uuid;

use crate::{
    database::{try_get_amount, try_get_count, try_get_timestamp},
    domain::products::{
        data::ProductFilter,
        records::{ProductRecord, ProductUuid},
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_PRODUCT_BY_SLUG_SQL: &str = include_str!("sql/get_product_by_slug.sql");
const GET_PRODUCTS_SQL: &str = include_str!("sql/get_products.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        pool: &PgPool,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(filter.search.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.featured)
            .bind(filter.sort.as_str())
            .bind(i64::from(filter.effective_limit()))
            .bind(i64::from(filter.offset))
            .fetch_all(pool)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        pool: &PgPool,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(pool)
            .await
    }

    pub(crate) async fn get_product_by_slug(
        &self,
        pool: &PgPool,
        slug: &str,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    pub(crate) async fn get_products(
        &self,
        pool: &PgPool,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(GET_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let sale_price: Option<i64> = row.try_get("sale_price")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            slug: row.try_get("slug")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            price: try_get_amount(row, "price")?,
            sale_price: sale_price
                .map(u64::try_from)
                .transpose()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "sale_price".to_string(),
                    source: Box::new(e),
                })?,
            stock_quantity: try_get_count(row, "stock_quantity")?,
            track_inventory: row.try_get("track_inventory")?,
            images: row.try_get::<Json<Vec<String>>, _>("images")?.0,
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            featured: row.try_get("featured")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
