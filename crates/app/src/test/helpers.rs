//! Test Helpers

use sqlx::{Postgres, query_as};

use crate::{
    database::amount_to_i64,
    domain::products::records::{ProductRecord, ProductStatus, ProductUuid},
    test::TestContext,
};

const INSERT_PRODUCT_SQL: &str = r"
INSERT INTO products (uuid, slug, name, price, stock_quantity, images, status)
VALUES ($1, $2, $3, $4, 10, jsonb_build_array('/img/' || $2 || '.png'), $5)
RETURNING
    uuid, slug, name, description, category, price, sale_price, stock_quantity,
    track_inventory, images, status, featured, created_at, updated_at
";

/// Insert a product directly; the storefront never writes products itself.
pub(crate) async fn create_product(
    ctx: &TestContext,
    slug: &str,
    price: u64,
    status: ProductStatus,
) -> Result<ProductRecord, sqlx::Error> {
    query_as::<Postgres, ProductRecord>(INSERT_PRODUCT_SQL)
        .bind(ProductUuid::new().into_uuid())
        .bind(slug)
        .bind(slug.replace('-', " "))
        .bind(amount_to_i64(price)?)
        .bind(status.as_str())
        .fetch_one(ctx.db.pool())
        .await
}
