//! Products service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::{
    database::Db,
    domain::products::{
        data::{ProductFilter, StockRequest},
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
        stock::{self, StockCheck},
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        Ok(self
            .repository
            .list_products(self.db.pool(), &filter)
            .await?)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        Ok(self.repository.get_product(self.db.pool(), product).await?)
    }

    async fn get_product_by_slug(&self, slug: &str) -> Result<ProductRecord, ProductsServiceError> {
        Ok(self
            .repository
            .get_product_by_slug(self.db.pool(), slug)
            .await?)
    }

    async fn check_stock(
        &self,
        items: Vec<StockRequest>,
    ) -> Result<Vec<StockCheck>, ProductsServiceError> {
        let requests = stock::aggregate(&items);
        let uuids: Vec<ProductUuid> = requests.iter().map(|item| item.product_uuid).collect();

        let products: FxHashMap<ProductUuid, ProductRecord> = self
            .repository
            .get_products(self.db.pool(), &uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        Ok(requests
            .iter()
            .map(|request| stock::evaluate(products.get(&request.product_uuid), request))
            .collect())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// List active products matching the filter.
    async fn list_products(
        &self,
        filter: ProductFilter,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a product by id, whatever its status.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Retrieve an active product by slug.
    async fn get_product_by_slug(&self, slug: &str) -> Result<ProductRecord, ProductsServiceError>;

    /// Check requested quantities against stock, one result per distinct product.
    async fn check_stock(
        &self,
        items: Vec<StockRequest>,
    ) -> Result<Vec<StockCheck>, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::{data::ProductSort, records::ProductStatus, stock::StockShortfall},
        test::{TestContext, helpers::create_product},
    };

    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL test container"]
    async fn list_products_hides_drafts_and_sorts_by_price() -> TestResult {
        let ctx = TestContext::new().await;

        create_product(&ctx, "cheap", 500, ProductStatus::Active).await?;
        create_product(&ctx, "dear", 2500, ProductStatus::Active).await?;
        create_product(&ctx, "hidden", 100, ProductStatus::Draft).await?;

        let products = ctx
            .products
            .list_products(ProductFilter {
                sort: ProductSort::PriceAsc,
                ..ProductFilter::default()
            })
            .await?;

        let slugs: Vec<&str> = products.iter().map(|p| p.slug.as_str()).collect();

        assert_eq!(slugs, vec!["cheap", "dear"]);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL test container"]
    async fn get_product_by_slug_skips_inactive_products() -> TestResult {
        let ctx = TestContext::new().await;

        create_product(&ctx, "retired", 500, ProductStatus::Inactive).await?;

        let result = ctx.products.get_product_by_slug("retired").await;

        assert!(matches!(result, Err(ProductsServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL test container"]
    async fn check_stock_reports_missing_and_insufficient_products() -> TestResult {
        let ctx = TestContext::new().await;

        let product = create_product(&ctx, "cards", 500, ProductStatus::Active).await?;
        let missing = ProductUuid::new();

        let checks = ctx
            .products
            .check_stock(vec![
                StockRequest {
                    product_uuid: product.uuid,
                    quantity: 8,
                },
                StockRequest {
                    product_uuid: missing,
                    quantity: 1,
                },
                StockRequest {
                    product_uuid: product.uuid,
                    quantity: 8,
                },
            ])
            .await?;

        assert_eq!(checks.len(), 2);
        assert_eq!(
            checks.first().and_then(|check| check.shortfall),
            Some(StockShortfall::Insufficient { available: 10 })
        );
        assert_eq!(
            checks.get(1).and_then(|check| check.shortfall),
            Some(StockShortfall::NotFound)
        );

        Ok(())
    }
}
