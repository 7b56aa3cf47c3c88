//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToParameters, ToSchema},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::data::{ProductFilter, ProductSort};

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::ProductResponse},
    state::State,
};

/// Catalogue filters.
#[derive(Debug, Deserialize, ToParameters)]
#[salvo(parameters(default_parameter_in = Query))]
pub(crate) struct ProductsQuery {
    /// Case-insensitive match on name or description
    pub search: Option<String>,

    pub category: Option<String>,

    pub featured: Option<bool>,

    /// `newest` (default), `price_asc`, `price_desc` or `name`
    pub sort: Option<String>,

    /// Page size (default 50, max 100)
    pub limit: Option<u32>,

    pub offset: Option<u32>,
}

impl ProductsQuery {
    fn into_filter(self) -> Result<ProductFilter, StatusError> {
        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<ProductSort>)
            .transpose()
            .or_400("Invalid sort order")?
            .unwrap_or_default();

        Ok(ProductFilter {
            search: self.search.filter(|search| !search.trim().is_empty()),
            category: self.category.filter(|category| !category.trim().is_empty()),
            featured: self.featured,
            sort,
            limit: self.limit.unwrap_or(ProductFilter::DEFAULT_LIMIT),
            offset: self.offset.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// Active products matching the filters
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Lists active products.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Products listed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid sort order"),
    ),
)]
pub(crate) async fn handler(
    query: ProductsQuery,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .products
        .list_products(query.into_filter()?)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext,
        domain::products::{MockProductsService, ProductsServiceError, records::ProductUuid},
    };

    use crate::test_helpers::{make_product, service, test_app};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        service(
            AppContext {
                products: Arc::new(products),
                ..test_app()
            },
            Router::with_path("products").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_returns_products() -> TestResult {
        let uuid = ProductUuid::new();
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|filter| *filter == ProductFilter::default())
            .return_once(move |_| Ok(vec![make_product(uuid)]));

        let response: ProductsResponse = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await
            .take_json()
            .await?;

        assert_eq!(response.products.len(), 1);
        assert_eq!(response.products[0].id, uuid::Uuid::from(uuid));
        assert_eq!(response.products[0].slug, "flash-cards");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_filters() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|filter| {
                filter.search.as_deref() == Some("cards")
                    && filter.category.as_deref() == Some("books")
                    && filter.featured == Some(true)
                    && filter.sort == ProductSort::PriceDesc
                    && filter.limit == 10
                    && filter.offset == 20
            })
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get(
            "http://example.com/products?search=cards&category=books&featured=true&sort=price_desc&limit=10&offset=20",
        )
        .send(&make_service(products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_rejects_unknown_sort() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_list_products().never();

        let res = TestClient::get("http://example.com/products?sort=random")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_storage_error_returns_500() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(|_| Err(ProductsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
