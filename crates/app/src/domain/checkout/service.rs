//! Checkout Service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::domain::{
    carts::{CartsService, records::SessionId},
    checkout::{
        data::{BuyerInfo, order_stock_requests, reprice, stock_requests},
        errors::CheckoutError,
    },
    orders::{OrdersService, data::NewOrder, records::Order},
    products::{ProductsService, data::StockRequest, records::ProductRecord, stock::StockCheck},
};

/// Turns a session cart into an order.
#[derive(Clone)]
pub struct CartCheckoutService {
    carts: Arc<dyn CartsService>,
    orders: Arc<dyn OrdersService>,
    products: Arc<dyn ProductsService>,
}

impl fmt::Debug for CartCheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartCheckoutService").finish_non_exhaustive()
    }
}

impl CartCheckoutService {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsService>,
        orders: Arc<dyn OrdersService>,
        products: Arc<dyn ProductsService>,
    ) -> Self {
        Self {
            carts,
            orders,
            products,
        }
    }

    async fn ensure_in_stock(&self, requests: Vec<StockRequest>) -> Result<(), CheckoutError> {
        let unavailable: Vec<StockCheck> = self
            .products
            .check_stock(requests)
            .await?
            .into_iter()
            .filter(|check| !check.is_available())
            .collect();

        if unavailable.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::OutOfStock(unavailable))
        }
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Validate stock, place an order from the session's cart, then take the ordered lines
    /// out of the cart. Lines added while the order was being placed stay.
    async fn checkout(&self, session: SessionId, buyer: BuyerInfo)
    -> Result<Order, CheckoutError>;

    /// Place an order without a cart. Lines are checked against stock and repriced from the
    /// catalogue, so caller-supplied prices and names are never stored.
    async fn place_order(&self, order: NewOrder) -> Result<Order, CheckoutError>;
}

#[async_trait]
impl CheckoutService for CartCheckoutService {
    async fn checkout(
        &self,
        session: SessionId,
        buyer: BuyerInfo,
    ) -> Result<Order, CheckoutError> {
        let cart = self.carts.get_cart(session.clone()).await?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.ensure_in_stock(stock_requests(&cart)).await?;

        let order = self
            .orders
            .create_order(NewOrder::from_cart(&cart, buyer))
            .await?;

        info!(
            session_id = %session,
            order_number = %order.order_number,
            "checked out cart"
        );

        if let Err(error) = self.carts.remove_ordered(session, cart.items).await {
            warn!(
                order_number = %order.order_number,
                error = %error,
                "failed to remove ordered lines from cart"
            );
        }

        Ok(order)
    }

    async fn place_order(&self, mut order: NewOrder) -> Result<Order, CheckoutError> {
        if !order.items.is_empty() {
            self.ensure_in_stock(order_stock_requests(&order.items))
                .await?;

            let mut catalogue: FxHashMap<_, ProductRecord> = FxHashMap::default();

            for item in &mut order.items {
                if !catalogue.contains_key(&item.product_uuid) {
                    let product = self.products.get_product(item.product_uuid).await?;

                    catalogue.insert(item.product_uuid, product);
                }

                if let Some(product) = catalogue.get(&item.product_uuid) {
                    reprice(item, product);
                }
            }
        }

        let order = self.orders.create_order(order).await?;

        info!(order_number = %order.order_number, "placed order");

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::{
        carts::{
            CartsServiceError, MockCartsService,
            records::{Cart, CartItem, CartItemUuid},
        },
        orders::{
            MockOrdersService, OrdersServiceError,
            data::OrderValidationError,
            records::{
                OrderItem,
                fixtures::{address, customer, item, order},
            },
            status::OrderStatus,
        },
        products::{
            MockProductsService, ProductsServiceError,
            records::{ProductUuid, fixtures::product},
            stock::{StockCheck, StockShortfall},
        },
    };

    use super::*;

    fn buyer() -> BuyerInfo {
        BuyerInfo {
            customer: customer(),
            shipping_address: address(),
            billing_address: None,
            payment_intent_id: None,
            expected_total: None,
        }
    }

    fn cart_with(session: &SessionId, product_uuid: ProductUuid) -> Cart {
        let mut cart = Cart::new(session.clone());

        cart.items.push(CartItem {
            uuid: CartItemUuid::new(),
            product_uuid,
            variant: None,
            quantity: 2,
            unit_price: 1000,
            name: "Word Cards".to_string(),
            image: None,
        });

        cart
    }

    fn in_stock(products: &mut MockProductsService) {
        products.expect_check_stock().once().returning(|requests| {
            Ok(requests
                .iter()
                .map(|request| StockCheck {
                    product_uuid: request.product_uuid,
                    requested: request.quantity,
                    shortfall: None,
                })
                .collect())
        });
    }

    fn echo_orders(orders: &mut MockOrdersService) {
        orders.expect_create_order().once().returning(|new_order| {
            let draft = new_order.into_draft()?;

            Ok(Order {
                uuid: draft.uuid,
                customer: draft.customer,
                items: draft.items,
                total: draft.total,
                ..order(OrderStatus::Pending)
            })
        });
    }

    #[tokio::test]
    async fn checkout_places_a_pending_order_and_removes_the_ordered_lines() -> TestResult {
        let session = SessionId::generate();
        let cart = cart_with(&session, ProductUuid::new());
        let ordered_line = cart.items.first().map(|item| item.uuid).ok_or("missing line")?;

        let mut carts = MockCartsService::new();
        carts.expect_get_cart().once().return_once(move |_| Ok(cart));
        carts
            .expect_remove_ordered()
            .once()
            .withf(move |_, ordered| {
                ordered.len() == 1 && ordered[0].uuid == ordered_line && ordered[0].quantity == 2
            })
            .returning(|session, _| Ok(Cart::new(session)));

        let mut products = MockProductsService::new();
        in_stock(&mut products);

        let mut orders = MockOrdersService::new();
        echo_orders(&mut orders);

        let service = CartCheckoutService::new(Arc::new(carts), Arc::new(orders), Arc::new(products));

        let placed = service.checkout(session, buyer()).await?;

        assert_eq!(placed.total, 2000);
        assert_eq!(placed.status, OrderStatus::Pending);
        assert_eq!(placed.customer.email, "a@b.com");

        Ok(())
    }

    #[tokio::test]
    async fn placed_order_keeps_its_lines_when_the_cart_changes() -> TestResult {
        let session = SessionId::generate();
        let mut cart = cart_with(&session, ProductUuid::new());
        let snapshot = cart.clone();

        let mut carts = MockCartsService::new();
        carts.expect_get_cart().once().return_once(move |_| Ok(snapshot));
        carts
            .expect_remove_ordered()
            .once()
            .returning(|session, _| Ok(Cart::new(session)));

        let mut products = MockProductsService::new();
        in_stock(&mut products);

        let mut orders = MockOrdersService::new();
        echo_orders(&mut orders);

        let service = CartCheckoutService::new(Arc::new(carts), Arc::new(orders), Arc::new(products));

        let placed = service.checkout(session, buyer()).await?;

        if let Some(line) = cart.items.first_mut() {
            line.quantity = 9;
            line.unit_price = 1;
        }

        assert_eq!(placed.items[0].quantity, 2);
        assert_eq!(placed.items[0].unit_price, 1000);
        assert_eq!(placed.total, 2000);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let mut carts = MockCartsService::new();
        carts
            .expect_get_cart()
            .once()
            .returning(|session| Ok(Cart::new(session)));

        let mut products = MockProductsService::new();
        products.expect_check_stock().never();

        let mut orders = MockOrdersService::new();
        orders.expect_create_order().never();

        let service = CartCheckoutService::new(Arc::new(carts), Arc::new(orders), Arc::new(products));

        let result = service.checkout(SessionId::generate(), buyer()).await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn out_of_stock_lines_stop_checkout() -> TestResult {
        let session = SessionId::generate();
        let product_uuid = ProductUuid::new();
        let cart = cart_with(&session, product_uuid);

        let mut carts = MockCartsService::new();
        carts.expect_get_cart().once().return_once(move |_| Ok(cart));
        carts.expect_remove_ordered().never();

        let mut products = MockProductsService::new();
        products.expect_check_stock().once().returning(|requests| {
            Ok(requests
                .iter()
                .map(|request| StockCheck {
                    product_uuid: request.product_uuid,
                    requested: request.quantity,
                    shortfall: Some(StockShortfall::Insufficient { available: 1 }),
                })
                .collect())
        });

        let mut orders = MockOrdersService::new();
        orders.expect_create_order().never();

        let service = CartCheckoutService::new(Arc::new(carts), Arc::new(orders), Arc::new(products));

        let result = service.checkout(session, buyer()).await;

        let unavailable = match result {
            Err(CheckoutError::OutOfStock(unavailable)) => unavailable,
            other => return Err(format!("expected out of stock, got {other:?}").into()),
        };

        assert_eq!(unavailable.len(), 1);
        assert_eq!(unavailable[0].product_uuid, product_uuid);

        Ok(())
    }

    #[tokio::test]
    async fn failing_to_empty_the_cart_does_not_fail_checkout() -> TestResult {
        let session = SessionId::generate();
        let cart = cart_with(&session, ProductUuid::new());

        let mut carts = MockCartsService::new();
        carts.expect_get_cart().once().return_once(move |_| Ok(cart));
        carts
            .expect_remove_ordered()
            .once()
            .returning(|_, _| Err(CartsServiceError::Conflict));

        let mut products = MockProductsService::new();
        in_stock(&mut products);

        let mut orders = MockOrdersService::new();
        echo_orders(&mut orders);

        let service = CartCheckoutService::new(Arc::new(carts), Arc::new(orders), Arc::new(products));

        let placed = service.checkout(session, buyer()).await?;

        assert_eq!(placed.order_number, "ISP-1000");

        Ok(())
    }

    #[tokio::test]
    async fn stock_lookup_failures_propagate() {
        let session = SessionId::generate();
        let cart = cart_with(&session, ProductUuid::new());

        let mut carts = MockCartsService::new();
        carts.expect_get_cart().once().return_once(move |_| Ok(cart));

        let mut products = MockProductsService::new();
        products
            .expect_check_stock()
            .once()
            .returning(|_| Err(ProductsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let orders = MockOrdersService::new();

        let service = CartCheckoutService::new(Arc::new(carts), Arc::new(orders), Arc::new(products));

        let result = service.checkout(session, buyer()).await;

        assert!(matches!(result, Err(CheckoutError::Products(_))));
    }

    fn direct_order(items: Vec<OrderItem>) -> NewOrder {
        NewOrder {
            customer: customer(),
            shipping_address: address(),
            billing_address: None,
            items,
            expected_total: None,
            payment_intent_id: None,
        }
    }

    #[tokio::test]
    async fn place_order_prices_lines_from_the_catalogue() -> TestResult {
        let listed = product(1500);
        let product_uuid = listed.uuid;

        let mut products = MockProductsService::new();
        in_stock(&mut products);
        products
            .expect_get_product()
            .once()
            .return_once(move |_| Ok(listed));

        let mut orders = MockOrdersService::new();
        echo_orders(&mut orders);

        let service = CartCheckoutService::new(
            Arc::new(MockCartsService::new()),
            Arc::new(orders),
            Arc::new(products),
        );

        let mut first = item(2, 1);
        first.product_uuid = product_uuid;
        first.name = "Anything".to_string();
        let mut second = item(1, 1);
        second.product_uuid = product_uuid;

        let placed = service.place_order(direct_order(vec![first, second])).await?;

        assert_eq!(placed.total, 4500);
        assert!(placed.items.iter().all(|line| line.unit_price == 1500));
        assert!(placed.items.iter().all(|line| line.name == "Word Cards"));

        Ok(())
    }

    #[tokio::test]
    async fn place_order_rejects_a_total_computed_from_client_prices() {
        let listed = product(1500);
        let product_uuid = listed.uuid;

        let mut products = MockProductsService::new();
        in_stock(&mut products);
        products
            .expect_get_product()
            .once()
            .return_once(move |_| Ok(listed));

        let mut orders = MockOrdersService::new();
        orders
            .expect_create_order()
            .once()
            .returning(|new_order| match new_order.into_draft() {
                Ok(_) => Err(OrdersServiceError::Conflict),
                Err(invalid) => Err(invalid.into()),
            });

        let service = CartCheckoutService::new(
            Arc::new(MockCartsService::new()),
            Arc::new(orders),
            Arc::new(products),
        );

        let mut line = item(1_000_000, 1);
        line.product_uuid = product_uuid;
        let mut order = direct_order(vec![line]);
        order.expected_total = Some(1_000_000);

        let result = service.place_order(order).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Orders(OrdersServiceError::Validation(
                OrderValidationError::TotalMismatch
            )))
        ));
    }

    #[tokio::test]
    async fn place_order_blocks_unknown_products_before_writing() {
        let mut products = MockProductsService::new();
        products.expect_check_stock().once().returning(|requests| {
            Ok(requests
                .iter()
                .map(|request| StockCheck {
                    product_uuid: request.product_uuid,
                    requested: request.quantity,
                    shortfall: Some(StockShortfall::NotFound),
                })
                .collect())
        });
        products.expect_get_product().never();

        let mut orders = MockOrdersService::new();
        orders.expect_create_order().never();

        let service = CartCheckoutService::new(
            Arc::new(MockCartsService::new()),
            Arc::new(orders),
            Arc::new(products),
        );

        let result = service.place_order(direct_order(vec![item(1, 1)])).await;

        assert!(matches!(result, Err(CheckoutError::OutOfStock(checks)) if checks.len() == 1));
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL test container"]
    async fn checkout_against_postgres_freezes_the_cart() -> TestResult {
        use crate::{
            domain::{carts::data::NewCartItem, products::records::ProductStatus},
            test::{TestContext, helpers::create_product},
        };

        let ctx = TestContext::new().await;
        let product = create_product(&ctx, "word-cards", 1000, ProductStatus::Active).await?;
        let session = SessionId::generate();

        ctx.carts
            .add_item(
                session.clone(),
                NewCartItem {
                    product_uuid: product.uuid,
                    variant: None,
                    quantity: 2,
                },
            )
            .await?;

        let carts: Arc<dyn CartsService> = Arc::new(ctx.carts.clone());
        let service = CartCheckoutService::new(
            Arc::clone(&carts),
            Arc::new(ctx.orders),
            Arc::new(ctx.products),
        );

        let placed = service.checkout(session.clone(), buyer()).await?;

        assert_eq!(placed.total, 2000);
        assert_eq!(placed.status, OrderStatus::Pending);
        assert!(carts.get_cart(session).await?.is_empty());

        Ok(())
    }
}
