//! Test helpers.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use salvo::{affix_state::inject, catcher::Catcher, prelude::*};
use smallvec::smallvec;

use storefront_app::{
    auth::{AdminSessionError, AdminSessions, hash_passphrase},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{Cart, CartItem, CartItemUuid, SessionId},
        },
        checkout::MockCheckoutService,
        donations::{
            MockDonationsService,
            records::{
                CategoryAllocation, Donation, DonationStatus, DonationType, DonationUuid, Donor,
                PaymentMethod,
            },
        },
        orders::{
            MockOrdersService,
            records::{Address, CustomerInfo, Order, OrderItem, OrderUuid, PaymentDetails},
            status::OrderStatus,
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductStatus, ProductUuid},
        },
    },
    gateway::MockContentGateway,
};

use crate::{errors::json_envelope, state::State};

pub(crate) const TEST_PASSPHRASE: &str = "correct horse battery staple";

const TEST_SESSION_SECRET: &[u8] = b"an admin session secret for tests only";

pub(crate) fn test_sessions() -> AdminSessions {
    AdminSessions::new(
        TEST_SESSION_SECRET,
        &hash_passphrase(TEST_PASSPHRASE),
        SignedDuration::from_secs(3600),
    )
    .expect("test session settings are valid")
}

/// A freshly issued admin token accepted by [`test_app`].
pub(crate) fn admin_token() -> Result<String, AdminSessionError> {
    Ok(test_sessions().issue(Timestamp::now())?.token)
}

/// Application context whose services reject every call. Tests swap in the mocks they
/// expect to be used.
pub(crate) fn test_app() -> AppContext {
    AppContext {
        products: Arc::new(MockProductsService::new()),
        carts: Arc::new(MockCartsService::new()),
        orders: Arc::new(MockOrdersService::new()),
        checkout: Arc::new(MockCheckoutService::new()),
        donations: Arc::new(MockDonationsService::new()),
        gateway: Arc::new(MockContentGateway::new()),
        sessions: Arc::new(test_sessions()),
    }
}

pub(crate) fn service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .push(route),
    )
    .catcher(Catcher::default().hoop(json_envelope))
}

/// A service whose only live dependency is the content gateway.
pub(crate) fn gateway_service(gateway: MockContentGateway, route: Router) -> Service {
    service(
        AppContext {
            gateway: Arc::new(gateway),
            ..test_app()
        },
        route,
    )
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        slug: "flash-cards".to_string(),
        name: "Flash Cards".to_string(),
        description: Some("Picture cards for first words".to_string()),
        category: Some("cards".to_string()),
        price: 1999,
        sale_price: None,
        stock_quantity: 5,
        track_inventory: true,
        images: vec!["/uploads/flash-cards.png".to_string()],
        status: ProductStatus::Active,
        featured: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(session: &str, lines: &[(ProductUuid, u32, u64)]) -> Cart {
    Cart {
        session_id: SessionId::parse(session).expect("test session ids are valid"),
        items: lines
            .iter()
            .map(|&(product_uuid, quantity, unit_price)| CartItem {
                uuid: CartItemUuid::new(),
                product_uuid,
                variant: None,
                quantity,
                unit_price,
                name: "Flash Cards".to_string(),
                image: None,
            })
            .collect(),
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn customer() -> CustomerInfo {
    CustomerInfo {
        email: "a@b.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Byron".to_string(),
        phone: None,
    }
}

pub(crate) fn address() -> Address {
    Address {
        address: "1 Main St".to_string(),
        address2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: Some("62701".to_string()),
        country: Some("US".to_string()),
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> Order {
    Order {
        uuid,
        order_number: "ISP-1000".to_string(),
        customer: customer(),
        shipping_address: address(),
        billing_address: None,
        items: vec![OrderItem {
            product_uuid: ProductUuid::from_uuid(uuid::Uuid::nil()),
            variant: None,
            name: "Flash Cards".to_string(),
            image: None,
            quantity: 2,
            unit_price: 1000,
        }],
        total: 2000,
        status,
        payment: PaymentDetails {
            payment_intent_id: Some("pi_123".to_string()),
            transaction_id: Some("txn_456".to_string()),
        },
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_donation(uuid: DonationUuid, status: DonationStatus) -> Donation {
    Donation {
        uuid,
        confirmation_number: "DON-LOYW3V28-QX7RT".to_string(),
        amount: 10_000,
        currency: "USD".to_string(),
        donation_type: DonationType::OneTime,
        payment_method: PaymentMethod::Card,
        status,
        donor: Donor {
            email: "donor@example.org".to_string(),
            first_name: Some("Grace".to_string()),
            last_name: Some("Hopper".to_string()),
            phone: None,
            is_anonymous: false,
        },
        allocations: smallvec![CategoryAllocation {
            category_id: "fws".to_string(),
            amount: 10_000,
        }],
        transaction_id: None,
        payment_intent_id: Some("pi_789".to_string()),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        completed_at: None,
    }
}
