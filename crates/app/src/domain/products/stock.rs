//! Checkout stock validation.

use crate::domain::products::{
    data::StockRequest,
    records::{ProductRecord, ProductUuid},
};

/// Why a requested quantity cannot be fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockShortfall {
    NotFound,
    Inactive,
    Insufficient { available: u32 },
}

/// Outcome of checking one product against the requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockCheck {
    pub product_uuid: ProductUuid,
    pub requested: u32,
    pub shortfall: Option<StockShortfall>,
}

impl StockCheck {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.shortfall.is_none()
    }
}

/// Merge requests for the same product, keeping first-seen order.
///
/// Two cart lines for different variants of one product draw on the same stock.
#[must_use]
pub fn aggregate(requests: &[StockRequest]) -> Vec<StockRequest> {
    let mut merged: Vec<StockRequest> = Vec::with_capacity(requests.len());

    for request in requests {
        match merged
            .iter_mut()
            .find(|existing| existing.product_uuid == request.product_uuid)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(request.quantity),
            None => merged.push(*request),
        }
    }

    merged
}

#[must_use]
pub fn evaluate(product: Option<&ProductRecord>, request: &StockRequest) -> StockCheck {
    let shortfall = match product {
        None => Some(StockShortfall::NotFound),
        Some(product) if !product.is_active() => Some(StockShortfall::Inactive),
        Some(product) if product.track_inventory && product.stock_quantity < request.quantity => {
            Some(StockShortfall::Insufficient {
                available: product.stock_quantity,
            })
        }
        Some(_) => None,
    };

    StockCheck {
        product_uuid: request.product_uuid,
        requested: request.quantity,
        shortfall,
    }
}
