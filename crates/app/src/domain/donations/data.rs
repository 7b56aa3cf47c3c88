//! Donations Data

use std::fmt;

use jiff::Timestamp;
use rand::Rng;
use thiserror::Error;

use crate::domain::donations::records::{
    Allocations, CategoryAllocation, DONATION_CATEGORIES, DonationStatus, DonationType,
    DonationUuid, Donor, PaymentMethod, find_category,
};

const BASE36: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn base36_digit(value: u64) -> char {
    BASE36
        .chars()
        .nth(usize::try_from(value % 36).unwrap_or_default())
        .unwrap_or('0')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DonationValidationError {
    #[error("Missing required fields")]
    MissingRequiredFields,

    #[error("Unknown donation category")]
    UnknownCategory,

    #[error("Status is required")]
    MissingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonation {
    pub amount: u64,
    pub donation_type: DonationType,
    pub payment_method: PaymentMethod,
    pub donor: Donor,
    /// Category ids in the order the donor picked them.
    pub categories: Vec<String>,
    pub payment_intent_id: Option<String>,
}

/// A validated donation with its confirmation number and allocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationDraft {
    pub uuid: DonationUuid,
    pub confirmation_number: String,
    pub amount: u64,
    pub currency: &'static str,
    pub donation_type: DonationType,
    pub payment_method: PaymentMethod,
    pub donor: Donor,
    pub allocations: Allocations,
    pub payment_intent_id: Option<String>,
}

impl NewDonation {
    /// # Errors
    ///
    /// Returns an error when the amount, email or categories are missing, or a category is
    /// not one of [`DONATION_CATEGORIES`].
    pub fn into_draft(
        self,
        now: Timestamp,
        rng: &mut impl Rng,
    ) -> Result<DonationDraft, DonationValidationError> {
        if self.amount == 0 || self.donor.email.trim().is_empty() || self.categories.is_empty() {
            return Err(DonationValidationError::MissingRequiredFields);
        }

        let mut categories: Vec<&str> = Vec::with_capacity(self.categories.len());

        for id in &self.categories {
            let category = find_category(id.trim()).ok_or(DonationValidationError::UnknownCategory)?;

            if !categories.contains(&category.id) {
                categories.push(category.id);
            }
        }

        let allocations = categories
            .iter()
            .zip(split_evenly(self.amount, categories.len()))
            .map(|(id, amount)| CategoryAllocation {
                category_id: (*id).to_string(),
                amount,
            })
            .collect();

        Ok(DonationDraft {
            uuid: DonationUuid::new(),
            confirmation_number: confirmation_number(now, rng),
            amount: self.amount,
            currency: "USD",
            donation_type: self.donation_type,
            payment_method: self.payment_method,
            donor: Donor {
                email: self.donor.email.trim().to_string(),
                ..self.donor
            },
            allocations,
            payment_intent_id: self.payment_intent_id,
        })
    }
}

/// Split `amount` cents into `parts` shares that differ by at most one cent. Remainder cents
/// go to the earliest shares.
#[must_use]
pub fn split_evenly(amount: u64, parts: usize) -> Vec<u64> {
    let Ok(divisor) = u64::try_from(parts) else {
        return Vec::new();
    };

    if divisor == 0 {
        return Vec::new();
    }

    let share = amount / divisor;
    let remainder = amount % divisor;

    (0..divisor)
        .map(|index| share + u64::from(index < remainder))
        .collect()
}

fn base36(mut value: u64) -> String {
    let mut digits = Vec::new();

    loop {
        digits.push(base36_digit(value));
        value /= 36;

        if value == 0 {
            break;
        }
    }

    digits.iter().rev().collect()
}

/// `DON-<base36 millis>-<5 random base36 characters>`, upper case.
pub fn confirmation_number(now: Timestamp, rng: &mut impl Rng) -> String {
    let millis = u64::try_from(now.as_millisecond()).unwrap_or_default();

    let suffix: String = (0..5)
        .map(|_| base36_digit(rng.gen_range(0..36)))
        .collect();

    format!("DON-{}-{suffix}", base36(millis))
}

/// Identifies a donation by uuid or confirmation number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationLookup {
    Uuid(DonationUuid),
    ConfirmationNumber(String),
}

impl DonationLookup {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();

        value.parse::<DonationUuid>().map_or_else(
            |_not_uuid| Self::ConfirmationNumber(value.to_string()),
            Self::Uuid,
        )
    }
}

impl fmt::Display for DonationLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(uuid) => write!(f, "{uuid}"),
            Self::ConfirmationNumber(number) => f.write_str(number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationStatusUpdate {
    pub status: DonationStatus,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationFilter {
    pub status: Option<DonationStatus>,
    pub email: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub limit: u32,
}

impl DonationFilter {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 100;

    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

impl Default for DonationFilter {
    fn default() -> Self {
        Self {
            status: None,
            email: None,
            created_from: None,
            created_to: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Completed donation totals for one category, as aggregated by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotals {
    pub category_id: String,
    pub raised: u64,
    pub donors: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationTotals {
    pub categories: Vec<CategoryTotals>,
    /// Distinct donors across all completed donations.
    pub donors: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub id: &'static str,
    pub name: &'static str,
    pub goal: u64,
    pub raised: u64,
    pub donors: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total_raised: u64,
    pub total_donors: u32,
    pub total_goal: u64,
    pub percentage_complete: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonationStats {
    pub categories: Vec<CategoryStats>,
    pub summary: StatsSummary,
}

#[expect(clippy::cast_precision_loss, reason = "percentages are display values")]
fn percentage(raised: u64, goal: u64) -> f64 {
    if goal == 0 {
        return 0.0;
    }

    (raised as f64 / goal as f64 * 100.0).min(100.0)
}

impl DonationStats {
    /// Build statistics for every static category, filling in zero for categories without
    /// completed donations.
    #[must_use]
    pub fn from_totals(totals: &DonationTotals) -> Self {
        let categories: Vec<CategoryStats> = DONATION_CATEGORIES
            .iter()
            .map(|category| {
                let found = totals
                    .categories
                    .iter()
                    .find(|row| row.category_id == category.id);

                let raised = found.map_or(0, |row| row.raised);

                CategoryStats {
                    id: category.id,
                    name: category.name,
                    goal: category.goal,
                    raised,
                    donors: found.map_or(0, |row| row.donors),
                    percentage: percentage(raised, category.goal),
                }
            })
            .collect();

        let total_raised = categories.iter().map(|category| category.raised).sum();
        let total_goal = categories.iter().map(|category| category.goal).sum();

        Self {
            categories,
            summary: StatsSummary {
                total_raised,
                total_donors: totals.donors,
                total_goal,
                percentage_complete: percentage(total_raised, total_goal),
            },
        }
    }

    /// Zeroed statistics, used when the aggregate cannot be computed.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_totals(&DonationTotals::default())
    }
}
