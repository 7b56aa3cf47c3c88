//! Donation Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use smallvec::SmallVec;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Donation UUID
pub type DonationUuid = TypedUuid<DonationRecord>;

/// Marker for [`DonationUuid`].
#[derive(Debug)]
pub struct DonationRecord;

/// A fundraising category donors can allocate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Goal in cents.
    pub goal: u64,
}

pub const DONATION_CATEGORIES: [DonationCategory; 3] = [
    DonationCategory {
        id: "fws",
        name: "Family World School Cooperative Learners",
        description: "Supports individual learners in the Family World School Cooperative \
                      through tuition support, technology fees, books, and educational events \
                      and activities.",
        goal: 5_000_000,
    },
    DonationCategory {
        id: "partner-schools",
        name: "FWS Partner Schools",
        description: "Supports infrastructure, technology, and other costs to build and \
                      maintain quality learning environments across FWS partner schools on \
                      the African continent.",
        goal: 7_500_000,
    },
    DonationCategory {
        id: "language-councils",
        name: "Language Councils",
        description: "Supports the creation and maintenance of language councils and \
                      initiatives for indigenous African languages.",
        goal: 3_000_000,
    },
];

/// Look up a static category by id.
#[must_use]
pub fn find_category(id: &str) -> Option<&'static DonationCategory> {
    DONATION_CATEGORIES.iter().find(|category| category.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownDonationValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownDonationValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DonationType {
    #[default]
    OneTime,
    Monthly,
}

impl DonationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for DonationType {
    type Err = UnknownDonationValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "one-time" => Ok(Self::OneTime),
            "monthly" => Ok(Self::Monthly),
            other => Err(UnknownDonationValue::new("donation type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
    Bank,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
            Self::Bank => "bank",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownDonationValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "bank" => Ok(Self::Bank),
            other => Err(UnknownDonationValue::new("payment method", other)),
        }
    }
}

/// Payment status of a donation.
///
/// ```text
/// pending -> completed -> refunded
/// pending -> failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DonationStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

const TRANSITIONS: &[(DonationStatus, DonationStatus)] = &[
    (DonationStatus::Pending, DonationStatus::Completed),
    (DonationStatus::Pending, DonationStatus::Failed),
    (DonationStatus::Completed, DonationStatus::Refunded),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move donation from {from} to {to}")]
pub struct InvalidDonationTransition {
    pub from: DonationStatus,
    pub to: DonationStatus,
}

impl DonationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// # Errors
    ///
    /// Returns an error when `next` is not reachable from `self` in one step.
    pub fn transition_to(self, next: Self) -> Result<Self, InvalidDonationTransition> {
        if TRANSITIONS.contains(&(self, next)) {
            Ok(next)
        } else {
            Err(InvalidDonationTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationStatus {
    type Err = UnknownDonationValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownDonationValue::new("donation status", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donor {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub is_anonymous: bool,
}

/// Share of a donation earmarked for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAllocation {
    pub category_id: String,
    pub amount: u64,
}

/// Allocations rarely exceed the number of static categories.
pub type Allocations = SmallVec<[CategoryAllocation; 3]>;

/// Donation Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub uuid: DonationUuid,
    pub confirmation_number: String,
    pub amount: u64,
    pub currency: String,
    pub donation_type: DonationType,
    pub payment_method: PaymentMethod,
    pub status: DonationStatus,
    pub donor: Donor,
    pub allocations: Allocations,
    pub transaction_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}


#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pending_donations_complete_or_fail() -> TestResult {
        assert_eq!(
            DonationStatus::Pending.transition_to(DonationStatus::Completed)?,
            DonationStatus::Completed
        );
        assert_eq!(
            DonationStatus::Pending.transition_to(DonationStatus::Failed)?,
            DonationStatus::Failed
        );

        Ok(())
    }

    #[test]
    fn only_completed_donations_are_refunded() {
        assert!(
            DonationStatus::Completed
                .transition_to(DonationStatus::Refunded)
                .is_ok()
        );
        assert!(
            DonationStatus::Pending
                .transition_to(DonationStatus::Refunded)
                .is_err()
        );
        assert!(
            DonationStatus::Failed
                .transition_to(DonationStatus::Completed)
                .is_err()
        );
    }

    #[test]
    fn parses_wire_values() -> TestResult {
        assert_eq!("one-time".parse::<DonationType>()?, DonationType::OneTime);
        assert_eq!("paypal".parse::<PaymentMethod>()?, PaymentMethod::Paypal);
        assert_eq!("refunded".parse::<DonationStatus>()?, DonationStatus::Refunded);
        assert!("weekly".parse::<DonationType>().is_err());

        Ok(())
    }

    #[test]
    fn finds_static_categories() {
        assert_eq!(find_category("fws").map(|c| c.goal), Some(5_000_000));
        assert!(find_category("unknown").is_none());
    }
}
