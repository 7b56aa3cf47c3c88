//! Donation request and response bodies.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::{
    domain::donations::{
        data::{CategoryStats, DonationStats, StatsSummary},
        records::{CategoryAllocation, Donation, Donor},
    },
    money,
};

/// Which end of a day a bare date filter stands for.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DayBound {
    Start,
    End,
}

/// Parse a timestamp filter. Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates in UTC.
pub(crate) fn parse_bound(value: &str, bound: DayBound) -> Result<Timestamp, StatusError> {
    let value = value.trim();

    if let Ok(timestamp) = value.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    let date = value
        .parse::<Date>()
        .map_err(|_invalid| StatusError::bad_request().brief(format!("Invalid date: {value}")))?;

    let datetime = match bound {
        DayBound::Start => date.at(0, 0, 0, 0),
        DayBound::End => date.at(23, 59, 59, 999_999_999),
    };

    datetime
        .to_zoned(TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(|_invalid| StatusError::bad_request().brief(format!("Invalid date: {value}")))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DonorResponse {
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub is_anonymous: bool,
}

impl From<Donor> for DonorResponse {
    fn from(donor: Donor) -> Self {
        Self {
            email: donor.email,
            first_name: donor.first_name,
            last_name: donor.last_name,
            phone: donor.phone,
            is_anonymous: donor.is_anonymous,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AllocationResponse {
    pub category_id: String,
    pub amount: f64,
}

impl From<CategoryAllocation> for AllocationResponse {
    fn from(allocation: CategoryAllocation) -> Self {
        Self {
            category_id: allocation.category_id,
            amount: money::to_major(allocation.amount),
        }
    }
}

/// Donation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DonationResponse {
    pub id: Uuid,
    pub confirmation_number: String,

    /// Amount in major units
    pub amount: f64,

    pub currency: String,
    pub donation_type: String,
    pub payment_method: String,
    pub status: String,
    pub donor_info: DonorResponse,

    /// How the amount is split across categories
    pub allocations: Vec<AllocationResponse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    pub created_at: String,
    pub updated_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<Donation> for DonationResponse {
    fn from(donation: Donation) -> Self {
        Self {
            id: donation.uuid.into(),
            confirmation_number: donation.confirmation_number,
            amount: money::to_major(donation.amount),
            currency: donation.currency,
            donation_type: donation.donation_type.as_str().to_string(),
            payment_method: donation.payment_method.as_str().to_string(),
            status: donation.status.to_string(),
            donor_info: donation.donor.into(),
            allocations: donation.allocations.into_iter().map(Into::into).collect(),
            transaction_id: donation.transaction_id,
            payment_intent_id: donation.payment_intent_id,
            created_at: donation.created_at.to_string(),
            updated_at: donation.updated_at.to_string(),
            completed_at: donation.completed_at.map(|at| at.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DonationEnvelope {
    pub donation: DonationResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryStatsResponse {
    pub id: String,
    pub name: String,
    pub goal: f64,
    pub raised: f64,
    pub donors: u32,
    pub percentage: f64,
}

impl From<CategoryStats> for CategoryStatsResponse {
    fn from(stats: CategoryStats) -> Self {
        Self {
            id: stats.id.to_string(),
            name: stats.name.to_string(),
            goal: money::to_major(stats.goal),
            raised: money::to_major(stats.raised),
            donors: stats.donors,
            percentage: stats.percentage,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatsSummaryResponse {
    pub total_raised: f64,
    pub total_donors: u32,
    pub total_goal: f64,
    pub percentage_complete: f64,
}

impl From<StatsSummary> for StatsSummaryResponse {
    fn from(summary: StatsSummary) -> Self {
        Self {
            total_raised: money::to_major(summary.total_raised),
            total_donors: summary.total_donors,
            total_goal: money::to_major(summary.total_goal),
            percentage_complete: summary.percentage_complete,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DonationStatsResponse {
    pub categories: Vec<CategoryStatsResponse>,
    pub summary: StatsSummaryResponse,
}

impl From<DonationStats> for DonationStatsResponse {
    fn from(stats: DonationStats) -> Self {
        Self {
            categories: stats.categories.into_iter().map(Into::into).collect(),
            summary: stats.summary.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatsEnvelope {
    pub stats: DonationStatsResponse,
}
