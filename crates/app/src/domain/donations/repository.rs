//! Donations Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::{
        Db, amount_to_i64, try_get_amount, try_get_count, try_get_optional_timestamp,
        try_get_timestamp,
    },
    domain::donations::{
        data::{
            CategoryTotals, DonationDraft, DonationFilter, DonationLookup, DonationStatusUpdate,
            DonationTotals,
        },
        records::{CategoryAllocation, Donation, DonationStatus, DonationUuid, Donor},
    },
};

const CREATE_DONATION_SQL: &str = include_str!("sql/create_donation.sql");
const GET_DONATION_SQL: &str = include_str!("sql/get_donation.sql");
const GET_DONATION_BY_CONFIRMATION_SQL: &str = include_str!("sql/get_donation_by_confirmation.sql");
const LIST_DONATIONS_SQL: &str = include_str!("sql/list_donations.sql");
const UPDATE_DONATION_STATUS_SQL: &str = include_str!("sql/update_donation_status.sql");
const DELETE_DONATION_SQL: &str = include_str!("sql/delete_donation.sql");
const CATEGORY_TOTALS_SQL: &str = include_str!("sql/category_totals.sql");
const COUNT_DONORS_SQL: &str = include_str!("sql/count_donors.sql");

#[automock]
#[async_trait]
pub(crate) trait DonationsRepository: Send + Sync {
    async fn create_donation(&self, draft: &DonationDraft) -> Result<Donation, sqlx::Error>;

    async fn find_donation(&self, lookup: &DonationLookup)
    -> Result<Option<Donation>, sqlx::Error>;

    async fn list_donations(&self, filter: &DonationFilter) -> Result<Vec<Donation>, sqlx::Error>;

    /// Apply a status change only if the donation is still in `expected`.
    async fn update_status(
        &self,
        donation: DonationUuid,
        expected: DonationStatus,
        update: &DonationStatusUpdate,
    ) -> Result<Option<Donation>, sqlx::Error>;

    async fn delete_donation(&self, donation: DonationUuid) -> Result<u64, sqlx::Error>;

    async fn totals(&self) -> Result<DonationTotals, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub(crate) struct PgDonationsRepository {
    pool: PgPool,
}

impl PgDonationsRepository {
    #[must_use]
    pub(crate) fn new(db: &Db) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl DonationsRepository for PgDonationsRepository {
    async fn create_donation(&self, draft: &DonationDraft) -> Result<Donation, sqlx::Error> {
        let allocations: Vec<StoredAllocation> =
            draft.allocations.iter().map(StoredAllocation::from).collect();

        query_as::<Postgres, Donation>(CREATE_DONATION_SQL)
            .bind(draft.uuid.into_uuid())
            .bind(&draft.confirmation_number)
            .bind(amount_to_i64(draft.amount)?)
            .bind(draft.currency)
            .bind(draft.donation_type.as_str())
            .bind(draft.payment_method.as_str())
            .bind(&draft.donor.email)
            .bind(draft.donor.first_name.as_deref())
            .bind(draft.donor.last_name.as_deref())
            .bind(draft.donor.phone.as_deref())
            .bind(draft.donor.is_anonymous)
            .bind(Json(allocations))
            .bind(draft.payment_intent_id.as_deref())
            .fetch_one(&self.pool)
            .await
    }

    async fn find_donation(
        &self,
        lookup: &DonationLookup,
    ) -> Result<Option<Donation>, sqlx::Error> {
        match lookup {
            DonationLookup::Uuid(uuid) => {
                query_as::<Postgres, Donation>(GET_DONATION_SQL)
                    .bind(uuid.into_uuid())
                    .fetch_optional(&self.pool)
                    .await
            }
            DonationLookup::ConfirmationNumber(number) => {
                query_as::<Postgres, Donation>(GET_DONATION_BY_CONFIRMATION_SQL)
                    .bind(number)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
    }

    async fn list_donations(&self, filter: &DonationFilter) -> Result<Vec<Donation>, sqlx::Error> {
        query_as::<Postgres, Donation>(LIST_DONATIONS_SQL)
            .bind(filter.status.map(DonationStatus::as_str))
            .bind(filter.email.as_deref().map(str::trim))
            .bind(filter.created_from.map(SqlxTimestamp::from))
            .bind(filter.created_to.map(SqlxTimestamp::from))
            .bind(i64::from(filter.effective_limit()))
            .fetch_all(&self.pool)
            .await
    }

    async fn update_status(
        &self,
        donation: DonationUuid,
        expected: DonationStatus,
        update: &DonationStatusUpdate,
    ) -> Result<Option<Donation>, sqlx::Error> {
        query_as::<Postgres, Donation>(UPDATE_DONATION_STATUS_SQL)
            .bind(donation.into_uuid())
            .bind(expected.as_str())
            .bind(update.status.as_str())
            .bind(update.transaction_id.as_deref())
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_donation(&self, donation: DonationUuid) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_DONATION_SQL)
            .bind(donation.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn totals(&self) -> Result<DonationTotals, sqlx::Error> {
        let categories = query(CATEGORY_TOTALS_SQL)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| {
                Ok(CategoryTotals {
                    category_id: row.try_get("category_id")?,
                    raised: try_get_amount(row, "raised")?,
                    donors: try_get_count(row, "donors")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let row = query(COUNT_DONORS_SQL).fetch_one(&self.pool).await?;

        Ok(DonationTotals {
            categories,
            donors: try_get_count(&row, "donors")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredAllocation {
    category_id: String,
    amount: u64,
}

impl From<&CategoryAllocation> for StoredAllocation {
    fn from(allocation: &CategoryAllocation) -> Self {
        Self {
            category_id: allocation.category_id.clone(),
            amount: allocation.amount,
        }
    }
}

fn decode_column<T, E>(col: &str, value: Result<T, E>) -> sqlx::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    value.map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Donation {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let donation_type: String = row.try_get("donation_type")?;
        let payment_method: String = row.try_get("payment_method")?;
        let status: String = row.try_get("status")?;
        let allocations: Json<Vec<StoredAllocation>> = row.try_get("allocations")?;

        Ok(Self {
            uuid: DonationUuid::from_uuid(row.try_get("uuid")?),
            confirmation_number: row.try_get("confirmation_number")?,
            amount: try_get_amount(row, "amount")?,
            currency: row.try_get("currency")?,
            donation_type: decode_column("donation_type", donation_type.parse())?,
            payment_method: decode_column("payment_method", payment_method.parse())?,
            status: decode_column("status", status.parse())?,
            donor: Donor {
                email: row.try_get("donor_email")?,
                first_name: row.try_get("donor_first_name")?,
                last_name: row.try_get("donor_last_name")?,
                phone: row.try_get("donor_phone")?,
                is_anonymous: row.try_get("is_anonymous")?,
            },
            allocations: allocations
                .0
                .into_iter()
                .map(|allocation| CategoryAllocation {
                    category_id: allocation.category_id,
                    amount: allocation.amount,
                })
                .collect(),
            transaction_id: row.try_get("transaction_id")?,
            payment_intent_id: row.try_get("payment_intent_id")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
            completed_at: try_get_optional_timestamp(row, "completed_at")?,
        })
    }
}
