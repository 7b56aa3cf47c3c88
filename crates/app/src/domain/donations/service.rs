//! Donations Service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::donations::{
        data::{DonationFilter, DonationLookup, DonationStats, DonationStatusUpdate, NewDonation},
        errors::DonationsServiceError,
        records::Donation,
        repository::{DonationsRepository, PgDonationsRepository},
    },
};

#[derive(Clone)]
pub struct PgDonationsService {
    repository: Arc<dyn DonationsRepository>,
}

impl fmt::Debug for PgDonationsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgDonationsService").finish_non_exhaustive()
    }
}

impl PgDonationsService {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        Self {
            repository: Arc::new(PgDonationsRepository::new(db)),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(repository: impl DonationsRepository + 'static) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    async fn require(&self, lookup: &DonationLookup) -> Result<Donation, DonationsServiceError> {
        self.repository
            .find_donation(lookup)
            .await?
            .ok_or(DonationsServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait DonationsService: Send + Sync {
    /// Record a pending donation and split it across the chosen categories.
    async fn create_donation(&self, donation: NewDonation)
    -> Result<Donation, DonationsServiceError>;

    async fn get_donation(&self, lookup: DonationLookup) -> Result<Donation, DonationsServiceError>;

    async fn list_donations(
        &self,
        filter: DonationFilter,
    ) -> Result<Vec<Donation>, DonationsServiceError>;

    async fn update_status(
        &self,
        lookup: DonationLookup,
        update: DonationStatusUpdate,
    ) -> Result<Donation, DonationsServiceError>;

    async fn delete_donation(
        &self,
        lookup: DonationLookup,
    ) -> Result<Donation, DonationsServiceError>;

    /// Fundraising progress from completed donations.
    async fn stats(&self) -> Result<DonationStats, DonationsServiceError>;
}

#[async_trait]
impl DonationsService for PgDonationsService {
    async fn create_donation(
        &self,
        donation: NewDonation,
    ) -> Result<Donation, DonationsServiceError> {
        let draft = donation.into_draft(Timestamp::now(), &mut rand::thread_rng())?;

        let donation = self.repository.create_donation(&draft).await?;

        info!(
            donation_uuid = %donation.uuid,
            confirmation_number = %donation.confirmation_number,
            amount = donation.amount,
            "donation created"
        );

        Ok(donation)
    }

    async fn get_donation(&self, lookup: DonationLookup) -> Result<Donation, DonationsServiceError> {
        self.require(&lookup).await
    }

    async fn list_donations(
        &self,
        filter: DonationFilter,
    ) -> Result<Vec<Donation>, DonationsServiceError> {
        Ok(self.repository.list_donations(&filter).await?)
    }

    async fn update_status(
        &self,
        lookup: DonationLookup,
        update: DonationStatusUpdate,
    ) -> Result<Donation, DonationsServiceError> {
        let current = self.require(&lookup).await?;

        current.status.transition_to(update.status)?;

        let updated = self
            .repository
            .update_status(current.uuid, current.status, &update)
            .await?;

        if let Some(donation) = updated {
            info!(
                donation_uuid = %donation.uuid,
                from = %current.status,
                to = %donation.status,
                "donation status updated"
            );

            return Ok(donation);
        }

        match self
            .repository
            .find_donation(&DonationLookup::Uuid(current.uuid))
            .await?
        {
            Some(_) => Err(DonationsServiceError::Conflict),
            None => Err(DonationsServiceError::NotFound),
        }
    }

    async fn delete_donation(
        &self,
        lookup: DonationLookup,
    ) -> Result<Donation, DonationsServiceError> {
        let donation = self.require(&lookup).await?;

        if self.repository.delete_donation(donation.uuid).await? == 0 {
            return Err(DonationsServiceError::NotFound);
        }

        info!(donation_uuid = %donation.uuid, "donation deleted");

        Ok(donation)
    }

    async fn stats(&self) -> Result<DonationStats, DonationsServiceError> {
        let totals = self.repository.totals().await?;

        Ok(DonationStats::from_totals(&totals))
    }
}
