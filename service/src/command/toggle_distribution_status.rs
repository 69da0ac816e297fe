//! [`Command`] for toggling a [`Distribution`] status.

use common::operations::{By, Toggle};
use derive_more::{Display, Error};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::distribution::Status;
use crate::{
    domain::{distribution, Distribution},
    infra::{storage, Storage},
    Service,
};

use super::Command;

/// [`Command`] for toggling a [`Distribution`] status between
/// [`Status::Active`] and [`Status::Paused`].
///
/// [`Status::Fulfilled`] is terminal: toggling such a [`Distribution`] has
/// no effect, and the unchanged record is returned.
#[derive(Clone, Copy, Debug)]
pub struct ToggleDistributionStatus {
    /// ID of the [`Distribution`] to toggle the status of.
    pub id: distribution::Id,
}

impl<S> Command<ToggleDistributionStatus> for Service<S>
where
    S: Storage<
        Toggle<By<Distribution, distribution::Id>>,
        Ok = Distribution,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = Distribution;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ToggleDistributionStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ToggleDistributionStatus { id } = cmd;

        let toggled = self
            .storage()
            .execute(Toggle(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::debug!(
            %id,
            status = %toggled.status,
            "`Distribution` status toggled",
        );

        Ok(toggled)
    }
}

/// Error of [`ToggleDistributionStatus`] [`Command`] execution.
#[derive(Debug, Display, Error)]
pub enum ExecutionError {
    /// [`Distribution`] with the provided ID does not exist.
    #[display("`Distribution(id: {_0})` does not exist")]
    DistributionNotExists(#[error(not(source))] distribution::Id),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}

impl From<storage::Error> for ExecutionError {
    fn from(e: storage::Error) -> Self {
        match e {
            storage::Error::DistributionGone(id) => {
                Self::DistributionNotExists(id)
            }
            e @ (storage::Error::RequestGone(_)
            | storage::Error::Transition(_)) => Self::Storage(e),
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        command::CreateDistribution, domain::distribution, infra::Memory,
        Config, Service,
    };

    use super::{Command as _, ExecutionError, ToggleDistributionStatus};

    async fn seeded(
        service: &Service<Memory>,
        status: distribution::Status,
    ) -> distribution::Id {
        service
            .execute(CreateDistribution {
                title: "Winter Coats".parse().unwrap(),
                description: "Warm coats".parse().unwrap(),
                category: "Clothing".parse().unwrap(),
                quantity: 10,
                location: "Community Center".parse().unwrap(),
                delivery_method: "Pickup".parse().unwrap(),
                status: Some(status),
                owner: "Sarah Johnson".parse().unwrap(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn flips_between_active_and_paused() {
        let service = Service::new(Config::default(), Memory::default());
        let id = seeded(&service, distribution::Status::Active).await;

        let toggled = service
            .execute(ToggleDistributionStatus { id })
            .await
            .unwrap();
        assert_eq!(toggled.status, distribution::Status::Paused);

        let toggled = service
            .execute(ToggleDistributionStatus { id })
            .await
            .unwrap();
        assert_eq!(toggled.status, distribution::Status::Active);
    }

    #[tokio::test]
    async fn leaves_fulfilled_unchanged() {
        let service = Service::new(Config::default(), Memory::default());
        let id = seeded(&service, distribution::Status::Fulfilled).await;

        let toggled = service
            .execute(ToggleDistributionStatus { id })
            .await
            .unwrap();

        assert_eq!(toggled.status, distribution::Status::Fulfilled);
    }

    #[tokio::test]
    async fn errors_on_unknown_distribution() {
        let service = Service::new(Config::default(), Memory::default());
        let id = distribution::Id::new();

        let err = service
            .execute(ToggleDistributionStatus { id })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::DistributionNotExists(e) if *e == id,
        ));
    }
}
