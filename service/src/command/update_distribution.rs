//! [`Command`] for updating an existing [`Distribution`].

use common::operations::Update;
use derive_more::{Display, Error};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::distribution::{
    Category, DeliveryMethod, Description, Location, Quantity, Status, Title,
};
use crate::{
    domain::{distribution, Distribution},
    infra::{storage, Storage},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Distribution`] with a sparse set
/// of field changes.
///
/// Fields not supplied are left unchanged. The ID, the creation timestamp,
/// the request count and the owner are not updatable.
#[derive(Clone, Debug)]
pub struct UpdateDistribution {
    /// ID of the [`Distribution`] to be updated.
    pub id: distribution::Id,

    /// New [`Title`], if any.
    pub title: Option<distribution::Title>,

    /// New [`Description`], if any.
    pub description: Option<distribution::Description>,

    /// New [`Category`], if any.
    pub category: Option<distribution::Category>,

    /// New [`Quantity`], if any.
    pub quantity: Option<distribution::Quantity>,

    /// New [`Location`], if any.
    pub location: Option<distribution::Location>,

    /// New [`DeliveryMethod`], if any.
    pub delivery_method: Option<distribution::DeliveryMethod>,

    /// New [`Status`], if any.
    pub status: Option<distribution::Status>,
}

impl<S> Command<UpdateDistribution> for Service<S>
where
    S: Storage<
        Update<distribution::Changes>,
        Ok = Distribution,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = Distribution;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateDistribution,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateDistribution {
            id,
            title,
            description,
            category,
            quantity,
            location,
            delivery_method,
            status,
        } = cmd;

        let updated = self
            .storage()
            .execute(Update(distribution::Changes {
                id,
                title,
                description,
                category,
                quantity,
                location,
                delivery_method,
                status,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::debug!(id = %updated.id, "`Distribution` updated");

        Ok(updated)
    }
}

/// Error of [`UpdateDistribution`] [`Command`] execution.
#[derive(Debug, Display, Error)]
pub enum ExecutionError {
    /// [`Distribution`] with the provided ID does not exist, so no change
    /// occurred.
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
        domain::distribution,
        infra::Memory,
        Config, Service,
    };

    use crate::command::CreateDistribution;

    use super::{Command as _, ExecutionError, UpdateDistribution};

    fn updates(id: distribution::Id) -> UpdateDistribution {
        UpdateDistribution {
            id,
            title: None,
            description: None,
            category: None,
            quantity: None,
            location: None,
            delivery_method: None,
            status: None,
        }
    }

    async fn seeded(service: &Service<Memory>) -> distribution::Id {
        service
            .execute(CreateDistribution {
                title: "Winter Coats".parse().unwrap(),
                description: "Warm coats".parse().unwrap(),
                category: "Clothing".parse().unwrap(),
                quantity: 10,
                location: "Community Center".parse().unwrap(),
                delivery_method: "Pickup".parse().unwrap(),
                status: None,
                owner: "Sarah Johnson".parse().unwrap(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn merges_partial_changes() {
        let service = Service::new(Config::default(), Memory::default());
        let id = seeded(&service).await;

        let updated = service
            .execute(UpdateDistribution {
                quantity: Some(3),
                status: Some(distribution::Status::Fulfilled),
                ..updates(id)
            })
            .await
            .unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.status, distribution::Status::Fulfilled);
        assert_eq!(updated.title.to_string(), "Winter Coats");
    }

    #[tokio::test]
    async fn errors_on_unknown_distribution() {
        let service = Service::new(Config::default(), Memory::default());
        let id = distribution::Id::new();

        let err = service.execute(updates(id)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::DistributionNotExists(e) if *e == id,
        ));
    }
}
