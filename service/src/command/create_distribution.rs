//! [`Command`] for creating a new [`Distribution`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::distribution::{
    Category, DeliveryMethod, Description, Location, Philanthropist,
    Quantity, Status, Title,
};
use crate::{
    domain::{distribution, Distribution},
    infra::{storage, Storage},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Distribution`].
///
/// The ID, the request count and the creation timestamp are assigned here;
/// the new [`Distribution`] is prepended to the collection
/// (most-recent-first ordering).
#[derive(Clone, Debug)]
pub struct CreateDistribution {
    /// [`Title`] of a new [`Distribution`].
    pub title: distribution::Title,

    /// [`Description`] of a new [`Distribution`].
    pub description: distribution::Description,

    /// [`Category`] of a new [`Distribution`].
    pub category: distribution::Category,

    /// [`Quantity`] of a new [`Distribution`].
    pub quantity: distribution::Quantity,

    /// [`Location`] of a new [`Distribution`].
    pub location: distribution::Location,

    /// [`DeliveryMethod`] of a new [`Distribution`].
    pub delivery_method: distribution::DeliveryMethod,

    /// Initial [`Status`] of a new [`Distribution`].
    ///
    /// [`Status::Active`] when omitted.
    pub status: Option<distribution::Status>,

    /// [`Philanthropist`] owning a new [`Distribution`].
    pub owner: distribution::Philanthropist,
}

impl<S> Command<CreateDistribution> for Service<S>
where
    S: Storage<Insert<Distribution>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = Distribution;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateDistribution,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateDistribution {
            title,
            description,
            category,
            quantity,
            location,
            delivery_method,
            status,
            owner,
        } = cmd;

        let distribution = Distribution {
            id: distribution::Id::new(),
            title,
            description,
            category,
            quantity,
            location,
            delivery_method,
            status: status.unwrap_or_default(),
            request_count: 0,
            created_at: DateTime::now().coerce(),
            owner,
        };

        self.storage()
            .execute(Insert(distribution.clone()))
            .await
            .map_err(tracerr::wrap!())?;

        tracing::debug!(id = %distribution.id, "`Distribution` created");

        Ok(distribution)
    }
}

/// Error of [`CreateDistribution`] [`Command`] execution.
pub type ExecutionError = storage::Error;

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        domain::{distribution, Distribution},
        infra::{Memory, Storage as _},
        Config, Service,
    };

    use super::{Command as _, CreateDistribution};

    fn winter_coats() -> CreateDistribution {
        CreateDistribution {
            title: "Winter Coats".parse().unwrap(),
            description: "Warm coats for families in need".parse().unwrap(),
            category: "Clothing".parse().unwrap(),
            quantity: 10,
            location: "Downtown Community Center".parse().unwrap(),
            delivery_method: "Pickup".parse().unwrap(),
            status: None,
            owner: "Sarah Johnson".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn assigns_defaults() {
        let service = Service::new(Config::default(), Memory::default());

        let created = service.execute(winter_coats()).await.unwrap();

        assert_eq!(created.status, distribution::Status::Active);
        assert_eq!(created.request_count, 0);

        let stored: Option<Distribution> = service
            .storage()
            .execute(Select(By::<Option<Distribution>, _>::new(created.id)))
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn honors_explicit_status() {
        let service = Service::new(Config::default(), Memory::default());

        let created = service
            .execute(CreateDistribution {
                status: Some(distribution::Status::Paused),
                ..winter_coats()
            })
            .await
            .unwrap();

        assert_eq!(created.status, distribution::Status::Paused);
    }
}
