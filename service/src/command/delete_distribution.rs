//! [`Command`] for deleting a [`Distribution`].

use common::operations::{By, Delete};
use tracerr::Traced;

use crate::{
    domain::{distribution, Distribution},
    infra::{storage, Storage},
    Service,
};

#[cfg(doc)]
use crate::domain::Request;

use super::Command;

/// [`Command`] for deleting a [`Distribution`].
///
/// Deletion cascades to every [`Request`] referencing the deleted
/// [`Distribution`], and is idempotent: an unknown ID is not an error.
#[derive(Clone, Copy, Debug)]
pub struct DeleteDistribution {
    /// ID of the [`Distribution`] to be deleted.
    pub id: distribution::Id,
}

impl<S> Command<DeleteDistribution> for Service<S>
where
    S: Storage<
        Delete<By<Distribution, distribution::Id>>,
        Ok = bool,
        Err = Traced<storage::Error>,
    >,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteDistribution,
    ) -> Result<Self::Ok, Self::Err> {
        let DeleteDistribution { id } = cmd;

        let removed = self
            .storage()
            .execute(Delete(By::new(id)))
            .await
            .map_err(tracerr::wrap!())?;

        if removed {
            tracing::debug!(%id, "`Distribution` deleted with its requests");
        }

        Ok(removed)
    }
}

/// Error of [`DeleteDistribution`] [`Command`] execution.
pub type ExecutionError = storage::Error;

#[cfg(test)]
mod spec {
    use crate::{
        domain::{distribution, Request},
        infra::Memory,
        query, Config, Query as _, Service,
    };
    use crate::command::{CreateDistribution, CreateRequest};

    use super::{Command as _, DeleteDistribution};

    async fn seeded(service: &Service<Memory>) -> distribution::Id {
        let id = service
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
            .id;

        for email in ["a@x.com", "b@x.com"] {
            _ = service
                .execute(CreateRequest {
                    distribution_id: id,
                    requester_name: "A".parse().unwrap(),
                    requester_email: email.parse().unwrap(),
                    requester_phone: None,
                    reason: "need coat".parse().unwrap(),
                    additional_info: None,
                })
                .await
                .unwrap();
        }

        id
    }

    #[tokio::test]
    async fn cascades_to_requests() {
        let service = Service::new(Config::default(), Memory::default());
        let id = seeded(&service).await;

        let removed =
            service.execute(DeleteDistribution { id }).await.unwrap();
        assert!(removed);

        let requests: Vec<Request> = service
            .execute(query::requests::ForDistribution::by(id))
            .await
            .unwrap();
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn is_idempotent() {
        let service = Service::new(Config::default(), Memory::default());
        let id = seeded(&service).await;

        assert!(service.execute(DeleteDistribution { id }).await.unwrap());
        assert!(!service.execute(DeleteDistribution { id }).await.unwrap());

        let unknown = distribution::Id::new();
        assert!(!service
            .execute(DeleteDistribution { id: unknown })
            .await
            .unwrap());
    }
}
