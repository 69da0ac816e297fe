//! [`Command`] for submitting a new [`Request`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::request::{
    AdditionalInfo, Email, Name, Phone, Reason, Status,
};
use crate::{
    domain::{distribution, request, Distribution, Request},
    infra::{storage, Storage},
    Event, Service,
};

use super::Command;

/// [`Command`] for submitting a new [`Request`] against a [`Distribution`].
///
/// The new [`Request`] starts as [`Status::Pending`] and is appended to the
/// collection (submission order). The referenced [`Distribution`]'s request
/// count is incremented atomically with the insertion, and an
/// [`Event::RequestCreated`] is emitted on success.
#[derive(Clone, Debug)]
pub struct CreateRequest {
    /// ID of the [`Distribution`] the new [`Request`] is submitted against.
    pub distribution_id: distribution::Id,

    /// [`Name`] of the requester.
    pub requester_name: request::Name,

    /// [`Email`] of the requester.
    pub requester_email: request::Email,

    /// [`Phone`] of the requester, if provided.
    pub requester_phone: Option<request::Phone>,

    /// [`Reason`] of the new [`Request`].
    pub reason: request::Reason,

    /// [`AdditionalInfo`] of the new [`Request`], if provided.
    pub additional_info: Option<request::AdditionalInfo>,
}

impl<S> Command<CreateRequest> for Service<S>
where
    S: Storage<
            Select<By<Option<Distribution>, distribution::Id>>,
            Ok = Option<Distribution>,
            Err = Traced<storage::Error>,
        > + Storage<Insert<Request>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = Request;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRequest) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRequest {
            distribution_id,
            requester_name,
            requester_email,
            requester_phone,
            reason,
            additional_info,
        } = cmd;

        let distribution = self
            .storage()
            .execute(Select(By::<Option<Distribution>, _>::new(
                distribution_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DistributionNotExists(distribution_id))
            .map_err(tracerr::wrap!())?;

        let request = Request {
            id: request::Id::new(),
            distribution_id,
            requester_name,
            requester_email,
            requester_phone,
            reason,
            additional_info,
            status: request::Status::default(),
            submitted_at: DateTime::now().coerce(),
        };

        // The `Distribution` may be deleted between the check above and the
        // insertion, so the storage re-verifies it under its lock.
        self.storage()
            .execute(Insert(request.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.emit(Event::RequestCreated {
            distribution_id,
            request_id: request.id,
            owner: distribution.owner,
            requester_email: request.requester_email.clone(),
        });

        tracing::debug!(
            id = %request.id,
            distribution_id = %distribution_id,
            "`Request` submitted",
        );

        Ok(request)
    }
}

/// Error of [`CreateRequest`] [`Command`] execution.
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
    use common::operations::{By, Select};

    use crate::{
        command::CreateDistribution,
        domain::{distribution, request, Distribution},
        infra::{Memory, Storage as _},
        Config, Event, Service,
    };

    use super::{Command as _, CreateRequest, ExecutionError};

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

    fn coat_request(distribution_id: distribution::Id) -> CreateRequest {
        CreateRequest {
            distribution_id,
            requester_name: "A".parse().unwrap(),
            requester_email: "a@x.com".parse().unwrap(),
            requester_phone: None,
            reason: "need coat".parse().unwrap(),
            additional_info: None,
        }
    }

    #[tokio::test]
    async fn submits_pending_request_and_bumps_count() {
        let service = Service::new(Config::default(), Memory::default());
        let distribution_id = seeded(&service).await;

        let request =
            service.execute(coat_request(distribution_id)).await.unwrap();

        assert_eq!(request.status, request::Status::Pending);
        assert_eq!(request.distribution_id, distribution_id);

        let stored: Option<Distribution> = service
            .storage()
            .execute(Select(By::<Option<Distribution>, _>::new(distribution_id)))
            .await
            .unwrap();
        assert_eq!(stored.unwrap().request_count, 1);
    }

    #[tokio::test]
    async fn errors_on_unknown_distribution() {
        let service = Service::new(Config::default(), Memory::default());
        let unknown = distribution::Id::new();

        let err =
            service.execute(coat_request(unknown)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::DistributionNotExists(id) if *id == unknown,
        ));
    }

    #[tokio::test]
    async fn emits_creation_intents() {
        let service = Service::new(Config::default(), Memory::default());
        let distribution_id = seeded(&service).await;
        let mut events = service.subscribe();

        let request =
            service.execute(coat_request(distribution_id)).await.unwrap();

        let event = events.recv().await.unwrap();
        let Event::RequestCreated {
            distribution_id: event_distribution_id,
            request_id,
            owner,
            requester_email,
        } = event
        else {
            panic!("unexpected event: {event:?}");
        };
        assert_eq!(event_distribution_id, distribution_id);
        assert_eq!(request_id, request.id);
        assert_eq!(owner.to_string(), "Sarah Johnson");
        assert_eq!(requester_email, request.requester_email);
    }
}
