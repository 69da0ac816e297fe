//! [`Command`] for changing a [`Request`] status.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error};
use tracerr::Traced;

use crate::{
    domain::{request, Request},
    infra::{storage, Storage},
    Event, Service,
};

use super::Command;

/// [`Command`] for transitioning a [`Request`] into a new
/// [`request::Status`].
///
/// Only the transitions permitted by the state machine are accepted:
/// pending requests may be approved or rejected, and approved ones
/// fulfilled. An [`Event::RequestStatusChanged`] is emitted on success.
#[derive(Clone, Copy, Debug)]
pub struct UpdateRequestStatus {
    /// ID of the [`Request`] to transition.
    pub id: request::Id,

    /// [`request::Status`] to transition the [`Request`] into.
    pub status: request::Status,
}

impl<S> Command<UpdateRequestStatus> for Service<S>
where
    S: Storage<
            Select<By<Option<Request>, request::Id>>,
            Ok = Option<Request>,
            Err = Traced<storage::Error>,
        > + Storage<
            Update<request::StatusChange>,
            Ok = Request,
            Err = Traced<storage::Error>,
        >,
{
    type Ok = Request;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateRequestStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRequestStatus { id, status } = cmd;

        let existing = self
            .storage()
            .execute(Select(By::<Option<Request>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RequestNotExists(id))
            .map_err(tracerr::wrap!())?;

        existing
            .status
            .transition_to(status)
            .map_err(|e| tracerr::new!(E::InvalidTransition(e)))
            .map(drop)?;

        // The status may change concurrently between the check above and
        // the update, so the storage re-validates it under its lock.
        let updated = self
            .storage()
            .execute(Update(request::StatusChange { id, status }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.emit(Event::RequestStatusChanged {
            distribution_id: updated.distribution_id,
            request_id: updated.id,
            status: updated.status,
            requester_email: updated.requester_email.clone(),
        });

        tracing::debug!(
            %id,
            status = %updated.status,
            "`Request` status changed",
        );

        Ok(updated)
    }
}

/// Error of [`UpdateRequestStatus`] [`Command`] execution.
#[derive(Debug, Display, Error)]
pub enum ExecutionError {
    /// [`Request`] with the provided ID does not exist.
    #[display("`Request(id: {_0})` does not exist")]
    RequestNotExists(#[error(not(source))] request::Id),

    /// Requested transition is not permitted by the state machine.
    #[display("{_0}")]
    InvalidTransition(request::InvalidTransition),

    /// [`Storage`] error.
    #[display("`Storage` operation failed: {_0}")]
    Storage(storage::Error),
}

impl From<storage::Error> for ExecutionError {
    fn from(e: storage::Error) -> Self {
        match e {
            storage::Error::RequestGone(id) => Self::RequestNotExists(id),
            storage::Error::Transition(e) => Self::InvalidTransition(e),
            e @ storage::Error::DistributionGone(_) => Self::Storage(e),
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{CreateDistribution, CreateRequest},
        domain::request,
        infra::Memory,
        Config, Event, Service,
    };

    use super::{Command as _, ExecutionError, UpdateRequestStatus};

    async fn seeded(service: &Service<Memory>) -> request::Id {
        let distribution = service
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
            .unwrap();

        service
            .execute(CreateRequest {
                distribution_id: distribution.id,
                requester_name: "A".parse().unwrap(),
                requester_email: "a@x.com".parse().unwrap(),
                requester_phone: None,
                reason: "need coat".parse().unwrap(),
                additional_info: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn walks_the_full_lifecycle() {
        let service = Service::new(Config::default(), Memory::default());
        let id = seeded(&service).await;

        let approved = service
            .execute(UpdateRequestStatus {
                id,
                status: request::Status::Approved,
            })
            .await
            .unwrap();
        assert_eq!(approved.status, request::Status::Approved);

        let fulfilled = service
            .execute(UpdateRequestStatus {
                id,
                status: request::Status::Fulfilled,
            })
            .await
            .unwrap();
        assert_eq!(fulfilled.status, request::Status::Fulfilled);

        let err = service
            .execute(UpdateRequestStatus {
                id,
                status: request::Status::Rejected,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidTransition(e)
                if e.from == request::Status::Fulfilled
                    && e.to == request::Status::Rejected,
        ));
    }

    #[tokio::test]
    async fn refuses_shortcut_to_fulfilled() {
        let service = Service::new(Config::default(), Memory::default());
        let id = seeded(&service).await;

        let err = service
            .execute(UpdateRequestStatus {
                id,
                status: request::Status::Fulfilled,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidTransition(_),
        ));
    }

    #[tokio::test]
    async fn errors_on_unknown_request() {
        let service = Service::new(Config::default(), Memory::default());
        let id = request::Id::new();

        let err = service
            .execute(UpdateRequestStatus {
                id,
                status: request::Status::Approved,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::RequestNotExists(e) if *e == id,
        ));
    }

    #[tokio::test]
    async fn emits_status_change_intent() {
        let service = Service::new(Config::default(), Memory::default());
        let id = seeded(&service).await;
        let mut events = service.subscribe();

        _ = service
            .execute(UpdateRequestStatus {
                id,
                status: request::Status::Approved,
            })
            .await
            .unwrap();

        let event = events.recv().await.unwrap();
        let Event::RequestStatusChanged {
            request_id, status, ..
        } = event
        else {
            panic!("unexpected event: {event:?}");
        };
        assert_eq!(request_id, id);
        assert_eq!(status, request::Status::Approved);
    }
}
