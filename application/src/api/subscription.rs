//! GraphQL [`Subscription`]s definitions.

use futures::{
    stream::{self, BoxStream},
    StreamExt as _,
};
use juniper::{graphql_object, graphql_subscription, GraphQLEnum};
use service::{domain, Event};
use tokio::sync::broadcast;

use crate::{api, Context, Error};

/// Root of all GraphQL subscription.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Streams notification intents raised by `Request` submissions and
    /// status changes.
    ///
    /// Actual delivery (email/SMS/etc.) is the subscriber's responsibility;
    /// lagging subscribers skip the intents they missed.
    pub async fn request_events(
        &self,
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<RequestEvent, Error>>, Error> {
        let events = ctx.service().subscribe();
        Ok(stream::unfold(events, |mut events| async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        return Some((Ok(RequestEvent::from(event)), events));
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed())
    }
}

/// Notification intent about a `Request`.
#[derive(Clone, Debug)]
pub struct RequestEvent {
    /// Kind of this [`RequestEvent`].
    kind: RequestEventKind,

    /// ID of the `Distribution` the affected `Request` belongs to.
    distribution_id: api::distribution::Id,

    /// ID of the affected `Request`.
    request_id: api::request::Id,

    /// Status of the affected `Request` after this [`RequestEvent`].
    status: api::request::Status,

    /// Owner of the `Distribution` to notify, if any.
    owner: Option<api::distribution::Philanthropist>,

    /// Email of the requester to notify.
    requester_email: api::request::Email,
}

/// Notification intent about a `Request`.
#[graphql_object(context = Context)]
impl RequestEvent {
    /// Kind of this `RequestEvent`.
    #[must_use]
    pub fn kind(&self) -> RequestEventKind {
        self.kind
    }

    /// ID of the `Distribution` the affected `Request` belongs to.
    #[must_use]
    pub fn distribution_id(&self) -> api::distribution::Id {
        self.distribution_id
    }

    /// ID of the affected `Request`.
    #[must_use]
    pub fn request_id(&self) -> api::request::Id {
        self.request_id
    }

    /// Status of the affected `Request` after this `RequestEvent`.
    #[must_use]
    pub fn status(&self) -> api::request::Status {
        self.status
    }

    /// Display name of the `Distribution` owner to notify, if relevant.
    #[must_use]
    pub fn owner(&self) -> &Option<api::distribution::Philanthropist> {
        &self.owner
    }

    /// Email of the requester to notify.
    #[must_use]
    pub fn requester_email(&self) -> api::request::Email {
        self.requester_email.clone()
    }
}

/// Kind of a [`RequestEvent`].
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum RequestEventKind {
    /// A new `Request` was submitted.
    Created,

    /// A `Request`'s status was changed.
    StatusChanged,
}

impl From<Event> for RequestEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::RequestCreated {
                distribution_id,
                request_id,
                owner,
                requester_email,
            } => Self {
                kind: RequestEventKind::Created,
                distribution_id: distribution_id.into(),
                request_id: request_id.into(),
                status: domain::request::Status::Pending.into(),
                owner: Some(owner.into()),
                requester_email: requester_email.into(),
            },
            Event::RequestStatusChanged {
                distribution_id,
                request_id,
                status,
                requester_email,
            } => Self {
                kind: RequestEventKind::StatusChanged,
                distribution_id: distribution_id.into(),
                request_id: request_id.into(),
                status: status.into(),
                owner: None,
                requester_email: requester_email.into(),
            },
        }
    }
}
