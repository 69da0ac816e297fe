//! [`Request`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{command, domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A beneficiary's request against a distribution.
#[derive(Clone, Debug, From)]
pub struct Request {
    /// ID of this [`Request`].
    id: Id,

    /// Underlying [`domain::Request`].
    request: OnceCell<domain::Request>,
}

impl From<domain::Request> for Request {
    fn from(request: domain::Request) -> Self {
        Self {
            id: request.id.into(),
            request: OnceCell::new_with(Some(request)),
        }
    }
}

impl Request {
    /// Returns the underlying [`domain::Request`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Request`] doesn't exist.
    async fn request(&self, ctx: &Context) -> Result<&domain::Request, Error> {
        let id = self.id.into();
        self.request
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::request::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::RequestError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A beneficiary's request against a distribution.
#[graphql_object(context = Context)]
impl Request {
    /// Unique identifier of this `Request`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Request.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Distribution` this `Request` is submitted against.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Request.distribution",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn distribution(
        &self,
        ctx: &Context,
    ) -> Result<api::Distribution, Error> {
        let id = self.request(ctx).await?.distribution_id;
        #[expect(
            unsafe_code,
            reason = "`Request` existence guarantees its `Distribution` \
                      existence"
        )]
        let distribution = unsafe { api::Distribution::new_unchecked(id) };
        Ok(distribution)
    }

    /// Name of the requester.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Request.requesterName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn requester_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.request(ctx).await?.requester_name.clone().into())
    }

    /// Email of the requester.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Request.requesterEmail",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn requester_email(
        &self,
        ctx: &Context,
    ) -> Result<Email, Error> {
        Ok(self.request(ctx).await?.requester_email.clone().into())
    }

    /// Phone of the requester, if provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Request.requesterPhone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn requester_phone(
        &self,
        ctx: &Context,
    ) -> Result<Option<Phone>, Error> {
        Ok(self
            .request(ctx)
            .await?
            .requester_phone
            .clone()
            .map(Into::into))
    }

    /// Reason of this `Request`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Request.reason",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn reason(&self, ctx: &Context) -> Result<Reason, Error> {
        Ok(self.request(ctx).await?.reason.clone().into())
    }

    /// Additional info of this `Request`, if provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Request.additionalInfo",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn additional_info(
        &self,
        ctx: &Context,
    ) -> Result<Option<AdditionalInfo>, Error> {
        Ok(self
            .request(ctx)
            .await?
            .additional_info
            .clone()
            .map(Into::into))
    }

    /// Current status of this `Request`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Request.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.request(ctx).await?.status.into())
    }

    /// `DateTime` when this `Request` was submitted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Request.submittedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn submitted_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.request(ctx).await?.submitted_at.coerce())
    }
}

/// Unique identifier of a `Request`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::request::Id)]
#[into(domain::request::Id)]
#[graphql(name = "RequestId", transparent)]
pub struct Id(Uuid);

/// Name of a requester.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RequesterName",
    with = scalar::Via::<domain::request::Name>,
)]
pub struct Name(domain::request::Name);

/// Email address of a requester.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RequesterEmail",
    with = scalar::Via::<domain::request::Email>,
)]
pub struct Email(domain::request::Email);

/// Phone number of a requester.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RequesterPhone",
    with = scalar::Via::<domain::request::Phone>,
)]
pub struct Phone(domain::request::Phone);

/// Reason of a `Request`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RequestReason",
    with = scalar::Via::<domain::request::Reason>,
)]
pub struct Reason(domain::request::Reason);

/// Additional info of a `Request`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RequestAdditionalInfo",
    with = scalar::Via::<domain::request::AdditionalInfo>,
)]
pub struct AdditionalInfo(domain::request::AdditionalInfo);

/// Status of a `Request`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "RequestStatus")]
pub enum Status {
    /// The `Request` awaits a decision.
    Pending,

    /// The `Request` is approved by the owner.
    Approved,

    /// The `Request` is fulfilled.
    Fulfilled,

    /// The `Request` is rejected by the owner.
    Rejected,
}

impl From<domain::request::Status> for Status {
    fn from(status: domain::request::Status) -> Self {
        use domain::request::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Fulfilled => Self::Fulfilled,
            S::Rejected => Self::Rejected,
        }
    }
}

impl From<Status> for domain::request::Status {
    fn from(status: Status) -> Self {
        use Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Fulfilled => Self::Fulfilled,
            S::Rejected => Self::Rejected,
        }
    }
}

impl AsError for command::create_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::DistributionNotExists(_) => {
                Some(api::query::DistributionError::NotExists.into())
            }
            Self::Storage(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_request_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::RequestNotExists(_) => {
                Some(api::query::RequestError::NotExists.into())
            }
            Self::InvalidTransition(e) => Some(Error::invalid_transition(e)),
            Self::Storage(e) => e.try_as_error(),
        }
    }
}
