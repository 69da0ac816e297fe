//! [`Distribution`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{
    graphql_object, GraphQLEnum, GraphQLScalar, InputValue, ScalarValue,
    Value,
};
use service::{command, domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A distribution listing.
#[derive(Clone, Debug, From)]
pub struct Distribution {
    /// ID of this [`Distribution`].
    id: Id,

    /// Underlying [`domain::Distribution`].
    distribution: OnceCell<domain::Distribution>,
}

impl From<domain::Distribution> for Distribution {
    fn from(distribution: domain::Distribution) -> Self {
        Self {
            id: distribution.id.into(),
            distribution: OnceCell::new_with(Some(distribution)),
        }
    }
}

impl Distribution {
    /// Creates a new [`Distribution`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Distribution`] with the provided ID exists,
    /// otherwise accessing this [`Distribution`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            distribution: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Distribution`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Distribution`] doesn't exist.
    async fn distribution(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Distribution, Error> {
        let id = self.id.into();
        self.distribution
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::distribution::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|d| {
                        future::ready(d.ok_or_else(|| {
                            api::query::DistributionError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A distribution listing.
#[graphql_object(context = Context)]
impl Distribution {
    /// Unique identifier of this `Distribution`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Title of this `Distribution`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.title",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn title(&self, ctx: &Context) -> Result<Title, Error> {
        Ok(self.distribution(ctx).await?.title.clone().into())
    }

    /// Description of this `Distribution`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Description, Error> {
        Ok(self.distribution(ctx).await?.description.clone().into())
    }

    /// Category of this `Distribution`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn category(&self, ctx: &Context) -> Result<Category, Error> {
        Ok(self.distribution(ctx).await?.category.clone().into())
    }

    /// Number of items offered by this `Distribution`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.quantity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn quantity(&self, ctx: &Context) -> Result<Quantity, Error> {
        Ok(self.distribution(ctx).await?.quantity.into())
    }

    /// Location where this `Distribution` is available.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(&self, ctx: &Context) -> Result<Location, Error> {
        Ok(self.distribution(ctx).await?.location.clone().into())
    }

    /// Delivery method of this `Distribution`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.deliveryMethod",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn delivery_method(
        &self,
        ctx: &Context,
    ) -> Result<DeliveryMethod, Error> {
        Ok(self.distribution(ctx).await?.delivery_method.clone().into())
    }

    /// Current status of this `Distribution`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.distribution(ctx).await?.status.into())
    }

    /// Number of `Request`s submitted against this `Distribution`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.requestCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn request_count(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::try_from(self.distribution(ctx).await?.request_count)
            .unwrap_or(i32::MAX))
    }

    /// `DateTime` when this `Distribution` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.distribution(ctx).await?.created_at.coerce())
    }

    /// Display name of the philanthropist owning this `Distribution`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.philanthropist",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn philanthropist(
        &self,
        ctx: &Context,
    ) -> Result<Philanthropist, Error> {
        Ok(self.distribution(ctx).await?.owner.clone().into())
    }

    /// `Request`s submitted against this `Distribution`, in submission
    /// order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Distribution.requests",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn requests(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Request>, Error> {
        ctx.service()
            .execute(query::requests::ForDistribution::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|requests| requests.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Distribution`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::distribution::Id)]
#[into(domain::distribution::Id)]
#[graphql(name = "DistributionId", transparent)]
pub struct Id(Uuid);

/// Title of a `Distribution`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DistributionTitle",
    with = scalar::Via::<domain::distribution::Title>,
)]
pub struct Title(domain::distribution::Title);

/// Description of a `Distribution`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DistributionDescription",
    with = scalar::Via::<domain::distribution::Description>,
)]
pub struct Description(domain::distribution::Description);

/// Category of a `Distribution`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DistributionCategory",
    with = scalar::Via::<domain::distribution::Category>,
)]
pub struct Category(domain::distribution::Category);

/// Location of a `Distribution`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DistributionLocation",
    with = scalar::Via::<domain::distribution::Location>,
)]
pub struct Location(domain::distribution::Location);

/// Delivery method of a `Distribution`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DistributionDeliveryMethod",
    with = scalar::Via::<domain::distribution::DeliveryMethod>,
)]
pub struct DeliveryMethod(domain::distribution::DeliveryMethod);

/// Display name of the philanthropist owning a `Distribution`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "Philanthropist",
    with = scalar::Via::<domain::distribution::Philanthropist>,
)]
pub struct Philanthropist(domain::distribution::Philanthropist);

/// Non-negative number of items offered by a `Distribution`.
#[derive(Clone, Copy, Debug, From, GraphQLScalar, Into)]
#[graphql(
    name = "DistributionQuantity",
    with = Self,
    parse_token(i32),
)]
pub struct Quantity(domain::distribution::Quantity);

impl Quantity {
    /// Converts this [`Quantity`] into a scalar [`Value`].
    fn to_output<S: ScalarValue>(q: &Self) -> Value<S> {
        Value::scalar(i32::try_from(q.0).unwrap_or(i32::MAX))
    }

    /// Constructs a [`Quantity`] from the provided scalar [`InputValue`].
    fn from_input<S: ScalarValue>(
        input: &InputValue<S>,
    ) -> Result<Self, String> {
        let n = input.as_int_value().ok_or_else(|| {
            format!(
                "Cannot parse `DistributionQuantity` input scalar from \
                 non-integer value: {input}",
            )
        })?;
        u32::try_from(n).map(Self).map_err(|_| {
            "Cannot parse `DistributionQuantity` input scalar: \
             cannot be negative"
                .to_owned()
        })
    }
}

/// Status of a `Distribution`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "DistributionStatus")]
pub enum Status {
    /// The `Distribution` accepts new requests.
    Active,

    /// The `Distribution` is temporarily paused by its owner.
    Paused,

    /// The `Distribution` is fulfilled.
    Fulfilled,
}

impl From<domain::distribution::Status> for Status {
    fn from(status: domain::distribution::Status) -> Self {
        use domain::distribution::Status as S;
        match status {
            S::Active => Self::Active,
            S::Paused => Self::Paused,
            S::Fulfilled => Self::Fulfilled,
        }
    }
}

impl From<Status> for domain::distribution::Status {
    fn from(status: Status) -> Self {
        use Status as S;
        match status {
            S::Active => Self::Active,
            S::Paused => Self::Paused,
            S::Fulfilled => Self::Fulfilled,
        }
    }
}

impl AsError for command::update_distribution::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::DistributionNotExists(_) => {
                Some(api::query::DistributionError::NotExists.into())
            }
            Self::Storage(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::toggle_distribution_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::DistributionNotExists(_) => {
                Some(api::query::DistributionError::NotExists.into())
            }
            Self::Storage(e) => e.try_as_error(),
        }
    }
}

pub mod list {
    //! Definitions related to the [`Distribution`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Distribution, Id};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Distribution` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::distribution::list::Cursor)]
    #[graphql(
        name = "DistributionListCursor",
        with = scalar::Via::<read::distribution::list::Cursor>,
    )]
    pub struct Cursor(pub read::distribution::list::Cursor);

    /// Edge in the [`Distribution`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::distribution::list::Edge);

    /// Edge in the `Distribution` list.
    #[graphql_object(name = "DistributionListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `DistributionListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `DistributionListEdge`.
        #[must_use]
        pub fn node(&self) -> Distribution {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from storage guarantees \
                          `Distribution` existence"
            )]
            unsafe {
                Distribution::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Distribution`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::distribution::list::Connection);

    /// Connection of the `Distribution` list.
    #[graphql_object(name = "DistributionListConnection", context = Context)]
    impl Connection {
        /// Edges of this `DistributionListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::distribution::list::PageInfo`].
        info: read::distribution::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `DistributionListConnection` page.
    #[graphql_object(name = "DistributionListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Distribution` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::distributions::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
