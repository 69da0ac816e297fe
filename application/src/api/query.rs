//! GraphQL [`Query`]s definitions.

use itertools::Itertools as _;
use juniper::graphql_object;
use service::{infra::storage, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Distribution` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DISTRIBUTION_NOT_EXISTS` - the `Distribution` with the specified
    ///                               ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "distribution",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn distribution(
        id: api::distribution::Id,
        ctx: &Context,
    ) -> Result<api::distribution::list::Edge, Error> {
        Self::distributions(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| DistributionError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Distribution`s, most recent first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            category = ?category.as_ref().map(ToString::to_string),
            first = ?first,
            gql.name = "distributions",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn distributions(
        first: Option<i32>,
        after: Option<api::distribution::list::Cursor>,
        last: Option<i32>,
        before: Option<api::distribution::list::Cursor>,
        category: Option<api::distribution::Category>,
        status: Option<api::distribution::Status>,
        ctx: &Context,
    ) -> Result<api::distribution::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::distributions::List::by(
                read::distribution::list::Selector {
                    arguments: read::distribution::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::distribution::list::Filter {
                        category: category.map(Into::into),
                        status: status.map(Into::into),
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns all the `Request`s submitted against the specified
    /// `Distribution`, in submission order.
    ///
    /// An unknown `DistributionId` yields an empty list, never an error.
    #[tracing::instrument(
        skip_all,
        fields(
            distribution_id = %distribution_id,
            gql.name = "requestsForDistribution",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn requests_for_distribution(
        distribution_id: api::distribution::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Request>, Error> {
        ctx.service()
            .execute(query::requests::ForDistribution::by(
                distribution_id.into(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|requests| requests.into_iter().map(Into::into).collect())
    }

    /// Returns all the `Request`s, in submission order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "requests",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn requests(ctx: &Context) -> Result<Vec<api::Request>, Error> {
        ctx.service()
            .execute(query::requests::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|requests| requests.into_iter().map(Into::into).collect())
    }
}

define_error! {
    enum DistributionError {
        #[code = "DISTRIBUTION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Distribution` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum RequestError {
        #[code = "REQUEST_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Request` with the specified ID does not exist"]
        NotExists,
    }
}

impl AsError for storage::Error {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            storage::Error::DistributionGone(_) => {
                Some(DistributionError::NotExists.into())
            }
            storage::Error::RequestGone(_) => {
                Some(RequestError::NotExists.into())
            }
            storage::Error::Transition(e) => {
                Some(Error::invalid_transition(e))
            }
        }
    }
}
