//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, domain::user, Command as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

/// Returns the authenticated philanthropist identity of the provided
/// [`Context`].
fn philanthropist(ctx: &Context) -> Result<user::User, Error> {
    let identity = ctx.identity().map_err(ctx.error())?;
    if identity.role == user::Role::Philanthropist {
        Ok(identity)
    } else {
        Err(ctx.error()(api::PrivilegeError::Philanthropist.into()))
    }
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Distribution` owned by the authenticated
    /// philanthropist.
    ///
    /// The status defaults to `ACTIVE` when omitted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHENTICATION_REQUIRED` - no identity headers are provided;
    /// - `NOT_PHILANTHROPIST` - the authenticated identity is not a
    ///                          philanthropist.
    #[tracing::instrument(
        skip_all,
        fields(
            category = %category,
            gql.name = "createDistribution",
            otel.name = Self::SPAN_NAME,
            status = ?status,
            title = %title,
        ),
    )]
    pub async fn create_distribution(
        title: api::distribution::Title,
        description: api::distribution::Description,
        category: api::distribution::Category,
        quantity: api::distribution::Quantity,
        location: api::distribution::Location,
        delivery_method: api::distribution::DeliveryMethod,
        status: Option<api::distribution::Status>,
        ctx: &Context,
    ) -> Result<api::Distribution, Error> {
        let identity = philanthropist(ctx)?;
        #[expect(
            unsafe_code,
            reason = "`user::Name` shares the format requirements"
        )]
        let owner = unsafe {
            service::domain::distribution::Philanthropist::new_unchecked(
                identity.name.to_string(),
            )
        };

        ctx.service()
            .execute(command::CreateDistribution {
                title: title.into(),
                description: description.into(),
                category: category.into(),
                quantity: quantity.into(),
                location: location.into(),
                delivery_method: delivery_method.into(),
                status: status.map(Into::into),
                owner,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Distribution` with the specified ID, merging the
    /// provided fields into the existing record.
    ///
    /// Omitted fields are left unchanged; the ID, the creation timestamp
    /// and the owner are never updatable.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHENTICATION_REQUIRED` - no identity headers are provided;
    /// - `NOT_PHILANTHROPIST` - the authenticated identity is not a
    ///                          philanthropist;
    /// - `DISTRIBUTION_NOT_EXISTS` - the `Distribution` with the specified
    ///                               ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "updateDistribution",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_distribution(
        id: api::distribution::Id,
        title: Option<api::distribution::Title>,
        description: Option<api::distribution::Description>,
        category: Option<api::distribution::Category>,
        quantity: Option<api::distribution::Quantity>,
        location: Option<api::distribution::Location>,
        delivery_method: Option<api::distribution::DeliveryMethod>,
        status: Option<api::distribution::Status>,
        ctx: &Context,
    ) -> Result<api::Distribution, Error> {
        philanthropist(ctx).map(drop)?;

        ctx.service()
            .execute(command::UpdateDistribution {
                id: id.into(),
                title: title.map(Into::into),
                description: description.map(Into::into),
                category: category.map(Into::into),
                quantity: quantity.map(Into::into),
                location: location.map(Into::into),
                delivery_method: delivery_method.map(Into::into),
                status: status.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Distribution` with the specified ID, along with every
    /// `Request` submitted against it.
    ///
    /// Deletion is idempotent: `false` is returned if nothing was deleted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHENTICATION_REQUIRED` - no identity headers are provided;
    /// - `NOT_PHILANTHROPIST` - the authenticated identity is not a
    ///                          philanthropist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "deleteDistribution",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_distribution(
        id: api::distribution::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        philanthropist(ctx).map(drop)?;

        ctx.service()
            .execute(command::DeleteDistribution { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Toggles the status of the `Distribution` with the specified ID
    /// between `ACTIVE` and `PAUSED`.
    ///
    /// A `FULFILLED` `Distribution` is terminal and returned unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHENTICATION_REQUIRED` - no identity headers are provided;
    /// - `NOT_PHILANTHROPIST` - the authenticated identity is not a
    ///                          philanthropist;
    /// - `DISTRIBUTION_NOT_EXISTS` - the `Distribution` with the specified
    ///                               ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "toggleDistributionStatus",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn toggle_distribution_status(
        id: api::distribution::Id,
        ctx: &Context,
    ) -> Result<api::Distribution, Error> {
        philanthropist(ctx).map(drop)?;

        ctx.service()
            .execute(command::ToggleDistributionStatus { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Submits a new `Request` against the `Distribution` with the
    /// specified ID.
    ///
    /// The new `Request` starts as `PENDING`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DISTRIBUTION_NOT_EXISTS` - the `Distribution` with the specified
    ///                               ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            distribution_id = %distribution_id,
            gql.name = "createRequest",
            otel.name = Self::SPAN_NAME,
            requester_name = %requester_name,
        ),
    )]
    pub async fn create_request(
        distribution_id: api::distribution::Id,
        requester_name: api::request::Name,
        requester_email: api::request::Email,
        reason: api::request::Reason,
        requester_phone: Option<api::request::Phone>,
        additional_info: Option<api::request::AdditionalInfo>,
        ctx: &Context,
    ) -> Result<api::Request, Error> {
        ctx.service()
            .execute(command::CreateRequest {
                distribution_id: distribution_id.into(),
                requester_name: requester_name.into(),
                requester_email: requester_email.into(),
                requester_phone: requester_phone.map(Into::into),
                reason: reason.into(),
                additional_info: additional_info.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Transitions the `Request` with the specified ID into a new status.
    ///
    /// Permitted transitions: `PENDING` → `APPROVED`, `PENDING` →
    /// `REJECTED`, `APPROVED` → `FULFILLED`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHENTICATION_REQUIRED` - no identity headers are provided;
    /// - `NOT_PHILANTHROPIST` - the authenticated identity is not a
    ///                          philanthropist;
    /// - `REQUEST_NOT_EXISTS` - the `Request` with the specified ID does
    ///                          not exist;
    /// - `INVALID_STATUS_TRANSITION` - the requested transition is not
    ///                                 permitted by the state machine.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "updateRequestStatus",
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_request_status(
        id: api::request::Id,
        status: api::request::Status,
        ctx: &Context,
    ) -> Result<api::Request, Error> {
        philanthropist(ctx).map(drop)?;

        ctx.service()
            .execute(command::UpdateRequestStatus {
                id: id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}
