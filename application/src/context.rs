//! [`Context`]-related definitions.

use std::{
    str::FromStr as _,
    sync::atomic::{self, AtomicU16},
};

use axum::{async_trait, extract::FromRequestParts};
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::domain::user;

use crate::{define_error, Error, JuniperResponse, Service};

/// Name of the HTTP header carrying the identity provider's user ID.
const ID_HEADER: &str = "x-identity-id";

/// Name of the HTTP header carrying the identity provider's display name.
const NAME_HEADER: &str = "x-identity-name";

/// Name of the HTTP header carrying the identity provider's role attribute.
const ROLE_HEADER: &str = "x-identity-role";

/// Application context.
///
/// Authentication itself is performed by an external identity provider in
/// front of this server, which forwards the authenticated identity in the
/// `X-Identity-Id`/`X-Identity-Name`/`X-Identity-Role` HTTP headers (the
/// role value is `PHILANTHROPIST` or `BENEFICIARY`). Those headers are
/// trusted as given.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Error status code.
    error_status_code: AtomicU16,

    /// Parts of the HTTP request.
    parts: http::request::Parts,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the error status code of this [`Context`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Tries to get the authenticated identity of this [`Context`].
    ///
    /// [`None`] is returned if the current HTTP request carries no identity
    /// headers at all.
    ///
    /// # Errors
    ///
    /// Errors if the identity headers are present but malformed.
    pub fn try_identity(&self) -> Result<Option<user::User>, Error> {
        use AuthError as E;

        let header = |name: &str| {
            self.parts
                .headers
                .get(name)
                .map(|v| v.to_str().map_err(|_| Error::from(E::InvalidIdentity)))
                .transpose()
        };

        let (id, name, role) =
            match (header(ID_HEADER)?, header(NAME_HEADER)?, header(ROLE_HEADER)?)
            {
                (None, None, None) => return Ok(None),
                (Some(id), Some(name), Some(role)) => (id, name, role),
                _ => return Err(self.error()(E::InvalidIdentity.into())),
            };

        let identity = user::User {
            id: user::Id::from(id.to_owned()),
            name: user::Name::new(name)
                .ok_or_else(|| self.error()(E::InvalidIdentity.into()))?,
            role: user::Role::from_str(role)
                .map_err(|_| self.error()(E::InvalidIdentity.into()))?,
        };

        Ok(Some(identity))
    }

    /// Returns the authenticated identity of this [`Context`].
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the current HTTP request carries no identity headers;
    /// - the identity headers are malformed.
    pub fn identity(&self) -> Result<user::User, Error> {
        self.try_identity()?.ok_or_else(|| {
            self.error()(AuthError::AuthenticationRequired.into())
        })
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                JuniperResponse {
                    status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(
                            Error::internal(&"missing `Service` extension")
                                .into_field_error(),
                        ),
                    ),
                }
            })?;

        Ok(Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            parts: parts.clone(),
        })
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHENTICATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authenticated identity required"]
        AuthenticationRequired,

        #[code = "INVALID_IDENTITY"]
        #[status = BAD_REQUEST]
        #[message = "Malformed identity headers"]
        InvalidIdentity,
    }
}
