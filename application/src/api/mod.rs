//! GraphQL API definitions.

pub mod distribution;
mod mutation;
mod query;
pub mod request;
pub mod scalar;
mod subscription;

use crate::define_error;

pub use self::{
    distribution::Distribution, mutation::Mutation, query::Query,
    request::Request, subscription::Subscription,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PrivilegeError {
        #[code = "NOT_PHILANTHROPIST"]
        #[status = FORBIDDEN]
        #[message = "Authenticated identity must be a philanthropist"]
        Philanthropist,
    }
}

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
