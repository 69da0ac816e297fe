//! [`Command`] definition.

pub mod create_distribution;
pub mod create_request;
pub mod delete_distribution;
pub mod toggle_distribution_status;
pub mod update_distribution;
pub mod update_request_status;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_distribution::CreateDistribution, create_request::CreateRequest,
    delete_distribution::DeleteDistribution,
    toggle_distribution_status::ToggleDistributionStatus,
    update_distribution::UpdateDistribution,
    update_request_status::UpdateRequestStatus,
};
