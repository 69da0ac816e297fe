//! Notification intents emitted by the [`Service`].
//!
//! The [`Service`] only signals that a notification is due; actual delivery
//! (email/SMS/etc.) is an external collaborator's responsibility. Intents
//! are published on a fire-and-forget broadcast channel and never block the
//! operation raising them.
//!
//! [`Service`]: crate::Service

use crate::domain::{distribution, request};

#[cfg(doc)]
use crate::domain::{Distribution, Request};

/// Notification intent emitted by a [`Service`] operation.
///
/// [`Service`]: crate::Service
#[derive(Clone, Debug)]
pub enum Event {
    /// A new [`Request`] was submitted against a [`Distribution`].
    ///
    /// Carries both the "notify the owner about the new [`Request`]" and the
    /// "confirm the submission to the requester" intents.
    RequestCreated {
        /// ID of the [`Distribution`] the [`Request`] was submitted against.
        distribution_id: distribution::Id,

        /// ID of the submitted [`Request`].
        request_id: request::Id,

        /// Owner of the [`Distribution`] to notify.
        owner: distribution::Philanthropist,

        /// Email of the requester to confirm the submission to.
        requester_email: request::Email,
    },

    /// A [`Request`]'s status was changed by the owner.
    ///
    /// Carries the "notify the requester about the decision" intent.
    RequestStatusChanged {
        /// ID of the [`Distribution`] the [`Request`] belongs to.
        distribution_id: distribution::Id,

        /// ID of the affected [`Request`].
        request_id: request::Id,

        /// New [`request::Status`] of the [`Request`].
        status: request::Status,

        /// Email of the requester to notify.
        requester_email: request::Email,
    },
}

impl Event {
    /// Returns ID of the [`Request`] this [`Event`] is about.
    #[must_use]
    pub fn request_id(&self) -> request::Id {
        match self {
            Self::RequestCreated { request_id, .. }
            | Self::RequestStatusChanged { request_id, .. } => *request_id,
        }
    }

    /// Returns ID of the [`Distribution`] this [`Event`] is about.
    #[must_use]
    pub fn distribution_id(&self) -> distribution::Id {
        match self {
            Self::RequestCreated {
                distribution_id, ..
            }
            | Self::RequestStatusChanged {
                distribution_id, ..
            } => *distribution_id,
        }
    }
}
