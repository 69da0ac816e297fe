//! [`Storage`]-related implementations.

pub mod memory;

use derive_more::{Display, Error as StdError};

use crate::domain::{distribution, request};

#[cfg(doc)]
use crate::domain::{Distribution, Request};

pub use self::memory::Memory;

/// Storage operation.
pub use common::Handler as Storage;

/// [`Storage`] error.
///
/// Integrity refusals detected under the storage lock. Callers usually
/// pre-check with point selects for friendlier errors; these remain the
/// authoritative verdicts for racing operations.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Distribution`] referenced by the operation doesn't exist (anymore).
    #[display("`Distribution(id: {_0})` does not exist")]
    DistributionGone(#[error(not(source))] distribution::Id),

    /// [`Request`] referenced by the operation doesn't exist.
    #[display("`Request(id: {_0})` does not exist")]
    RequestGone(#[error(not(source))] request::Id),

    /// Refused [`request::Status`] transition.
    #[display("{_0}")]
    Transition(request::InvalidTransition),
}
