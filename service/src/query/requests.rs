//! [`Query`] collection related to the multiple [`Request`]s.

use common::operations::By;

use crate::domain::{distribution, Request};
#[cfg(doc)]
use crate::{domain::Distribution, Query};

use super::StorageQuery;

/// Queries all the [`Request`]s, in submission order.
pub type List = StorageQuery<By<Vec<Request>, ()>>;

/// Queries all the [`Request`]s submitted against a [`Distribution`], in
/// submission order.
///
/// Yields an empty list (never an error) for an unknown
/// [`distribution::Id`].
pub type ForDistribution = StorageQuery<By<Vec<Request>, distribution::Id>>;
