//! [`Query`] collection related to a single [`Request`].

use common::operations::By;

use crate::domain::{request, Request};
#[cfg(doc)]
use crate::Query;

use super::StorageQuery;

/// Queries a [`Request`] by its [`request::Id`].
pub type ById = StorageQuery<By<Option<Request>, request::Id>>;
