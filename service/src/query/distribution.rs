//! [`Query`] collection related to a single [`Distribution`].

use common::operations::By;

use crate::domain::{distribution, Distribution};
#[cfg(doc)]
use crate::Query;

use super::StorageQuery;

/// Queries a [`Distribution`] by its [`distribution::Id`].
pub type ById = StorageQuery<By<Option<Distribution>, distribution::Id>>;
