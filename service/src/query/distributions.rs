//! [`Query`] collection related to the multiple [`Distribution`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Distribution, Query};

use super::StorageQuery;

/// Queries a list of [`Distribution`]s.
pub type List = StorageQuery<
    By<read::distribution::list::Page, read::distribution::list::Selector>,
>;

/// Queries total count of [`Distribution`] list items.
pub type TotalCount =
    StorageQuery<By<read::distribution::list::TotalCount, ()>>;
