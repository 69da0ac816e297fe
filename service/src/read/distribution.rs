//! [`Distribution`]-related read definitions.

#[cfg(doc)]
use crate::domain::Distribution;

pub mod list {
    //! [`Distribution`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{distribution, Distribution};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = distribution::Id;

    /// Cursor pointing to a specific [`Distribution`] in a list.
    pub type Cursor = distribution::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`distribution::Category`] to select by.
        pub category: Option<distribution::Category>,

        /// [`distribution::Status`] to select by.
        pub status: Option<distribution::Status>,
    }

    impl Filter {
        /// Checks whether the given [`Distribution`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, distribution: &Distribution) -> bool {
            let Self { category, status } = self;

            category
                .as_ref()
                .is_none_or(|c| distribution.category == *c)
                && status.is_none_or(|s| distribution.status == s)
        }
    }

    /// Total count of [`Distribution`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
