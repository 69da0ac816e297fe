//! [`Distribution`] definitions.

use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use common::DateTime;

/// Listing of goods or services offered by a philanthropist.
#[derive(Clone, Debug)]
pub struct Distribution {
    /// ID of this [`Distribution`].
    pub id: Id,

    /// [`Title`] of this [`Distribution`].
    pub title: Title,

    /// [`Description`] of this [`Distribution`].
    pub description: Description,

    /// [`Category`] this [`Distribution`] belongs to.
    pub category: Category,

    /// Number of items offered by this [`Distribution`].
    pub quantity: Quantity,

    /// [`Location`] where this [`Distribution`] is available.
    pub location: Location,

    /// [`DeliveryMethod`] of this [`Distribution`].
    pub delivery_method: DeliveryMethod,

    /// Current [`Status`] of this [`Distribution`].
    pub status: Status,

    /// Number of live [`Request`]s referencing this [`Distribution`].
    ///
    /// Maintained incrementally by the storage as [`Request`]s are created
    /// and cascade-deleted.
    ///
    /// [`Request`]: crate::domain::Request
    pub request_count: RequestCount,

    /// [`DateTime`] when this [`Distribution`] was created.
    pub created_at: CreationDateTime,

    /// [`Philanthropist`] owning this [`Distribution`].
    pub owner: Philanthropist,
}

/// ID of a [`Distribution`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Title of a [`Distribution`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 512
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Description of a [`Distribution`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` matches the
    /// format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        description.trim() == description
            && !description.is_empty()
            && description.len() <= 2048
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Category of a [`Distribution`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Category(String);

impl Category {
    /// Creates a new [`Category`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `category` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(category: impl Into<String>) -> Self {
        Self(category.into())
    }

    /// Creates a new [`Category`] if the given `category` is valid.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Option<Self> {
        let category = category.into();
        Self::check(&category).then_some(Self(category))
    }

    /// Checks whether the given `category` is a valid [`Category`].
    fn check(category: impl AsRef<str>) -> bool {
        let category = category.as_ref();
        category.trim() == category
            && !category.is_empty()
            && category.len() <= 128
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Category`")
    }
}

/// Location where a [`Distribution`] is available.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `location` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.len() <= 512
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Delivery method of a [`Distribution`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct DeliveryMethod(String);

impl DeliveryMethod {
    /// Creates a new [`DeliveryMethod`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `method` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(method: impl Into<String>) -> Self {
        Self(method.into())
    }

    /// Creates a new [`DeliveryMethod`] if the given `method` is valid.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Option<Self> {
        let method = method.into();
        Self::check(&method).then_some(Self(method))
    }

    /// Checks whether the given `method` is a valid [`DeliveryMethod`].
    fn check(method: impl AsRef<str>) -> bool {
        let method = method.as_ref();
        method.trim() == method && !method.is_empty() && method.len() <= 128
    }
}

impl FromStr for DeliveryMethod {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `DeliveryMethod`")
    }
}

/// Display name of the philanthropist owning a [`Distribution`].
///
/// Handed in opaquely by the identity provider and never validated beyond
/// basic sanity.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Philanthropist(String);

impl Philanthropist {
    /// Creates a new [`Philanthropist`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Philanthropist`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Philanthropist`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Philanthropist {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Philanthropist`")
    }
}

/// Number of items offered by a [`Distribution`].
pub type Quantity = u32;

/// Number of live [`Request`]s referencing a [`Distribution`].
///
/// [`Request`]: crate::domain::Request
pub type RequestCount = u32;

define_kind! {
    #[doc = "Status of a [`Distribution`]."]
    enum Status {
        #[doc = "The [`Distribution`] accepts new requests."]
        Active = 1,

        #[doc = "The [`Distribution`] is temporarily paused by its owner."]
        Paused = 2,

        #[doc = "The [`Distribution`] is fulfilled."]
        Fulfilled = 3,
    }
}

impl Status {
    /// Returns the pause/activate flip of this [`Status`].
    ///
    /// [`None`] is returned for [`Status::Fulfilled`]: it's a terminal
    /// display state not reachable by toggling.
    #[must_use]
    pub fn toggled(self) -> Option<Self> {
        match self {
            Self::Active => Some(Self::Paused),
            Self::Paused => Some(Self::Active),
            Self::Fulfilled => None,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Active
    }
}

/// Sparse set of field updates applicable to a [`Distribution`].
///
/// [`Id`], [`CreationDateTime`], [`RequestCount`] and [`Philanthropist`]
/// are not expressible here, so they cannot be overwritten.
#[derive(Clone, Debug)]
pub struct Changes {
    /// ID of the [`Distribution`] to update.
    pub id: Id,

    /// New [`Title`], if any.
    pub title: Option<Title>,

    /// New [`Description`], if any.
    pub description: Option<Description>,

    /// New [`Category`], if any.
    pub category: Option<Category>,

    /// New [`Quantity`], if any.
    pub quantity: Option<Quantity>,

    /// New [`Location`], if any.
    pub location: Option<Location>,

    /// New [`DeliveryMethod`], if any.
    pub delivery_method: Option<DeliveryMethod>,

    /// New [`Status`], if any.
    pub status: Option<Status>,
}

impl Changes {
    /// Merges these [`Changes`] into the given [`Distribution`].
    ///
    /// Fields not supplied are left unchanged.
    pub fn apply_to(&self, distribution: &mut Distribution) {
        let Self {
            id: _,
            title,
            description,
            category,
            quantity,
            location,
            delivery_method,
            status,
        } = self;

        if let Some(title) = title {
            distribution.title = title.clone();
        }
        if let Some(description) = description {
            distribution.description = description.clone();
        }
        if let Some(category) = category {
            distribution.category = category.clone();
        }
        if let Some(quantity) = quantity {
            distribution.quantity = *quantity;
        }
        if let Some(location) = location {
            distribution.location = location.clone();
        }
        if let Some(delivery_method) = delivery_method {
            distribution.delivery_method = delivery_method.clone();
        }
        if let Some(status) = status {
            distribution.status = *status;
        }
    }
}

/// [`DateTime`] when a [`Distribution`] was created.
pub type CreationDateTime = DateTimeOf<(Distribution, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn toggles_between_active_and_paused() {
        assert_eq!(Status::Active.toggled(), Some(Status::Paused));
        assert_eq!(Status::Paused.toggled(), Some(Status::Active));
    }

    #[test]
    fn fulfilled_is_terminal() {
        assert_eq!(Status::Fulfilled.toggled(), None);
    }

    #[test]
    fn defaults_to_active() {
        assert_eq!(Status::default(), Status::Active);
    }
}
