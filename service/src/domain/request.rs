//! [`Request`] definitions.

use std::sync::LazyLock;

use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use common::DateTime;
use crate::domain::distribution;
#[cfg(doc)]
use crate::domain::Distribution;

/// Beneficiary's application against a specific [`Distribution`].
#[derive(Clone, Debug)]
pub struct Request {
    /// ID of this [`Request`].
    pub id: Id,

    /// ID of the [`Distribution`] this [`Request`] is submitted against.
    ///
    /// Always refers to a [`Distribution`] existing at the moment of this
    /// [`Request`] creation. Deleting that [`Distribution`] cascades to this
    /// [`Request`].
    pub distribution_id: distribution::Id,

    /// [`Name`] of the requester.
    pub requester_name: Name,

    /// [`Email`] of the requester.
    pub requester_email: Email,

    /// [`Phone`] of the requester, if provided.
    pub requester_phone: Option<Phone>,

    /// [`Reason`] of this [`Request`].
    pub reason: Reason,

    /// [`AdditionalInfo`] of this [`Request`], if provided.
    pub additional_info: Option<AdditionalInfo>,

    /// Current [`Status`] of this [`Request`].
    pub status: Status,

    /// [`DateTime`] when this [`Request`] was submitted.
    pub submitted_at: SubmissionDateTime,
}

/// ID of a [`Request`].
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

/// Name of a requester.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of a requester.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]{2,}$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of a requester.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[\d\s().-]{7,20}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Reason of a [`Request`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Reason(String);

impl Reason {
    /// Creates a new [`Reason`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `reason` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Creates a new [`Reason`] if the given `reason` is valid.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Option<Self> {
        let reason = reason.into();
        Self::check(&reason).then_some(Self(reason))
    }

    /// Checks whether the given `reason` is a valid [`Reason`].
    fn check(reason: impl AsRef<str>) -> bool {
        let reason = reason.as_ref();
        reason.trim() == reason && !reason.is_empty() && reason.len() <= 2048
    }
}

impl FromStr for Reason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reason`")
    }
}

/// Additional info of a [`Request`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct AdditionalInfo(String);

impl AdditionalInfo {
    /// Creates a new [`AdditionalInfo`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `info` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(info: impl Into<String>) -> Self {
        Self(info.into())
    }

    /// Creates a new [`AdditionalInfo`] if the given `info` is valid.
    #[must_use]
    pub fn new(info: impl Into<String>) -> Option<Self> {
        let info = info.into();
        Self::check(&info).then_some(Self(info))
    }

    /// Checks whether the given `info` is a valid [`AdditionalInfo`].
    fn check(info: impl AsRef<str>) -> bool {
        let info = info.as_ref();
        info.trim() == info && !info.is_empty() && info.len() <= 2048
    }
}

impl FromStr for AdditionalInfo {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `AdditionalInfo`")
    }
}

define_kind! {
    #[doc = "Status of a [`Request`]."]
    enum Status {
        #[doc = "The [`Request`] awaits a decision."]
        Pending = 1,

        #[doc = "The [`Request`] is approved by the owner."]
        Approved = 2,

        #[doc = "The [`Request`] is fulfilled."]
        Fulfilled = 3,

        #[doc = "The [`Request`] is rejected by the owner."]
        Rejected = 4,
    }
}

impl Status {
    /// Checks whether this [`Status`] may transition into the given one.
    ///
    /// Allowed transitions:
    /// - [`Pending`] → [`Approved`]
    /// - [`Pending`] → [`Rejected`]
    /// - [`Approved`] → [`Fulfilled`]
    ///
    /// [`Approved`]: Status::Approved
    /// [`Fulfilled`]: Status::Fulfilled
    /// [`Pending`]: Status::Pending
    /// [`Rejected`]: Status::Rejected
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Fulfilled)
        )
    }

    /// Transitions this [`Status`] into the given one.
    ///
    /// # Errors
    ///
    /// Errors with an [`InvalidTransition`] if the transition is not allowed
    /// by the state machine.
    pub fn transition_to(self, to: Self) -> Result<Self, InvalidTransition> {
        self.can_transition_to(to)
            .then_some(to)
            .ok_or(InvalidTransition { from: self, to })
    }

    /// Indicates whether this [`Status`] is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Fulfilled | Self::Rejected)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Pending
    }
}

/// Refused [`Status`] transition of a [`Request`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("`Request` status cannot transition from `{from}` to `{to}`")]
pub struct InvalidTransition {
    /// [`Status`] the transition was attempted from.
    pub from: Status,

    /// [`Status`] the transition was attempted to.
    pub to: Status,
}

/// Change of a [`Request`]'s [`Status`].
#[derive(Clone, Copy, Debug)]
pub struct StatusChange {
    /// ID of the [`Request`] to change the [`Status`] of.
    pub id: Id,

    /// [`Status`] to transition the [`Request`] into.
    pub status: Status,
}

/// [`DateTime`] when a [`Request`] was submitted.
pub type SubmissionDateTime = DateTimeOf<(Request, unit::Submission)>;

#[cfg(test)]
mod spec {
    use super::{Email, Name, Reason, Status};

    /// All the [`Status`] values.
    const STATUSES: [Status; 4] = [
        Status::Pending,
        Status::Approved,
        Status::Fulfilled,
        Status::Rejected,
    ];

    #[test]
    fn permits_only_defined_transitions() {
        for from in STATUSES {
            for to in STATUSES {
                let permitted = matches!(
                    (from, to),
                    (Status::Pending, Status::Approved)
                        | (Status::Pending, Status::Rejected)
                        | (Status::Approved, Status::Fulfilled)
                );

                assert_eq!(
                    from.can_transition_to(to),
                    permitted,
                    "unexpected verdict for `{from}` -> `{to}`",
                );
                assert_eq!(from.transition_to(to).is_ok(), permitted);
            }
        }
    }

    #[test]
    fn terminal_statuses_permit_nothing() {
        for from in [Status::Fulfilled, Status::Rejected] {
            assert!(from.is_terminal());
            for to in STATUSES {
                let e = from.transition_to(to).unwrap_err();
                assert_eq!((e.from, e.to), (from, to));
            }
        }
    }

    #[test]
    fn mandatory_fields_reject_empty_input() {
        assert!(Name::new("").is_none());
        assert!(Name::new("  ").is_none());
        assert!(Reason::new("").is_none());
        assert!(Email::new("").is_none());

        assert!(Name::new("Maria Rodriguez").is_some());
        assert!(Reason::new("need coat").is_some());
    }

    #[test]
    fn email_requires_plausible_address() {
        assert!(Email::new("maria.rodriguez@email.com").is_some());
        assert!(Email::new("a@x.com").is_some());

        assert!(Email::new("not-an-email").is_none());
        assert!(Email::new("a@b").is_none());
        assert!(Email::new("a b@x.com").is_none());
    }
}
