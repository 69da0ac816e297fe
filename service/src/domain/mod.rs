//! Domain definitions.

pub mod distribution;
pub mod request;
pub mod user;

pub use self::{distribution::Distribution, request::Request, user::User};
