//! Upstream Payload Models
//!
//! Typed payloads for the four ranking API endpoints the cache partitions
//! mirror: user profile, top-100 solved list, extended profile attributes and
//! organization memberships.

mod organization;
mod top100;
mod user;

pub use organization::Organization;
pub use top100::{RankedProblem, Top100};
pub use user::{AdditionalInfo, UserProfile};
