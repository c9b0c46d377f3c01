//! Domain types and rules for interaction toggles and denormalized counters.
//!
//! Pure logic only; persistence lives in `kudos-db`.

pub mod counter;
pub mod error;
pub mod interaction;
pub mod pagination;
pub mod roles;
pub mod types;
