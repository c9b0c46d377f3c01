//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs and filter structs used by the repositories

pub mod comment;
pub mod interaction;
pub mod target;
