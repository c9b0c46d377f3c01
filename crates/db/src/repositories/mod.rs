//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod counter_repo;
pub mod interaction_repo;
pub mod target_repo;

pub use comment_repo::CommentRepo;
pub use counter_repo::CounterRepo;
pub use interaction_repo::InteractionRepo;
pub use target_repo::TargetRepo;
