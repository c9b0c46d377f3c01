pub mod comments;
pub mod follows;
pub mod interactions;
pub mod shares;
pub mod targets;
