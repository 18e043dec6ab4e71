//! Managers for the catalog aggregates and user accounts.
//!
//! Each manager borrows a connection (a pool or an open transaction) and
//! returns explicit `ServiceError` variants; the HTTP layer decides how those
//! map to status codes.

pub mod game;
pub mod studio;
pub mod user;

use sea_orm::DbErr;

pub use game::GameService;
pub use studio::StudioService;
pub use user::{UserAccount, UserService};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The caller supplied something the operation cannot accept.
    #[error("{0}")]
    InvalidArgument(String),
    /// The record addressed by the operation does not exist.
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl ServiceError {
    /// Creating a record that already carries an id.
    pub(crate) fn already_inserted(id: i32) -> Self {
        ServiceError::InvalidArgument(format!("record with id {id} already inserted"))
    }
}
