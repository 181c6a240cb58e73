//! User store feature slice: account records with their vault material.

mod error;
mod models;
mod repository;

pub use error::{UsersError, UsersErrorExt};
pub use models::{CascadeReport, NewUser, UserPatch, UserRecord};
pub use repository::{Users, UsersInner};

use keyhold_database::Database;

/// Initialize the user store over an established database session.
pub fn init(db: Database) -> Users {
    tracing::info!("Users slice initialized");

    Users::new(UsersInner { db })
}
