use std::borrow::Cow;

/// A specialized [`UsersError`] enum of this crate.
#[keyhold_derive::keyhold_error]
pub enum UsersError {
    /// The requested user does not exist.
    #[error("User not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Unique username index violation.
    #[error("Username taken{}: {message}", format_context(.context))]
    UsernameTaken { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A wrapper for underlying `SurrealDB` engine errors.
    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal users error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
