use std::borrow::Cow;

/// A specialized [`CredentialsError`] enum of this crate.
#[keyhold_derive::keyhold_error]
pub enum CredentialsError {
    /// The requested credential record does not exist.
    #[error("Credential not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The owner id does not reference an existing user.
    #[error("Owner not found{}: {message}", format_context(.context))]
    OwnerNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// An entry index past the end of the entry list.
    #[error("Entry index out of range{}: {message}", format_context(.context))]
    EntryOutOfRange { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A wrapper for underlying `SurrealDB` engine errors.
    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal credentials error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
