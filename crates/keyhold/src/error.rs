use std::borrow::Cow;

/// A specialized [`KeyholdError`] enum of this crate.
#[keyhold_derive::keyhold_error]
pub enum KeyholdError {
    /// Database connection or migration failures during startup.
    #[error("Database initialization failed{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: keyhold_database::DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
