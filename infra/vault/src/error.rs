//! # Vault Errors
//!
//! This module defines the [`VaultError`] enum used throughout the vault crate
//! for reporting cryptographic and configuration failures.

use std::borrow::Cow;

/// A specialized [`VaultError`] enum for vault-related failures.
#[keyhold_derive::keyhold_error]
pub enum VaultError {
    /// Failure during master-secret hashing or verification.
    #[error("Hashing error{}: {message}", format_context(.context))]
    Hashing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during key derivation (Argon2id or HKDF expansion).
    #[error("Key derivation error{}: {message}", format_context(.context))]
    KeyDerivation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during the encryption process.
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure during the decryption process.
    ///
    /// This usually indicates an incorrect key, a mismatched cryptographic
    /// context (AAD), or tampered data.
    #[error("Decryption error{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure when the vault or builder is incorrectly configured.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure when the provided sealed payload is malformed or too short.
    #[error("Invalid payload{}: {message}", format_context(.context))]
    InvalidPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
