//! A thread-safe cryptographic vault for password-manager material.
//!
//! This crate produces and consumes exactly the values the Keyhold schema
//! persists:
//!
//! * a salted adaptive hash of the master secret (Argon2id, PHC string);
//! * a per-user random salt;
//! * the user's 256-bit data key, stored **wrapped** (encrypted under a key
//!   derived from the master secret) together with its IV;
//! * per-entry encrypted password bytes, each with its own IV.
//!
//! ## Detached IV
//!
//! Sealed values are returned as `(ciphertext || tag, iv)` rather than a
//! self-describing blob, because the schema stores ciphertext and IV as
//! separate fields. [`SealedSecret::from_parts`] reassembles them on read.
//!
//! ## Key hierarchy
//!
//! ```text
//! master secret + salt --Argon2id+HKDF--> wrap key --AES-GCM--> encrypted data key (+ IV)
//! data key --AES-GCM--> encrypted entry password (+ IV)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use keyhold_vault::prelude::*;
//!
//! # fn main() -> Result<(), VaultError> {
//! let salt = generate_salt();
//! let wrap_vault = Vault::<Aes>::builder().derived_key("master-secret", salt)?.build()?;
//!
//! // Register: generate and wrap the data key.
//! let data_key = DataKey::generate();
//! let wrapped = wrap_vault.wrap_key(&data_key, b"user-key")?;
//!
//! // Save a login: seal the site password under the data key.
//! let entry_vault = Vault::<Aes>::builder().data_key(&data_key).build()?;
//! let sealed = entry_vault.seal(b"hunter2", b"login-entry")?;
//!
//! // Later: unwrap and open.
//! let restored = wrap_vault.unwrap_key(&wrapped, b"user-key")?;
//! let entry_vault = Vault::<Aes>::builder().data_key(&restored).build()?;
//! assert_eq!(entry_vault.open(&sealed, b"login-entry")?, b"hunter2");
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
pub mod kdf;
mod types;

pub use builder::VaultBuilder;
pub use engine::Vault;
pub use error::{VaultError, VaultErrorExt};
pub use kdf::{WrapKey, derive_wrap_key, hash_master_secret, verify_master_secret};
pub use types::{DataKey, KEY_LEN, SALT_LEN, SealedSecret, generate_salt};

pub mod prelude {
    pub use crate::builder::VaultBuilder;
    pub use crate::engine::Vault;
    pub use crate::error::{VaultError, VaultErrorExt};
    pub use crate::kdf::{hash_master_secret, verify_master_secret};
    pub use crate::types::{Aes, ChaCha, DataKey, SealedSecret, generate_salt};
}

pub mod algorithms {
    pub use crate::types::{Aes, ChaCha, VaultCipher};
}
