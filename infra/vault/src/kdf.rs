//! Master-secret hashing and key derivation.
//!
//! Two distinct uses of Argon2id live here:
//! * [`hash_master_secret`] / [`verify_master_secret`] produce and check the
//!   salted adaptive hash persisted in the user record (PHC string format,
//!   self-contained salt).
//! * [`derive_wrap_key`] turns (master secret, per-user salt) into the
//!   256-bit key that wraps the user's data key. The Argon2id output is
//!   domain-separated with HKDF-SHA256 so the wrap key is never the same
//!   bytes as any other derived material.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, Version};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::VaultError;
use crate::types::KEY_LEN;

/// HKDF info label binding derived keys to the wrap domain.
const WRAP_INFO: &[u8] = b"keyhold/v1 wrap-key";

/// A 256-bit wrap key derived from the master secret. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct WrapKey(pub(crate) [u8; KEY_LEN]);

impl std::fmt::Debug for WrapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WrapKey(..)")
    }
}

/// Argon2id parameters, tuned for interactive use (64 MiB, t=3, p=1).
fn argon2_params() -> Params {
    Params::new(64 * 1024, 3, 1, Some(KEY_LEN)).expect("Static Argon2 params are always valid")
}

fn argon2() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params())
}

/// Hashes the master secret for persistence (PHC string, random salt).
///
/// The PHC string embeds the algorithm, parameters, and salt, so it is the
/// only value the user record needs for later verification.
///
/// # Errors
/// Returns [`VaultError::Hashing`] if the hasher rejects the input.
pub fn hash_master_secret(secret: impl AsRef<[u8]>) -> Result<String, VaultError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2().hash_password(secret.as_ref(), &salt).map_err(|e| {
        VaultError::Hashing { message: e.to_string().into(), context: None }
    })?;
    Ok(hash.to_string())
}

/// Verifies a master secret against a stored PHC string.
///
/// Returns `Ok(false)` for a well-formed hash that does not match; reserves
/// errors for malformed hashes.
///
/// # Errors
/// Returns [`VaultError::Hashing`] if the stored hash cannot be parsed.
pub fn verify_master_secret(
    secret: impl AsRef<[u8]>,
    stored: &str,
) -> Result<bool, VaultError> {
    let parsed = PasswordHash::new(stored).map_err(|e| VaultError::Hashing {
        message: e.to_string().into(),
        context: Some("Parsing stored master-secret hash".into()),
    })?;

    match argon2().verify_password(secret.as_ref(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(VaultError::Hashing { message: e.to_string().into(), context: None }),
    }
}

/// Derives the wrap key from the master secret and the per-user salt.
///
/// Deterministic for a given (secret, salt) pair: the same inputs always
/// reproduce the same wrap key, which is what lets a returning user unwrap
/// their stored data key.
///
/// # Errors
/// Returns [`VaultError::KeyDerivation`] if Argon2id or HKDF expansion fails.
pub fn derive_wrap_key(
    secret: impl AsRef<[u8]>,
    salt: impl AsRef<[u8]>,
) -> Result<WrapKey, VaultError> {
    let mut root = [0u8; KEY_LEN];
    argon2().hash_password_into(secret.as_ref(), salt.as_ref(), &mut root).map_err(|e| {
        VaultError::KeyDerivation {
            message: e.to_string().into(),
            context: Some("Argon2id root derivation".into()),
        }
    })?;

    let hk = Hkdf::<Sha256>::new(None, &root);
    let mut wrap = [0u8; KEY_LEN];
    hk.expand(WRAP_INFO, &mut wrap).map_err(|_| VaultError::KeyDerivation {
        message: "HKDF expansion failed for wrap key".into(),
        context: None,
    })?;

    root.zeroize();

    Ok(WrapKey(wrap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let phc = hash_master_secret("correct horse battery staple").unwrap();
        assert!(phc.starts_with("$argon2id$"));

        assert!(verify_master_secret("correct horse battery staple", &phc).unwrap());
        assert!(!verify_master_secret("incorrect horse", &phc).unwrap());
    }

    #[test]
    fn hashing_same_secret_twice_gives_distinct_strings() {
        let a = hash_master_secret("secret").unwrap();
        let b = hash_master_secret("secret").unwrap();
        // Random salt per call.
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let err = verify_master_secret("secret", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, VaultError::Hashing { .. }));
    }

    #[test]
    fn wrap_key_is_deterministic_per_secret_and_salt() {
        let a = derive_wrap_key("secret", b"0123456789abcdef").unwrap();
        let b = derive_wrap_key("secret", b"0123456789abcdef").unwrap();
        assert_eq!(a.0, b.0);

        let c = derive_wrap_key("secret", b"fedcba9876543210").unwrap();
        assert_ne!(a.0, c.0);
    }
}
