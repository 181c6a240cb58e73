use crate::engine::{Vault, VaultInner};
use crate::error::VaultError;
use crate::kdf;
use crate::types::{Aes, DataKey, KEY_LEN, VaultCipher};
use aead::Key;
use private::Sealed;
use std::marker::PhantomData;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Default, ZeroizeOnDrop)]
pub struct NoKey;
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct WithKey {
    key: [u8; KEY_LEN],
}

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoKey {}
impl Sealed for WithKey {}

/// A builder for secure initialization of the [`Vault`].
///
/// Implements `ZeroizeOnDrop` to ensure that raw key material is cleared from
/// memory as soon as the builder is no longer needed.
#[allow(private_bounds)]
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct VaultBuilder<C: VaultCipher = Aes, K: Sealed + ZeroizeOnDrop = NoKey> {
    #[zeroize(skip)]
    _cipher: PhantomData<C>,
    keys: K,
}

impl<C: VaultCipher> Default for VaultBuilder<C> {
    fn default() -> Self {
        Self { _cipher: PhantomData, keys: NoKey }
    }
}

impl<C: VaultCipher> VaultBuilder<C> {
    /// Creates a new empty builder.
    #[must_use = "Builder must be configured with a key before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the wrap key from the master secret and per-user salt
    /// (Argon2id + HKDF-SHA256).
    ///
    /// Use this form to build the vault that wraps and unwraps the user's
    /// stored data key.
    ///
    /// # Errors
    /// Returns [`VaultError::KeyDerivation`] if key derivation fails.
    pub fn derived_key(
        self,
        secret: impl AsRef<[u8]>,
        salt: impl AsRef<[u8]>,
    ) -> Result<VaultBuilder<C, WithKey>, VaultError> {
        let wrap = kdf::derive_wrap_key(secret, salt)?;
        Ok(VaultBuilder { _cipher: PhantomData, keys: WithKey { key: wrap.0 } })
    }

    /// Uses an unwrapped [`DataKey`] directly.
    ///
    /// Use this form to build the vault that seals and opens login-entry
    /// passwords.
    #[must_use]
    pub fn data_key(self, key: &DataKey) -> VaultBuilder<C, WithKey> {
        VaultBuilder { _cipher: PhantomData, keys: WithKey { key: *key.as_bytes() } }
    }
}

impl<C: VaultCipher> VaultBuilder<C, WithKey> {
    /// Finalizes vault construction and zeroes the builder.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidConfiguration`] if the cipher rejects the key.
    pub fn build(mut self) -> Result<Vault<C>, VaultError> {
        let key = Key::<C>::try_from(&self.keys.key[..]).map_err(|_| {
            VaultError::InvalidConfiguration {
                message: format!("Cipher rejected a {KEY_LEN}-byte key").into(),
                context: None,
            }
        })?;
        let vault = VaultInner { cipher: C::new(&key) };

        self.zeroize();

        Ok(Vault { inner: Arc::new(vault) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChaCha;

    #[test]
    fn builds_from_derived_and_data_keys() {
        let derived = VaultBuilder::<Aes>::new()
            .derived_key(b"master secret", b"0123456789abcdef")
            .expect("Wrap key derivation");
        assert!(derived.build().is_ok());

        let data_key = DataKey::generate();
        assert!(VaultBuilder::<Aes>::new().data_key(&data_key).build().is_ok());
        assert!(VaultBuilder::<ChaCha>::new().data_key(&data_key).build().is_ok());
    }
}
