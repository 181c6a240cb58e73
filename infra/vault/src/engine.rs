use aead::Nonce;
use aead::inout::InOutBuf;
use getrandom::fill;
use std::sync::Arc;

use crate::builder::VaultBuilder;
use crate::error::VaultError;
use crate::types::{Aes, DataKey, NONCE_LEN, SealedSecret, TAG_LEN, VaultCipher};

/// Inner state of the [`Vault`].
#[allow(unreachable_pub)]
#[derive(Debug)]
pub struct VaultInner<C = Aes>
where
    C: VaultCipher,
{
    pub cipher: C,
}

/// A thread-safe container for cryptographic operations.
///
/// `Vault` is the interface for encrypting and decrypting the secrets the
/// schema stores: the user's wrapped data key and the per-entry password
/// bytes. It wraps its state in an [`Arc`], making it cheaply clonable and
/// safe to share across threads or asynchronous tasks.
///
/// ### Nonces
/// Every seal uses a fresh random 96-bit nonce, returned as the detached IV
/// so it can be stored in its own field next to the ciphertext. This is a
/// standard approach for `AES-GCM` and `ChaCha20Poly1305`, but probabilistic;
/// rotate the data key if you expect extremely high-volume sealing.
///
/// ### Generic Parameters
/// * `C`: The cipher implementation. Defaults to [`Aes`] (AES-256-GCM) for
///   high performance and hardware acceleration support.
///
/// ### Example
/// ```rust
/// use keyhold_vault::prelude::*;
///
/// # fn main() -> Result<(), VaultError> {
/// let key = DataKey::generate();
/// let vault = Vault::<Aes>::builder().data_key(&key).build()?;
///
/// let sealed = vault.seal(b"hunter2", b"login-entry")?;
/// let opened = vault.open(&sealed, b"login-entry")?;
/// assert_eq!(opened.as_slice(), b"hunter2");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Vault<C = Aes>
where
    C: VaultCipher,
{
    pub(crate) inner: Arc<VaultInner<C>>,
}

impl<C: VaultCipher> Clone for Vault<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C> Vault<C>
where
    C: VaultCipher,
{
    /// Returns a new [`VaultBuilder`] to configure the vault.
    #[must_use]
    pub fn builder() -> VaultBuilder<C> {
        VaultBuilder::<C>::new()
    }

    /// Generates a unique random nonce.
    #[inline]
    fn next_nonce() -> Nonce<C> {
        let mut nonce = Nonce::<C>::default();
        fill(&mut nonce).expect("System RNG unavailable for nonce generation");
        nonce
    }

    /// Encrypts plaintext into a [`SealedSecret`] with a detached IV.
    ///
    /// The `context` bytes are bound as AAD: opening requires the same
    /// context, which ties each ciphertext to the field it was sealed for.
    ///
    /// # Errors
    /// * [`VaultError::Encryption`] if the AEAD encryption fails.
    pub fn seal(
        &self,
        plaintext: impl AsRef<[u8]>,
        context: &[u8],
    ) -> Result<SealedSecret, VaultError> {
        let nonce = Self::next_nonce();

        let mut buf = Vec::with_capacity(plaintext.as_ref().len() + TAG_LEN);
        buf.extend_from_slice(plaintext.as_ref());

        let in_out = InOutBuf::from(&mut buf[..]);
        let tag = self.inner.cipher.encrypt_inout_detached(&nonce, context, in_out).map_err(
            |_| VaultError::Encryption {
                message: "Encryption failed".into(),
                context: Some("AEAD encryption failed".into()),
            },
        )?;

        buf.extend_from_slice(tag.as_slice());
        Ok(SealedSecret { ciphertext: buf, iv: nonce.to_vec() })
    }

    /// Decrypts a [`SealedSecret`] back into plaintext.
    ///
    /// # Errors
    /// * [`VaultError::InvalidPayload`] if the ciphertext or IV is malformed.
    /// * [`VaultError::Decryption`] if the context, key, or data is invalid.
    pub fn open(&self, sealed: &SealedSecret, context: &[u8]) -> Result<Vec<u8>, VaultError> {
        if sealed.ciphertext.len() < TAG_LEN {
            return Err(VaultError::InvalidPayload {
                message: format!(
                    "Ciphertext too short ({} bytes). Expected at least {TAG_LEN} bytes",
                    sealed.ciphertext.len()
                )
                .into(),
                context: None,
            });
        }
        if sealed.iv.len() != NONCE_LEN {
            return Err(VaultError::InvalidPayload {
                message: format!("IV must be {NONCE_LEN} bytes, got {}", sealed.iv.len()).into(),
                context: None,
            });
        }

        let nonce = sealed.iv.as_slice().try_into().map_err(|_| VaultError::Decryption {
            message: "Invalid nonce length".into(),
            context: None,
        })?;

        let (ciphertext, tag_slice) =
            sealed.ciphertext.split_at(sealed.ciphertext.len() - TAG_LEN);

        let tag = tag_slice.try_into().map_err(|_| VaultError::Decryption {
            message: "Invalid tag length".into(),
            context: None,
        })?;

        let mut buf = ciphertext.to_vec();
        let in_out = InOutBuf::from(&mut buf[..]);

        self.inner.cipher.decrypt_inout_detached(&nonce, context, in_out, &tag).map_err(|_| {
            VaultError::Decryption {
                message: "Decryption failed".into(),
                context: Some("AEAD authentication failed".into()),
            }
        })?;

        Ok(buf)
    }

    /// Wraps (encrypts) a [`DataKey`] for persistence in the user record.
    ///
    /// # Errors
    /// * [`VaultError::Encryption`] if the AEAD encryption fails.
    pub fn wrap_key(&self, key: &DataKey, context: &[u8]) -> Result<SealedSecret, VaultError> {
        self.seal(key.as_bytes(), context)
    }

    /// Unwraps a stored [`DataKey`].
    ///
    /// # Errors
    /// * [`VaultError::Decryption`] if the wrap key or context is wrong.
    /// * [`VaultError::InvalidPayload`] if the unwrapped bytes are not a valid key.
    pub fn unwrap_key(&self, sealed: &SealedSecret, context: &[u8]) -> Result<DataKey, VaultError> {
        let mut bytes = self.open(sealed, context)?;
        let key = DataKey::from_bytes(&bytes);
        bytes.iter_mut().for_each(|b| *b = 0);
        key
    }
}
