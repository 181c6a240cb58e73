use crate::error::VaultError;
use aead::{AeadInOut, KeyInit};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use zeroize::{Zeroize, ZeroizeOnDrop};

// --- Aliases ---

pub type Aes = Aes256Gcm;
pub type ChaCha = ChaCha20Poly1305;

pub trait VaultCipher: AeadInOut + KeyInit + 'static {}
impl<T: AeadInOut + KeyInit + 'static> VaultCipher for T {}

// --- Format constants ---

/// AEAD nonce length (96-bit). Stored detached, next to the ciphertext.
pub(crate) const NONCE_LEN: usize = 12;

/// AEAD tag length (128-bit). Appended to the ciphertext.
pub(crate) const TAG_LEN: usize = 16;

/// Per-user salt length for key derivation.
pub const SALT_LEN: usize = 16;

/// Symmetric key length (256-bit).
pub const KEY_LEN: usize = 32;

// --- Sealed container ---

/// An encrypted value with a detached initialization vector.
///
/// The schema persists ciphertext and IV as separate fields, so the vault
/// returns them separately instead of packing a self-describing blob:
///
/// ```text
/// ciphertext = [CIPHERTEXT(N)][TAG(16)]    iv = [NONCE(12)]
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub ciphertext: Vec<u8>,
    pub iv: Vec<u8>,
}

impl std::fmt::Debug for SealedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedSecret")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("iv_len", &self.iv.len())
            .finish()
    }
}

impl SealedSecret {
    /// Reassembles a sealed secret from stored ciphertext and IV columns.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidPayload`] if either part is too short to
    /// contain the AEAD tag or nonce.
    pub fn from_parts(
        ciphertext: impl Into<Vec<u8>>,
        iv: impl Into<Vec<u8>>,
    ) -> Result<Self, VaultError> {
        let ciphertext = ciphertext.into();
        let iv = iv.into();

        if ciphertext.len() < TAG_LEN {
            return Err(VaultError::InvalidPayload {
                message: format!(
                    "Ciphertext too short ({} bytes). Expected at least {TAG_LEN} bytes",
                    ciphertext.len()
                )
                .into(),
                context: None,
            });
        }
        if iv.len() != NONCE_LEN {
            return Err(VaultError::InvalidPayload {
                message: format!("IV must be {NONCE_LEN} bytes, got {}", iv.len()).into(),
                context: None,
            });
        }

        Ok(Self { ciphertext, iv })
    }
}

// --- Key material ---

/// A randomly generated 256-bit data key.
///
/// This is the key that encrypts a user's login entries; it is itself stored
/// wrapped (encrypted) in the user record. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DataKey(pub(crate) [u8; KEY_LEN]);

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DataKey(..)")
    }
}

impl DataKey {
    /// Generates a fresh random data key from the system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        getrandom::fill(&mut key).expect("System RNG unavailable for key generation");
        Self(key)
    }

    /// Rebuilds a data key from unwrapped bytes.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidPayload`] if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|_| VaultError::InvalidPayload {
            message: format!("Data key must be {KEY_LEN} bytes, got {}", bytes.len()).into(),
            context: None,
        })?;
        Ok(Self(key))
    }

    /// Exposes the raw key bytes (for wrapping only; do not persist in plaintext).
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Generates a fresh random per-user salt (store it in the user record; not secret).
#[must_use]
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    getrandom::fill(&mut salt).expect("System RNG unavailable for salt generation");
    salt
}
