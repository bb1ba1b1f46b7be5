//! Ephemeral ed25519 keypair.
//!
//! # Security
//! - Secret material is zeroized on drop
//! - Keys are never logged or serialized outside the persisted wallet record
//! - The 64-byte secret layout is seed || public key, matching the host
//!   chain's keypair convention

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::chain::{Pubkey, Signature};
use crate::wallet::types::{WalletError, WalletResult};

/// An in-memory ed25519 keypair backing a burner wallet.
pub struct BurnerKeypair {
    signing_key: SigningKey,
}

impl BurnerKeypair {
    /// Generate a fresh keypair from the OS entropy source.
    pub fn generate() -> WalletResult<Self> {
        let mut seed = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| WalletError::Generation(e.to_string()))?;
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Self { signing_key })
    }

    /// Rebuild a keypair from the persisted 64-byte secret.
    ///
    /// The trailing 32 bytes must match the public key derived from the
    /// seed; a mismatch means the record was corrupted.
    pub fn from_secret_bytes(bytes: &[u8]) -> WalletResult<Self> {
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| WalletError::Generation(format!("secret must be 64 bytes, got {}", bytes.len())))?;

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&arr[..32]);
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();

        if signing_key.verifying_key().to_bytes() != arr[32..] {
            return Err(WalletError::Generation(
                "secret key does not match embedded public key".to_string(),
            ));
        }

        Ok(Self { signing_key })
    }

    /// The public half as a chain pubkey.
    pub fn pubkey(&self) -> Pubkey {
        Pubkey(self.signing_key.verifying_key().to_bytes())
    }

    /// The full 64-byte secret (seed || public key), for persistence and
    /// user backup only.
    pub fn to_secret_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.signing_key.to_bytes());
        out[32..].copy_from_slice(&self.signing_key.verifying_key().to_bytes());
        out
    }

    /// Sign a message, producing the chain's 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(pubkey: &Pubkey, message: &[u8], signature: &Signature) -> bool {
        let Ok(vk) = VerifyingKey::from_bytes(&pubkey.0) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        vk.verify(message, &sig).is_ok()
    }
}

// SigningKey zeroizes its own secret on drop (dalek's zeroize feature);
// nothing else in this struct holds key material.

impl std::fmt::Debug for BurnerKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BurnerKeypair")
            .field("pubkey", &self.pubkey().to_string())
            .finish_non_exhaustive()
    }
}
