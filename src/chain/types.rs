//! Chain-level key and signature types.

use thiserror::Error;

/// Errors for chain primitive parsing.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Input was not valid base-58 or had the wrong length.
    #[error("invalid public key: {0}")]
    InvalidPubkey(String),

    /// Signature bytes had the wrong length.
    #[error("invalid signature: expected 64 bytes, got {0}")]
    InvalidSignature(usize),
}

/// A 32-byte account public key, displayed as base-58.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pubkey(pub [u8; 32]);

impl Pubkey {
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Parse a base-58 string into a public key.
    pub fn from_base58(s: &str) -> Result<Self, ChainError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| ChainError::InvalidPubkey(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ChainError::InvalidPubkey("must decode to 32 bytes".to_string()))?;
        Ok(Self(arr))
    }
}

impl From<[u8; 32]> for Pubkey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for Pubkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

/// A 64-byte ed25519 signature, displayed as base-58.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChainError> {
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| ChainError::InvalidSignature(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}
