//! Transaction container with appended signatures.

use crate::chain::types::{Pubkey, Signature};

/// An unsubmitted transaction: an opaque message payload plus the
/// signatures collected so far.
///
/// Builders produce the message bytes elsewhere; signers append their
/// signature without touching the payload (the host chain's partial-sign
/// convention).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Serialized transaction message, signed as-is.
    pub message: Vec<u8>,
    /// Signatures appended so far, with the signer's public key.
    pub signatures: Vec<(Pubkey, Signature)>,
}

impl Transaction {
    /// Wrap a serialized message with no signatures yet.
    pub fn new(message: Vec<u8>) -> Self {
        Self {
            message,
            signatures: Vec::new(),
        }
    }

    /// Append a signature. Re-signing with the same key replaces the
    /// previous entry instead of duplicating it.
    pub fn append_signature(&mut self, signer: Pubkey, signature: Signature) {
        if let Some(slot) = self.signatures.iter_mut().find(|(pk, _)| *pk == signer) {
            slot.1 = signature;
        } else {
            self.signatures.push((signer, signature));
        }
    }

    /// Signature previously appended by `signer`, if any.
    pub fn signature_for(&self, signer: &Pubkey) -> Option<&Signature> {
        self.signatures
            .iter()
            .find(|(pk, _)| pk == signer)
            .map(|(_, sig)| sig)
    }

    pub fn is_signed_by(&self, signer: &Pubkey) -> bool {
        self.signature_for(signer).is_some()
    }
}
