//! Error types for notebridge core.

use std::time::Duration;

use thiserror::Error;

use crate::crypto::PublicKey;
use crate::types::EventId;

/// Core errors that can occur while building and signing events.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("draft issuer {draft} does not match signing key {signer}")]
    IssuerMismatch { draft: PublicKey, signer: PublicKey },

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Rejection of secret key material.
///
/// Raised when keys are loaded, never from the signing path itself.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("secret key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("secret key must be 32 bytes, got {0}")]
    InvalidLength(usize),

    #[error("secret key is not a valid secp256k1 scalar")]
    InvalidSecretKey,
}

/// Validation errors for received or deserialized events.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("signature verification failed")]
    SignatureFailed,

    #[error("event id mismatch: claimed {claimed}, computed {computed}")]
    IdMismatch { claimed: EventId, computed: EventId },

    #[error("insufficient proof of work: required {required} bits, got {actual}")]
    InsufficientWork { required: u32, actual: u32 },

    #[error("committed difficulty {committed} is below required {required}")]
    CommitmentTooLow { committed: u32, required: u32 },

    #[error("structural error: {0}")]
    StructuralError(String),
}

/// Failure modes of the proof-of-work search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MiningError {
    /// The target was not met before the deadline.
    #[error("mining timed out after {attempts} attempts ({elapsed:?}) at difficulty {difficulty}")]
    Timeout {
        difficulty: u32,
        attempts: u64,
        elapsed: Duration,
    },

    /// The caller raised the cancellation flag.
    #[error("mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },

    /// Difficulty zero means proof-of-work is off; the miner is not invoked.
    #[error("difficulty 0 disables proof-of-work")]
    DifficultyDisabled,
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                ValidationError::SignatureFailed
            }
            CoreError::IssuerMismatch { .. } => ValidationError::SignatureFailed,
            CoreError::MalformedEvent(msg) => ValidationError::StructuralError(msg),
            CoreError::EncodingError(msg) | CoreError::DecodingError(msg) => {
                ValidationError::StructuralError(msg)
            }
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
