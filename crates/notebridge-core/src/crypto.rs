//! Cryptographic primitives: SHA-256 hashing and BIP-340 Schnorr signing.
//!
//! Wraps `sha2` and `secp256k1` with strong types. Public keys are x-only
//! (32 bytes) and signatures are 64-byte Schnorr signatures over the event id.

use secp256k1::{schnorr, Keypair, Message, SecretKey, XOnlyPublicKey, SECP256K1};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{CoreError, KeyError};
use crate::types::{decode_fixed, impl_hex_serde, EventId};

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Sha256Hash> for EventId {
    fn from(hash: Sha256Hash) -> Self {
        EventId(hash.0)
    }
}

/// A 32-byte x-only secp256k1 public key: the issuer identity of an event.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        decode_fixed(s).map(Self)
    }

    /// Verify a Schnorr signature over an event id.
    pub fn verify(&self, id: &EventId, signature: &Signature) -> Result<(), CoreError> {
        let pk = XOnlyPublicKey::from_slice(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        let sig =
            schnorr::Signature::from_slice(&signature.0).map_err(|_| CoreError::InvalidSignature)?;
        let msg = Message::from_digest(id.0);

        SECP256K1
            .verify_schnorr(&sig, &msg, &pk)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl_hex_serde!(PublicKey);

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte BIP-340 Schnorr signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        decode_fixed(s).map(Self)
    }

    /// The zero signature (invalid, used as placeholder).
    pub const ZERO: Self = Self([0u8; 64]);
}

impl_hex_serde!(Signature);

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

/// Issuer key material.
///
/// Construction is the only place secret keys are validated; once a `Keys`
/// exists, signing cannot fail on key grounds.
#[derive(Clone)]
pub struct Keys {
    keypair: Keypair,
    public_key: PublicKey,
}

impl Keys {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let keypair = Keypair::new(SECP256K1, &mut rand::thread_rng());
        Self::from_keypair(keypair)
    }

    /// Load from 32 raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != 32 {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        let secret = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_keypair(Keypair::from_secret_key(SECP256K1, &secret)))
    }

    /// Load from a hex-encoded secret key.
    pub fn from_secret_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.trim())?;
        Self::from_secret_bytes(&bytes)
    }

    fn from_keypair(keypair: Keypair) -> Self {
        let (xonly, _parity) = keypair.x_only_public_key();
        Self {
            keypair,
            public_key: PublicKey(xonly.serialize()),
        }
    }

    /// The issuer identity for these keys.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Sign an event id with fresh auxiliary randomness.
    pub fn sign(&self, id: &EventId) -> Signature {
        let aux: [u8; 32] = rand::random();
        let msg = Message::from_digest(id.0);
        let sig = SECP256K1.sign_schnorr_with_aux_rand(&msg, &self.keypair, &aux);
        Signature(sig.serialize())
    }

    /// Sign an event id without auxiliary randomness.
    ///
    /// Output depends only on the key and the id; used for golden vectors.
    pub fn sign_deterministic(&self, id: &EventId) -> Signature {
        let msg = Message::from_digest(id.0);
        let sig = SECP256K1.sign_schnorr_no_aux_rand(&msg, &self.keypair);
        Signature(sig.serialize())
    }

    /// Get the raw secret key bytes.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.keypair.secret_bytes()
    }
}

impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keys({:?})", self.public_key)
    }
}
