//! Ed25519 key pairs, authentication keys, and locally-created accounts.

use crate::debug;
use crate::types::address::AccountAddress;
use crate::types::bcs::{
    decode_len, encode_len, read_exact, Decode, DecodeError, Encode, EncodeError, EncodeSink,
};
use crate::types::hash::Hash;
use ed25519_dalek::{
    Signer, Verifier, SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH,
    SIGNATURE_LENGTH,
};
use rand_core::OsRng;

/// Address-derivation scheme identifiers published by the network.
///
/// The byte value is appended as the domain separator when hashing inputs
/// into a new address or authentication key, which keeps the different
/// derivation families from colliding.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeriveScheme {
    /// Single Ed25519 key authentication.
    Ed25519 = 0,
    /// Multi-signature Ed25519 authentication.
    MultiEd25519 = 1,
    /// Automatically generated unique object ids.
    DeriveAuid = 251,
    /// Object address derived from an owning object.
    DeriveObjectFromObject = 252,
    /// Object address derived from a GUID.
    DeriveObjectFromGuid = 253,
    /// Object address derived from a caller-chosen seed.
    DeriveObjectFromSeed = 254,
    /// Resource account derived from a source account and seed.
    ResourceAccount = 255,
}

/// A 32-byte authentication key.
///
/// Verifies signatures authorizing actions for an account. An account's
/// initial authentication key doubles as its address; key rotation changes
/// the key but never the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticationKey(pub [u8; 32]);

impl AuthenticationKey {
    /// Computes the authentication key for a single Ed25519 public key:
    /// `SHA3-256(pubkey || scheme)` with the Ed25519 scheme byte.
    pub fn from_public_key(public_key: &PublicKey) -> AuthenticationKey {
        let mut h = Hash::sha3();
        h.update(&public_key.to_bytes());
        h.update(&[DeriveScheme::Ed25519 as u8]);
        AuthenticationKey(h.finalize().0)
    }

    /// Converts the key into the account address it pins at creation.
    pub fn account_address(&self) -> AccountAddress {
        AccountAddress::from_auth_key(self)
    }
}

/// Private key for signing transactions.
///
/// Generated using cryptographically secure randomness from the OS.
/// Never serialized or transmitted over the network.
#[derive(Clone)]
pub struct PrivateKey {
    key: SigningKey,
}

impl PrivateKey {
    /// Generates a new random private key using OS-provided entropy.
    pub fn generate() -> Self {
        let mut rng = OsRng;
        Self {
            key: SigningKey::generate(&mut rng),
        }
    }

    /// Creates a private key from raw seed bytes.
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            key: SigningKey::from_bytes(bytes),
        }
    }

    /// Derives the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            key: self.key.verifying_key(),
        }
    }

    /// Signs arbitrary bytes, producing an Ed25519 signature.
    pub fn sign(&self, data: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.key.sign(data))
    }
}

/// Public key for signature verification and authentication-key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    key: VerifyingKey,
}

impl PublicKey {
    /// Reconstructs a public key from its 32 compressed-point bytes.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Option<Self> {
        VerifyingKey::from_bytes(bytes).ok().map(|key| Self { key })
    }

    /// Returns the key's 32 compressed-point bytes.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.key.to_bytes()
    }

    /// Verifies an Ed25519 signature against the given data.
    ///
    /// Returns `true` if the signature is valid, `false` otherwise.
    pub fn verify(&self, data: &[u8], signature: &Ed25519Signature) -> bool {
        self.key.verify(data, &signature.0).is_ok()
    }

    /// Computes this key's authentication key.
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_public_key(self)
    }
}

// BCS form of a public key is a length-prefixed 32-byte string.
impl Encode for PublicKey {
    fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
        encode_len(PUBLIC_KEY_LENGTH, out)?;
        out.write(&self.to_bytes());
        Ok(())
    }
}

impl Decode for PublicKey {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let len = decode_len(input)?;
        if len != PUBLIC_KEY_LENGTH {
            return Err(DecodeError::InvalidValue);
        }
        let bytes: [u8; PUBLIC_KEY_LENGTH] = read_exact(input, PUBLIC_KEY_LENGTH)?
            .try_into()
            .map_err(|_| DecodeError::InvalidValue)?;
        PublicKey::from_bytes(&bytes).ok_or(DecodeError::InvalidValue)
    }
}

/// Wrapper around the dalek `Signature` carrying its BCS form: a
/// length-prefixed 64-byte string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub ed25519_dalek::Signature);

impl Ed25519Signature {
    /// Returns the signature's 64 raw bytes.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.to_bytes()
    }
}

impl Encode for Ed25519Signature {
    fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
        encode_len(SIGNATURE_LENGTH, out)?;
        out.write(&self.to_bytes());
        Ok(())
    }
}

impl Decode for Ed25519Signature {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let len = decode_len(input)?;
        if len != SIGNATURE_LENGTH {
            return Err(DecodeError::InvalidValue);
        }
        let bytes: [u8; SIGNATURE_LENGTH] = read_exact(input, SIGNATURE_LENGTH)?
            .try_into()
            .map_err(|_| DecodeError::InvalidValue)?;
        Ok(Ed25519Signature(ed25519_dalek::Signature::from_bytes(
            &bytes,
        )))
    }
}

/// A locally-held account: a signing key plus the address it controls.
///
/// The address is pinned to the key's initial authentication key; callers
/// that rotated their key can construct the account with an explicit
/// address instead.
#[derive(Clone)]
pub struct Account {
    key: PrivateKey,
    pub address: AccountAddress,
}

impl Account {
    /// Creates a fresh account with a random key.
    pub fn generate() -> Self {
        let key = PrivateKey::generate();
        let address = key.public_key().authentication_key().account_address();
        debug!("generated account {}", address);
        Self { key, address }
    }

    /// Wraps an existing key, deriving the address from its authentication
    /// key.
    pub fn from_private_key(key: PrivateKey) -> Self {
        let address = key.public_key().authentication_key().account_address();
        Self { key, address }
    }

    /// Wraps an existing key under an explicit address (rotated-key case).
    pub fn with_address(key: PrivateKey, address: AccountAddress) -> Self {
        Self { key, address }
    }

    /// The account's signing key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    /// The account's public key.
    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    /// Signs arbitrary bytes with the account's key.
    pub fn sign(&self, data: &[u8]) -> Ed25519Signature {
        self.key.sign(data)
    }
}
