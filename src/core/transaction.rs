//! Raw transactions, the domain-separated signing preimage, and the signed
//! envelope the network accepts.

use std::sync::OnceLock;

use crate::core::payload::TransactionPayload;
use crate::crypto::ed25519::{Account, Ed25519Signature, PublicKey};
use crate::types::address::AccountAddress;
use crate::types::bcs::{Encode, EncodeError};
use crate::types::bytes::Bytes;
use crate::types::hash::{Hash, HASH_LEN};
use aptos_derive::BcsCodec;

/// Domain-separation salt hashed into every raw-transaction signing preimage.
const RAW_TRANSACTION_SALT: &[u8] = b"APTOS::RawTransaction";

/// SHA3-256 of the salt, computed once and prepended to the encoded
/// transaction before signing.
fn salt_prehash() -> &'static [u8; HASH_LEN] {
    static PREHASH: OnceLock<[u8; HASH_LEN]> = OnceLock::new();
    PREHASH.get_or_init(|| {
        let mut builder = Hash::sha3();
        builder.update(RAW_TRANSACTION_SALT);
        builder.finalize().0
    })
}

/// An unsigned transaction, the unit a sender authorizes.
///
/// Field order is the canonical encoding order; reordering any field
/// changes the signing preimage and invalidates existing signatures.
#[derive(Debug, Clone, PartialEq, Eq, BcsCodec)]
pub struct RawTransaction {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub payload: TransactionPayload,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_timestamp_secs: u64,
    pub chain_id: u8,
}

impl RawTransaction {
    /// Returns the exact byte string a signer must sign: the salt prehash
    /// followed by the canonical encoding of the transaction.
    pub fn signable_bytes(&self) -> Result<Bytes, EncodeError> {
        let encoded = self.to_bytes()?;
        let mut out = Vec::with_capacity(HASH_LEN + encoded.len());
        out.extend_from_slice(salt_prehash());
        out.extend_from_slice(encoded.as_slice());
        Ok(Bytes::from(out))
    }

    /// Signs the transaction with the given account, producing the envelope
    /// the network accepts for submission.
    pub fn sign(self, account: &Account) -> Result<SignedTransaction, EncodeError> {
        let preimage = self.signable_bytes()?;
        let signature = account.sign(preimage.as_slice());
        Ok(SignedTransaction {
            authenticator: TransactionAuthenticator::Ed25519 {
                public_key: account.public_key(),
                signature,
            },
            raw_txn: self,
        })
    }
}

/// Proof of authorization carried alongside a raw transaction.
#[derive(Debug, Clone, PartialEq, Eq, BcsCodec)]
pub enum TransactionAuthenticator {
    Ed25519 {
        public_key: PublicKey,
        signature: Ed25519Signature,
    },
}

/// A raw transaction paired with the authenticator that authorizes it.
#[derive(Debug, Clone, PartialEq, Eq, BcsCodec)]
pub struct SignedTransaction {
    pub raw_txn: RawTransaction,
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Verifies the authenticator against the transaction's signing preimage.
    pub fn verify(&self) -> Result<bool, EncodeError> {
        let preimage = self.raw_txn.signable_bytes()?;
        match &self.authenticator {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => Ok(public_key.verify(preimage.as_slice(), signature)),
        }
    }
}
