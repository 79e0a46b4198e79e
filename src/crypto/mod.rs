//! Cryptographic primitives: Ed25519 keys, signatures, and accounts.

pub mod ed25519;
