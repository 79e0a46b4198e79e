//! Aptos client core library.
//!
//! Provides account addresses, canonical (BCS) serialization, Ed25519
//! accounts, and transaction building and signing for the Aptos network.

pub mod core;
pub mod crypto;
pub mod types;
pub mod utils;
