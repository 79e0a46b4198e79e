//! Core type definitions.
//!
//! This module provides the fundamental types used throughout the client:
//! - `AccountAddress`: 32-byte on-chain addresses with the short/long hex forms
//! - `Encode` / `Decode`: canonical (BCS) serialization traits
//! - `Bytes`: cheaply cloneable byte storage
//! - `Hash`: fixed-size 32-byte SHA3-256 digests

pub mod address;
pub mod bcs;
pub mod bytes;
pub mod hash;
