//! Derive macros for the aptos-client crate.
//!
//! Provides:
//! - `#[derive(BcsCodec)]` - automatic BCS (Binary Canonical Serialization)
//! - `#[derive(Error)]` - error type boilerplate (thiserror replacement)

mod bcs_codec;
mod error;

use proc_macro::TokenStream;

/// Automatically implements the `Encode` and `Decode` BCS traits.
#[proc_macro_derive(BcsCodec, attributes(bcs_codec))]
pub fn derive_bcs_codec(input: TokenStream) -> TokenStream {
    bcs_codec::derive_bcs_codec(input)
}

/// Automatically implements `Display` and `Error` traits for error enums.
#[proc_macro_derive(Error, attributes(error))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
