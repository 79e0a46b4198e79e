//! Transaction payloads: entry-function calls into on-chain modules.

use crate::types::address::AccountAddress;
use crate::types::bcs::{Encode, EncodeError};
use crate::types::bytes::Bytes;
use aptos_derive::BcsCodec;

/// The body of a transaction.
///
/// The network defines three payload kinds; scripts (variant 0) and the
/// deprecated module bundles (variant 1) are not supported here, so the
/// entry-function variant carries its protocol-pinned index explicitly.
#[repr(u32)]
#[derive(Debug, Clone, PartialEq, Eq, BcsCodec)]
pub enum TransactionPayload {
    /// A call to a function declared `entry` in an on-chain module.
    EntryFunction(EntryFunction) = 2,
}

/// Identifies a module by its publishing account and name.
#[derive(Debug, Clone, PartialEq, Eq, BcsCodec)]
pub struct ModuleId {
    pub address: AccountAddress,
    pub name: String,
}

impl ModuleId {
    pub fn new(address: AccountAddress, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }
}

/// Type arguments for generic entry functions.
///
/// Only the primitive tags are representable; the transfer flows this crate
/// builds pass no type arguments at all. Variant indices follow the
/// network's published ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BcsCodec)]
pub enum TypeTag {
    Bool = 0,
    U8 = 1,
    U64 = 2,
    U128 = 3,
    Address = 4,
}

/// A call to an entry function with pre-encoded arguments.
///
/// Each argument is already in canonical binary form when it enters the
/// list; the transaction encoder only frames and concatenates them, it
/// never re-encodes.
#[derive(Debug, Clone, PartialEq, Eq, BcsCodec)]
pub struct EntryFunction {
    pub module: ModuleId,
    pub function: String,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<Bytes>,
}

impl EntryFunction {
    /// Builds the canonical coin-transfer call: `0x1::aptos_account::transfer`
    /// with the destination address and amount as encoded arguments.
    pub fn transfer(dest: &AccountAddress, amount: u64) -> Result<EntryFunction, EncodeError> {
        Ok(EntryFunction {
            module: ModuleId::new(AccountAddress::ONE, "aptos_account"),
            function: "transfer".to_string(),
            ty_args: vec![],
            args: vec![dest.to_bytes()?, amount.to_bytes()?],
        })
    }
}
