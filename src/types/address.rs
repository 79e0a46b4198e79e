//! 32-byte account addresses with relaxed parsing and two text renderings.
//!
//! An address prints in its "short" form by default: special addresses (the
//! reserved low addresses such as `0x1`) collapse to one or two hex digits,
//! everything else renders as the full 64 digits. The "long" form is always
//! 64 digits and is what canonical APIs expect.

use crate::crypto::ed25519::{AuthenticationKey, DeriveScheme};
use crate::types::bcs::{read_exact, Decode, DecodeError, Encode, EncodeError, EncodeSink};
use crate::types::hash::Hash;
use aptos_derive::Error;
use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Account address length in bytes.
pub const ADDRESS_LEN: usize = 32;

/// A 32-byte on-chain account address, most-significant byte first.
///
/// A plain value type: equality is byte-wise, copies are array copies. In BCS
/// an address is exactly its 32 raw bytes with no length prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountAddress(pub [u8; ADDRESS_LEN]);

/// Errors from parsing an address string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// No hex digits after the optional `0x` prefix.
    #[error("address string has no hex digits")]
    Empty,
    /// More hex digits than fit in 32 bytes.
    #[error("address string has {0} hex digits, more than the 64 that fit an address")]
    TooLong(usize),
    /// A character outside `[0-9a-fA-F]`.
    #[error("invalid hex character '{0}' in address string")]
    InvalidHexCharacter(char),
}

impl AccountAddress {
    /// The all-zero address.
    pub const ZERO: AccountAddress = AccountAddress([0u8; ADDRESS_LEN]);
    /// Reserved framework address `0x1`.
    pub const ONE: AccountAddress = Self::reserved(1);
    /// Reserved framework address `0x2`.
    pub const TWO: AccountAddress = Self::reserved(2);
    /// Reserved framework address `0x3`.
    pub const THREE: AccountAddress = Self::reserved(3);
    /// Reserved framework address `0x4`.
    pub const FOUR: AccountAddress = Self::reserved(4);

    const fn reserved(low_byte: u8) -> AccountAddress {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 1] = low_byte;
        AccountAddress(bytes)
    }

    /// Returns the address as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns true for the reserved low addresses eligible for the short
    /// rendering: first 31 bytes zero and final byte below 0x10.
    pub fn is_special(&self) -> bool {
        self.0[..ADDRESS_LEN - 1].iter().all(|&b| b == 0) && self.0[ADDRESS_LEN - 1] < 0x10
    }

    /// Parses an address from hex text, accepting short forms.
    ///
    /// Strips an optional `0x`/`0X` prefix; the remaining 1..=64 hex digits
    /// are right-aligned into the 32 bytes (missing leading digits are
    /// zero). Case-insensitive. Over-length or non-hex input is rejected,
    /// never truncated.
    pub fn parse_relaxed(s: &str) -> Result<AccountAddress, AddressParseError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.is_empty() {
            return Err(AddressParseError::Empty);
        }
        if digits.len() > ADDRESS_LEN * 2 {
            return Err(AddressParseError::TooLong(digits.len()));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        for (i, c) in digits.chars().rev().enumerate() {
            let nibble = c
                .to_digit(16)
                .ok_or(AddressParseError::InvalidHexCharacter(c))? as u8;
            let byte = ADDRESS_LEN - 1 - i / 2;
            if i % 2 == 0 {
                bytes[byte] |= nibble;
            } else {
                bytes[byte] |= nibble << 4;
            }
        }
        Ok(AccountAddress(bytes))
    }

    /// Renders the full 64-digit form regardless of specialness.
    pub fn to_long_string(&self) -> String {
        use fmt::Write;
        let mut out = String::with_capacity(2 + ADDRESS_LEN * 2);
        out.push_str("0x");
        for byte in &self.0 {
            // writing to a String cannot fail
            let _ = write!(out, "{:02x}", byte);
        }
        out
    }

    /// Copies an authentication key into an address.
    ///
    /// An account's address is fixed at creation to its initial
    /// authentication key, even if the key is later rotated, so this is an
    /// identity copy of the 32 key bytes.
    pub fn from_auth_key(auth_key: &AuthenticationKey) -> AccountAddress {
        AccountAddress(auth_key.0)
    }

    /// Derives the deterministic address of an object owned by this account.
    ///
    /// Computed as `SHA3-256(owner || object || scheme)` with the network's
    /// object-derived-from-object scheme byte, so addresses derived locally
    /// agree with addresses the network computes on-chain.
    pub fn object_address_from_object(&self, object: &AccountAddress) -> AccountAddress {
        let mut h = Hash::sha3();
        h.update(self.as_slice());
        h.update(object.as_slice());
        h.update(&[DeriveScheme::DeriveObjectFromObject as u8]);
        AccountAddress(h.finalize().0)
    }
}

impl fmt::Display for AccountAddress {
    /// Renders the short form: minimal digits for special addresses, the
    /// full 64 digits for everything else.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_special() {
            write!(f, "0x{:x}", self.0[ADDRESS_LEN - 1])
        } else {
            write!(f, "0x")?;
            for byte in &self.0 {
                write!(f, "{:02x}", byte)?;
            }
            Ok(())
        }
    }
}

impl FromStr for AccountAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountAddress::parse_relaxed(s)
    }
}

impl Encode for AccountAddress {
    fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
        out.write(&self.0);
        Ok(())
    }
}

impl Decode for AccountAddress {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = read_exact(input, ADDRESS_LEN)?;
        let mut addr = [0u8; ADDRESS_LEN];
        addr.copy_from_slice(bytes);
        Ok(AccountAddress(addr))
    }
}

impl Serialize for AccountAddress {
    /// JSON form is the short string, matching what node APIs emit.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddressVisitor;

        impl Visitor<'_> for AddressVisitor {
            type Value = AccountAddress;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a hex-encoded account address string")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                AccountAddress::parse_relaxed(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::bcs::{Decode, Encode};

    /// The address byte patterns exercised by the upstream conformance
    /// vectors: the reserved addresses, the specialness boundary, and full
    /// addresses with progressively more leading zero nibbles.
    const VECTORS: [[u8; 32]; 8] = [
        [0; 32],
        {
            let mut b = [0; 32];
            b[31] = 0x01;
            b
        },
        {
            let mut b = [0; 32];
            b[31] = 0x0F;
            b
        },
        [
            0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34,
            0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x01, 0x23, 0x45, 0x67,
            0x89, 0xab, 0xcd, 0xef,
        ],
        [
            0x02, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34,
            0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x01, 0x23, 0x45, 0x67,
            0x89, 0xab, 0xcd, 0xef,
        ],
        [
            0x00, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34,
            0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x01, 0x23, 0x45, 0x67,
            0x89, 0xab, 0xcd, 0xef,
        ],
        [
            0x00, 0x04, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34,
            0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x01, 0x23, 0x45, 0x67,
            0x89, 0xab, 0xcd, 0xef,
        ],
        [
            0x00, 0x00, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34,
            0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x01, 0x23, 0x45, 0x67,
            0x89, 0xab, 0xcd, 0xef,
        ],
    ];

    const EXPECTED_SHORT: [&str; 8] = [
        "0x0",
        "0x1",
        "0xf",
        "0x1234123412341234123412341234123412341234123412340123456789abcdef",
        "0x0234123412341234123412341234123412341234123412340123456789abcdef",
        "0x0034123412341234123412341234123412341234123412340123456789abcdef",
        "0x0004123412341234123412341234123412341234123412340123456789abcdef",
        "0x0000123412341234123412341234123412341234123412340123456789abcdef",
    ];

    const EXPECTED_LONG: [&str; 8] = [
        "0x0000000000000000000000000000000000000000000000000000000000000000",
        "0x0000000000000000000000000000000000000000000000000000000000000001",
        "0x000000000000000000000000000000000000000000000000000000000000000f",
        "0x1234123412341234123412341234123412341234123412340123456789abcdef",
        "0x0234123412341234123412341234123412341234123412340123456789abcdef",
        "0x0034123412341234123412341234123412341234123412340123456789abcdef",
        "0x0004123412341234123412341234123412341234123412340123456789abcdef",
        "0x0000123412341234123412341234123412341234123412340123456789abcdef",
    ];

    #[test]
    fn special_address_short_string() {
        let mut aa = AccountAddress::ZERO;
        aa.0[31] = 3;
        assert_eq!(aa.to_string(), "0x3");

        let parsed = AccountAddress::parse_relaxed("0x3").unwrap();
        assert_eq!(aa, parsed);
    }

    #[test]
    fn reserved_addresses_parse_to_constants() {
        assert_eq!(AccountAddress::parse_relaxed("0x0").unwrap(), AccountAddress::ZERO);
        assert_eq!(AccountAddress::parse_relaxed("0x1").unwrap(), AccountAddress::ONE);
        assert_eq!(AccountAddress::parse_relaxed("0x2").unwrap(), AccountAddress::TWO);
        assert_eq!(AccountAddress::parse_relaxed("0x3").unwrap(), AccountAddress::THREE);
        assert_eq!(AccountAddress::parse_relaxed("0x4").unwrap(), AccountAddress::FOUR);
    }

    #[test]
    fn string_output_short_and_long() {
        for (i, input) in VECTORS.iter().enumerate() {
            let addr = AccountAddress(*input);
            assert_eq!(addr.to_string(), EXPECTED_SHORT[i], "case {}", i);
            assert_eq!(addr.to_long_string(), EXPECTED_LONG[i], "case {}", i);
        }
    }

    #[test]
    fn short_and_long_agree_for_non_special() {
        for input in &VECTORS {
            let addr = AccountAddress(*input);
            if !addr.is_special() {
                assert_eq!(addr.to_string(), addr.to_long_string());
            }
        }
    }

    #[test]
    fn specialness_boundary_at_16() {
        let mut addr = AccountAddress::ZERO;
        addr.0[31] = 0x0F;
        assert!(addr.is_special());

        addr.0[31] = 0x10;
        assert!(!addr.is_special());
    }

    #[test]
    fn single_nonzero_leading_byte_disqualifies_short_form() {
        let mut addr = AccountAddress::ZERO;
        addr.0[0] = 0x02;
        addr.0[31] = 0x01;
        assert!(!addr.is_special());
        assert_eq!(addr.to_string().len(), 2 + 64);
    }

    #[test]
    fn bcs_form_is_raw_32_bytes() {
        for input in &VECTORS {
            let addr = AccountAddress(*input);
            let bytes = addr.to_bytes().unwrap();
            assert_eq!(bytes.as_ref(), input.as_slice());

            let decoded = AccountAddress::from_bytes(&bytes).unwrap();
            assert_eq!(addr, decoded);
        }
    }

    #[test]
    fn bcs_decode_rejects_truncated_input() {
        let result = AccountAddress::from_bytes(&[0u8; 31]);
        assert!(matches!(result, Err(DecodeError::UnexpectedEof)));
    }

    #[test]
    fn bcs_decode_rejects_trailing_bytes() {
        let result = AccountAddress::from_bytes(&[0u8; 33]);
        assert!(matches!(result, Err(DecodeError::InvalidValue)));
    }

    #[test]
    fn parse_relaxed_errors() {
        assert_eq!(
            AccountAddress::parse_relaxed("0x"),
            Err(AddressParseError::Empty)
        );
        assert_eq!(
            AccountAddress::parse_relaxed(
                "0xF1234567812345678123456781234567812345678123456781234567812345678"
            ),
            Err(AddressParseError::TooLong(65))
        );
        assert_eq!(
            AccountAddress::parse_relaxed("NotHex"),
            Err(AddressParseError::InvalidHexCharacter('N'))
        );
        assert_eq!(AccountAddress::parse_relaxed(""), Err(AddressParseError::Empty));
    }

    #[test]
    fn parse_relaxed_accepts_uppercase() {
        let lower = AccountAddress::parse_relaxed("0xabcdef").unwrap();
        let upper = AccountAddress::parse_relaxed("0XABCDEF").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn parse_relaxed_odd_digit_count() {
        let addr = AccountAddress::parse_relaxed("0xabc").unwrap();
        assert_eq!(addr.0[30], 0x0a);
        assert_eq!(addr.0[31], 0xbc);
        assert_eq!(&addr.0[..30], &[0u8; 30]);
    }

    #[test]
    fn parse_reparse_is_stable() {
        for text in ["0x1", "0xF", "0x10", "0x0234", "abcdef0123456789"] {
            let addr = AccountAddress::parse_relaxed(text).unwrap();
            let reparsed = AccountAddress::parse_relaxed(&addr.to_long_string()).unwrap();
            assert_eq!(addr, reparsed);
        }
    }

    #[test]
    fn from_str_delegates_to_parse_relaxed() {
        let addr: AccountAddress = "0x42".parse().unwrap();
        assert_eq!(addr.0[31], 0x42);
        assert!("zz".parse::<AccountAddress>().is_err());
    }

    #[test]
    fn from_auth_key_is_identity_copy() {
        let auth_key = AuthenticationKey([0u8; 32]);
        assert_eq!(AccountAddress::from_auth_key(&auth_key), AccountAddress::ZERO);

        let auth_key = AuthenticationKey([0xAB; 32]);
        assert_eq!(AccountAddress::from_auth_key(&auth_key).0, [0xAB; 32]);
    }

    #[test]
    fn object_address_derivation_matches_network_vectors() {
        // SHA3-256(owner || object || 0xFC), cross-checked externally
        let derived = AccountAddress::ONE.object_address_from_object(&AccountAddress::TWO);
        assert_eq!(
            derived.to_long_string(),
            "0xbd852bdc69be8a743bd850d44dad607c176af2e64266faa97f7d285b44cca81d"
        );

        let owner = AccountAddress::parse_relaxed("0xb0b").unwrap();
        let object = AccountAddress::parse_relaxed("0xcafe").unwrap();
        assert_eq!(
            owner.object_address_from_object(&object).to_long_string(),
            "0xe7bddfa16f855965beef840cced42ba2296fcff2b09f54872f2c0e4401c7e162"
        );
    }

    #[test]
    fn object_address_derivation_is_deterministic() {
        let owner = AccountAddress::parse_relaxed("0xb0b").unwrap();
        let object = AccountAddress::parse_relaxed("0xcafe").unwrap();

        let first = owner.object_address_from_object(&object);
        let second = owner.object_address_from_object(&object);
        assert_eq!(first, second);

        let other_owner = AccountAddress::parse_relaxed("0xa11ce").unwrap();
        assert_ne!(first, other_owner.object_address_from_object(&object));
    }

    #[test]
    fn json_uses_short_form() {
        let json = serde_json::to_string(&AccountAddress::ONE).unwrap();
        assert_eq!(json, "\"0x1\"");

        let parsed: AccountAddress = serde_json::from_str("\"0x1\"").unwrap();
        assert_eq!(parsed, AccountAddress::ONE);
    }

    #[test]
    fn json_rejects_malformed_addresses() {
        assert!(serde_json::from_str::<AccountAddress>("\"0x\"").is_err());
        assert!(serde_json::from_str::<AccountAddress>("\"NotHex\"").is_err());
        assert!(serde_json::from_str::<AccountAddress>("17").is_err());
    }
}
