//! BCS (Binary Canonical Serialization) encoding and decoding traits.
//!
//! This module provides the serialization infrastructure shared by the
//! address codec and the transaction builder. The format is canonical: the
//! same logical value always serializes to the same bytes, which is what
//! makes it safe to hash and sign.
//!
//! # Binary Format
//!
//! - Unsigned integers: little-endian, fixed-width
//! - `bool`: single byte (0 = false, 1 = true)
//! - `Vec<T>`/`String`: ULEB128 length prefix followed by elements
//! - Enums: ULEB128 variant index followed by the variant's fields
//! - Sequence lengths and variant indices must fit in a `u32`
//!
//! # Example
//!
//! ```ignore
//! use crate::types::bcs::{Encode, Decode};
//!
//! let value: u32 = 42;
//! let bytes = value.to_bytes().unwrap();
//! let decoded = u32::from_bytes(&bytes).unwrap();
//! assert_eq!(value, decoded);
//! ```

use crate::types::bytes::Bytes;
use aptos_derive::Error;

/// Sink for writing encoded bytes.
///
/// Implemented by byte buffers and hashers so values can be encoded directly
/// into the target without intermediate allocations.
pub trait EncodeSink {
    /// Writes the given bytes to the sink.
    fn write(&mut self, bytes: &[u8]);
}

/// Counter for computing encoded size without allocating memory.
///
/// Used by `Encode::to_bytes` to pre-allocate exact capacity before encoding.
pub struct SizeCounter {
    len: usize,
}

impl SizeCounter {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        Self { len: 0 }
    }

    /// Returns the total number of bytes counted.
    pub fn len(&self) -> usize {
        self.len
    }
}

impl EncodeSink for SizeCounter {
    fn write(&mut self, bytes: &[u8]) {
        self.len += bytes.len();
    }
}

impl EncodeSink for Bytes {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl EncodeSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Errors that can occur during encoding.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A sequence is too long for its ULEB128 u32 length prefix.
    #[error("sequence of {0} elements exceeds the BCS length limit")]
    LengthOverflow(usize),
}

/// Errors that can occur during decoding.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended before expected data was read.
    #[error("input truncated")]
    UnexpectedEof,
    /// Data does not represent a valid value for the target type.
    #[error("invalid value for target type")]
    InvalidValue,
    /// Length prefix exceeds maximum allowed size.
    #[error("length prefix exceeds maximum allowed size")]
    LengthOverflow,
}

/// Trait for types that can be serialized to BCS.
pub trait Encode {
    /// Writes the BCS representation to the given sink.
    fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError>;

    /// Serializes to a new byte buffer with exact capacity.
    ///
    /// Performs two passes: first to count bytes, then to encode.
    fn to_bytes(&self) -> Result<Bytes, EncodeError> {
        let mut counter = SizeCounter::new();
        self.encode(&mut counter)?;

        let mut out = Bytes::with_capacity(counter.len());
        self.encode(&mut out)?;
        Ok(out)
    }
}

/// Trait for types that can be deserialized from BCS.
pub trait Decode: Sized {
    /// Reads and decodes a value from the input buffer.
    ///
    /// Advances the input slice past the consumed bytes.
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError>;

    /// Decodes a value from a byte slice, requiring all bytes to be consumed.
    ///
    /// Returns `InvalidValue` if trailing bytes remain after decoding.
    fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let mut input = data;
        let value = Self::decode(&mut input)?;

        if !input.is_empty() {
            return Err(DecodeError::InvalidValue);
        }

        Ok(value)
    }
}

/// Reads exactly `n` bytes from the input, advancing the slice.
pub(crate) fn read_exact<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8], DecodeError> {
    if input.len() < n {
        return Err(DecodeError::UnexpectedEof);
    }
    let (bytes, rest) = input.split_at(n);
    *input = rest;
    Ok(bytes)
}

/// Writes a u32 as ULEB128 (7 bits per byte, high bit marks continuation).
pub(crate) fn write_uleb128<S: EncodeSink>(out: &mut S, mut value: u32) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.write(&[byte]);
        if value == 0 {
            return;
        }
    }
}

/// Reads a ULEB128-encoded u32, rejecting non-canonical encodings.
///
/// An encoding is non-canonical when its final group is zero (a shorter
/// encoding of the same value exists) or when it carries bits beyond u32.
pub(crate) fn read_uleb128(input: &mut &[u8]) -> Result<u32, DecodeError> {
    let mut value: u32 = 0;
    let mut shift: u32 = 0;
    loop {
        let byte = read_exact(input, 1)?[0];
        let group = (byte & 0x7f) as u32;
        if shift == 28 && group > 0x0f {
            return Err(DecodeError::LengthOverflow);
        }
        value |= group << shift;
        if byte & 0x80 == 0 {
            if shift > 0 && group == 0 {
                return Err(DecodeError::InvalidValue);
            }
            return Ok(value);
        }
        shift += 7;
        if shift > 28 {
            return Err(DecodeError::LengthOverflow);
        }
    }
}

/// Writes a sequence length as a ULEB128 u32.
///
/// Fails if the length does not fit in a u32, the maximum BCS allows.
pub(crate) fn encode_len<S: EncodeSink>(len: usize, out: &mut S) -> Result<(), EncodeError> {
    let len32 = u32::try_from(len).map_err(|_| EncodeError::LengthOverflow(len))?;
    write_uleb128(out, len32);
    Ok(())
}

/// Maximum allowed length for decoded sequences to prevent memory exhaustion.
const MAX_SEQUENCE_LEN: usize = 1_000_000;

/// Reads a sequence length, bounding it against `MAX_SEQUENCE_LEN`.
pub(crate) fn decode_len(input: &mut &[u8]) -> Result<usize, DecodeError> {
    let len = read_uleb128(input)? as usize;
    if len > MAX_SEQUENCE_LEN {
        return Err(DecodeError::LengthOverflow);
    }
    Ok(len)
}

/// Writes an enum variant index as a ULEB128 u32.
///
/// Used by the `BcsCodec` derive macro.
pub fn encode_variant_index<S: EncodeSink>(index: u32, out: &mut S) -> Result<(), EncodeError> {
    write_uleb128(out, index);
    Ok(())
}

/// Reads an enum variant index.
///
/// Used by the `BcsCodec` derive macro.
pub fn decode_variant_index(input: &mut &[u8]) -> Result<u32, DecodeError> {
    read_uleb128(input)
}

// u8
impl Encode for u8 {
    fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
        out.write(&[*self]);
        Ok(())
    }
}

impl Decode for u8 {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = read_exact(input, 1)?;
        Ok(bytes[0])
    }
}

// Macro for the wider fixed-size unsigned integer types
macro_rules! impl_uint {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
                    out.write(&self.to_le_bytes());
                    Ok(())
                }
            }

            impl Decode for $t {
                fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
                    let bytes = read_exact(input, std::mem::size_of::<$t>())?;
                    Ok(<$t>::from_le_bytes(bytes.try_into().unwrap()))
                }
            }
        )*
    };
}

impl_uint!(u16, u32, u64, u128);

// bool
impl Encode for bool {
    fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
        out.write(&[*self as u8]);
        Ok(())
    }
}

impl Decode for bool {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let b = u8::decode(input)?;
        match b {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DecodeError::InvalidValue),
        }
    }
}

// Vec<T>
impl<T: Encode> Encode for Vec<T> {
    fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
        encode_len(self.len(), out)?;
        for item in self {
            item.encode(out)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let len = decode_len(input)?;

        let mut vec = Vec::with_capacity(len);
        for _ in 0..len {
            vec.push(T::decode(input)?);
        }
        Ok(vec)
    }
}

// String
impl Encode for String {
    fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
        encode_len(self.len(), out)?;
        out.write(self.as_bytes());
        Ok(())
    }
}

impl Decode for String {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let len = decode_len(input)?;
        let bytes = read_exact(input, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidValue)
    }
}

// &str (encode only)
impl Encode for &str {
    fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
        let bytes = self.as_bytes();
        encode_len(bytes.len(), out)?;
        out.write(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== SizeCounter Tests ==========

    #[test]
    fn size_counter_accumulates() {
        let mut counter = SizeCounter::new();
        assert_eq!(counter.len(), 0);

        counter.write(&[1, 2, 3]);
        assert_eq!(counter.len(), 3);

        counter.write(&[4, 5]);
        assert_eq!(counter.len(), 5);
    }

    #[test]
    fn to_bytes_preallocates_exact_capacity() {
        let data: Vec<u8> = vec![1, 2, 3, 4, 5];
        let bytes = data.to_bytes().unwrap();
        // Vec encodes as: 1-byte ULEB128 length + elements
        assert_eq!(bytes.len(), 1 + 5);
        assert_eq!(bytes.capacity(), bytes.len());
    }

    // ========== ULEB128 Tests ==========

    #[test]
    fn uleb128_single_byte_values() {
        for val in [0u32, 1, 63, 127] {
            let mut out = Vec::new();
            write_uleb128(&mut out, val);
            assert_eq!(out.len(), 1);
            assert_eq!(out[0], val as u8);

            let mut input = out.as_slice();
            assert_eq!(read_uleb128(&mut input).unwrap(), val);
            assert!(input.is_empty());
        }
    }

    #[test]
    fn uleb128_multi_byte_values() {
        let cases: [(u32, &[u8]); 4] = [
            (128, &[0x80, 0x01]),
            (300, &[0xac, 0x02]),
            (16384, &[0x80, 0x80, 0x01]),
            (u32::MAX, &[0xff, 0xff, 0xff, 0xff, 0x0f]),
        ];
        for (val, expected) in cases {
            let mut out = Vec::new();
            write_uleb128(&mut out, val);
            assert_eq!(out.as_slice(), expected, "encoding {}", val);

            let mut input = out.as_slice();
            assert_eq!(read_uleb128(&mut input).unwrap(), val);
        }
    }

    #[test]
    fn uleb128_rejects_non_canonical_encoding() {
        // 0x80 0x00 is a two-byte encoding of zero
        let mut input: &[u8] = &[0x80, 0x00];
        assert_eq!(read_uleb128(&mut input), Err(DecodeError::InvalidValue));
    }

    #[test]
    fn uleb128_rejects_overflow() {
        // 2^35 - 1 does not fit a u32
        let mut input: &[u8] = &[0xff, 0xff, 0xff, 0xff, 0x7f];
        assert_eq!(read_uleb128(&mut input), Err(DecodeError::LengthOverflow));
    }

    #[test]
    fn uleb128_rejects_truncated_input() {
        let mut input: &[u8] = &[0x80];
        assert_eq!(read_uleb128(&mut input), Err(DecodeError::UnexpectedEof));
    }

    // ========== Integer Tests ==========

    #[test]
    fn u8_roundtrip() {
        for val in [0u8, 1, 127, 255] {
            let bytes = val.to_bytes().unwrap();
            assert_eq!(bytes.len(), 1);
            assert_eq!(u8::from_bytes(&bytes).unwrap(), val);
        }
    }

    #[test]
    fn u32_little_endian() {
        let val: u32 = 0x12345678;
        let bytes = val.to_bytes().unwrap();
        assert_eq!(bytes.as_ref(), &[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(u32::from_bytes(&bytes).unwrap(), val);
    }

    #[test]
    fn u64_roundtrip() {
        for val in [0u64, 1, u64::MAX / 2, u64::MAX] {
            let bytes = val.to_bytes().unwrap();
            assert_eq!(bytes.len(), 8);
            assert_eq!(u64::from_bytes(&bytes).unwrap(), val);
        }
    }

    #[test]
    fn u128_roundtrip() {
        let val: u128 = 0x0123456789ABCDEF_FEDCBA9876543210;
        let bytes = val.to_bytes().unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(u128::from_bytes(&bytes).unwrap(), val);
    }

    // ========== bool Tests ==========

    #[test]
    fn bool_encoding() {
        assert_eq!(false.to_bytes().unwrap().as_ref(), &[0u8]);
        assert_eq!(true.to_bytes().unwrap().as_ref(), &[1u8]);
    }

    #[test]
    fn bool_invalid_value() {
        for invalid in [2u8, 128, 255] {
            let result = bool::from_bytes(&[invalid]);
            assert!(matches!(result, Err(DecodeError::InvalidValue)));
        }
    }

    // ========== Vec<T> Tests ==========

    #[test]
    fn vec_encoding_format() {
        let vec: Vec<u8> = vec![0xAA, 0xBB, 0xCC];
        let bytes = vec.to_bytes().unwrap();

        // one-byte ULEB128 length prefix + elements
        assert_eq!(bytes[0], 3);
        assert_eq!(&bytes[1..], &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn vec_roundtrip() {
        let original: Vec<u32> = vec![1, 2, 3, 4, 5];
        let bytes = original.to_bytes().unwrap();
        let decoded = Vec::<u32>::from_bytes(&bytes).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn vec_empty() {
        let empty: Vec<u8> = vec![];
        let bytes = empty.to_bytes().unwrap();
        assert_eq!(bytes.as_ref(), &[0u8]); // just the length prefix
        assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap(), empty);
    }

    #[test]
    fn vec_length_prefix_spans_multiple_bytes() {
        let long: Vec<u8> = vec![0x55; 200];
        let bytes = long.to_bytes().unwrap();
        // 200 needs two ULEB128 bytes: 0xc8 0x01
        assert_eq!(&bytes[..2], &[0xc8, 0x01]);
        assert_eq!(bytes.len(), 2 + 200);
        assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap(), long);
    }

    #[test]
    fn vec_decode_length_overflow() {
        // length prefix claims more than MAX_SEQUENCE_LEN elements
        let mut bytes = Vec::new();
        write_uleb128(&mut bytes, (MAX_SEQUENCE_LEN as u32) + 1);
        let result = Vec::<u8>::from_bytes(&bytes);
        assert!(matches!(result, Err(DecodeError::LengthOverflow)));
    }

    #[test]
    fn vec_decode_truncated_elements() {
        // length prefix claims 5 elements but only 2 follow
        let bytes = [5u8, 0xAA, 0xBB];
        let result = Vec::<u8>::from_bytes(&bytes);
        assert!(matches!(result, Err(DecodeError::UnexpectedEof)));
    }

    // ========== String Tests ==========

    #[test]
    fn string_roundtrip() {
        let original = "aptos_account".to_string();
        let bytes = original.to_bytes().unwrap();
        let decoded = String::from_bytes(&bytes).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn string_unicode() {
        let original = "Hello, \u{4e16}\u{754c}!".to_string();
        let bytes = original.to_bytes().unwrap();
        let decoded = String::from_bytes(&bytes).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn string_invalid_utf8() {
        let mut bytes = Vec::new();
        write_uleb128(&mut bytes, 3);
        bytes.extend_from_slice(&[0xFF, 0xFE, 0x00]);

        let result = String::from_bytes(&bytes);
        assert!(matches!(result, Err(DecodeError::InvalidValue)));
    }

    #[test]
    fn str_encodes_same_as_string() {
        let s = "transfer";
        let str_bytes = s.to_bytes().unwrap();
        let string_bytes = s.to_string().to_bytes().unwrap();
        assert_eq!(str_bytes.as_ref(), string_bytes.as_ref());
    }

    // ========== Error Handling Tests ==========

    #[test]
    fn unexpected_eof_empty_input() {
        let result = u32::from_bytes(&[]);
        assert!(matches!(result, Err(DecodeError::UnexpectedEof)));
    }

    #[test]
    fn unexpected_eof_partial_input() {
        // u32 needs 4 bytes, only provide 2
        let result = u32::from_bytes(&[0x12, 0x34]);
        assert!(matches!(result, Err(DecodeError::UnexpectedEof)));
    }

    #[test]
    fn trailing_bytes_error() {
        // a u8 followed by extra bytes
        let bytes = &[42u8, 0xFF, 0xFF];
        let result = u8::from_bytes(bytes);
        assert!(matches!(result, Err(DecodeError::InvalidValue)));
    }

    #[test]
    fn decode_advances_input() {
        let mut input: &[u8] = &[0x01, 0x02, 0x03, 0x04, 0x05];

        let first = u8::decode(&mut input).unwrap();
        assert_eq!(first, 0x01);
        assert_eq!(input.len(), 4);

        let second = u16::decode(&mut input).unwrap();
        assert_eq!(second, 0x0302); // little-endian
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn error_messages_are_displayable() {
        assert_eq!(
            EncodeError::LengthOverflow(5_000_000_000).to_string(),
            "sequence of 5000000000 elements exceeds the BCS length limit"
        );
        assert_eq!(DecodeError::UnexpectedEof.to_string(), "input truncated");
    }
}
