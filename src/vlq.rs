#![doc = r#"
Variable-length quantities

Delta-times and payload lengths in a MIDI file are written as big-endian
groups of seven bits. Every byte but the last has its leading bit set:

```text
value        bytes
0x00000000   00
0x0000007F   7F
0x00000080   81 00
0x00003FFF   FF 7F
0x00004000   81 80 00
0x0FFFFFFF   FF FF FF 7F
```

Four bytes carry 28 bits, which is the largest value a MIDI file may hold.
"#]

use crate::VlqError;
use alloc::vec::Vec;

/// The largest encodable value, `2^28 - 1`.
pub const MAX: u32 = 0x0FFF_FFFF;

/// The longest valid encoding, in bytes.
pub const MAX_LEN: usize = 4;

/// Encode `value` into a new buffer.
///
/// # Errors
/// If `value` is greater than [`MAX`].
pub fn encode(value: u32) -> Result<Vec<u8>, VlqError> {
    let mut out = Vec::with_capacity(MAX_LEN);
    encode_into(value, &mut out)?;
    Ok(out)
}

/// Append the encoding of `value` to `out`.
///
/// Nothing is written on error.
pub fn encode_into(value: u32, out: &mut Vec<u8>) -> Result<(), VlqError> {
    if value > MAX {
        return Err(VlqError::Overflow(value));
    }

    // least significant group first, flipped on the way out
    let mut groups = [0u8; MAX_LEN];
    let mut len = 0;
    let mut rest = value;
    loop {
        groups[len] = (rest & 0x7F) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }

    for i in (0..len).rev() {
        let continuation = if i == 0 { 0x00 } else { 0x80 };
        out.push(groups[i] | continuation);
    }
    Ok(())
}

/// Number of bytes [`encode`] would produce for `value`.
pub const fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}

/// Decode a quantity starting at `offset`.
///
/// Returns the value and the number of bytes it occupied. Reading stops at
/// the first byte whose leading bit is clear; nothing after it is touched.
pub fn decode(bytes: &[u8], offset: usize) -> Result<(u32, usize), VlqError> {
    let bytes = bytes.get(offset..).unwrap_or_default();

    let mut value = 0u32;
    for (consumed, &byte) in bytes.iter().enumerate() {
        if consumed == MAX_LEN {
            return Err(VlqError::TooLong);
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, consumed + 1));
        }
    }
    Err(VlqError::Truncated)
}

#[test]
fn known_encodings() {
    use pretty_assertions::assert_eq;

    assert_eq!(encode(0).unwrap(), [0x00]);
    assert_eq!(encode(0x40).unwrap(), [0x40]);
    assert_eq!(encode(127).unwrap(), [0x7F]);
    assert_eq!(encode(128).unwrap(), [0x81, 0x00]);
    assert_eq!(encode(0x2000).unwrap(), [0xC0, 0x00]);
    assert_eq!(encode(16383).unwrap(), [0xFF, 0x7F]);
    assert_eq!(encode(16384).unwrap(), [0x81, 0x80, 0x00]);
    assert_eq!(encode(0x10_0000).unwrap(), [0xC0, 0x80, 0x00]);
    assert_eq!(encode(0x20_0000).unwrap(), [0x81, 0x80, 0x80, 0x00]);
    assert_eq!(encode(MAX).unwrap(), [0xFF, 0xFF, 0xFF, 0x7F]);
}

#[test]
fn rejects_values_past_28_bits() {
    let mut out = Vec::new();
    assert_eq!(
        encode_into(MAX + 1, &mut out),
        Err(VlqError::Overflow(MAX + 1))
    );
    assert!(out.is_empty());
}

#[test]
fn decode_stops_at_terminator() {
    let bytes = [0x00, 0x81, 0x00, 0x90, 0x3C];
    assert_eq!(decode(&bytes, 1), Ok((128, 2)));
    assert_eq!(decode(&bytes, 0), Ok((0, 1)));
}

#[test]
fn decode_errors() {
    assert_eq!(decode(&[0x81, 0x80], 0), Err(VlqError::Truncated));
    assert_eq!(decode(&[], 0), Err(VlqError::Truncated));
    assert_eq!(decode(&[0x00], 4), Err(VlqError::Truncated));
    assert_eq!(
        decode(&[0x81, 0x80, 0x80, 0x80, 0x00], 0),
        Err(VlqError::TooLong)
    );
}

#[test]
fn encoded_len_matches_encode() {
    for value in [0, 1, 127, 128, 16383, 16384, 0x1F_FFFF, 0x20_0000, MAX] {
        assert_eq!(encoded_len(value), encode(value).unwrap().len());
    }
}
