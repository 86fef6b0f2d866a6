use pretty_assertions::assert_eq;
use smfkit::{VlqError, vlq};

#[test]
fn known_encodings() {
    let cases: [(u32, &[u8]); 8] = [
        (0, &[0x00]),
        (0x40, &[0x40]),
        (127, &[0x7F]),
        (128, &[0x81, 0x00]),
        (0x2000, &[0xC0, 0x00]),
        (16_383, &[0xFF, 0x7F]),
        (16_384, &[0x81, 0x80, 0x00]),
        (268_435_455, &[0xFF, 0xFF, 0xFF, 0x7F]),
    ];
    for (value, bytes) in cases {
        assert_eq!(vlq::encode(value).unwrap(), bytes, "encoding {value}");
        assert_eq!(vlq::decode(bytes, 0).unwrap(), (value, bytes.len()));
        assert_eq!(vlq::encoded_len(value), bytes.len());
    }
}

#[test]
fn decode_stops_at_terminator() {
    // delta of 200 followed by a note on
    let bytes = [0x90, 0x3C, 0x81, 0x48, 0x90, 0x3C, 0x64];
    assert_eq!(vlq::decode(&bytes, 2).unwrap(), (200, 2));
}

#[test]
fn decode_errors() {
    assert_eq!(vlq::decode(&[0x81, 0x80], 0), Err(VlqError::Truncated));
    assert_eq!(vlq::decode(&[], 0), Err(VlqError::Truncated));
    assert_eq!(vlq::decode(&[0x00], 4), Err(VlqError::Truncated));
    assert_eq!(
        vlq::decode(&[0x81, 0x80, 0x80, 0x80, 0x00], 0),
        Err(VlqError::TooLong)
    );
}

#[test]
fn encode_rejects_29_bits() {
    assert_eq!(vlq::encode(vlq::MAX + 1), Err(VlqError::Overflow(vlq::MAX + 1)));

    let mut out = vec![0xAA];
    assert!(vlq::encode_into(u32::MAX, &mut out).is_err());
    assert_eq!(out, [0xAA]);
}

#[test]
fn round_trip_boundaries() {
    let mut value = 1u32;
    while value <= vlq::MAX {
        for v in [value - 1, value, value.saturating_add(1).min(vlq::MAX)] {
            let bytes = vlq::encode(v).unwrap();
            assert_eq!(vlq::decode(&bytes, 0).unwrap(), (v, bytes.len()));
        }
        value <<= 7;
    }
}
