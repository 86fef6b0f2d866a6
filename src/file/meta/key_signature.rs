use crate::{Clamped, diagnostics::clamp};

/// Key Signature (`FF 59 02 sf mi`).
///
/// `sf` counts sharps (positive) or flats (negative), `mi` is 1 for a minor
/// key. The default is C major.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    sharps: i8,
    minor: bool,
}

impl KeySignature {
    /// Clamps `sharps` to `-7..=7`.
    pub fn new(sharps: i8, minor: bool) -> Clamped<Self> {
        clamp("sharps", sharps as i64, -7, 7).map(|sharps| Self {
            sharps: sharps as i8,
            minor,
        })
    }

    /// Reads the two bytes of the event. Any non-zero mode byte means minor.
    pub fn from_bytes(bytes: [u8; 2]) -> Clamped<Self> {
        Self::new(bytes[0] as i8, bytes[1] != 0)
    }

    /// The wire bytes
    pub const fn to_bytes(&self) -> [u8; 2] {
        [self.sharps as u8, self.minor as u8]
    }

    /// Sharps if positive, flats if negative
    pub const fn sharps(&self) -> i8 {
        self.sharps
    }

    /// True for a minor key
    pub const fn is_minor(&self) -> bool {
        self.minor
    }
}

#[test]
fn flats_are_twos_complement() {
    let e_flat_minor = KeySignature::new(-6, true).value;
    assert_eq!(e_flat_minor.to_bytes(), [0xFA, 0x01]);
    assert_eq!(KeySignature::from_bytes([0xFA, 0x01]).value, e_flat_minor);
}

#[test]
fn sharps_clamp() {
    let clamped = KeySignature::new(9, false);
    assert!(clamped.was_clamped());
    assert_eq!(clamped.value.sharps(), 7);
}
