use crate::{Clamped, ParseError, diagnostics::clamp};
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
A seven bit MIDI data byte, `0..=127`.

Every note, velocity, controller and program number on the wire is a data
byte: its leading bit is clear, which is how a parser tells it apart from a
status byte.

# Example
```rust
# use smfkit::prelude::*;
assert!(DataByte::new(64).is_ok());
assert!(DataByte::new(0x90).is_err());

let loud = DataByte::clamped("velocity", 200);
assert_eq!(loud.value.value(), 127);
assert!(loud.was_clamped());
```
"#]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// The largest data byte
    pub const MAX: Self = Self(0x7F);

    /// Checks for correctness (leading 0 bit).
    pub const fn new(byte: u8) -> Result<Self, ParseError> {
        if byte > 0x7F {
            return Err(ParseError::InvalidDataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Masks off the leading bit.
    pub const fn new_unchecked(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// Clamp `byte` to 127, naming the field in the warning.
    pub fn clamped(field: &'static str, byte: u8) -> Clamped<Self> {
        clamp(field, byte as i64, 0, 0x7F).map(|v| Self(v as u8))
    }

    /// The byte
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = ParseError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

#[doc = r#"
One of the sixteen MIDI channels.

Variants are named the way musicians count (`One` to `Sixteen`); the wire
value is zero based.

# Example
```rust
# use smfkit::prelude::*;
assert_eq!(Channel::new(9).unwrap(), Channel::Ten);
assert_eq!(u8::from(Channel::Ten), 9);
assert_eq!(Channel::clamped(40).value, Channel::Sixteen);
```
"#]
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    One = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    const ALL: [Channel; 16] = {
        use Channel::*;
        [
            One, Two, Three, Four, Five, Six, Seven, Eight, Nine, Ten, Eleven, Twelve, Thirteen,
            Fourteen, Fifteen, Sixteen,
        ]
    };

    /// Zero-based channel from a wire value.
    pub fn new(index: u8) -> Result<Self, ParseError> {
        Self::try_from(index).map_err(|e| ParseError::InvalidChannel(e.number))
    }

    /// Zero-based channel, clamped to 15.
    pub fn clamped(index: u8) -> Clamped<Self> {
        clamp("channel", index as i64, 0, 15).map(|v| Self::ALL[v as usize])
    }

    /// The channel stored in the low nibble of a status byte.
    pub const fn from_status(status: u8) -> Self {
        Self::ALL[(status & 0x0F) as usize]
    }

    /// Zero-based wire value
    pub fn index(self) -> u8 {
        self.into()
    }
}

#[test]
fn channel_from_status_nibble() {
    assert_eq!(Channel::from_status(0x90), Channel::One);
    assert_eq!(Channel::from_status(0x9F), Channel::Sixteen);
    assert_eq!(Channel::from_status(0xC9), Channel::Ten);
}

#[test]
fn channel_bounds() {
    assert!(Channel::new(16).is_err());
    let clamped = Channel::clamped(16);
    assert_eq!(clamped.value, Channel::Sixteen);
    assert!(clamped.was_clamped());
    assert!(!Channel::clamped(3).was_clamped());
}

#[test]
fn data_byte_bounds() {
    assert_eq!(DataByte::new(0x80), Err(ParseError::InvalidDataByte(0x80)));
    assert_eq!(DataByte::new_unchecked(0xFF).value(), 0x7F);
    assert_eq!(DataByte::clamped("note", 127).value.value(), 127);
    assert!(DataByte::clamped("note", 128).was_clamped());
}
