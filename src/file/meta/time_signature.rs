use crate::FileError;

#[doc = r#"
Time Signature (`FF 58 04 nn dd cc bb`).

The denominator is stored as a power of two, so only `1, 2, 4, 8, ...` can
be represented.

| Byte | Meaning |
|---|---|
| `nn` | numerator |
| `dd` | log2 of the denominator |
| `cc` | MIDI clocks per metronome click |
| `bb` | notated 32nd notes per MIDI quarter note (24 clocks) |

# Example
```rust
# use smfkit::prelude::*;
let six_eight = TimeSignature::new(6, 8).unwrap();
assert_eq!(six_eight.to_bytes(), [6, 3, 24, 8]);
assert!(TimeSignature::new(3, 6).is_err());
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: u8,
    denominator_exp: u8,
    clocks_per_click: u8,
    thirty_seconds_per_quarter: u8,
}

impl Default for TimeSignature {
    /// 4/4
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator_exp: 2,
            clocks_per_click: 24,
            thirty_seconds_per_quarter: 8,
        }
    }
}

impl TimeSignature {
    /// `numerator / denominator` with a click every quarter note.
    ///
    /// # Errors
    /// If `denominator` is not a power of two.
    pub fn new(numerator: u8, denominator: u8) -> Result<Self, FileError> {
        if !denominator.is_power_of_two() {
            return Err(FileError::InvalidDenominator(denominator));
        }
        Ok(Self {
            numerator,
            denominator_exp: denominator.trailing_zeros() as u8,
            clocks_per_click: 24,
            thirty_seconds_per_quarter: 8,
        })
    }

    /// Replace the metronome fields
    pub const fn with_metronome(mut self, clocks_per_click: u8, thirty_seconds_per_quarter: u8) -> Self {
        self.clocks_per_click = clocks_per_click;
        self.thirty_seconds_per_quarter = thirty_seconds_per_quarter;
        self
    }

    /// Reads the four bytes of the event
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            numerator: bytes[0],
            denominator_exp: bytes[1],
            clocks_per_click: bytes[2],
            thirty_seconds_per_quarter: bytes[3],
        }
    }

    /// The wire bytes
    pub const fn to_bytes(&self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_exp,
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]
    }

    /// Beats per measure
    pub const fn numerator(&self) -> u8 {
        self.numerator
    }

    /// The note value of one beat. Exponents past 31 read as `2^31`.
    pub const fn denominator(&self) -> u32 {
        let exp = if self.denominator_exp > 31 {
            31
        } else {
            self.denominator_exp
        };
        1 << exp
    }

    /// log2 of [`Self::denominator`], as stored
    pub const fn denominator_exponent(&self) -> u8 {
        self.denominator_exp
    }

    /// MIDI clocks per metronome click
    pub const fn clocks_per_click(&self) -> u8 {
        self.clocks_per_click
    }

    /// 32nd notes per MIDI quarter note
    pub const fn thirty_seconds_per_quarter(&self) -> u8 {
        self.thirty_seconds_per_quarter
    }
}

#[test]
fn powers_of_two_round_trip() {
    for (exp, bottom) in [1u8, 2, 4, 8, 16, 32].into_iter().enumerate() {
        let sig = TimeSignature::new(3, bottom).unwrap();
        assert_eq!(sig.denominator_exponent(), exp as u8);
        assert_eq!(sig.denominator(), bottom as u32);
    }
}

#[test]
fn rejects_other_denominators() {
    assert_eq!(TimeSignature::new(4, 0), Err(FileError::InvalidDenominator(0)));
    assert_eq!(TimeSignature::new(4, 12), Err(FileError::InvalidDenominator(12)));
}
