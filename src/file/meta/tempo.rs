use crate::{Clamped, diagnostics::clamp};

/// Microseconds in a minute
const MICROS_PER_MINUTE: f64 = 60_000_000.;

#[doc = r#"
Set Tempo (`FF 51 03 tt tt tt`): microseconds per quarter note.

# Example
```rust
# use smfkit::prelude::*;
let tempo = Tempo::from_bpm(120.).value;
assert_eq!(tempo.micros_per_quarter_note(), 500_000);
assert_eq!(tempo.bpm(), 120.);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Default for Tempo {
    /// 120 bpm, the tempo a file has until told otherwise
    fn default() -> Self {
        Self(500_000)
    }
}

impl Tempo {
    /// The largest tempo value three bytes can hold
    pub const MAX: u32 = 0xFF_FFFF;

    /// Microseconds per quarter note, clamped to `1..=0xFFFFFF`.
    pub fn from_micros(micros_per_quarter_note: u32) -> Clamped<Self> {
        clamp("tempo", micros_per_quarter_note as i64, 1, Self::MAX as i64).map(|v| Self(v as u32))
    }

    /// `60_000_000 / bpm`, truncated and clamped to the wire range.
    pub fn from_bpm(bpm: f64) -> Clamped<Self> {
        let micros = MICROS_PER_MINUTE / bpm;
        // `as` saturates, so infinities land on the clamp bounds
        clamp("tempo", micros as i64, 1, Self::MAX as i64).map(|v| Self(v as u32))
    }

    /// Reads the three bytes of a tempo event. A zero tempo becomes 1.
    pub fn new_from_bytes(bytes: &[u8; 3]) -> Clamped<Self> {
        Self::from_micros(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    /// The wire bytes
    pub const fn to_bytes(&self) -> [u8; 3] {
        let [_, a, b, c] = self.0.to_be_bytes();
        [a, b, c]
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        MICROS_PER_MINUTE / self.0 as f64
    }
}

#[test]
fn bpm_round_trip() {
    assert_eq!(Tempo::from_bpm(120.).value.micros_per_quarter_note(), 500_000);
    assert_eq!(Tempo::from_bpm(90.).value.micros_per_quarter_note(), 666_666);
    assert_eq!(Tempo::from_bpm(60.).value.bpm(), 60.);
}

#[test]
fn tempo_bytes() {
    let tempo = Tempo::new_from_bytes(&[0x07, 0xA1, 0x20]).value;
    assert_eq!(tempo.micros_per_quarter_note(), 500_000);
    assert_eq!(tempo.to_bytes(), [0x07, 0xA1, 0x20]);
}

#[test]
fn out_of_range_tempos_clamp() {
    let slow = Tempo::from_bpm(1.);
    assert!(slow.was_clamped());
    assert_eq!(slow.value.micros_per_quarter_note(), Tempo::MAX);

    let stopped = Tempo::from_bpm(0.);
    assert_eq!(stopped.value.micros_per_quarter_note(), Tempo::MAX);

    let absurd = Tempo::from_bpm(1e12);
    assert_eq!(absurd.value.micros_per_quarter_note(), 1);
}

#[test]
fn zero_tempo_bytes_clamp() {
    let zero = Tempo::new_from_bytes(&[0, 0, 0]);
    assert!(zero.was_clamped());
    assert_eq!(zero.value.micros_per_quarter_note(), 1);
    assert!(zero.value.bpm().is_finite());
}
