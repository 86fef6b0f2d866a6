mod smpte;
pub use smpte::*;

use crate::{
    SmpteError,
    file::{SmpteOffset, Tempo},
};

/// The header's division: what a tick means.
///
/// Either a count of ticks per quarter note (leading bit clear) or an SMPTE
/// frame rate and a count of ticks per frame (leading bit set). See
/// [`Header`](crate::file::Header) for the byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Delta times count fractions of a quarter note
    TicksPerQuarterNote(TicksPerQuarterNote),

    /// Delta times count fractions of an SMPTE frame
    Smpte(SmpteHeader),
}

impl Default for Timing {
    /// 960 ticks per quarter note
    fn default() -> Self {
        Self::new_ticks_per_quarter_note(TicksPerQuarterNote::DEFAULT)
    }
}

impl Timing {
    /// `tpqn` ticks to a quarter note. Only the low 15 bits are kept.
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self::TicksPerQuarterNote(TicksPerQuarterNote(tpqn & 0x7FFF))
    }

    /// `ticks_per_frame` ticks to each frame at `fps`.
    pub const fn new_smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte(SmpteHeader {
            fps,
            ticks_per_frame,
        })
    }

    /// Decode the two division bytes of a header.
    pub const fn from_bytes(bytes: [u8; 2]) -> Result<Self, SmpteError> {
        if bytes[0] & 0x80 == 0 {
            return Ok(Self::new_ticks_per_quarter_note(u16::from_be_bytes(bytes)));
        }
        match SmpteFps::from_division_byte(bytes[0] as i8) {
            Ok(fps) => Ok(Self::new_smpte(fps, bytes[1])),
            Err(e) => Err(e),
        }
    }

    /// The two division bytes
    pub const fn to_bytes(&self) -> [u8; 2] {
        match self {
            Self::TicksPerQuarterNote(t) => t.0.to_be_bytes(),
            Self::Smpte(s) => [s.fps.to_division_byte() as u8, s.ticks_per_frame],
        }
    }

    /// The header's resolution, `None` under SMPTE timing.
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        if let Self::TicksPerQuarterNote(t) = self {
            Some(t.get())
        } else {
            None
        }
    }

    /// Ticks per quarter note, derived from `tempo` under SMPTE timing.
    ///
    /// Under SMPTE timing a quarter note lasts `tempo` microseconds and a tick
    /// lasts `1 / (fps * ticks_per_frame)` seconds. Never returns zero.
    pub fn effective_ticks_per_quarter_note(&self, tempo: Tempo) -> f64 {
        let tpq = match self {
            Self::TicksPerQuarterNote(t) => t.get() as f64,
            Self::Smpte(s) => {
                tempo.micros_per_quarter_note() as f64 * s.ticks_per_second() / 1_000_000.
            }
        };
        tpq.max(1.)
    }

    /// Length of one tick in microseconds.
    ///
    /// `tempo` only matters for quarter-note timing; SMPTE ticks have a fixed
    /// length. Nominal frame rates are used, so drop-frame counts as 30.
    pub fn micros_per_tick(&self, tempo: Tempo) -> f64 {
        match self {
            // µs_per_tick = tempo / TPQN
            Self::TicksPerQuarterNote(t) => {
                tempo.micros_per_quarter_note() as f64
                    / t.get().max(1) as f64
            }
            // µs_per_tick = 1 000 000 / (fps × ticks_per_frame)
            Self::Smpte(s) => 1_000_000. / s.ticks_per_second().max(1.),
        }
    }

    /// Microseconds to add for a track's SMPTE offset.
    ///
    /// A file with SMPTE timing counts the offset's frames at the file's rate.
    pub fn offset_micros(&self, offset: &SmpteOffset) -> f64 {
        match self {
            Self::Smpte(s) => {
                if offset.fps != s.fps {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        header_fps = s.fps.as_f64(),
                        offset_fps = offset.fps.as_f64(),
                        "SMPTE offset frame rate differs from the header; using the header's"
                    );
                }
                offset.as_micros_with_override(s.fps)
            }
            Self::TicksPerQuarterNote(_) => offset.as_micros(),
        }
    }
}

/// Musical resolution, 0-32767 ticks per quarter note
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicksPerQuarterNote(u16);

impl TicksPerQuarterNote {
    /// Resolution of a new file
    pub const DEFAULT: u16 = 960;

    /// Ticks in one quarter note
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Frame-based resolution: a frame rate and a tick count per frame
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    pub(crate) fps: SmpteFps,
    pub(crate) ticks_per_frame: u8,
}

impl SmpteHeader {
    /// Frame rate
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Subdivisions of each frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }

    fn ticks_per_second(&self) -> f64 {
        self.fps.as_division() as f64 * self.ticks_per_frame as f64
    }
}

#[test]
fn division_bytes() {
    use pretty_assertions::assert_eq;

    let tpq = Timing::from_bytes([0x03, 0xC0]).unwrap();
    assert_eq!(tpq, Timing::default());
    assert_eq!(tpq.ticks_per_quarter_note(), Some(960));
    assert_eq!(tpq.to_bytes(), [0x03, 0xC0]);

    // -25 fps, 40 ticks per frame
    let smpte = Timing::from_bytes([0xE7, 0x28]).unwrap();
    assert_eq!(smpte, Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(smpte.ticks_per_quarter_note(), None);
    assert_eq!(smpte.to_bytes(), [0xE7, 0x28]);

    assert_eq!(
        Timing::from_bytes([0xE0, 0x28]),
        Err(SmpteError::HeaderFrameTime(-32))
    );
}

#[test]
fn tick_lengths() {
    let tempo = Tempo::default();
    assert_eq!(Timing::new_ticks_per_quarter_note(500).micros_per_tick(tempo), 1000.);
    // 25 fps * 40 ticks = 1000 ticks per second
    let smpte = Timing::new_smpte(SmpteFps::TwentyFive, 40);
    assert_eq!(smpte.micros_per_tick(tempo), 1000.);
    // a 500ms quarter note spans 500 of those ticks
    assert_eq!(smpte.effective_ticks_per_quarter_note(tempo), 500.);
}
