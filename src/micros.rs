use core::{fmt, ops::Add};

/// A wall-clock position in whole microseconds, as returned by
/// [`MidiFile::ticks_to_micros`](crate::file::MidiFile::ticks_to_micros).
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UMicros(u64);

impl UMicros {
    /// The start of the file
    pub const ZERO: Self = Self(0);

    /// Wrap a microsecond count
    #[inline]
    pub const fn new(us: u64) -> Self {
        Self(us)
    }

    /// The raw microsecond count
    #[inline]
    pub const fn us(self) -> u64 {
        self.0
    }

    /// Truncated to milliseconds
    #[inline]
    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000
    }

    /// Fractional seconds
    #[inline]
    pub const fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1e6
    }
}

impl Add for UMicros {
    type Output = Self;

    /// Saturates at `u64::MAX`
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for UMicros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}s", self.0 / 1_000_000, self.0 % 1_000_000)
    }
}

#[cfg(feature = "std")]
impl From<UMicros> for std::time::Duration {
    fn from(value: UMicros) -> Self {
        Self::from_micros(value.0)
    }
}

#[test]
fn micros_units() {
    use alloc::string::ToString;

    let t = UMicros::new(1_596_000);
    assert_eq!(t.as_millis(), 1_596);
    assert_eq!(t.as_secs_f64(), 1.596);
    assert_eq!(t.to_string(), "1.596000s");
    assert_eq!(UMicros::new(u64::MAX) + t, UMicros::new(u64::MAX));
}
