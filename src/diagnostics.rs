use alloc::vec::Vec;

/// A value that did not fit its wire range and was clamped.
///
/// Clamping never stops an operation. The warning is logged (with the
/// `tracing` feature) and, where a [`Diagnostics`] collection is in reach,
/// recorded there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RangeWarning {
    /// Name of the clamped field, e.g. `"velocity"`
    pub field: &'static str,
    /// The value that was asked for
    pub given: i64,
    /// The value that was stored
    pub clamped: i64,
}

impl core::fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} out of range, clamped to {}",
            self.field, self.given, self.clamped
        )
    }
}

/// The result of a range-checked construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Clamped<T> {
    /// The value, always legal
    pub value: T,
    /// Present if the input had to be clamped
    pub warning: Option<RangeWarning>,
}

impl<T> Clamped<T> {
    pub(crate) const fn exact(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    /// Returns the value, dropping any warning (it has already been logged).
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Returns the value, recording any warning in `diagnostics`.
    pub fn record(self, diagnostics: &mut Diagnostics) -> T {
        if let Some(warning) = self.warning {
            diagnostics.push(warning);
        }
        self.value
    }

    /// True if the input was out of range.
    pub const fn was_clamped(&self) -> bool {
        self.warning.is_some()
    }

    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> Clamped<U> {
        Clamped {
            value: f(self.value),
            warning: self.warning,
        }
    }
}

/// Clamp `value` into `min..=max`, logging when it does not fit.
pub(crate) fn clamp(field: &'static str, value: i64, min: i64, max: i64) -> Clamped<i64> {
    let clamped = value.clamp(min, max);
    if clamped == value {
        return Clamped::exact(value);
    }

    #[cfg(feature = "tracing")]
    tracing::warn!(field, given = value, clamped, "value out of range, clamping");

    Clamped {
        value: clamped,
        warning: Some(RangeWarning {
            field,
            given: value,
            clamped,
        }),
    }
}

/// An ordered collection of [`RangeWarning`]s.
///
/// Tracks and files each carry one; their convenience operations (such as
/// [`Track::add_note`](crate::file::Track::add_note)) record into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    warnings: Vec<RangeWarning>,
}

impl Diagnostics {
    /// An empty collection
    pub const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Clamp `value` into `min..=max`, recording a warning if it had to move.
    pub fn clamp(&mut self, field: &'static str, value: i64, min: i64, max: i64) -> i64 {
        clamp(field, value, min, max).record(self)
    }

    /// Add a warning
    pub fn push(&mut self, warning: RangeWarning) {
        self.warnings.push(warning);
    }

    /// All warnings, oldest first
    pub fn warnings(&self) -> &[RangeWarning] {
        &self.warnings
    }

    /// Number of warnings
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// True if nothing was clamped
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Remove and return every warning.
    pub fn take(&mut self) -> Vec<RangeWarning> {
        core::mem::take(&mut self.warnings)
    }

    /// Forget every warning.
    pub fn clear(&mut self) {
        self.warnings.clear();
    }
}

impl Extend<RangeWarning> for Diagnostics {
    fn extend<I: IntoIterator<Item = RangeWarning>>(&mut self, iter: I) {
        self.warnings.extend(iter);
    }
}

#[test]
fn clamp_records_only_when_out_of_range() {
    use pretty_assertions::assert_eq;

    let mut diagnostics = Diagnostics::new();
    assert_eq!(diagnostics.clamp("velocity", 100, 0, 127), 100);
    assert!(diagnostics.is_empty());

    assert_eq!(diagnostics.clamp("velocity", 300, 0, 127), 127);
    assert_eq!(diagnostics.clamp("sharps", -9, -7, 7), -7);
    assert_eq!(
        diagnostics.warnings(),
        &[
            RangeWarning {
                field: "velocity",
                given: 300,
                clamped: 127
            },
            RangeWarning {
                field: "sharps",
                given: -9,
                clamped: -7
            }
        ]
    );

    let taken = diagnostics.take();
    assert_eq!(taken.len(), 2);
    assert!(diagnostics.is_empty());
}
