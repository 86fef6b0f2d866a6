use crate::{SmpteError, file::SmpteFps};

/// SMPTE Offset (`FF 54 05 hr mn se fr ff`): the timecode at which a track
/// starts.
///
/// ```text
/// hr  0rrhhhhh   rate bits rr (24, 25, 29.97, 30), hours 0-23
/// mn  minutes 0-59
/// se  seconds 0-59
/// fr  frames
/// ff  hundredths of a frame, 0-99
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// Rate the frames are counted in. Files with SMPTE timing use their own.
    pub fps: SmpteFps,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
    /// Frame within the second
    pub frame: u8,
    /// Hundredths of a frame, 0-99
    pub subframe: u8,
}

impl SmpteOffset {
    /// Wall-clock position in microseconds, counting frames at `fps`.
    pub const fn as_micros_with_override(&self, fps: SmpteFps) -> f64 {
        let seconds = self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32;
        let frames = self.frame as f64 + self.subframe as f64 / 100.;
        seconds as f64 * 1_000_000. + frames * 1_000_000. / fps.as_f64()
    }

    /// Wall-clock position in microseconds at the offset's own rate.
    pub const fn as_micros(&self) -> f64 {
        self.as_micros_with_override(self.fps)
    }

    /// Decode the five payload bytes.
    ///
    /// Frames are not checked against the rate; everything else is.
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        let &[rate_hour, minute, second, frame, subframe] = data else {
            return Err(SmpteError::Length(data.len()));
        };
        let Some(fps) = SmpteFps::from_offset_bits(rate_hour >> 5) else {
            return Err(SmpteError::TrackFrame(rate_hour >> 5));
        };

        let hour = rate_hour & 0b0001_1111;
        if hour > 23 {
            return Err(SmpteError::HourOffset(hour));
        }
        if minute > 59 {
            return Err(SmpteError::MinuteOffset(minute));
        }
        if second > 59 {
            return Err(SmpteError::SecondOffset(second));
        }
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// The five payload bytes
    pub const fn to_bytes(&self) -> [u8; 5] {
        [
            (self.fps.offset_bits() << 5) | (self.hour & 0b0001_1111),
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }
}

#[test]
fn offset_fields_and_bytes() {
    use pretty_assertions::assert_eq;

    // 25 fps, 02:30:15, frame 20, 50 hundredths
    let bytes = [0x22, 0x1E, 0x0F, 0x14, 0x32];
    let expected = SmpteOffset {
        fps: SmpteFps::TwentyFive,
        hour: 2,
        minute: 30,
        second: 15,
        frame: 20,
        subframe: 50,
    };
    assert_eq!(SmpteOffset::parse(&bytes), Ok(expected));
    assert_eq!(expected.to_bytes(), bytes);
    // 9015 s plus 20.5 frames of 40 ms
    assert_eq!(expected.as_micros(), 9_015_820_000.);
}

#[test]
fn offset_range_checks() {
    use pretty_assertions::assert_eq;

    let cases: [(&[u8], SmpteError); 5] = [
        (&[0x18, 0, 0, 0, 0], SmpteError::HourOffset(24)),
        (&[0x00, 60, 0, 0, 0], SmpteError::MinuteOffset(60)),
        (&[0x00, 0, 61, 0, 0], SmpteError::SecondOffset(61)),
        (&[0x00, 0, 0, 0, 100], SmpteError::Subframe(100)),
        (&[0x00, 0, 0, 0], SmpteError::Length(4)),
    ];
    for (bytes, err) in cases {
        assert_eq!(SmpteOffset::parse(bytes), Err(err));
    }
}
