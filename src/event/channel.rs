use crate::{
    Channel, Clamped, DataByte, TrackError,
    diagnostics::clamp,
    reader::{ReadResult, Reader, inv_data},
};
use alloc::vec::Vec;

/// Pitch wheel values are signed around this centre on the wire.
pub const PITCH_WHEEL_CENTER: i16 = 0x2000;

#[doc = r#"
The body of a channel voice message, without its channel.

Each variant maps to one status nibble:

| Nibble | Variant | Data bytes |
|---|---|---|
| `8` | [`NoteOff`](VoiceEvent::NoteOff) | note, velocity |
| `9` | [`NoteOn`](VoiceEvent::NoteOn) | note, velocity |
| `A` | [`PolyAfterTouch`](VoiceEvent::PolyAfterTouch) | note, pressure |
| `B` | [`ControlChange`](VoiceEvent::ControlChange) | controller, value |
| `C` | [`ProgramChange`](VoiceEvent::ProgramChange) | program |
| `D` | [`AfterTouch`](VoiceEvent::AfterTouch) | pressure |
| `E` | [`PitchWheel`](VoiceEvent::PitchWheel) | lsb, msb |
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceEvent {
    /// Release a note
    NoteOff {
        /// The key
        note: DataByte,
        /// Release velocity
        velocity: DataByte,
    },
    /// Strike a note. A velocity of zero releases it instead.
    NoteOn {
        /// The key
        note: DataByte,
        /// Strike velocity
        velocity: DataByte,
    },
    /// Per-key pressure
    PolyAfterTouch {
        /// The key
        note: DataByte,
        /// Pressure
        pressure: DataByte,
    },
    /// Controller change
    ControlChange {
        /// Controller number
        controller: DataByte,
        /// New value
        value: DataByte,
    },
    /// Program (instrument) change
    ProgramChange {
        /// Program number
        program: DataByte,
    },
    /// Channel-wide pressure
    AfterTouch {
        /// Pressure
        pressure: DataByte,
    },
    /// Pitch bend, `-8192..=8191` with 0 as no bend
    PitchWheel {
        /// Signed bend
        value: i16,
    },
}

impl VoiceEvent {
    /// A pitch wheel event, clamped to `-8192..=8191`.
    pub fn pitch_wheel(value: i16) -> Clamped<Self> {
        clamp(
            "pitch wheel",
            value as i64,
            -(PITCH_WHEEL_CENTER as i64),
            PITCH_WHEEL_CENTER as i64 - 1,
        )
        .map(|v| Self::PitchWheel { value: v as i16 })
    }

    /// The high nibble of the status byte
    pub const fn status_nibble(&self) -> u8 {
        match self {
            Self::NoteOff { .. } => 0x8,
            Self::NoteOn { .. } => 0x9,
            Self::PolyAfterTouch { .. } => 0xA,
            Self::ControlChange { .. } => 0xB,
            Self::ProgramChange { .. } => 0xC,
            Self::AfterTouch { .. } => 0xD,
            Self::PitchWheel { .. } => 0xE,
        }
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        match *self {
            Self::NoteOff { note, velocity } | Self::NoteOn { note, velocity } => {
                out.extend_from_slice(&[note.value(), velocity.value()])
            }
            Self::PolyAfterTouch { note, pressure } => {
                out.extend_from_slice(&[note.value(), pressure.value()])
            }
            Self::ControlChange { controller, value } => {
                out.extend_from_slice(&[controller.value(), value.value()])
            }
            Self::ProgramChange { program } => out.push(program.value()),
            Self::AfterTouch { pressure } => out.push(pressure.value()),
            Self::PitchWheel { value } => {
                let wire = (value as i32 + PITCH_WHEEL_CENTER as i32).clamp(0, 0x3FFF) as u16;
                out.extend_from_slice(&[(wire & 0x7F) as u8, (wire >> 7) as u8]);
            }
        }
    }

    fn read(nibble: u8, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let event = match nibble {
            0x8 => Self::NoteOff {
                note: read_data(reader)?,
                velocity: read_data(reader)?,
            },
            0x9 => Self::NoteOn {
                note: read_data(reader)?,
                velocity: read_data(reader)?,
            },
            0xA => Self::PolyAfterTouch {
                note: read_data(reader)?,
                pressure: read_data(reader)?,
            },
            0xB => Self::ControlChange {
                controller: read_data(reader)?,
                value: read_data(reader)?,
            },
            0xC => Self::ProgramChange {
                program: read_data(reader)?,
            },
            0xD => Self::AfterTouch {
                pressure: read_data(reader)?,
            },
            0xE => {
                let lsb = read_data(reader)?.value() as i16;
                let msb = read_data(reader)?.value() as i16;
                Self::PitchWheel {
                    value: ((msb << 7) | lsb) - PITCH_WHEEL_CENTER,
                }
            }
            _ => {
                return Err(inv_data(
                    reader,
                    TrackError::UnknownStatus(nibble << 4),
                ));
            }
        };
        Ok(event)
    }
}

fn read_data(reader: &mut Reader<'_>) -> ReadResult<DataByte> {
    let byte = reader.peek_u8()?;
    let data = DataByte::new(byte).map_err(|e| inv_data(reader, e))?;
    reader.read_u8()?;
    Ok(data)
}

/// A voice event bound to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelVoiceMessage {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Bind `event` to `channel`
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// The channel
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The event
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }

    /// `kind << 4 | channel`
    pub fn status(&self) -> u8 {
        (self.event.status_nibble() << 4) | self.channel.index()
    }

    /// True for a NoteOn with a non-zero velocity.
    pub fn is_note_on(&self) -> bool {
        matches!(self.event, VoiceEvent::NoteOn { velocity, .. } if velocity.value() > 0)
    }

    /// True for a NoteOff, or a NoteOn with zero velocity.
    pub fn is_note_off(&self) -> bool {
        match self.event {
            VoiceEvent::NoteOff { .. } => true,
            VoiceEvent::NoteOn { velocity, .. } => velocity.value() == 0,
            _ => false,
        }
    }

    /// Status byte followed by the data bytes.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.push(self.status());
        self.event.write_data(out);
    }

    /// Read the data bytes for an already-known `status`.
    pub(crate) fn read(status: u8, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let event = VoiceEvent::read(status >> 4, reader)?;
        Ok(Self::new(Channel::from_status(status), event))
    }
}

#[test]
fn pitch_wheel_wire_bias() {
    use pretty_assertions::assert_eq;

    let centre = ChannelVoiceMessage::new(Channel::One, VoiceEvent::PitchWheel { value: 0 });
    let mut out = Vec::new();
    centre.write(&mut out);
    assert_eq!(out, [0xE0, 0x00, 0x40]);

    let lowest = ChannelVoiceMessage::new(Channel::Two, VoiceEvent::PitchWheel { value: -8192 });
    out.clear();
    lowest.write(&mut out);
    assert_eq!(out, [0xE1, 0x00, 0x00]);

    let highest = ChannelVoiceMessage::new(Channel::Three, VoiceEvent::PitchWheel { value: 8191 });
    out.clear();
    highest.write(&mut out);
    assert_eq!(out, [0xE2, 0x7F, 0x7F]);

    let mut reader = Reader::from_byte_slice(&out[1..]);
    let read = ChannelVoiceMessage::read(0xE2, &mut reader).unwrap();
    assert_eq!(read, highest);
}

#[test]
fn pitch_wheel_clamps() {
    let clamped = VoiceEvent::pitch_wheel(9000);
    assert_eq!(clamped.value, VoiceEvent::PitchWheel { value: 8191 });
    assert!(clamped.was_clamped());
}

#[test]
fn data_byte_with_leading_bit_is_rejected() {
    use crate::ParseError;

    let bytes = [0x3C, 0x90];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = ChannelVoiceMessage::read(0x90, &mut reader).unwrap_err();
    assert_eq!(err.position(), 1);
    assert_eq!(err.parse_error(), Some(&ParseError::InvalidDataByte(0x90)));
}
