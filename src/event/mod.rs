#![doc = r#"
Events placed at absolute ticks

An [`Event`] is one of three wire categories, each at an absolute tick:

```text
                    |-------|
                    | Event |
                    |-------|
                 /      |      \
|---------------|  |-------|  |------|
| Channel Voice |  | SysEx |  | Meta |
|---------------|  |-------|  |------|
```

Delta-times are not stored. They are derived from absolute ticks when a
[`Track`](crate::file::Track) is packed, and accumulated back into absolute
ticks when one is parsed.
"#]

mod channel;
pub use channel::*;

use crate::{
    Channel, DataByte, EncodeError, TrackError,
    file::{KeySignature, MetaEvent, MetaType, Tempo, TimeSignature},
    reader::{ReadResult, Reader, inv_data},
    vlq,
};
use alloc::vec::Vec;

/// What an event is, with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A message for one channel
    ChannelVoice(ChannelVoiceMessage),
    /// `F0 len data`: a complete system exclusive message
    SysEx(Vec<u8>),
    /// `F7 len data`: a sysex continuation or arbitrary escaped bytes
    Escape(Vec<u8>),
    /// `FF type len data`
    Meta(MetaEvent),
}

/// The fieldless discriminant of an [`EventKind`], used for lookups.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    NoteOff,
    NoteOn,
    PolyAfterTouch,
    ControlChange,
    ProgramChange,
    AfterTouch,
    PitchWheel,
    SysEx,
    Escape,
    Meta(MetaType),
}

impl From<MetaType> for EventType {
    fn from(value: MetaType) -> Self {
        Self::Meta(value)
    }
}

#[doc = r#"
An event at an absolute tick.

Constructors taking raw numbers clamp them to their wire range and log
the clamp; they never fail. To keep the warnings, build through the
`add_*` methods of [`Track`](crate::file::Track), which record them in the
track's [`Diagnostics`](crate::Diagnostics).

# Example
```rust
# use smfkit::prelude::*;
let on = Event::note_on(480, 0, 60, 100);
assert_eq!(on.at(), 480);
assert_eq!(on.event_type(), EventType::NoteOn);

let clamped = Event::note_on(0, 0, 200, 100);
let EventKind::ChannelVoice(msg) = clamped.kind() else { panic!() };
assert_eq!(*msg.event(), VoiceEvent::NoteOn {
    note: DataByte::new(127).unwrap(),
    velocity: DataByte::new(100).unwrap(),
});
```
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    at: u32,
    kind: EventKind,
}

impl Event {
    /// An event of `kind` at tick `at`
    pub const fn new(at: u32, kind: EventKind) -> Self {
        Self { at, kind }
    }

    /// A channel voice event
    pub fn voice(at: u32, channel: u8, event: VoiceEvent) -> Self {
        let channel = Channel::clamped(channel).into_inner();
        Self::new(
            at,
            EventKind::ChannelVoice(ChannelVoiceMessage::new(channel, event)),
        )
    }

    /// Note On
    pub fn note_on(at: u32, channel: u8, note: u8, velocity: u8) -> Self {
        Self::voice(
            at,
            channel,
            VoiceEvent::NoteOn {
                note: DataByte::clamped("note", note).into_inner(),
                velocity: DataByte::clamped("velocity", velocity).into_inner(),
            },
        )
    }

    /// Note Off
    pub fn note_off(at: u32, channel: u8, note: u8, velocity: u8) -> Self {
        Self::voice(
            at,
            channel,
            VoiceEvent::NoteOff {
                note: DataByte::clamped("note", note).into_inner(),
                velocity: DataByte::clamped("velocity", velocity).into_inner(),
            },
        )
    }

    /// Polyphonic key pressure
    pub fn poly_aftertouch(at: u32, channel: u8, note: u8, pressure: u8) -> Self {
        Self::voice(
            at,
            channel,
            VoiceEvent::PolyAfterTouch {
                note: DataByte::clamped("note", note).into_inner(),
                pressure: DataByte::clamped("pressure", pressure).into_inner(),
            },
        )
    }

    /// Control Change
    pub fn control_change(at: u32, channel: u8, controller: u8, value: u8) -> Self {
        Self::voice(
            at,
            channel,
            VoiceEvent::ControlChange {
                controller: DataByte::clamped("controller", controller).into_inner(),
                value: DataByte::clamped("value", value).into_inner(),
            },
        )
    }

    /// Program Change
    pub fn program_change(at: u32, channel: u8, program: u8) -> Self {
        Self::voice(
            at,
            channel,
            VoiceEvent::ProgramChange {
                program: DataByte::clamped("program", program).into_inner(),
            },
        )
    }

    /// Channel pressure
    pub fn aftertouch(at: u32, channel: u8, pressure: u8) -> Self {
        Self::voice(
            at,
            channel,
            VoiceEvent::AfterTouch {
                pressure: DataByte::clamped("pressure", pressure).into_inner(),
            },
        )
    }

    /// Pitch bend, `-8192..=8191`
    pub fn pitch_wheel(at: u32, channel: u8, value: i16) -> Self {
        Self::voice(at, channel, VoiceEvent::pitch_wheel(value).into_inner())
    }

    /// `F0` system exclusive. `data` excludes the leading `F0`.
    pub fn sysex(at: u32, data: impl Into<Vec<u8>>) -> Self {
        Self::new(at, EventKind::SysEx(data.into()))
    }

    /// `F7` escape
    pub fn escape(at: u32, data: impl Into<Vec<u8>>) -> Self {
        Self::new(at, EventKind::Escape(data.into()))
    }

    /// A meta event
    pub const fn meta(at: u32, meta: MetaEvent) -> Self {
        Self::new(at, EventKind::Meta(meta))
    }

    /// Track name
    pub fn track_name(at: u32, name: &str) -> Self {
        Self::meta(at, MetaEvent::track_name(name))
    }

    /// Free-form text
    pub fn text(at: u32, text: &str) -> Self {
        Self::meta(at, MetaEvent::text_event(text))
    }

    /// Set tempo
    pub const fn tempo(at: u32, tempo: Tempo) -> Self {
        Self::meta(at, MetaEvent::Tempo(tempo))
    }

    /// Time signature
    pub const fn time_signature(at: u32, signature: TimeSignature) -> Self {
        Self::meta(at, MetaEvent::TimeSignature(signature))
    }

    /// Key signature
    pub const fn key_signature(at: u32, signature: KeySignature) -> Self {
        Self::meta(at, MetaEvent::KeySignature(signature))
    }

    /// End of track
    pub const fn track_end(at: u32) -> Self {
        Self::meta(at, MetaEvent::TrackEnd)
    }

    /// Absolute tick
    pub const fn at(&self) -> u32 {
        self.at
    }

    /// Move the event
    pub fn set_at(&mut self, at: u32) {
        self.at = at;
    }

    /// The payload
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The payload, mutably
    pub fn kind_mut(&mut self) -> &mut EventKind {
        &mut self.kind
    }

    /// Consume into the payload
    pub fn into_kind(self) -> EventKind {
        self.kind
    }

    /// The channel message, if this is one
    pub const fn as_voice(&self) -> Option<&ChannelVoiceMessage> {
        match &self.kind {
            EventKind::ChannelVoice(msg) => Some(msg),
            _ => None,
        }
    }

    /// The meta event, if this is one
    pub const fn as_meta(&self) -> Option<&MetaEvent> {
        match &self.kind {
            EventKind::Meta(meta) => Some(meta),
            _ => None,
        }
    }

    /// True for the end-of-track meta event
    pub const fn is_track_end(&self) -> bool {
        matches!(self.kind, EventKind::Meta(MetaEvent::TrackEnd))
    }

    /// The discriminant of this event
    pub const fn event_type(&self) -> EventType {
        match &self.kind {
            EventKind::ChannelVoice(msg) => match msg.event() {
                VoiceEvent::NoteOff { .. } => EventType::NoteOff,
                VoiceEvent::NoteOn { .. } => EventType::NoteOn,
                VoiceEvent::PolyAfterTouch { .. } => EventType::PolyAfterTouch,
                VoiceEvent::ControlChange { .. } => EventType::ControlChange,
                VoiceEvent::ProgramChange { .. } => EventType::ProgramChange,
                VoiceEvent::AfterTouch { .. } => EventType::AfterTouch,
                VoiceEvent::PitchWheel { .. } => EventType::PitchWheel,
            },
            EventKind::SysEx(_) => EventType::SysEx,
            EventKind::Escape(_) => EventType::Escape,
            EventKind::Meta(meta) => EventType::Meta(meta.meta_type()),
        }
    }

    /// Serialize as `VLQ(delta)` followed by the event bytes.
    ///
    /// Channel events always carry their status byte; the writer does not
    /// use running status.
    pub fn write(&self, delta: u32, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        vlq::encode_into(delta, out)?;
        match &self.kind {
            EventKind::ChannelVoice(msg) => {
                msg.write(out);
                Ok(())
            }
            EventKind::SysEx(data) => {
                out.push(0xF0);
                write_varlen_payload(data, out)
            }
            EventKind::Escape(data) => {
                out.push(0xF7);
                write_varlen_payload(data, out)
            }
            EventKind::Meta(meta) => meta.write(out),
        }
    }

    /// Read one event from a track body.
    ///
    /// `at` is the running absolute tick and is advanced by the event's
    /// delta. `running_status` holds the last channel status seen in this
    /// track; a data byte in status position reuses it.
    ///
    /// Sysex, escape and meta events leave `running_status` as it was, although
    /// SMF 1.0 has them cancel it.
    pub fn read(
        reader: &mut Reader<'_>,
        at: &mut u32,
        running_status: &mut Option<u8>,
    ) -> ReadResult<Self> {
        let delta = reader.read_vlq()?;
        *at = at.saturating_add(delta);

        let byte = reader.peek_u8()?;
        let status = if byte < 0x80 {
            running_status.ok_or_else(|| inv_data(reader, TrackError::MissingRunningStatus(byte)))?
        } else {
            reader.read_u8()?
        };

        let kind = match status {
            0x80..=0xEF => {
                *running_status = Some(status);
                EventKind::ChannelVoice(ChannelVoiceMessage::read(status, reader)?)
            }
            0xF0 => EventKind::SysEx(reader.read_varlen_slice()?.to_vec()),
            0xF7 => EventKind::Escape(reader.read_varlen_slice()?.to_vec()),
            0xFF => EventKind::Meta(MetaEvent::read(reader)?),
            other => return Err(inv_data(reader, TrackError::UnknownStatus(other))),
        };
        Ok(Self::new(*at, kind))
    }
}

/// `VLQ(len)` followed by `data`. Nothing is written if the length overflows.
pub(crate) fn write_varlen_payload(data: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let len = u32::try_from(data.len()).map_err(|_| crate::VlqError::Overflow(u32::MAX))?;
    vlq::encode_into(len, out)?;
    out.extend_from_slice(data);
    Ok(())
}

#[test]
fn channel_events_carry_status() {
    use pretty_assertions::assert_eq;

    let mut out = Vec::new();
    Event::note_on(0, 2, 60, 100).write(0, &mut out).unwrap();
    Event::note_off(96, 2, 60, 64).write(96, &mut out).unwrap();
    Event::program_change(96, 9, 5).write(0, &mut out).unwrap();
    assert_eq!(
        out,
        [0x00, 0x92, 0x3C, 0x64, 0x60, 0x82, 0x3C, 0x40, 0x00, 0xC9, 0x05]
    );
}

#[test]
fn sysex_and_escape_are_length_prefixed() {
    use pretty_assertions::assert_eq;

    let mut out = Vec::new();
    Event::sysex(0, [0x43, 0x12, 0x00, 0xF7]).write(0, &mut out).unwrap();
    Event::escape(0, [0xF8]).write(200, &mut out).unwrap();
    assert_eq!(
        out,
        [0x00, 0xF0, 0x04, 0x43, 0x12, 0x00, 0xF7, 0x81, 0x48, 0xF7, 0x01, 0xF8]
    );
}

#[test]
fn read_honours_running_status() {
    // note on, then two more note ons with the status omitted
    let bytes = [
        0x00, 0x90, 0x3C, 0x64, //
        0x10, 0x40, 0x64, //
        0x10, 0x43, 0x00,
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let mut at = 0;
    let mut running_status = None;

    let mut events = Vec::new();
    while !reader.is_at_end() {
        events.push(Event::read(&mut reader, &mut at, &mut running_status).unwrap());
    }

    assert_eq!(
        events,
        [
            Event::note_on(0, 0, 60, 100),
            Event::note_on(16, 0, 64, 100),
            Event::note_on(32, 0, 67, 0),
        ]
    );
}

#[test]
fn read_rejects_unknown_status() {
    let bytes = [0x00, 0xF4, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = Event::read(&mut reader, &mut 0, &mut None).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&crate::ParseError::Track(TrackError::UnknownStatus(0xF4)))
    );
}

#[test]
fn read_rejects_data_without_running_status() {
    let bytes = [0x00, 0x3C, 0x64];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = Event::read(&mut reader, &mut 0, &mut None).unwrap_err();
    assert_eq!(err.position(), 1);
    assert_eq!(
        err.parse_error(),
        Some(&crate::ParseError::Track(TrackError::MissingRunningStatus(
            0x3C
        )))
    );
}
