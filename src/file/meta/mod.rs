#![doc = r#"
Meta events (`FF type length data`)

Meta events never reach a synthesizer; they describe the sequence: names,
lyrics, tempo, meter, key and the end of each track.
"#]

mod key_signature;
pub use key_signature::*;

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

mod time_signature;
pub use time_signature::*;

use crate::{
    Channel, DataByte, EncodeError, MetaError, ParseError,
    event::write_varlen_payload,
    reader::{ReadResult, Reader, inv_data},
};
use alloc::{borrow::Cow, string::String, vec::Vec};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The type byte following `FF`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MetaType {
    SequenceNumber = 0x00,
    Text = 0x01,
    Copyright = 0x02,
    TrackName = 0x03,
    InstrumentName = 0x04,
    Lyric = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ProgramName = 0x08,
    DeviceName = 0x09,
    ChannelPrefix = 0x20,
    MidiPort = 0x21,
    TrackEnd = 0x2F,
    Tempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

/// A meta event and its payload.
///
/// String variants hold raw bytes; files in the wild are not always UTF-8.
/// Use [`MetaEvent::text`] for a lossy string view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetaEvent {
    /// `FF 00 02`
    SequenceNumber(u16),
    /// `FF 01`
    Text(Vec<u8>),
    /// `FF 02`
    Copyright(Vec<u8>),
    /// `FF 03`, the track (or sequence) name
    TrackName(Vec<u8>),
    /// `FF 04`
    InstrumentName(Vec<u8>),
    /// `FF 05`
    Lyric(Vec<u8>),
    /// `FF 06`
    Marker(Vec<u8>),
    /// `FF 07`
    CuePoint(Vec<u8>),
    /// `FF 08`
    ProgramName(Vec<u8>),
    /// `FF 09`
    DeviceName(Vec<u8>),
    /// `FF 20 01`, the channel following sysex and meta events refer to
    ChannelPrefix(Channel),
    /// `FF 21 01`
    MidiPort(DataByte),
    /// `FF 2F 00`
    TrackEnd,
    /// `FF 51 03`
    Tempo(Tempo),
    /// `FF 54 05`
    SmpteOffset(SmpteOffset),
    /// `FF 58 04`
    TimeSignature(TimeSignature),
    /// `FF 59 02`
    KeySignature(KeySignature),
    /// `FF 7F`, raw bytes for one vendor's sequencer
    SequencerSpecific(Vec<u8>),
}

impl MetaEvent {
    /// A track name
    pub fn track_name(name: &str) -> Self {
        Self::TrackName(name.as_bytes().to_vec())
    }

    /// A free-form text event
    pub fn text_event(text: &str) -> Self {
        Self::Text(text.as_bytes().to_vec())
    }

    /// The type byte of this event
    pub const fn meta_type(&self) -> MetaType {
        match self {
            Self::SequenceNumber(_) => MetaType::SequenceNumber,
            Self::Text(_) => MetaType::Text,
            Self::Copyright(_) => MetaType::Copyright,
            Self::TrackName(_) => MetaType::TrackName,
            Self::InstrumentName(_) => MetaType::InstrumentName,
            Self::Lyric(_) => MetaType::Lyric,
            Self::Marker(_) => MetaType::Marker,
            Self::CuePoint(_) => MetaType::CuePoint,
            Self::ProgramName(_) => MetaType::ProgramName,
            Self::DeviceName(_) => MetaType::DeviceName,
            Self::ChannelPrefix(_) => MetaType::ChannelPrefix,
            Self::MidiPort(_) => MetaType::MidiPort,
            Self::TrackEnd => MetaType::TrackEnd,
            Self::Tempo(_) => MetaType::Tempo,
            Self::SmpteOffset(_) => MetaType::SmpteOffset,
            Self::TimeSignature(_) => MetaType::TimeSignature,
            Self::KeySignature(_) => MetaType::KeySignature,
            Self::SequencerSpecific(_) => MetaType::SequencerSpecific,
        }
    }

    /// Lossy UTF-8 view of the string variants, `None` for the others.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(b)
            | Self::Copyright(b)
            | Self::TrackName(b)
            | Self::InstrumentName(b)
            | Self::Lyric(b)
            | Self::Marker(b)
            | Self::CuePoint(b)
            | Self::ProgramName(b)
            | Self::DeviceName(b) => Some(String::from_utf8_lossy(b)),
            _ => None,
        }
    }

    /// The bytes after the length prefix.
    pub fn payload(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Text(b)
            | Self::Copyright(b)
            | Self::TrackName(b)
            | Self::InstrumentName(b)
            | Self::Lyric(b)
            | Self::Marker(b)
            | Self::CuePoint(b)
            | Self::ProgramName(b)
            | Self::DeviceName(b)
            | Self::SequencerSpecific(b) => Cow::Borrowed(b),
            Self::SequenceNumber(n) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::ChannelPrefix(c) => Cow::Owned(alloc::vec![c.index()]),
            Self::MidiPort(p) => Cow::Owned(alloc::vec![p.value()]),
            Self::TrackEnd => Cow::Borrowed(&[]),
            Self::Tempo(t) => Cow::Owned(t.to_bytes().to_vec()),
            Self::SmpteOffset(o) => Cow::Owned(o.to_bytes().to_vec()),
            Self::TimeSignature(t) => Cow::Owned(t.to_bytes().to_vec()),
            Self::KeySignature(k) => Cow::Owned(k.to_bytes().to_vec()),
        }
    }

    /// `FF type VLQ(length) payload`
    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.push(0xFF);
        out.push(self.meta_type().into());
        write_varlen_payload(&self.payload(), out)
    }

    /// Reads the type byte, length and payload following an `FF` status.
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let type_byte = reader.read_u8()?;
        let kind = MetaType::try_from(type_byte)
            .map_err(|e| inv_data(reader, MetaError::UnknownType(e.number)))?;
        let data = reader.read_varlen_slice()?;
        Self::from_data(kind, data).map_err(|e| inv_data(reader, e))
    }

    fn from_data(kind: MetaType, data: &[u8]) -> Result<Self, ParseError> {
        let event = match kind {
            MetaType::SequenceNumber => Self::SequenceNumber(u16::from_be_bytes(fixed(kind, data)?)),
            MetaType::Text => Self::Text(data.to_vec()),
            MetaType::Copyright => Self::Copyright(data.to_vec()),
            MetaType::TrackName => Self::TrackName(data.to_vec()),
            MetaType::InstrumentName => Self::InstrumentName(data.to_vec()),
            MetaType::Lyric => Self::Lyric(data.to_vec()),
            MetaType::Marker => Self::Marker(data.to_vec()),
            MetaType::CuePoint => Self::CuePoint(data.to_vec()),
            MetaType::ProgramName => Self::ProgramName(data.to_vec()),
            MetaType::DeviceName => Self::DeviceName(data.to_vec()),
            MetaType::ChannelPrefix => {
                let [channel] = fixed(kind, data)?;
                Self::ChannelPrefix(Channel::clamped(channel).into_inner())
            }
            MetaType::MidiPort => {
                let [port] = fixed(kind, data)?;
                Self::MidiPort(DataByte::clamped("midi port", port).into_inner())
            }
            MetaType::TrackEnd => {
                fixed::<0>(kind, data)?;
                Self::TrackEnd
            }
            MetaType::Tempo => {
                Self::Tempo(Tempo::new_from_bytes(&fixed(kind, data)?).into_inner())
            }
            MetaType::SmpteOffset => Self::SmpteOffset(SmpteOffset::parse(data)?),
            MetaType::TimeSignature => {
                Self::TimeSignature(TimeSignature::from_bytes(fixed(kind, data)?))
            }
            MetaType::KeySignature => {
                Self::KeySignature(KeySignature::from_bytes(fixed(kind, data)?).into_inner())
            }
            MetaType::SequencerSpecific => Self::SequencerSpecific(data.to_vec()),
        };
        Ok(event)
    }
}

fn fixed<const N: usize>(kind: MetaType, data: &[u8]) -> Result<[u8; N], MetaError> {
    data.try_into().map_err(|_| MetaError::Length {
        kind: kind.into(),
        expected: N,
        found: data.len(),
    })
}

#[test]
fn track_end_is_three_bytes() {
    let mut out = Vec::new();
    MetaEvent::TrackEnd.write(&mut out).unwrap();
    assert_eq!(out, [0xFF, 0x2F, 0x00]);
}

#[test]
fn tempo_wire_form() {
    use pretty_assertions::assert_eq;

    let mut out = Vec::new();
    MetaEvent::Tempo(Tempo::default()).write(&mut out).unwrap();
    assert_eq!(out, [0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);

    let mut reader = Reader::from_byte_slice(&out[1..]);
    assert_eq!(
        MetaEvent::read(&mut reader).unwrap(),
        MetaEvent::Tempo(Tempo::default())
    );
    assert!(reader.is_at_end());
}

#[test]
fn unknown_meta_type_fails() {
    let bytes = [0x60, 0x01, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = MetaEvent::read(&mut reader).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Meta(MetaError::UnknownType(0x60)))
    );
}

#[test]
fn fixed_size_mismatch_fails() {
    let bytes = [0x51, 0x02, 0x07, 0xA1];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = MetaEvent::read(&mut reader).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Meta(MetaError::Length {
            kind: 0x51,
            expected: 3,
            found: 2
        }))
    );
}

#[test]
fn text_is_lossy() {
    let name = MetaEvent::TrackName(alloc::vec![b'B', b'a', 0xFF, b's']);
    assert_eq!(name.text().unwrap(), "Ba\u{FFFD}s");
    assert_eq!(MetaEvent::TrackEnd.text(), None);
}

#[test]
fn zero_tempo_is_read_as_one_microsecond() {
    let bytes = [0x51, 0x03, 0x00, 0x00, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    let meta = MetaEvent::read(&mut reader).unwrap();
    assert_eq!(meta, MetaEvent::Tempo(Tempo::from_micros(1).value));
}
