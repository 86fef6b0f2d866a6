use crate::{
    Channel, ChunkError, DataByte, Diagnostics, EncodeError,
    event::{ChannelVoiceMessage, Event, EventKind, EventType, VoiceEvent},
    file::MetaType,
    file::builder::chunk::RawTrackChunk,
    note::{self, Note},
    reader::{ReadResult, Reader, inv_data},
};
use alloc::{borrow::Cow, vec::Vec};

/// Release velocity written by [`Track::add_note`]
pub const DEFAULT_RELEASE_VELOCITY: u8 = 0x40;

#[doc = r#"
An ordered list of events at absolute ticks.

Events are kept in insertion order; [`Track::pack`] sorts a copy by time
(events sharing a tick keep their insertion order) and derives the
delta-times from it.

# Example
```rust
# use smfkit::prelude::*;
let mut track = Track::default();
track
    .add_event(Event::track_name(0, "Lead"))
    .add_note(0, 0, 60, 100, 480)
    .add_track_end(0);

let bytes = track.pack().unwrap();
assert_eq!(&bytes[..4], b"MTrk");

let parsed = Track::parse(&bytes).unwrap();
assert_eq!(parsed.name().as_deref(), Some("Lead"));
assert_eq!(parsed.max_time(), 480);
```
"#]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    events: Vec<Event>,
    diagnostics: Diagnostics,
}

impl Track {
    /// A track holding `events`
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Append one event. Nothing is reordered or deduplicated.
    pub fn add_event(&mut self, event: Event) -> &mut Self {
        self.events.push(event);
        self
    }

    /// Append several events.
    pub fn add_events(&mut self, events: impl IntoIterator<Item = Event>) -> &mut Self {
        self.events.extend(events);
        self
    }

    /// A note on at `at` and a note off `duration` ticks later, released at
    /// velocity 64.
    pub fn add_note(
        &mut self,
        at: u32,
        channel: u8,
        pitch: u8,
        velocity: u8,
        duration: u32,
    ) -> &mut Self {
        self.add_note_with_release(at, channel, pitch, velocity, DEFAULT_RELEASE_VELOCITY, duration)
    }

    /// [`Track::add_note`] with an explicit release velocity.
    ///
    /// Out of range numbers are clamped and recorded in
    /// [`Track::diagnostics`].
    pub fn add_note_with_release(
        &mut self,
        at: u32,
        channel: u8,
        pitch: u8,
        velocity: u8,
        release: u8,
        duration: u32,
    ) -> &mut Self {
        let channel = self.channel(channel);
        let note = self.data("note", pitch);
        let velocity = self.data("velocity", velocity);
        let release = self.data("release velocity", release);

        self.add_voice(at, channel, VoiceEvent::NoteOn { note, velocity });
        self.add_voice(
            at.saturating_add(duration),
            channel,
            VoiceEvent::NoteOff {
                note,
                velocity: release,
            },
        )
    }

    /// One note per pitch, all sharing a start, velocity and duration.
    pub fn add_chord(
        &mut self,
        at: u32,
        channel: u8,
        pitches: &[u8],
        velocity: u8,
        duration: u32,
    ) -> &mut Self {
        for &pitch in pitches {
            self.add_note(at, channel, pitch, velocity, duration);
        }
        self
    }

    /// A lone Note On. Like every `add_*` voice method here, clamped
    /// numbers are recorded in [`Track::diagnostics`]; the matching
    /// [`Event`] constructors only log them.
    pub fn add_note_on(&mut self, at: u32, channel: u8, pitch: u8, velocity: u8) -> &mut Self {
        let channel = self.channel(channel);
        let note = self.data("note", pitch);
        let velocity = self.data("velocity", velocity);
        self.add_voice(at, channel, VoiceEvent::NoteOn { note, velocity })
    }

    /// A lone Note Off
    pub fn add_note_off(&mut self, at: u32, channel: u8, pitch: u8, velocity: u8) -> &mut Self {
        let channel = self.channel(channel);
        let note = self.data("note", pitch);
        let velocity = self.data("velocity", velocity);
        self.add_voice(at, channel, VoiceEvent::NoteOff { note, velocity })
    }

    /// Polyphonic key pressure
    pub fn add_poly_aftertouch(
        &mut self,
        at: u32,
        channel: u8,
        pitch: u8,
        pressure: u8,
    ) -> &mut Self {
        let channel = self.channel(channel);
        let note = self.data("note", pitch);
        let pressure = self.data("pressure", pressure);
        self.add_voice(at, channel, VoiceEvent::PolyAfterTouch { note, pressure })
    }

    /// Control Change
    pub fn add_control_change(
        &mut self,
        at: u32,
        channel: u8,
        controller: u8,
        value: u8,
    ) -> &mut Self {
        let channel = self.channel(channel);
        let controller = self.data("controller", controller);
        let value = self.data("value", value);
        self.add_voice(at, channel, VoiceEvent::ControlChange { controller, value })
    }

    /// Program Change
    pub fn add_program_change(&mut self, at: u32, channel: u8, program: u8) -> &mut Self {
        let channel = self.channel(channel);
        let program = self.data("program", program);
        self.add_voice(at, channel, VoiceEvent::ProgramChange { program })
    }

    /// Channel pressure
    pub fn add_aftertouch(&mut self, at: u32, channel: u8, pressure: u8) -> &mut Self {
        let channel = self.channel(channel);
        let pressure = self.data("pressure", pressure);
        self.add_voice(at, channel, VoiceEvent::AfterTouch { pressure })
    }

    /// Pitch bend, `-8192..=8191`
    pub fn add_pitch_wheel(&mut self, at: u32, channel: u8, value: i16) -> &mut Self {
        let channel = self.channel(channel);
        let event = VoiceEvent::pitch_wheel(value).record(&mut self.diagnostics);
        self.add_voice(at, channel, event)
    }

    fn add_voice(&mut self, at: u32, channel: Channel, event: VoiceEvent) -> &mut Self {
        let msg = ChannelVoiceMessage::new(channel, event);
        self.add_event(Event::new(at, EventKind::ChannelVoice(msg)))
    }

    fn channel(&mut self, channel: u8) -> Channel {
        Channel::clamped(channel).record(&mut self.diagnostics)
    }

    fn data(&mut self, field: &'static str, value: u8) -> DataByte {
        DataByte::clamped(field, value).record(&mut self.diagnostics)
    }

    /// The first event of the given type, in insertion order.
    pub fn get_event(&self, kind: impl Into<EventType>) -> Option<&Event> {
        let kind = kind.into();
        self.events.iter().find(|e| e.event_type() == kind)
    }

    /// The first event of the given type, mutably.
    pub fn get_event_mut(&mut self, kind: impl Into<EventType>) -> Option<&mut Event> {
        let kind = kind.into();
        self.events.iter_mut().find(|e| e.event_type() == kind)
    }

    /// Remove every end-of-track event and append one at
    /// `max(self.max_time(), at)`.
    pub fn add_track_end(&mut self, at: u32) -> &mut Self {
        self.events.retain(|e| !e.is_track_end());
        let at = self.max_time().max(at);
        self.add_event(Event::track_end(at))
    }

    /// Keep only the events for which `f` returns true.
    pub fn retain(&mut self, f: impl FnMut(&Event) -> bool) {
        self.events.retain(f);
    }

    /// Events in insertion order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events in insertion order, mutably
    pub fn events_mut(&mut self) -> &mut [Event] {
        &mut self.events
    }

    /// Consume into the events
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if there are no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The latest tick of any event, 0 for an empty track
    pub fn max_time(&self) -> u32 {
        self.events.iter().map(Event::at).max().unwrap_or(0)
    }

    /// Text of the first track name event
    pub fn name(&self) -> Option<Cow<'_, str>> {
        self.get_event(MetaType::TrackName)?
            .as_meta()?
            .text()
    }

    /// Clamp warnings recorded by this track's convenience operations
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Clamp warnings, mutably (to clear them, say)
    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// The notes played by this track. See [`note::reconstruct`].
    pub fn notes(&self) -> Vec<Note> {
        note::reconstruct(&self.events)
    }

    /// The complete `MTrk` chunk.
    ///
    /// The track itself is left untouched. Channel events always carry their
    /// status byte.
    ///
    /// # Errors
    /// - [`EncodeError::TrackEndCount`] unless there is exactly one end-of-track
    ///   event (see [`Track::add_track_end`])
    /// - [`EncodeError::TrackEndNotLast`] if any event sorts after it
    /// - [`EncodeError::Vlq`] for a delta-time or payload length past 28 bits
    pub fn pack(&self) -> Result<Vec<u8>, EncodeError> {
        let mut sorted: Vec<&Event> = self.events.iter().collect();
        sorted.sort_by_key(|e| e.at());

        let ends = sorted.iter().filter(|e| e.is_track_end()).count();
        if ends != 1 {
            return Err(EncodeError::TrackEndCount(ends));
        }
        match sorted.last() {
            Some(last) if !last.is_track_end() => {
                let end = sorted.iter().find(|e| e.is_track_end()).map_or(0, |e| e.at());
                return Err(EncodeError::TrackEndNotLast {
                    end,
                    at: last.at(),
                });
            }
            _ => {}
        }

        let mut body = Vec::new();
        let mut previous = 0;
        for event in sorted {
            event.write(event.at() - previous, &mut body)?;
            previous = event.at();
        }

        let len = u32::try_from(body.len()).map_err(|_| EncodeError::ChunkTooLarge(body.len()))?;
        let mut out = Vec::with_capacity(body.len() + 8);
        out.extend_from_slice(&RawTrackChunk::TAG);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Parse a complete `MTrk` chunk, tag and length included.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let tag: [u8; 4] = reader.read_exact_size()?;
        if tag != RawTrackChunk::TAG {
            return Err(inv_data(
                &reader,
                ChunkError::UnexpectedTag {
                    expected: RawTrackChunk::TAG,
                    found: tag,
                },
            ));
        }
        let len = reader.read_u32_be()? as usize;
        let base = reader.buffer_position();
        Self::parse_events_at(reader.read_slice(len)?, base)
    }

    /// Parse a bare chunk body: the `(delta, event)` pairs.
    pub fn parse_events(body: &[u8]) -> ReadResult<Self> {
        Self::parse_events_at(body, 0)
    }

    /// Parsing stops at the first end-of-track event. Running status does not
    /// carry over from any other track.
    pub(crate) fn parse_events_at(body: &[u8], base: usize) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice_at(body, base);
        let mut at = 0;
        let mut running_status = None;
        let mut events = Vec::new();

        while !reader.is_at_end() {
            let event = Event::read(&mut reader, &mut at, &mut running_status)?;
            let end = event.is_track_end();
            events.push(event);
            if end {
                break;
            }
        }

        #[cfg(feature = "tracing")]
        if !reader.is_at_end() {
            tracing::debug!(
                trailing = reader.remaining(),
                "ignoring bytes after end of track"
            );
        } else if !events.last().is_some_and(Event::is_track_end) {
            tracing::debug!("track chunk has no end of track event");
        }

        Ok(Self::new(events))
    }
}

#[test]
fn pack_derives_deltas() {
    use pretty_assertions::assert_eq;

    let mut track = Track::default();
    track
        .add_event(Event::note_off(100, 0, 60, 64))
        .add_event(Event::note_on(0, 0, 60, 100))
        .add_track_end(0);

    assert_eq!(
        track.pack().unwrap(),
        [
            b'M', b'T', b'r', b'k', 0, 0, 0, 12, //
            0x00, 0x90, 0x3C, 0x64, //
            0x64, 0x80, 0x3C, 0x40, //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
    // packing sorts a copy
    assert_eq!(track.events()[0].at(), 100);
}

#[test]
fn add_track_end_replaces() {
    let mut track = Track::default();
    track
        .add_event(Event::track_end(5))
        .add_note(10, 0, 60, 100, 20)
        .add_event(Event::track_end(3));
    track.add_track_end(0);

    let ends: Vec<_> = track.events().iter().filter(|e| e.is_track_end()).collect();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].at(), 30);

    track.add_track_end(100);
    assert_eq!(track.max_time(), 100);
    assert!(track.events().last().unwrap().is_track_end());
}

#[test]
fn pack_requires_a_final_track_end() {
    let mut track = Track::default();
    track.add_note(0, 0, 60, 100, 10);
    assert_eq!(track.pack(), Err(EncodeError::TrackEndCount(0)));

    track.add_event(Event::track_end(5));
    assert_eq!(
        track.pack(),
        Err(EncodeError::TrackEndNotLast { end: 5, at: 10 })
    );

    track.add_event(Event::track_end(20));
    assert_eq!(track.pack(), Err(EncodeError::TrackEndCount(2)));
}

#[test]
fn convenience_operations_record_clamps() {
    let mut track = Track::default();
    track.add_note(0, 17, 200, 100, 10);
    assert_eq!(track.diagnostics().len(), 2);
    assert_eq!(track.diagnostics().warnings()[0].field, "channel");
    assert_eq!(track.diagnostics().warnings()[1].clamped, 127);
}

#[test]
fn voice_methods_record_clamps() {
    use pretty_assertions::assert_eq;

    let mut track = Track::default();
    track
        .add_note_on(0, 20, 200, 100)
        .add_control_change(0, 0, 7, 130)
        .add_pitch_wheel(0, 0, 9000)
        .add_program_change(0, 3, 5);

    let fields: Vec<&str> = track.diagnostics().warnings().iter().map(|w| w.field).collect();
    assert_eq!(fields, ["channel", "note", "value", "pitch wheel"]);
    assert_eq!(track.events()[0], Event::note_on(0, 15, 127, 100));

    // the free constructors log but have no collection to record into
    track.diagnostics_mut().clear();
    track.add_event(Event::note_on(0, 20, 200, 100));
    assert!(track.diagnostics().is_empty());
}
