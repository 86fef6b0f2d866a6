#![doc = r#"
Rebuilding notes from on/off pairs

A note on the wire is two events: a Note On and, some ticks later, a Note Off
(or a Note On with velocity 0) for the same pitch and channel. [`reconstruct`]
pairs them back up.

Overlapping notes of one pitch on one channel close first-in, first-out: each
off ends the **oldest** note still sounding.

```rust
# use smfkit::prelude::*;
let mut track = Track::default();
track.add_event(Event::note_on(0, 0, 60, 100));
track.add_event(Event::note_on(10, 0, 60, 90));
track.add_event(Event::note_off(15, 0, 60, 0));
track.add_event(Event::note_on(30, 0, 60, 0));

let notes = track.notes();
assert_eq!(notes[0].at(), 0);
assert_eq!(notes[0].duration(), 15);
assert_eq!(notes[1].at(), 10);
assert_eq!(notes[1].duration(), 20);
```
"#]

use crate::{Channel, DataByte, event::Event, event::VoiceEvent};
use alloc::{
    collections::{BTreeMap, VecDeque},
    vec::Vec,
};

/// A sounding note: where it starts, what it plays, how long it lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    channel: Channel,
    at: u32,
    pitch: DataByte,
    velocity: DataByte,
    duration: u32,
}

impl Note {
    /// Create a new note
    pub const fn new(
        channel: Channel,
        at: u32,
        pitch: DataByte,
        velocity: DataByte,
        duration: u32,
    ) -> Self {
        Self {
            channel,
            at,
            pitch,
            velocity,
            duration,
        }
    }

    /// Channel of the note
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Tick of the Note On
    pub const fn at(&self) -> u32 {
        self.at
    }

    /// Key number
    pub const fn pitch(&self) -> DataByte {
        self.pitch
    }

    /// Velocity of the Note On
    pub const fn velocity(&self) -> DataByte {
        self.velocity
    }

    /// Ticks between Note On and Note Off
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Tick of the Note Off
    pub const fn end(&self) -> u32 {
        self.at.saturating_add(self.duration)
    }
}

struct Open {
    at: u32,
    velocity: DataByte,
}

/// Pair the note events of `events` into [`Note`]s.
///
/// Events are visited in time order; events sharing a tick keep their order
/// in the slice. Notes come out in the order they close. Offs with nothing
/// open are ignored, and notes never closed are dropped.
pub fn reconstruct<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<Note> {
    let mut sorted: Vec<&Event> = events.into_iter().collect();
    sorted.sort_by_key(|e| e.at());

    let mut open: BTreeMap<(DataByte, Channel), VecDeque<Open>> = BTreeMap::new();
    let mut notes = Vec::new();

    for event in sorted {
        let Some(msg) = event.as_voice() else {
            continue;
        };
        let (note, velocity) = match *msg.event() {
            VoiceEvent::NoteOn { note, velocity } | VoiceEvent::NoteOff { note, velocity } => {
                (note, velocity)
            }
            _ => continue,
        };
        let key = (note, msg.channel());

        if msg.is_note_on() {
            open.entry(key).or_default().push_back(Open {
                at: event.at(),
                velocity,
            });
            continue;
        }

        let Some(on) = open.get_mut(&key).and_then(VecDeque::pop_front) else {
            continue;
        };
        notes.push(Note::new(
            msg.channel(),
            on.at,
            note,
            on.velocity,
            event.at() - on.at,
        ));
    }

    #[cfg(feature = "tracing")]
    {
        let unterminated: usize = open.values().map(VecDeque::len).sum();
        if unterminated > 0 {
            tracing::debug!(unterminated, "dropping notes with no matching note off");
        }
    }

    notes
}

#[test]
fn overlapping_notes_close_oldest_first() {
    use pretty_assertions::assert_eq;

    let events = [
        Event::note_on(1000, 0, 60, 100),
        Event::note_off(6000, 0, 60, 64),
        Event::note_on(2000, 0, 60, 100),
        Event::note_off(4001, 0, 60, 64),
        Event::note_on(3000, 0, 60, 100),
        Event::note_off(5002, 0, 60, 64),
    ];

    let notes = reconstruct(&events);
    let got: Vec<(u32, u32)> = notes.iter().map(|n| (n.at(), n.duration())).collect();
    assert_eq!(got, [(1000, 3001), (2000, 3002), (3000, 3000)]);
}

#[test]
fn channels_and_pitches_are_separate() {
    let events = [
        Event::note_on(0, 0, 60, 100),
        Event::note_on(0, 1, 60, 100),
        Event::note_on(0, 0, 62, 100),
        Event::note_off(5, 1, 60, 0),
        Event::note_off(7, 0, 62, 0),
        Event::note_off(9, 0, 60, 0),
    ];
    let notes = reconstruct(&events);
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0].channel(), Channel::Two);
    assert_eq!(notes[0].duration(), 5);
    assert_eq!(notes[1].pitch().value(), 62);
    assert_eq!(notes[2].end(), 9);
}

#[test]
fn orphans_and_open_notes_are_dropped() {
    let events = [
        Event::note_off(0, 0, 40, 0),
        Event::note_on(10, 0, 41, 80),
        Event::control_change(12, 0, 7, 100),
    ];
    assert!(reconstruct(&events).is_empty());
}
