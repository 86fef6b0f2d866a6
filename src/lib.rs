#![doc = r#"
A byte-exact codec for the Standard MIDI File (SMF) format.

`smfkit` turns absolute-tick events into the bytes of a `.mid` file and back.
It is meant to sit underneath generative tooling: you place events at
absolute ticks, and the codec derives delta-times, chunk lengths and
track terminators for you.

# Overview

```text
Event ──► Track ──► MidiFile ──► pack() ──► bytes
                                   ▲
bytes ──► chunks ──► Track::parse ─┘──► notes()
```

- [`vlq`]: MIDI's 7-bit variable-length integers
- [`event`]: the closed set of wire events ([`Event`](event::Event))
- [`file`]: [`Track`](file::Track), [`MidiFile`](file::MidiFile) and the meta events
- [`note`]: rebuilding `(pitch, velocity, duration)` notes from on/off pairs

# Example

```rust
use smfkit::prelude::*;

let mut file = MidiFile::default();
file.set_bpm(90.);
file.set_time_signature(6, 8).unwrap();

let start = file.mbt_to_ticks(2, 1, 0);
let length = file.beats_to_ticks(1.5);

let piano = file.add_track(Some("Piano")).unwrap();
piano.add_chord(start, 0, &[60, 64, 67], 96, length);

let bytes = file.pack().unwrap();
let parsed = MidiFile::parse(&bytes).unwrap();

assert_eq!(parsed.notes(1).unwrap().len(), 3);
```

# Errors

Values outside their wire range (a velocity of 200, a channel of 20) are
clamped and recorded as [`RangeWarning`]s; structural problems (an unknown
status byte, a duplicate track name) are returned as typed errors.
"#]
#![no_std]
#![warn(missing_docs)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod byte;
pub use byte::*;

mod diagnostics;
pub use diagnostics::*;

mod error;
pub use error::*;

pub mod event;

pub mod file;

mod micros;
pub use micros::*;

pub mod note;

pub mod reader;

pub mod vlq;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        Channel, Clamped, DataByte, Diagnostics, RangeWarning, UMicros,
        error::*,
        event::{ChannelVoiceMessage, Event, EventKind, EventType, VoiceEvent},
        file::{
            FormatType, Header, KeySignature, MetaEvent, MetaType, MidiFile, SmpteFps,
            SmpteHeader, SmpteOffset, Tempo, TicksPerQuarterNote, TimeSignature, Timing, Track,
        },
        note::Note,
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
    };
}
