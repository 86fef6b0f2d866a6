#![doc = r#"
Rusty representation of a [`MidiFile`]

A file is a [`Header`] and a list of [`Track`]s. The first track doubles as
the metadata track: it carries the tempo, time signature and key signature
that the time conversions read.
"#]

/// Contains the [`MidiFileBuilder`](builder::MidiFileBuilder) and the chunk
/// framing it consumes.
pub mod builder;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod meta;
pub use meta::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::{
    Diagnostics, EncodeError, FileError, UMicros,
    event::{Event, EventKind, EventType},
    file::builder::MidiFileBuilder,
    note::Note,
    reader::{ReadResult, Reader, ReaderError},
};
use alloc::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

#[doc = r#"
A Standard MIDI File.

# Example
```rust
# use smfkit::prelude::*;
let mut file = MidiFile::default();
assert_eq!(file.tracks().len(), 1);
assert_eq!(file.bpm(), 120.);

file.add_track(None).unwrap().add_note(0, 0, 60, 100, 960);
assert_eq!(file.track(1).unwrap().name().as_deref(), Some("Track 1"));

let parsed = MidiFile::parse(&file.pack().unwrap()).unwrap();
assert_eq!(parsed.header().track_count(), 2);
```
"#]
#[derive(Clone, Debug, PartialEq)]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
    diagnostics: Diagnostics,
}

impl Default for MidiFile {
    /// Format 1, 960 ticks per quarter note, 4/4, C major, 120 bpm
    fn default() -> Self {
        Self::new(TicksPerQuarterNote::DEFAULT)
    }
}

impl MidiFile {
    /// A format 1 file with the given resolution and a metadata track.
    pub fn new(ticks_per_quarter_note: u16) -> Self {
        Self::with_timing(Timing::new_ticks_per_quarter_note(ticks_per_quarter_note))
    }

    /// A format 1 file with the given division and a metadata track named
    /// `"Track 0"` holding 4/4, C major and 120 bpm at tick 0.
    pub fn with_timing(timing: Timing) -> Self {
        let mut meta = Track::default();
        meta.add_events([
            Event::track_name(0, "Track 0"),
            Event::time_signature(0, TimeSignature::default()),
            Event::key_signature(0, KeySignature::default()),
            Event::tempo(0, Tempo::default()),
        ]);
        Self {
            header: Header::new(FormatType::Simultaneous, 1, timing),
            tracks: vec![meta],
            diagnostics: Diagnostics::new(),
        }
    }

    /// Parse a set of bytes into a file struct.
    ///
    /// Chunks other than `MThd` and `MTrk` are skipped. If the header's
    /// track count disagrees with the track chunks found, the chunks win.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut builder = MidiFileBuilder::default();

        while let Some(chunk) = reader.read_chunk()? {
            builder.handle_chunk(chunk, reader.buffer_position())?;
        }

        builder
            .build()
            .map_err(|k| ReaderError::invalid(reader.buffer_position(), k))
    }

    /// Read and parse the file at `path`.
    #[cfg(feature = "std")]
    pub fn read(path: impl AsRef<std::path::Path>) -> Result<Self, crate::Error> {
        let bytes = std::fs::read(path)?;
        Ok(Self::parse(&bytes)?)
    }

    /// Terminate every track and encode the file.
    ///
    /// Each track gets [`Track::add_track_end(0)`](Track::add_track_end) and the
    /// header's track count is synced before encoding.
    pub fn pack(&mut self) -> Result<Vec<u8>, EncodeError> {
        let count = u16::try_from(self.tracks.len())
            .map_err(|_| EncodeError::TooManyTracks(self.tracks.len()))?;
        self.header.set_track_count(count);

        let mut out = self.header.pack();
        for track in &mut self.tracks {
            track.add_track_end(0);
            out.extend(track.pack()?);
        }
        Ok(out)
    }

    /// [`MidiFile::pack`] into a writer.
    #[cfg(feature = "std")]
    pub fn write_to<W: std::io::Write>(&mut self, mut writer: W) -> Result<(), crate::Error> {
        let bytes = self.pack()?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// [`MidiFile::pack`] into a file at `path`, replacing it if it exists.
    #[cfg(feature = "std")]
    pub fn write(&mut self, path: impl AsRef<std::path::Path>) -> Result<(), crate::Error> {
        let bytes = self.pack()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Returns header info
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the header, mutably. The track count is overwritten on pack.
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Returns the division
    pub fn timing(&self) -> Timing {
        self.header.timing()
    }

    /// Returns the format type for the file.
    pub fn format_type(&self) -> FormatType {
        self.header.format()
    }

    /// Returns a track list
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The track at `index`
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// The track at `index`, mutably
    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// The first track whose name is `name`
    pub fn track_by_name(&self, name: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.name().as_deref() == Some(name))
    }

    /// Append a track with a name event at tick 0.
    ///
    /// Without a name the track is called `"Track N"`, N being the number of
    /// tracks before it, or the next free number if a deleted track left that
    /// name in use.
    ///
    /// # Errors
    /// [`FileError::DuplicateTrackName`] if a track already has the given name.
    pub fn add_track(&mut self, name: Option<&str>) -> Result<&mut Track, FileError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.free_track_name(),
        };
        if self.track_by_name(&name).is_some() {
            return Err(FileError::DuplicateTrackName(name));
        }

        let mut track = Track::default();
        track.add_event(Event::track_name(0, &name));
        let index = self.tracks.len();
        self.tracks.push(track);
        self.sync_track_count();
        Ok(&mut self.tracks[index])
    }

    fn free_track_name(&self) -> String {
        (self.tracks.len()..)
            .map(|n| format!("Track {n}"))
            .find(|name| self.track_by_name(name).is_none())
            .unwrap_or_default()
    }

    /// Remove and return the track at `index`. Later tracks move down one.
    pub fn delete_track(&mut self, index: usize) -> Result<Track, FileError> {
        self.check_index(index)?;
        let track = self.tracks.remove(index);
        self.sync_track_count();
        Ok(track)
    }

    /// The notes of the track at `index`.
    pub fn notes(&self, index: usize) -> Result<Vec<Note>, FileError> {
        self.check_index(index)?;
        Ok(self.tracks[index].notes())
    }

    /// Clamp warnings from file-level setters
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Clamp warnings, mutably
    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Set the tempo in quarter notes per minute.
    ///
    /// Tempos outside the three byte wire range are clamped and recorded in
    /// [`MidiFile::diagnostics`].
    pub fn set_bpm(&mut self, bpm: f64) {
        let tempo = Tempo::from_bpm(bpm).record(&mut self.diagnostics);
        self.set_tempo(tempo);
    }

    /// Replace the tempo on the metadata track.
    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.set_meta(MetaEvent::Tempo(tempo));
    }

    /// Quarter notes per minute, 120 if no tempo is set.
    pub fn bpm(&self) -> f64 {
        self.tempo().bpm()
    }

    /// The tempo on the metadata track, or the default.
    pub fn tempo(&self) -> Tempo {
        match self.meta(MetaType::Tempo) {
            Some(MetaEvent::Tempo(tempo)) => *tempo,
            _ => Tempo::default(),
        }
    }

    /// Set the meter, e.g. `(6, 8)`.
    ///
    /// # Errors
    /// [`FileError::InvalidDenominator`] unless `bottom` is a power of two.
    pub fn set_time_signature(&mut self, top: u8, bottom: u8) -> Result<(), FileError> {
        let signature = TimeSignature::new(top, bottom)?;
        self.set_meta(MetaEvent::TimeSignature(signature));
        Ok(())
    }

    /// The time signature on the metadata track, or 4/4.
    pub fn time_signature(&self) -> TimeSignature {
        match self.meta(MetaType::TimeSignature) {
            Some(MetaEvent::TimeSignature(signature)) => *signature,
            _ => TimeSignature::default(),
        }
    }

    /// Set the key. `sharps` is clamped to `-7..=7`.
    pub fn set_key_signature(&mut self, sharps: i8, minor: bool) {
        let signature = KeySignature::new(sharps, minor).record(&mut self.diagnostics);
        self.set_meta(MetaEvent::KeySignature(signature));
    }

    /// The key signature on the metadata track, or C major.
    pub fn key_signature(&self) -> KeySignature {
        match self.meta(MetaType::KeySignature) {
            Some(MetaEvent::KeySignature(signature)) => *signature,
            _ => KeySignature::default(),
        }
    }

    /// Tick of `tick` ticks past beat `beat` of measure `measure`, both
    /// counted from 1, under the current time signature.
    ///
    /// Measure or beat 0 is read as 1. Saturates at `u32::MAX`.
    pub fn mbt_to_ticks(&self, measure: u32, beat: u32, tick: u32) -> u32 {
        let signature = self.time_signature();
        let top = signature.numerator() as u64;
        let bottom = signature.denominator() as u64;
        let tpq = self.quarter_note_ticks() as u64;

        let measures = measure.saturating_sub(1) as u64;
        let beats = beat.saturating_sub(1) as u64;
        let total = measures * top * tpq * 4 / bottom + beats * tpq * 4 / bottom + tick as u64;
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    /// Length of `beats` beats in ticks, truncated.
    pub fn beats_to_ticks(&self, beats: f64) -> u32 {
        let bottom = self.time_signature().denominator() as f64;
        (beats * self.quarter_note_ticks() * 4. / bottom) as u32
    }

    /// Wall-clock time of `tick`.
    ///
    /// Uses the metadata track's tempo (for quarter-note timing) and adds its
    /// SMPTE offset, if any.
    pub fn ticks_to_micros(&self, tick: u32) -> UMicros {
        let timing = self.timing();
        let offset = match self.meta(MetaType::SmpteOffset) {
            Some(MetaEvent::SmpteOffset(offset)) => timing.offset_micros(offset),
            _ => 0.,
        };
        let micros = timing.micros_per_tick(self.tempo()) * tick as f64 + offset;
        UMicros::new(micros as u64)
    }

    fn quarter_note_ticks(&self) -> f64 {
        self.timing().effective_ticks_per_quarter_note(self.tempo())
    }

    fn meta(&self, kind: MetaType) -> Option<&MetaEvent> {
        self.tracks.first()?.get_event(kind)?.as_meta()
    }

    /// Replace the first event of the same type on the metadata track, or add
    /// one at tick 0.
    fn set_meta(&mut self, meta: MetaEvent) {
        let kind = EventType::Meta(meta.meta_type());
        let track = self.meta_track_mut();
        if let Some(event) = track.get_event_mut(kind) {
            *event.kind_mut() = EventKind::Meta(meta);
            return;
        }
        track.add_event(Event::meta(0, meta));
    }

    fn meta_track_mut(&mut self) -> &mut Track {
        if self.tracks.is_empty() {
            self.tracks.push(Track::default());
            self.sync_track_count();
        }
        &mut self.tracks[0]
    }

    fn sync_track_count(&mut self) {
        let count = u16::try_from(self.tracks.len()).unwrap_or(u16::MAX);
        self.header.set_track_count(count);
    }

    fn check_index(&self, index: usize) -> Result<(), FileError> {
        if index >= self.tracks.len() {
            return Err(FileError::TrackIndex {
                index,
                count: self.tracks.len(),
            });
        }
        Ok(())
    }
}

#[test]
fn default_file_layout() {
    use pretty_assertions::assert_eq;

    let file = MidiFile::default();
    assert_eq!(file.format_type(), FormatType::Simultaneous);
    assert_eq!(file.header().track_count(), 1);
    assert_eq!(file.timing().ticks_per_quarter_note(), Some(960));

    let types: Vec<EventType> = file.tracks()[0]
        .events()
        .iter()
        .map(Event::event_type)
        .collect();
    assert_eq!(
        types,
        [
            EventType::Meta(MetaType::TrackName),
            EventType::Meta(MetaType::TimeSignature),
            EventType::Meta(MetaType::KeySignature),
            EventType::Meta(MetaType::Tempo),
        ]
    );
}

#[test]
fn setters_replace_in_place() {
    let mut file = MidiFile::default();
    file.set_bpm(90.);
    file.set_bpm(120.);
    assert_eq!(file.tracks()[0].len(), 4);
    assert_eq!(file.tempo().micros_per_quarter_note(), 500_000);
}

#[test]
fn setters_recreate_a_missing_meta_track() {
    let mut file = MidiFile::default();
    file.delete_track(0).unwrap();
    assert_eq!(file.header().track_count(), 0);
    assert_eq!(file.bpm(), 120.);

    file.set_key_signature(-3, true);
    assert_eq!(file.header().track_count(), 1);
    assert_eq!(file.key_signature().sharps(), -3);
}
