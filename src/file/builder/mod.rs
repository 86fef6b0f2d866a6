pub mod chunk;

use super::MidiFile;
use crate::{
    ChunkError, Diagnostics, FileError,
    file::{
        Header, Track,
        builder::chunk::{ChunkEvent, UnknownChunk},
    },
    reader::{ReadResult, ReaderError},
};
use alloc::vec::Vec;

/// A builder used to assemble a [`MidiFile`] from its chunks.
#[derive(Default)]
pub struct MidiFileBuilder {
    header: Option<Header>,
    tracks: Vec<Track>,
    skipped_chunks: usize,
}

impl MidiFileBuilder {
    /// Handles a chunk of a midi file. `position` is where the chunk ended.
    pub fn handle_chunk(&mut self, chunk: ChunkEvent<'_>, position: usize) -> ReadResult<()> {
        match chunk {
            ChunkEvent::Header(h) => {
                if self.header.is_some() {
                    return Err(ReaderError::invalid(position, ChunkError::DuplicateHeader));
                }
                self.header = Some(h);
            }
            ChunkEvent::Track(t) => self.tracks.push(t.parse()?),
            ChunkEvent::Unknown(u) => self.skip(u),
        }
        Ok(())
    }

    #[allow(unused_variables)]
    fn skip(&mut self, chunk: UnknownChunk<'_>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            tag = ?chunk.tag(),
            len = chunk.data().len(),
            "skipping unknown chunk"
        );
        self.skipped_chunks += 1;
    }

    /// Number of unknown chunks skipped so far
    pub fn skipped_chunks(&self) -> usize {
        self.skipped_chunks
    }

    /// Attempts to finish the midifile from the provided chunks.
    ///
    /// The number of track chunks found wins over the header's declared count.
    pub fn build(self) -> Result<MidiFile, FileError> {
        let Some(mut header) = self.header else {
            return Err(FileError::NoHeader);
        };

        let found = u16::try_from(self.tracks.len()).unwrap_or(u16::MAX);
        if header.track_count() != found {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                declared = header.track_count(),
                found,
                "header track count disagrees with the track chunks"
            );
            header.set_track_count(found);
        }

        Ok(MidiFile {
            header,
            tracks: self.tracks,
            diagnostics: Diagnostics::new(),
        })
    }
}
