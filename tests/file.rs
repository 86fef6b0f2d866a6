use pretty_assertions::assert_eq;
use smfkit::prelude::*;

/// Header chunk with the given fields
fn header_chunk(format: u16, tracks: u16, division: [u8; 2]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0, 0, 0, 6]);
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&tracks.to_be_bytes());
    bytes.extend_from_slice(&division);
    bytes
}

/// A one-note track chunk
fn note_track() -> Vec<u8> {
    let body = [
        0x00, 0x90, 0x3C, 0x64, //
        0x60, 0x80, 0x3C, 0x40, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

#[test]
fn default_file() {
    let file = MidiFile::default();
    assert_eq!(file.header().format(), FormatType::Simultaneous);
    assert_eq!(file.header().track_count(), 1);
    assert_eq!(file.timing().ticks_per_quarter_note(), Some(960));
    assert_eq!(file.track(0).unwrap().name().as_deref(), Some("Track 0"));
    assert_eq!(file.bpm(), 120.);

    let signature = file.time_signature();
    assert_eq!((signature.numerator(), signature.denominator()), (4, 4));
    assert_eq!(file.key_signature(), KeySignature::default());
}

#[test]
fn bpm_round_trip() {
    let mut file = MidiFile::default();
    file.set_bpm(90.);
    assert_eq!(file.tempo().micros_per_quarter_note(), 666_666);

    file.set_bpm(120.);
    assert_eq!(file.tempo().micros_per_quarter_note(), 500_000);
    assert_eq!(file.bpm(), 120.);
    assert!(file.diagnostics().is_empty());
}

#[test]
fn bpm_out_of_range_is_clamped() {
    let mut file = MidiFile::default();
    // 60 000 000 µs does not fit in three bytes
    file.set_bpm(1.);
    assert_eq!(file.tempo().micros_per_quarter_note(), Tempo::MAX);
    assert_eq!(file.diagnostics().len(), 1);
    assert_eq!(file.diagnostics().warnings()[0].field, "tempo");
}

#[test]
fn time_signature() {
    let mut file = MidiFile::default();
    file.set_time_signature(6, 8).unwrap();
    let signature = file.time_signature();
    assert_eq!(signature.denominator_exponent(), 3);
    assert_eq!((signature.numerator(), signature.denominator()), (6, 8));

    assert_eq!(
        file.set_time_signature(3, 6),
        Err(FileError::InvalidDenominator(6))
    );
    assert_eq!(file.time_signature().numerator(), 6);
}

#[test]
fn key_signature() {
    let mut file = MidiFile::default();
    file.set_key_signature(-2, true);
    assert_eq!(file.key_signature().sharps(), -2);
    assert!(file.key_signature().is_minor());

    file.set_key_signature(9, false);
    assert_eq!(file.key_signature().sharps(), 7);
    assert_eq!(file.diagnostics().len(), 1);
}

#[test]
fn musical_time_in_four_four() {
    let file = MidiFile::default();
    assert_eq!(file.beats_to_ticks(1.), 960);
    assert_eq!(file.beats_to_ticks(4.), 3840);
    assert_eq!(file.beats_to_ticks(0.5), 480);
    assert_eq!(file.mbt_to_ticks(1, 1, 0), 0);
    assert_eq!(file.mbt_to_ticks(2, 1, 0), 3840);
    assert_eq!(file.mbt_to_ticks(1, 2, 10), 970);
}

#[test]
fn musical_time_follows_the_meter() {
    let mut file = MidiFile::new(480);
    file.set_time_signature(6, 8).unwrap();
    assert_eq!(file.beats_to_ticks(1.), 240);
    assert_eq!(file.mbt_to_ticks(2, 1, 0), 1440);
    assert_eq!(file.mbt_to_ticks(3, 4, 5), 2 * 1440 + 3 * 240 + 5);
}

#[test]
fn ticks_to_micros_uses_the_tempo() {
    let mut file = MidiFile::new(1000);
    file.set_bpm(60.);
    assert_eq!(file.ticks_to_micros(0), UMicros::ZERO);
    assert_eq!(file.ticks_to_micros(1500).us(), 1_500_000);
}

#[test]
fn add_and_name_tracks() {
    let mut file = MidiFile::default();
    file.add_track(None).unwrap();
    file.add_track(Some("Bass")).unwrap().add_note(0, 1, 36, 100, 480);

    assert_eq!(file.header().track_count(), 3);
    assert_eq!(file.track(1).unwrap().name().as_deref(), Some("Track 1"));
    assert_eq!(file.track_by_name("Bass").unwrap().len(), 3);

    assert_eq!(
        file.add_track(Some("Bass")).unwrap_err(),
        FileError::DuplicateTrackName("Bass".into())
    );
    assert_eq!(file.header().track_count(), 3);
}

#[test]
fn generated_names_skip_taken_ones() {
    let mut file = MidiFile::default();
    file.add_track(Some("Track 2")).unwrap();
    let name = file.add_track(None).unwrap().name().unwrap().into_owned();
    assert_eq!(name, "Track 3");

    assert_eq!(
        file.add_track(Some("Track 2")).unwrap_err(),
        FileError::DuplicateTrackName("Track 2".into())
    );
}

#[test]
fn add_after_delete_picks_a_free_name() {
    let mut file = MidiFile::default();
    file.add_track(None).unwrap();
    file.add_track(None).unwrap();
    file.delete_track(1).unwrap();

    let name = file.add_track(None).unwrap().name().unwrap().into_owned();
    assert_eq!(name, "Track 3");
    let names: Vec<_> = file
        .tracks()
        .iter()
        .map(|t| t.name().unwrap().into_owned())
        .collect();
    assert_eq!(names, ["Track 0", "Track 2", "Track 3"]);
}

#[test]
fn delete_track_keeps_indices_contiguous() {
    let mut file = MidiFile::default();
    file.add_track(None).unwrap();
    file.add_track(Some("Bass")).unwrap();

    let removed = file.delete_track(1).unwrap();
    assert_eq!(removed.name().as_deref(), Some("Track 1"));
    assert_eq!(file.header().track_count(), 2);
    assert_eq!(file.track(1).unwrap().name().as_deref(), Some("Bass"));

    assert_eq!(
        file.delete_track(5).unwrap_err(),
        FileError::TrackIndex { index: 5, count: 2 }
    );
    assert_eq!(
        file.notes(2).unwrap_err(),
        FileError::TrackIndex { index: 2, count: 2 }
    );
}

#[test]
fn pack_parse_round_trip() {
    let mut file = MidiFile::new(480);
    file.set_bpm(100.);
    file.set_time_signature(3, 4).unwrap();
    file.set_key_signature(3, false);

    let piano = file.add_track(Some("Piano")).unwrap();
    piano.add_chord(0, 0, &[60, 64, 67], 80, 480);
    piano.add_note(480, 0, 72, 90, 240);

    let drums = file.add_track(Some("Drums")).unwrap();
    drums.add_event(Event::program_change(0, 9, 0));
    drums.add_note(0, 9, 36, 127, 10);

    let bytes = file.pack().unwrap();
    let parsed = MidiFile::parse(&bytes).unwrap();

    assert_eq!(parsed.header(), file.header());
    assert_eq!(parsed.tracks().len(), 3);
    assert_eq!(parsed.tempo(), file.tempo());
    assert_eq!(parsed.time_signature(), file.time_signature());
    assert_eq!(parsed.key_signature(), file.key_signature());
    assert_eq!(parsed.notes(1).unwrap(), file.notes(1).unwrap());
    assert_eq!(parsed.notes(2).unwrap().len(), 1);

    for (a, b) in parsed.tracks().iter().zip(file.tracks()) {
        let mut expected = b.events().to_vec();
        expected.sort_by_key(Event::at);
        assert_eq!(a.events(), expected.as_slice());
    }

    // packing again changes nothing
    let mut parsed = parsed;
    assert_eq!(parsed.pack().unwrap(), bytes);
}

#[test]
fn pack_terminates_every_track() {
    let mut file = MidiFile::default();
    file.add_track(None).unwrap().add_note(0, 0, 60, 100, 96);
    file.pack().unwrap();

    for track in file.tracks() {
        let ends = track.events().iter().filter(|e| e.is_track_end()).count();
        assert_eq!(ends, 1);
        assert!(track.events().last().unwrap().is_track_end());
    }
    assert_eq!(file.track(1).unwrap().max_time(), 96);
}

#[test]
fn unknown_chunks_are_skipped() {
    let mut bytes = header_chunk(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(b"XFIH");
    bytes.extend_from_slice(&[0, 0, 0, 3, 1, 2, 3]);
    bytes.extend(note_track());
    bytes.extend_from_slice(b"XFKM");
    bytes.extend_from_slice(&[0, 0, 0, 0]);

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.format_type(), FormatType::SingleMultiChannel);
    assert_eq!(file.tracks().len(), 1);
    assert_eq!(file.timing().ticks_per_quarter_note(), Some(96));
    assert_eq!(file.notes(0).unwrap()[0].duration(), 96);
}

#[test]
fn track_chunks_win_over_the_declared_count() {
    let mut bytes = header_chunk(1, 3, [0x01, 0xE0]);
    bytes.extend(note_track());
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.header().track_count(), 1);
}

#[test]
fn header_problems() {
    let err = MidiFile::parse(&note_track()).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::File(FileError::NoHeader))
    );

    let mut bytes = header_chunk(1, 0, [0x01, 0xE0]);
    bytes.extend(header_chunk(1, 0, [0x01, 0xE0]));
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Chunk(ChunkError::DuplicateHeader))
    );

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0, 0, 0, 4, 0, 1, 0, 0]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Header(HeaderError::Length(4)))
    );

    let err = MidiFile::parse(&header_chunk(7, 0, [0x01, 0xE0])).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Header(HeaderError::InvalidFormat(7)))
    );
}

#[test]
fn long_header_is_accepted() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0, 0, 0, 8, 0, 1, 0, 1, 0x00, 0x60, 0xAA, 0xBB]);
    bytes.extend(note_track());
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.timing().ticks_per_quarter_note(), Some(96));
}

#[test]
fn write_and_read_a_file() {
    let path = std::env::temp_dir().join(format!("smfkit-{}.mid", std::process::id()));

    let mut file = MidiFile::default();
    file.add_track(Some("Lead")).unwrap().add_note(0, 0, 72, 100, 240);
    file.write(&path).unwrap();

    let read = MidiFile::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(read.track_by_name("Lead").unwrap().notes().len(), 1);

    let mut buffer = Vec::new();
    file.write_to(&mut buffer).unwrap();
    assert_eq!(buffer, file.pack().unwrap());
}

#[test]
fn reading_a_missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("smfkit-does-not-exist.mid");
    assert!(matches!(MidiFile::read(&path), Err(Error::Io(_))));
}
