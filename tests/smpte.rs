use pretty_assertions::assert_eq;
use smfkit::prelude::*;

/// A format 0 file with SMPTE timing, one track starting with an SMPTE offset
/// and a single note.
fn create_midi_with_smpte_offset(fps: SmpteFps, ticks_per_frame: u8, offset: [u8; 5]) -> Vec<u8> {
    let mut bytes = Vec::new();

    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x00]); // format 0
    bytes.extend_from_slice(&[0x00, 0x01]); // one track
    bytes.push(fps.to_division_byte() as u8);
    bytes.push(ticks_per_frame);

    let mut body = vec![0x00, 0xFF, 0x54, 0x05];
    body.extend_from_slice(&offset);
    body.extend_from_slice(&[
        0x00, 0x90, 0x3C, 0x64, // note on
        0x60, 0x80, 0x3C, 0x40, // note off after 96 ticks
        0x00, 0xFF, 0x2F, 0x00,
    ]);

    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend(body);
    bytes
}

fn offset_of(file: &MidiFile) -> SmpteOffset {
    match file.track(0).and_then(|t| t.get_event(MetaType::SmpteOffset)) {
        Some(event) => match event.as_meta() {
            Some(MetaEvent::SmpteOffset(offset)) => *offset,
            _ => panic!("expected an SMPTE offset"),
        },
        None => panic!("no SMPTE offset"),
    }
}

#[test]
fn smpte_header_and_offset() {
    // 24 fps, 12:30:15, frame 18, subframe 50
    let bytes = create_midi_with_smpte_offset(SmpteFps::TwentyFour, 40, [0x0C, 30, 15, 18, 50]);
    let file = MidiFile::parse(&bytes).unwrap();

    let Timing::Smpte(smpte) = file.timing() else {
        panic!("expected SMPTE timing");
    };
    assert_eq!(smpte.fps(), SmpteFps::TwentyFour);
    assert_eq!(smpte.ticks_per_frame(), 40);

    let offset = offset_of(&file);
    assert_eq!(
        (offset.hour, offset.minute, offset.second, offset.frame, offset.subframe),
        (12, 30, 15, 18, 50)
    );
    let expected = (12 * 3600 + 30 * 60 + 15) as f64 * 1_000_000.0
        + (18.0 / 24.0) * 1_000_000.0
        + (50.0 / 100.0 / 24.0) * 1_000_000.0;
    assert!((offset.as_micros() - expected).abs() < 0.01);
}

#[test]
fn smpte_ticks_to_micros() {
    // 25 fps * 40 ticks per frame = 1000 ticks per second
    // offset 00:00:01, frame 12, subframe 50 = 1.5 s
    let bytes = create_midi_with_smpte_offset(SmpteFps::TwentyFive, 40, [0x20, 0, 1, 12, 50]);
    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.ticks_to_micros(0).us(), 1_500_000);
    assert_eq!(file.ticks_to_micros(96).us(), 1_596_000);
}

#[test]
fn header_rate_overrides_the_offset_rate() {
    // offset claims 24 fps, header says 30
    let bytes = create_midi_with_smpte_offset(SmpteFps::Thirty, 10, [0x00, 0, 0, 12, 0]);
    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(offset_of(&file).fps, SmpteFps::TwentyFour);
    assert_eq!(file.ticks_to_micros(0).us(), 400_000);
}

#[test]
fn quarter_note_file_uses_the_offset_rate() {
    let mut file = MidiFile::new(500);
    let offset = SmpteOffset::parse(&[0x20, 0, 2, 0, 0]).unwrap();
    file.track_mut(0)
        .unwrap()
        .add_event(Event::meta(0, MetaEvent::SmpteOffset(offset)));

    assert_eq!(file.ticks_to_micros(500).us(), 2_500_000);
}

#[test]
fn smpte_musical_time_follows_the_tempo() {
    let bytes = create_midi_with_smpte_offset(SmpteFps::TwentyFive, 40, [0x20, 0, 0, 0, 0]);
    let file = MidiFile::parse(&bytes).unwrap();

    // a 500 ms quarter note spans 500 ticks at 1000 ticks per second
    assert_eq!(file.beats_to_ticks(1.), 500);
    assert_eq!(file.mbt_to_ticks(2, 1, 0), 2000);
}

#[test]
fn smpte_file_round_trip() {
    let mut file = MidiFile::with_timing(Timing::new_smpte(SmpteFps::TwentyNine, 80));
    let offset = SmpteOffset::parse(&[0x41, 0x17, 0x2D, 0x0C, 0x22]).unwrap();
    file.track_mut(0)
        .unwrap()
        .add_event(Event::meta(0, MetaEvent::SmpteOffset(offset)));

    let bytes = file.pack().unwrap();
    assert_eq!(&bytes[12..14], [0xE3, 80]);

    let parsed = MidiFile::parse(&bytes).unwrap();
    assert_eq!(parsed.timing(), Timing::new_smpte(SmpteFps::TwentyNine, 80));
    assert_eq!(offset_of(&parsed), offset);
}

#[test]
fn invalid_offset_inside_a_file() {
    let bytes = create_midi_with_smpte_offset(SmpteFps::TwentyFour, 40, [0x18, 0, 0, 0, 0]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Smpte(SmpteError::HourOffset(24)))
    );
}

#[test]
fn invalid_header_rate() {
    let mut bytes = create_midi_with_smpte_offset(SmpteFps::TwentyFour, 40, [0, 0, 0, 0, 0]);
    bytes[12] = -28i8 as u8;
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Smpte(SmpteError::HeaderFrameTime(-28)))
    );
}

#[test]
fn offset_field_errors() {
    assert_eq!(SmpteOffset::parse(&[0, 0, 0]), Err(SmpteError::Length(3)));
    assert_eq!(SmpteOffset::parse(&[0x80, 0, 0, 0, 0]), Err(SmpteError::TrackFrame(4)));
    assert_eq!(SmpteOffset::parse(&[0, 60, 0, 0, 0]), Err(SmpteError::MinuteOffset(60)));
    assert_eq!(SmpteOffset::parse(&[0, 0, 60, 0, 0]), Err(SmpteError::SecondOffset(60)));
    assert_eq!(SmpteOffset::parse(&[0, 0, 0, 0, 100]), Err(SmpteError::Subframe(100)));
}

#[test]
fn drop_frame_length() {
    let offset = SmpteOffset::parse(&[0x40, 0, 0, 1, 0]).unwrap();
    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    let frame = 1_000_000.0 * 1001.0 / 30_000.0;
    assert!((offset.as_micros() - frame).abs() < 0.001);
}
