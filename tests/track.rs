use pretty_assertions::assert_eq;
use smfkit::prelude::*;

/// Wraps an event body in an `MTrk` chunk
fn track_chunk(body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

#[test]
fn pack_parse_round_trip() {
    let mut track = Track::default();
    track
        .add_event(Event::track_name(0, "Keys"))
        .add_event(Event::program_change(0, 3, 4))
        .add_event(Event::control_change(0, 3, 7, 100))
        .add_event(Event::sysex(0, [0x7E, 0x7F, 0x09, 0x01, 0xF7]))
        .add_chord(0, 3, &[60, 64, 67], 90, 480)
        .add_event(Event::pitch_wheel(480, 3, -8192))
        .add_event(Event::pitch_wheel(500, 3, 8191))
        .add_event(Event::poly_aftertouch(520, 3, 60, 20))
        .add_event(Event::aftertouch(540, 3, 30))
        .add_event(Event::text(600, "fin"))
        .add_event(Event::escape(700, [0xF8]))
        .add_track_end(960);

    let bytes = track.pack().unwrap();
    let parsed = Track::parse(&bytes).unwrap();

    let mut expected = track.events().to_vec();
    expected.sort_by_key(Event::at);
    assert_eq!(parsed.events(), expected.as_slice());
    assert_eq!(parsed.name().as_deref(), Some("Keys"));
    assert_eq!(parsed.max_time(), 960);

    // a second pack is byte-identical
    assert_eq!(parsed.pack().unwrap(), bytes);
}

#[test]
fn equal_ticks_keep_insertion_order() {
    let mut track = Track::default();
    track
        .add_event(Event::note_on(10, 0, 60, 100))
        .add_event(Event::note_on(0, 1, 61, 100))
        .add_event(Event::note_on(10, 2, 62, 100))
        .add_event(Event::note_on(10, 3, 63, 100))
        .add_track_end(0);

    let parsed = Track::parse(&track.pack().unwrap()).unwrap();
    let channels: Vec<Channel> = parsed
        .events()
        .iter()
        .filter_map(Event::as_voice)
        .map(ChannelVoiceMessage::channel)
        .collect();
    assert_eq!(
        channels,
        [Channel::Two, Channel::One, Channel::Three, Channel::Four]
    );
}

#[test]
fn running_status_survives_meta_events() {
    let body = [
        0x00, 0x91, 0x3C, 0x64, // note on, channel 2
        0x00, 0xFF, 0x01, 0x01, b'A', // text
        0x60, 0x3C, 0x00, // running status: note on, velocity 0
        0x00, 0xF0, 0x01, 0xF7, // sysex
        0x10, 0x3E, 0x50, // running status again
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let track = Track::parse_events(&body).unwrap();
    assert_eq!(
        track.events(),
        [
            Event::note_on(0, 1, 60, 100),
            Event::text(0, "A"),
            Event::note_on(96, 1, 60, 0),
            Event::sysex(96, [0xF7]),
            Event::note_on(112, 1, 62, 80),
            Event::track_end(112),
        ]
    );
}

#[test]
fn writer_never_uses_running_status() {
    let mut track = Track::default();
    track
        .add_event(Event::note_on(0, 0, 60, 100))
        .add_event(Event::note_on(0, 0, 64, 100))
        .add_track_end(0);
    let bytes = track.pack().unwrap();
    assert_eq!(
        &bytes[8..],
        [0x00, 0x90, 0x3C, 0x64, 0x00, 0x90, 0x40, 0x64, 0x00, 0xFF, 0x2F, 0x00]
    );
}

#[test]
fn parsing_stops_at_track_end() {
    let body = [0x00, 0xFF, 0x2F, 0x00, 0x00, 0x90, 0x3C, 0x64];
    let track = Track::parse_events(&body).unwrap();
    assert_eq!(track.events(), [Event::track_end(0)]);
}

#[test]
fn unknown_status_is_positioned() {
    let bytes = track_chunk(&[0x00, 0x90, 0x3C, 0x64, 0x00, 0xF4, 0x00]);
    let err = Track::parse(&bytes).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Track(TrackError::UnknownStatus(0xF4)))
    );
    // 8 bytes of chunk header, then the status at 13
    assert_eq!(err.position(), 14);
}

#[test]
fn unknown_meta_type_fails() {
    let bytes = track_chunk(&[0x00, 0xFF, 0x60, 0x00, 0x00, 0xFF, 0x2F, 0x00]);
    let err = Track::parse(&bytes).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Meta(MetaError::UnknownType(0x60)))
    );
}

#[test]
fn data_byte_without_status_fails() {
    let err = Track::parse_events(&[0x00, 0x3C, 0x64]).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Track(TrackError::MissingRunningStatus(0x3C)))
    );
}

#[test]
fn truncated_body_is_out_of_bounds() {
    let err = Track::parse_events(&[0x00, 0x90, 0x3C]).unwrap_err();
    assert!(err.is_out_of_bounds());

    let err = Track::parse_events(&[0x00, 0xFF, 0x03, 0x05, b'a']).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn wrong_chunk_tag() {
    let mut bytes = track_chunk(&[0x00, 0xFF, 0x2F, 0x00]);
    bytes[..4].copy_from_slice(b"MThd");
    let err = Track::parse(&bytes).unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Chunk(ChunkError::UnexpectedTag {
            expected: *b"MTrk",
            found: *b"MThd"
        }))
    );
}

#[test]
fn get_event_finds_first_of_type() {
    let mut track = Track::default();
    track
        .add_event(Event::program_change(0, 0, 1))
        .add_event(Event::program_change(10, 0, 2))
        .add_event(Event::tempo(0, Tempo::default()));

    assert_eq!(track.get_event(EventType::ProgramChange).unwrap().at(), 0);
    assert!(track.get_event(MetaType::Tempo).is_some());
    assert!(track.get_event(MetaType::TrackName).is_none());

    track.get_event_mut(EventType::ProgramChange).unwrap().set_at(20);
    assert_eq!(track.get_event(EventType::ProgramChange).unwrap().at(), 20);
}

#[test]
fn add_note_uses_default_release() {
    let mut track = Track::default();
    track.add_note(100, 9, 36, 127, 50);
    assert_eq!(
        track.events(),
        [Event::note_on(100, 9, 36, 127), Event::note_off(150, 9, 36, 0x40)]
    );

    track.add_note_with_release(200, 9, 38, 100, 10, 5);
    assert_eq!(track.events()[3], Event::note_off(205, 9, 38, 10));
    assert!(track.diagnostics().is_empty());
}

#[test]
fn pack_leaves_the_track_alone() {
    let mut track = Track::default();
    track.add_note(0, 0, 60, 100, 10);
    assert_eq!(track.pack(), Err(EncodeError::TrackEndCount(0)));
    assert_eq!(track.len(), 2);
}
