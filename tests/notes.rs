use pretty_assertions::assert_eq;
use smfkit::prelude::*;

#[test]
fn overlapping_notes_close_first_in_first_out() {
    let mut file = MidiFile::default();
    let track = file.add_track(None).unwrap();
    track
        .add_note(1000, 0, 60, 100, 5000)
        .add_note(2000, 0, 60, 100, 2001)
        .add_note(3000, 0, 60, 100, 2002);

    let notes = file.notes(1).unwrap();
    let got: Vec<(u32, u32)> = notes.iter().map(|n| (n.at(), n.duration())).collect();
    assert_eq!(got, [(1000, 3001), (2000, 3002), (3000, 3000)]);
}

#[test]
fn notes_survive_a_round_trip() {
    let mut file = MidiFile::default();
    file.add_track(Some("Pad"))
        .unwrap()
        .add_chord(0, 4, &[48, 55, 64], 70, 1920)
        .add_note(1920, 4, 50, 75, 960);

    let before = file.notes(1).unwrap();
    let parsed = MidiFile::parse(&file.pack().unwrap()).unwrap();
    assert_eq!(parsed.notes(1).unwrap(), before);

    let first = before[0];
    assert_eq!(first.channel(), Channel::Five);
    assert_eq!(first.pitch().value(), 48);
    assert_eq!(first.velocity().value(), 70);
    assert_eq!(first.end(), 1920);
}

#[test]
fn zero_velocity_note_on_closes() {
    let mut track = Track::default();
    track.add_events([
        Event::note_on(0, 0, 60, 100),
        Event::control_change(5, 0, 64, 127),
        Event::note_on(10, 0, 60, 0),
    ]);
    assert_eq!(
        track.notes(),
        [Note::new(
            Channel::One,
            0,
            DataByte::new(60).unwrap(),
            DataByte::new(100).unwrap(),
            10
        )]
    );
}

#[test]
fn meta_track_has_no_notes() {
    let file = MidiFile::default();
    assert!(file.notes(0).unwrap().is_empty());
}
