//! Renderer tests: MIDI export on disk and synthesizer failures

use std::fs;

use fraction::Fraction;
use highscore::diagnostics::ErrorKind;
use highscore::render::midi::{NOTE_OFF_MSG, NOTE_ON_MSG};
use highscore::render::{MidiExporter, NotationRenderer, Synthesizer, schedule};
use highscore::value::{Chord, Duration, Notation, Note};
use highscore::{Interpreter, parse_expression};
use highscore::Value;

fn notation(source: &str) -> Notation {
    match parse_expression(source) {
        Ok(Value::Notation(n)) => n,
        Ok(other) => panic!("Expected notation, got {}", other.kind()),
        Err(e) => panic!("Parse failed: {e}"),
    }
}

#[test]
fn test_midi_file_written_without_image_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut exporter = MidiExporter::new(120).unwrap();
    let passage = notation("||{1^4}<pitch>\"C4\" {1^4}<pitch>\"G4\"||");

    exporter.render(&passage, &dir.path().join("song.png")).unwrap();

    let bytes = fs::read(dir.path().join("song.mid")).unwrap();
    assert_eq!(&bytes[..4], b"MThd");
    assert!(!dir.path().join("song.png").exists());
    let ons = bytes.windows(2).filter(|w| w[0] == NOTE_ON_MSG && w[1] == 60).count();
    let offs = bytes.windows(2).filter(|w| w[0] == NOTE_OFF_MSG && w[1] == 67).count();
    assert_eq!(ons, 1);
    assert_eq!(offs, 1);
}

#[test]
fn test_missing_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let mut exporter = MidiExporter::new(90).unwrap();
    let passage = notation("||<pitch>60||");
    exporter.render(&passage, &dir.path().join("nested/take")).unwrap();
    assert!(dir.path().join("nested/take.mid").is_file());
}

#[test]
fn test_schedule_uses_tempo() {
    let passage = Notation::with_defaults(vec![
        Note::new(Chord::single(60), Duration::new(1, 4).unwrap()),
        Note::new(Chord::single(62), Duration::new(3, 8).unwrap()),
    ]);
    let events = schedule(&passage, 60);
    assert_eq!(events[0].length, Fraction::from(1u64));
    assert_eq!(events[1].start, Fraction::from(1u64));
    assert_eq!(events[1].length, Fraction::new(3u64, 2u64));
}

#[test]
fn test_missing_synthesizer_is_render_error() {
    let dir = tempfile::tempdir().unwrap();
    let synth = Synthesizer {
        program: "highscore-no-such-synth".to_string(),
        soundfont: dir.path().join("font.sf2"),
        sample_rate: 44_100,
    };
    let mut exporter = MidiExporter::new(120).unwrap().with_synthesizer(synth);
    let passage = notation("||<pitch>60||");

    let err = exporter.render(&passage, &dir.path().join("a")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Render);
    assert!(err.message().contains("highscore-no-such-synth"));
    // the MIDI file is written before synthesis is attempted
    assert!(dir.path().join("a.mid").is_file());
}

#[test]
fn test_script_renders_into_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = MidiExporter::new(120).unwrap();
    let mut interpreter = Interpreter::with_renderer(exporter)
        .unwrap()
        .with_output_dir(dir.path());

    let source = "\
$melody := [\"C4\", \"D4\", \"E4\"][$n => {1^8}<pitch>$n]
render <notation>$melody as \"melody\"";
    interpreter.run(source).unwrap();
    assert!(dir.path().join("melody.mid").is_file());
}

#[test]
fn test_out_of_range_pitch_fails_render() {
    let dir = tempfile::tempdir().unwrap();
    let mut interpreter = Interpreter::with_renderer(MidiExporter::new(120).unwrap())
        .unwrap()
        .with_output_dir(dir.path());
    let err = interpreter
        .run("render <notation><pitch>200 as \"high\"")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Render);
    assert_eq!(err.line(), Some(1));
}
