//! Integration tests for chordsync library usage.
//!
//! These tests verify that the library can be used as a dependency
//! from external projects.

use chordsync::{
    chord_to_midi_notes, parse_chart, transpose_chord, transpose_key, ChordSymbol, ChordSyncError,
    EventPosition, MediaDriver, ParsedChart, PitchSet, Player, PositionResolver, Section,
    TimedEvent, Timeline, Transport, REFERENCE_OCTAVE, SUPPORTED_RATES,
};

/// Test that all major types are accessible from the library.
#[test]
fn test_types_accessible() {
    // This test verifies that the public API types compile and are usable.
    // If any re-export is missing, this test will fail to compile.

    fn _assert_types() {
        let _: fn(&str) -> ChordSymbol = chordsync::parse_chord;
        let _: fn(&str, i32) -> PitchSet = chord_to_midi_notes;
        let _: fn(&str) -> ParsedChart = parse_chart;
        let _: i32 = REFERENCE_OCTAVE;
        let _: [f64; 8] = SUPPORTED_RATES;
        let _: Option<ChordSyncError> = None;
    }
}

/// Test parsing and transposing a complete chart.
#[test]
fn test_parse_and_transpose_chart() {
    let content = "{title: Amazing Grace}\n{key: G}\n\
                   [G]Amazing [G7]grace, how [C]sweet the [G]sound\n\
                   That [G]saved a [Em]wretch like [D]me";
    let chart = parse_chart(content);
    assert_eq!(chart.meta.title.as_deref(), Some("Amazing Grace"));
    assert_eq!(chart.meta.key.as_deref(), Some("G"));
    assert_eq!(chart.chords, vec!["G", "G7", "C", "Em", "D"]);
    assert_eq!(chart.lines.len(), 2);

    let transposed = chordsync::transpose_chart(content, "G", "A");
    let chart = parse_chart(&transposed);
    assert_eq!(chart.chords, vec!["A", "A7", "D", "F#m", "E"]);
}

/// Test chord symbol to pitch set conversion.
#[test]
fn test_pitch_sets() {
    let set = chord_to_midi_notes("C", 4);
    assert_eq!(set.midi, vec![60, 64, 67]);
    assert_eq!(set.names, vec!["C4", "E4", "G4"]);

    let set = chord_to_midi_notes("Am7", 4);
    assert_eq!(set.midi, vec![69, 72, 76, 79]);

    // slash chord bass sounds one octave below the root
    let set = chord_to_midi_notes("C/E", 4);
    assert_eq!(set.midi, vec![52, 60, 64, 67]);
}

/// Test transposition round trips.
#[test]
fn test_transposition_round_trips() {
    assert_eq!(transpose_chord("Am7", 12, false), "Am7");
    assert_eq!(transpose_key("D", 2), "E");
    assert_eq!(transpose_key("Dm", 2), "Em");
    for semitones in 0..12 {
        let up = transpose_chord("G", semitones, false);
        assert_eq!(transpose_chord(&up, -semitones, false), "G");
    }
}

/// Test driving the playback state machine with a synchronized timeline.
#[test]
fn test_playback_follows_timeline() {
    struct NullDriver;
    impl MediaDriver for NullDriver {
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn seek(&mut self, _seconds: f64) {}
        fn set_volume(&mut self, _volume: u8) {}
        fn set_rate(&mut self, _rate: f64) {}
        fn mute(&mut self) {}
        fn unmute(&mut self) {}
    }

    let timeline = Timeline::new(vec![Section {
        name: "Verse 1".to_string(),
        start_time: 4.0,
        events: vec![
            TimedEvent {
                chord: "G".to_string(),
                lyric: "Amazing".to_string(),
                timestamp: 5.0,
            },
            TimedEvent {
                chord: "C".to_string(),
                lyric: "grace".to_string(),
                timestamp: 9.0,
            },
        ],
    }]);

    let mut player = Player::new();
    player.attach_driver(Box::new(NullDriver));
    player.set_source("video-1");
    player.on_ready(60.0);
    assert_eq!(player.transport(), Transport::Ready);
    player.play();

    let mut resolver = PositionResolver::new();

    // before the section no event is active
    player.on_time_tick(1.0);
    assert!(resolver.resolve(&timeline, player.current_time()).is_none());

    // inside the section, the first event highlights and then holds
    player.on_time_tick(6.0);
    let resolved = resolver.resolve(&timeline, player.current_time()).unwrap();
    assert!(resolved.changed);
    assert_eq!(resolved.current, EventPosition { section: 0, event: 0 });
    assert_eq!(timeline.event(resolved.current).unwrap().chord, "G");

    player.on_time_tick(7.0);
    let resolved = resolver.resolve(&timeline, player.current_time()).unwrap();
    assert!(!resolved.changed);

    player.on_time_tick(10.0);
    let resolved = resolver.resolve(&timeline, player.current_time()).unwrap();
    assert!(resolved.changed);
    assert_eq!(timeline.event(resolved.current).unwrap().chord, "C");
}

/// Test the loop-wrap contract through the public API.
#[test]
fn test_loop_region_wraps() {
    let mut player = Player::new();
    player.on_ready(120.0);
    player.set_loop_region(20.0, 30.0);
    player.toggle_loop();

    player.on_time_tick(25.0);
    assert_eq!(player.current_time(), 25.0);
    // the stored time never advances past the loop end
    player.on_time_tick(30.0);
    assert_eq!(player.current_time(), 25.0);
}
