use crate::chord::chord_parser::{parse_chord, ChordSymbol};
use crate::chord::transposer::{semitone_index, SHARP_NOTES};
use crate::chord::SEMITONES_PER_OCTAVE;

/// Octave anchoring MIDI 60 (middle C)
pub const REFERENCE_OCTAVE: i32 = 4;

const MIDDLE_C: i32 = 60;

/// Interval table: quality suffix to semitone offsets from the root.
///
/// Adding a chord quality is a one-line edit here; lookup order does not
/// matter, suffixes are matched exactly.
const QUALITY_INTERVALS: &[(&str, &[i32])] = &[
    ("", &[0, 4, 7]),
    ("maj", &[0, 4, 7]),
    ("M", &[0, 4, 7]),
    ("m", &[0, 3, 7]),
    ("min", &[0, 3, 7]),
    ("-", &[0, 3, 7]),
    ("7", &[0, 4, 7, 10]),
    ("maj7", &[0, 4, 7, 11]),
    ("M7", &[0, 4, 7, 11]),
    ("m7", &[0, 3, 7, 10]),
    ("min7", &[0, 3, 7, 10]),
    ("-7", &[0, 3, 7, 10]),
    ("dim", &[0, 3, 6]),
    ("°", &[0, 3, 6]),
    ("aug", &[0, 4, 8]),
    ("+", &[0, 4, 8]),
    ("sus2", &[0, 2, 7]),
    ("sus4", &[0, 5, 7]),
    ("sus", &[0, 5, 7]),
    ("add9", &[0, 4, 7, 14]),
    ("6", &[0, 4, 7, 9]),
    ("m6", &[0, 3, 7, 9]),
    ("9", &[0, 4, 7, 10, 14]),
    ("maj9", &[0, 4, 7, 11, 14]),
    ("M9", &[0, 4, 7, 11, 14]),
    ("m9", &[0, 3, 7, 10, 14]),
    ("min9", &[0, 3, 7, 10, 14]),
    ("11", &[0, 4, 7, 10, 14, 17]),
    ("13", &[0, 4, 7, 10, 14, 21]),
];

const MAJOR_TRIAD: &[i32] = &[0, 4, 7];

/// An ordered set of absolute pitches derived from one chord symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchSet {
    /// MIDI note numbers, bass first when present
    pub midi: Vec<u8>,
    /// Note-name rendering, e.g. `C4`
    pub names: Vec<String>,
    /// True when the quality was unknown and the major triad stood in
    pub fallback: bool,
}

/// Intervals for a quality suffix, `None` when it is not in the table.
pub fn intervals_for_quality(quality: &str) -> Option<&'static [i32]> {
    QUALITY_INTERVALS
        .iter()
        .find(|(suffix, _)| *suffix == quality)
        .map(|(_, intervals)| *intervals)
}

/// Note-name rendering of a MIDI number, sharp spelling.
pub fn note_name(midi: u8) -> String {
    let pitch_class = SHARP_NOTES[(i32::from(midi) % SEMITONES_PER_OCTAVE) as usize];
    let octave = i32::from(midi) / SEMITONES_PER_OCTAVE - 1;
    format!("{pitch_class}{octave}")
}

fn clamp_midi(pitch: i32) -> u8 {
    pitch.clamp(0, 127) as u8
}

/// Absolute pitches of a parsed chord at the given octave.
///
/// A resolvable bass is prepended one octave below the chord's base pitch
/// so it always sounds lowest.
pub fn pitch_set(chord: &ChordSymbol, octave: i32) -> PitchSet {
    let octave_offset = (octave - REFERENCE_OCTAVE) * SEMITONES_PER_OCTAVE;
    let base = MIDDLE_C + octave_offset + semitone_index(&chord.root) as i32;
    let (intervals, fallback) = match intervals_for_quality(&chord.quality) {
        Some(intervals) => (intervals, false),
        None => {
            log::debug!("unknown chord quality {:?}, using major triad", chord.quality);
            (MAJOR_TRIAD, true)
        }
    };
    let mut midi = Vec::with_capacity(intervals.len() + 1);
    if let Some(bass) = &chord.bass {
        let bass_pitch = MIDDLE_C + octave_offset + semitone_index(bass) as i32;
        midi.push(clamp_midi(bass_pitch - SEMITONES_PER_OCTAVE));
    }
    for interval in intervals {
        midi.push(clamp_midi(base + interval));
    }
    let names = midi.iter().map(|&pitch| note_name(pitch)).collect();
    PitchSet {
        midi,
        names,
        fallback,
    }
}

/// Absolute pitches of a chord symbol string at the given octave.
///
/// Garbage input yields the default C-major triad, never an error.
pub fn chord_to_midi_notes(symbol: &str, octave: i32) -> PitchSet {
    pitch_set(&parse_chord(symbol), octave)
}
