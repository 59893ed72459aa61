//! Chordsync - chord chart engine and synchronized playback core
//!
//! This library provides:
//! - Parsing of inline bracket chord notation (`[G]Amazing [D]grace`)
//! - Chord transposition between keys and pitch-set conversion for preview
//! - A timeline index and playback state machine keeping a chord/lyric
//!   display in lock-step with an external media clock
//!
//! # Example
//!
//! ```
//! use chordsync::{chord_to_midi_notes, parse_chart, transpose_chord};
//!
//! let chart = parse_chart("[G]Amazing [D]grace");
//! assert_eq!(chart.chords, vec!["G", "D"]);
//! assert_eq!(transpose_chord("G", 2, false), "A");
//! assert_eq!(chord_to_midi_notes("C", 4).midi, vec![60, 64, 67]);
//! ```

pub mod chord;
pub mod config;
pub mod error;
pub mod notation;
pub mod playback;

// Re-export main types for convenience
pub use chord::chord_parser::{parse_chord, ChordSymbol};
pub use chord::pitch_mapper::{chord_to_midi_notes, note_name, PitchSet, REFERENCE_OCTAVE};
pub use chord::transposer::{
    is_flat_key, key_compatibility, key_distance, semitones_between, transpose_chart,
    transpose_chord, transpose_key, KeyCompatibility,
};
pub use config::{LoopPreset, PresetStore};
pub use error::ChordSyncError;
pub use notation::chart_parser::{
    detect_key, parse_chart, validate_chart, ChartMeta, NotationLine, NotationSegment, ParsedChart,
};
pub use notation::timeline::{EventPosition, Section, TimedEvent, Timeline};
pub use playback::clock::TickScheduler;
pub use playback::driver::MediaDriver;
pub use playback::player::{LoopRegion, Player, Transport, SUPPORTED_RATES};
pub use playback::resolver::{PositionResolver, ResolvedPosition, ScrollConfig};
pub use playback::sequencer::{PreviewSequencer, VoicePool};
pub use playback::TICK_INTERVAL;
