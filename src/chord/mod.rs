pub mod chord_parser;
pub mod pitch_mapper;
pub mod transposer;

/// Semitones in one octave
pub const SEMITONES_PER_OCTAVE: i32 = 12;
