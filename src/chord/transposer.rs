use crate::chord::chord_parser::{parse_root, try_parse_chord};
use crate::chord::SEMITONES_PER_OCTAVE;

/// Chromatic ordering with sharp spellings
pub const SHARP_NOTES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Chromatic ordering with flat spellings
pub const FLAT_NOTES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Keys conventionally spelled with flats, relative minors included
const FLAT_KEYS: [&str; 12] = [
    "F", "Bb", "Eb", "Ab", "Db", "Gb", "Dm", "Gm", "Cm", "Fm", "Bbm", "Ebm",
];

/// Relative major/minor pairs
const RELATIVE_KEYS: [(&str, &str); 13] = [
    ("C", "Am"),
    ("G", "Em"),
    ("D", "Bm"),
    ("A", "F#m"),
    ("E", "C#m"),
    ("B", "G#m"),
    ("F#", "D#m"),
    ("Gb", "Ebm"),
    ("Db", "Bbm"),
    ("Ab", "Fm"),
    ("Eb", "Cm"),
    ("Bb", "Gm"),
    ("F", "Dm"),
];

/// Rating of a key change between two songs in a setlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCompatibility {
    /// Same key, close neighbor, or a perfect 4th/5th apart
    Natural,
    /// Relative major/minor or three semitones away
    Acceptable,
    /// Anything wider
    Awkward,
}

/// Semitone index (0-11) of a spelled pitch class, `None` if it is not one.
pub fn try_semitone_index(note: &str) -> Option<usize> {
    let (rest, root) = parse_root(note.trim()).ok()?;
    if !rest.is_empty() {
        return None;
    }
    let mut chars = root.chars();
    let base: i32 = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let accidental: i32 = match chars.next() {
        Some('#') => 1,
        Some('b') => -1,
        _ => 0,
    };
    Some((base + accidental).rem_euclid(SEMITONES_PER_OCTAVE) as usize)
}

/// Semitone index of a note, defaulting to 0 (C) when it does not parse.
pub fn semitone_index(note: &str) -> usize {
    try_semitone_index(note).unwrap_or(0)
}

/// Transpose a single spelled note. An unknown note is returned unchanged.
pub fn transpose_note(note: &str, semitones: i32, use_flats: bool) -> String {
    let Some(index) = try_semitone_index(note) else {
        return note.to_string();
    };
    let new_index = (index as i32 + semitones).rem_euclid(SEMITONES_PER_OCTAVE) as usize;
    if use_flats {
        FLAT_NOTES[new_index].to_string()
    } else {
        SHARP_NOTES[new_index].to_string()
    }
}

/// Transpose a chord symbol, shifting root and bass alike.
///
/// The quality suffix is preserved verbatim. A symbol with no recognizable
/// root is returned unchanged.
pub fn transpose_chord(chord: &str, semitones: i32, use_flats: bool) -> String {
    let Some(parsed) = try_parse_chord(chord) else {
        return chord.to_string();
    };
    let mut transposed = transpose_note(&parsed.root, semitones, use_flats);
    transposed.push_str(&parsed.quality);
    if let Some(bass) = &parsed.bass {
        transposed.push('/');
        transposed.push_str(&transpose_note(bass, semitones, use_flats));
    }
    transposed
}

/// Transpose a key name, preserving a trailing `m` minor marker.
///
/// Results are spelled from the sharp ordering; an unknown key is returned
/// unchanged.
pub fn transpose_key(key: &str, semitones: i32) -> String {
    let trimmed = key.trim();
    let (base, minor) = match trimmed.strip_suffix('m') {
        Some(base) => (base, true),
        None => (trimmed, false),
    };
    let Some(index) = try_semitone_index(base) else {
        return key.to_string();
    };
    let new_index = (index as i32 + semitones).rem_euclid(SEMITONES_PER_OCTAVE) as usize;
    let root = SHARP_NOTES[new_index];
    if minor {
        format!("{root}m")
    } else {
        root.to_string()
    }
}

fn strip_minor(key: &str) -> &str {
    let trimmed = key.trim();
    trimmed.strip_suffix('m').unwrap_or(trimmed)
}

/// Semitone delta in `[0, 12)` taking `from_key` to `to_key`.
pub fn semitones_between(from_key: &str, to_key: &str) -> i32 {
    let from = semitone_index(strip_minor(from_key)) as i32;
    let to = semitone_index(strip_minor(to_key)) as i32;
    (to - from).rem_euclid(SEMITONES_PER_OCTAVE)
}

/// Whether a destination key is conventionally spelled with flats.
pub fn is_flat_key(key: &str) -> bool {
    FLAT_KEYS.contains(&key.trim())
}

/// Shortest semitone distance between two keys (0-6).
pub fn key_distance(from_key: &str, to_key: &str) -> u32 {
    let from = semitone_index(strip_minor(from_key)) as i32;
    let to = semitone_index(strip_minor(to_key)) as i32;
    let distance = (to - from).abs();
    distance.min(SEMITONES_PER_OCTAVE - distance) as u32
}

fn relative_of(key: &str) -> Option<&'static str> {
    RELATIVE_KEYS.iter().find_map(|(major, minor)| {
        if *major == key {
            Some(*minor)
        } else if *minor == key {
            Some(*major)
        } else {
            None
        }
    })
}

/// Rate how natural a transition between two keys sounds.
pub fn key_compatibility(from_key: &str, to_key: &str) -> KeyCompatibility {
    let from_key = from_key.trim();
    let to_key = to_key.trim();
    if from_key == to_key {
        return KeyCompatibility::Natural;
    }
    if relative_of(from_key) == Some(to_key) || relative_of(to_key) == Some(from_key) {
        return KeyCompatibility::Acceptable;
    }
    let interval = semitones_between(from_key, to_key);
    if interval == 5 || interval == 7 {
        // perfect 4th or 5th
        return KeyCompatibility::Natural;
    }
    match key_distance(from_key, to_key) {
        0..=2 => KeyCompatibility::Natural,
        3 => KeyCompatibility::Acceptable,
        _ => KeyCompatibility::Awkward,
    }
}

/// Transpose every bracket token of a chart, leaving lyrics and directives
/// untouched. A zero delta returns the input as-is.
pub fn transpose_chart(content: &str, from_key: &str, to_key: &str) -> String {
    let semitones = semitones_between(from_key, to_key);
    if semitones == 0 {
        return content.to_string();
    }
    let use_flats = is_flat_key(to_key);
    log::debug!("transposing chart {from_key} -> {to_key} ({semitones} semitones, flats={use_flats})");
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(open) = rest.find('[') {
        let (before, bracketed) = rest.split_at(open);
        out.push_str(before);
        match bracketed[1..].find(']') {
            Some(close) => {
                let token = &bracketed[1..=close];
                out.push('[');
                out.push_str(&transpose_chord(token, semitones, use_flats));
                out.push(']');
                rest = &bracketed[close + 2..];
            }
            None => {
                // unterminated bracket is inert text
                out.push_str(bracketed);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
