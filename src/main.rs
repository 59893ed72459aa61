use chordsync::ChordSyncError as LibChordSyncError;
use chordsync::{
    chord_to_midi_notes, detect_key, parse_chart, transpose_chart, validate_chart, ParsedChart,
};
use clap::Parser;
use std::io;
use std::path::PathBuf;

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("chordsync=info"))
        .init();

    // args
    let args = CliArgs::parse();
    let chart_file = PathBuf::from(&args.chart_file);

    // check if chart file exists
    if !chart_file.exists() {
        let err = AppError::ConfigError(format!("Chart file not found {chart_file:?}"));
        return Err(err);
    }

    let content = std::fs::read_to_string(&chart_file)?;
    for warning in validate_chart(&content) {
        log::warn!("{warning}");
    }

    // transpose the whole document when a target key is given
    let content = match &args.to_key {
        Some(to_key) => {
            let from_key = args
                .from_key
                .clone()
                .or_else(|| detect_key(&content))
                .ok_or_else(|| {
                    AppError::ConfigError("source key unknown, pass --from-key".to_string())
                })?;
            log::info!("transposing from {from_key} to {to_key}");
            transpose_chart(&content, &from_key, to_key)
        }
        None => content,
    };

    let chart = parse_chart(&content);
    print_meta(&chart);

    if args.show_pitches {
        for chord in &chart.chords {
            let pitch_set = chord_to_midi_notes(chord, args.octave);
            let marker = if pitch_set.fallback { " (?)" } else { "" };
            println!("{chord}: {}{marker}", pitch_set.names.join(" "));
        }
        println!();
    }

    println!("{}", render_text(&chart));
    Ok(())
}

fn print_meta(chart: &ParsedChart) {
    if let Some(title) = &chart.meta.title {
        println!("title:  {title}");
    }
    if let Some(artist) = &chart.meta.artist {
        println!("artist: {artist}");
    }
    if let Some(key) = &chart.meta.key {
        println!("key:    {key}");
    }
    if let Some(tempo) = chart.meta.tempo {
        println!("tempo:  {tempo}");
    }
    if !chart.chords.is_empty() {
        println!("chords: {}", chart.chords.join(" "));
    }
    println!();
}

/// Two-row rendering: chords above the syllables they land on.
fn render_text(chart: &ParsedChart) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in &chart.lines {
        if line.is_empty() {
            out.push(String::new());
            continue;
        }
        let mut chord_row = String::new();
        let mut lyric_row = String::new();
        for segment in &line.segments {
            if let Some(chord) = &segment.chord {
                let position = lyric_row.chars().count();
                while chord_row.chars().count() < position {
                    chord_row.push(' ');
                }
                chord_row.push_str(chord);
                chord_row.push(' ');
            }
            lyric_row.push_str(&segment.lyric);
        }
        if !chord_row.trim().is_empty() {
            out.push(chord_row.trim_end().to_string());
        }
        if !lyric_row.trim().is_empty() {
            out.push(lyric_row);
        }
    }
    out.join("\n")
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Path to a chord chart file in bracket notation.
    chart_file: String,
    /// Optional target key to transpose the chart into.
    #[arg(long)]
    to_key: Option<String>,
    /// Source key override (defaults to the chart's key directive).
    #[arg(long)]
    from_key: Option<String>,
    /// Octave used when printing chord pitch sets.
    #[arg(long, default_value_t = 4)]
    octave: i32,
    /// Print the pitch set of every chord in the chart.
    #[arg(long, default_value_t = false)]
    show_pitches: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("other error: {0}")]
    OtherError(String),
}

impl From<LibChordSyncError> for AppError {
    fn from(error: LibChordSyncError) -> Self {
        match error {
            LibChordSyncError::ConfigError(s) => Self::ConfigError(s),
            LibChordSyncError::DriverError(code) => {
                Self::OtherError(format!("driver error {code}"))
            }
            LibChordSyncError::IoError(s) => Self::OtherError(s),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::OtherError(error.to_string())
    }
}
