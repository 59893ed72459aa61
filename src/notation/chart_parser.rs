use crate::chord::chord_parser::parse_chord;
use nom::bytes::complete::{tag, take_till, take_till1};
use nom::sequence::delimited;
use nom::{IResult, Parser};
use std::collections::{HashMap, HashSet};

/// One chord/lyric pair within a line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotationSegment {
    /// Chord token text, kept verbatim
    pub chord: Option<String>,
    pub lyric: String,
}

/// An ordered sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotationLine {
    pub segments: Vec<NotationSegment>,
}

impl NotationLine {
    /// A line with no segments, or a single chord-less blank segment.
    pub fn is_empty(&self) -> bool {
        match self.segments.as_slice() {
            [] => true,
            [only] => only.chord.is_none() && only.lyric.trim().is_empty(),
            _ => false,
        }
    }
}

/// Metadata recovered from directive lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartMeta {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub tempo: Option<u32>,
}

/// A parsed chord chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedChart {
    pub meta: ChartMeta,
    pub lines: Vec<NotationLine>,
    /// Chord tokens de-duplicated in order of first appearance
    pub chords: Vec<String>,
}

/// Parse one bracket-delimited chord token.
fn chord_token(i: &str) -> IResult<&str, &str> {
    delimited(tag("["), take_till(|c| c == ']'), tag("]")).parse(i)
}

/// Take a run of plain text up to the next bracket.
fn lyric_run(i: &str) -> IResult<&str, &str> {
    take_till1(|c| c == '[')(i)
}

fn append_lyric(segments: &mut Vec<NotationSegment>, text: &str) {
    match segments.last_mut() {
        Some(last) => last.lyric.push_str(text),
        None => segments.push(NotationSegment {
            chord: None,
            lyric: text.to_string(),
        }),
    }
}

fn scan_line(line: &str, on_token: &mut impl FnMut(&str)) -> NotationLine {
    let mut segments: Vec<NotationSegment> = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        if let Ok((next, token)) = chord_token(rest) {
            on_token(token);
            segments.push(NotationSegment {
                chord: Some(token.to_string()),
                lyric: String::new(),
            });
            rest = next;
        } else if let Ok((next, text)) = lyric_run(rest) {
            append_lyric(&mut segments, text);
            rest = next;
        } else {
            // unterminated bracket, keep it as inert text
            append_lyric(&mut segments, rest);
            rest = "";
        }
    }
    NotationLine { segments }
}

fn apply_directive(meta: &mut ChartMeta, line: &str) {
    let inner = line
        .trim_start_matches('{')
        .split('}')
        .next()
        .unwrap_or_default();
    let (name, value) = match inner.split_once(':') {
        Some((name, value)) => (name.trim().to_ascii_lowercase(), value.trim()),
        None => (inner.trim().to_ascii_lowercase(), ""),
    };
    match name.as_str() {
        "title" | "t" => meta.title = Some(value.to_string()),
        "artist" | "subtitle" | "st" => meta.artist = Some(value.to_string()),
        "key" => meta.key = Some(value.to_string()),
        "tempo" | "bpm" => match value.parse::<u32>() {
            Ok(tempo) => meta.tempo = Some(tempo),
            Err(_) => log::debug!("ignoring non-numeric tempo directive {value:?}"),
        },
        _ => log::debug!("skipping directive {name:?}"),
    }
}

/// Parse raw bracket-notation text into a structured chart.
///
/// Permissive by design: unmatched brackets, stray characters or empty
/// brackets produce odd but renderable segments, never an error.
pub fn parse_chart(content: &str) -> ParsedChart {
    let mut meta = ChartMeta::default();
    let mut lines = Vec::new();
    let mut chords: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for raw_line in content.split('\n') {
        let line = raw_line.trim_end();
        if line.trim_start().starts_with('{') {
            // directive lines are excluded from rendering
            apply_directive(&mut meta, line.trim_start());
            continue;
        }
        let parsed = scan_line(line, &mut |token| {
            if seen.insert(token.to_string()) {
                chords.push(token.to_string());
            }
        });
        lines.push(parsed);
    }
    ParsedChart {
        meta,
        lines,
        chords,
    }
}

/// All chord tokens of a chart in occurrence order, duplicates included.
fn all_tokens(content: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for raw_line in content.split('\n') {
        let line = raw_line.trim_end();
        if line.trim_start().starts_with('{') {
            continue;
        }
        scan_line(line, &mut |token| tokens.push(token.to_string()));
    }
    tokens
}

/// Data-quality warnings for a chart. Nothing is rejected.
pub fn validate_chart(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let open_count = content.matches('[').count();
    let close_count = content.matches(']').count();
    if open_count != close_count {
        warnings.push(format!(
            "mismatched brackets: {open_count} '[' vs {close_count} ']'"
        ));
    }
    for token in all_tokens(content) {
        if token.is_empty() {
            warnings.push("empty chord brackets".to_string());
        } else if !token.starts_with(|c: char| c.is_ascii_alphabetic() && c.to_ascii_uppercase() <= 'G') {
            warnings.push(format!("invalid chord: {token}"));
        }
    }
    warnings
}

/// Guess the key of a chart.
///
/// The key directive wins when present; otherwise the most common chord
/// root, with the first chord counting double.
pub fn detect_key(content: &str) -> Option<String> {
    let chart = parse_chart(content);
    if let Some(key) = &chart.meta.key {
        if !key.is_empty() {
            return Some(key.clone());
        }
    }
    let tokens = all_tokens(content);
    let mut counts: HashMap<String, u32> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for token in &tokens {
        let root = parse_chord(token).root;
        if !counts.contains_key(&root) {
            order.push(root.clone());
        }
        *counts.entry(root).or_insert(0) += 1;
    }
    if let Some(first) = tokens.first() {
        let first_root = parse_chord(first).root;
        *counts.entry(first_root).or_insert(0) += 2;
    }
    // max_by_key keeps the last maximum, so reverse to let first-seen win ties
    order.into_iter().rev().max_by_key(|root| counts[root])
}
