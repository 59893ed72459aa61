use nom::character::complete::one_of;
use nom::combinator::{map, opt};
use nom::{IResult, Parser};
use std::fmt;

/// A chord symbol split into its components.
///
/// Enharmonic spelling is preserved as given (`Bb` stays `Bb`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSymbol {
    /// Spelled pitch class, letter normalized to uppercase
    pub root: String,
    /// Quality suffix kept verbatim (`m7`, `sus4`, ...)
    pub quality: String,
    /// Bass note of a slash chord, if it parsed as a pitch class
    pub bass: Option<String>,
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = &self.bass {
            write!(f, "/{bass}")?;
        }
        Ok(())
    }
}

/// Parse a root token: one letter A-G (any case) with optional `#` or `b`.
pub fn parse_root(i: &str) -> IResult<&str, String> {
    map(
        (one_of("ABCDEFGabcdefg"), opt(one_of("#b"))),
        |(letter, accidental): (char, Option<char>)| {
            let mut root = String::with_capacity(2);
            root.push(letter.to_ascii_uppercase());
            if let Some(accidental) = accidental {
                root.push(accidental);
            }
            root
        },
    )
    .parse(i)
}

/// Parse a chord symbol, or `None` when no leading root token matches.
pub fn try_parse_chord(symbol: &str) -> Option<ChordSymbol> {
    let symbol = symbol.trim();
    let (main, bass_part) = match symbol.split_once('/') {
        Some((main, bass)) => (main, Some(bass)),
        None => (symbol, None),
    };
    let (quality, root) = parse_root(main).ok()?;
    // a bass that does not parse as a pitch class is dropped
    let bass = bass_part.and_then(|bass| match parse_root(bass) {
        Ok((_, bass_root)) => Some(bass_root),
        Err(_) => {
            log::debug!("dropping unparseable bass {bass:?} of chord {symbol:?}");
            None
        }
    });
    Some(ChordSymbol {
        root,
        quality: quality.to_string(),
        bass,
    })
}

/// Parse a chord symbol with a soft fallback.
///
/// Unparseable input yields a default C with empty quality so callers stay
/// renderable and playable for any input.
pub fn parse_chord(symbol: &str) -> ChordSymbol {
    try_parse_chord(symbol).unwrap_or_else(|| {
        log::debug!("unparseable chord symbol {symbol:?}, defaulting to C");
        ChordSymbol {
            root: "C".to_string(),
            quality: String::new(),
            bass: None,
        }
    })
}
