//! Human name parsing for roster name cells.
//!
//! The roster prints names upper-cased, usually as `FIRST [MIDDLE] LAST`, with
//! the occasional salutation or suffix glued to either end (`PAUL M LEWIS MR`).

/// Name split into the parts the roster record carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    pub first: String,
    /// Middle initials, space-separated.
    pub initials: String,
    pub last: String,
}

/// Splits a raw full-name string into first, middle initials and last name.
pub trait NameParser: Send + Sync {
    fn parse(&self, raw: &str) -> ParsedName;
}

const SALUTATIONS: &[&str] = &["MR", "MRS", "MS", "MISS", "MASTER", "MX", "DR", "PROF", "REV", "SIR", "MADAM", "MME"];

/// Generational suffixes and post-nominals. Designations that double as surnames (MAI) are left out.
const SUFFIXES: &[&str] = &["JR", "SR", "II", "III", "IV", "ESQ", "PHD", "MD", "CPA"];

const LAST_NAME_PARTICLES: &[&str] = &[
    "VAN", "VON", "DE", "DEL", "DELA", "DER", "DI", "DA", "DU", "DOS", "DAS", "LA", "LE", "ST", "SAN", "TEN", "TER",
];

/// Rule-based parser tolerant of leading/trailing salutations and suffixes.
///
/// Affixes are only stripped while at least two words remain, and never right
/// after a bare initial, so a surname that happens to be a salutation
/// (`SUJAN MASTER`, `SUJAN K MASTER`) survives.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanNameParser;

impl NameParser for HumanNameParser {
    fn parse(&self, raw: &str) -> ParsedName {
        let mut segments: Vec<&str> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();

        // "JOHN SMITH, JR" carries the suffix in its own comma segment.
        while segments.len() > 1 && segments.last().is_some_and(|s| s.split_whitespace().all(is_affix)) {
            segments.pop();
        }

        match segments.as_slice() {
            [] => ParsedName::default(),
            [single] => parse_given_first(single.split_whitespace().collect()),
            [last, given @ ..] => parse_last_first(last, &given.join(" ")),
        }
    }
}

/// `FIRST [MIDDLE...] LAST`
fn parse_given_first(mut words: Vec<&str>) -> ParsedName {
    strip_affixes(&mut words, 2, true);

    match words.as_slice() {
        [] => ParsedName::default(),
        [only] => ParsedName { last: title_case(only), ..Default::default() },
        [first, rest @ ..] => {
            let mut split = rest.len() - 1;
            while split > 0 && is_particle(rest[split - 1]) {
                split -= 1;
            }
            ParsedName { first: title_case(first), initials: initials(&rest[..split]), last: join_title(&rest[split..]) }
        }
    }
}

/// `LAST, FIRST [MIDDLE...]`
fn parse_last_first(last: &str, given: &str) -> ParsedName {
    let mut given: Vec<&str> = given.split_whitespace().collect();
    strip_affixes(&mut given, 1, false);

    let last_words: Vec<&str> = last.split_whitespace().collect();
    let (first, middle) = match given.split_first() {
        Some((first, middle)) => (title_case(first), initials(middle)),
        None => (String::new(), String::new()),
    };

    ParsedName { first, initials: middle, last: join_title(&last_words) }
}

/// With `surname_last`, a trailing word right after a bare initial is the surname and stays.
fn strip_affixes(words: &mut Vec<&str>, keep: usize, surname_last: bool) {
    while words.len() > keep && is_salutation(words[0]) {
        words.remove(0);
    }
    while words.len() > keep
        && words.last().is_some_and(|w| is_affix(w))
        && !(surname_last && is_initial(words[words.len() - 2]))
    {
        words.pop();
    }
}

/// A single letter, optionally followed by a period.
fn is_initial(word: &str) -> bool {
    let mut chars = word.strip_suffix('.').unwrap_or(word).chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

fn normalized(word: &str) -> String {
    word.trim_matches(|c: char| c == '.' || c == ',').to_ascii_uppercase()
}

fn is_salutation(word: &str) -> bool {
    SALUTATIONS.contains(&normalized(word).as_str())
}

fn is_affix(word: &str) -> bool {
    let w = normalized(word);
    SALUTATIONS.contains(&w.as_str()) || SUFFIXES.contains(&w.as_str())
}

fn is_particle(word: &str) -> bool {
    LAST_NAME_PARTICLES.contains(&normalized(word).as_str())
}

fn initials(words: &[&str]) -> String {
    words
        .iter()
        .filter_map(|w| w.chars().find(|c| c.is_alphabetic()))
        .flat_map(char::to_uppercase)
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_title(words: &[&str]) -> String {
    words.iter().map(|w| title_case(w)).collect::<Vec<_>>().join(" ")
}

/// `O'BRIEN` -> `O'Brien`, `SMITH-JONES` -> `Smith-Jones`, `MCDONALD` -> `McDonald`.
fn title_case(word: &str) -> String {
    let word = word.trim_matches(|c: char| c == '.' || c == ',');
    let mut out = String::with_capacity(word.len());
    let mut upper_next = true;

    for c in word.chars() {
        if upper_next {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper_next = matches!(c, '-' | '\'');
    }

    if out.len() > 2 && out.starts_with("Mc") {
        let (prefix, rest) = out.split_at(2);
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            return format!("{prefix}{}{}", c.to_uppercase(), chars.as_str());
        }
    }

    out
}
