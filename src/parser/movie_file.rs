//! Parser for the plain-text movie import format.
//!
//! ```text
//! Title: Se7en
//! Release Year: 1995
//! Format: DVD
//! Stars: Morgan Freeman, Brad Pitt
//!
//! Title: ...
//! ```
//!
//! Blocks are separated by blank lines. Parsing is lenient: a malformed block
//! degrades to a partially filled record, it never fails the whole file.

use regex::Regex;
use std::sync::OnceLock;

const BYTE_ORDER_MARK: char = '\u{feff}';

const TITLE: &str = "title:";
const RELEASE_YEAR: &str = "release year:";
const FORMAT: &str = "format:";
const STARS: &str = "stars:";

/// One block of an import file. Fields the block did not carry stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMovie {
    pub title: String,
    pub release_year: Option<i32>,
    pub format: Option<String>,
    pub stars: Vec<String>,
}

impl ParsedMovie {
    /// Names of the fields this record lacks, in file order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.release_year.is_none() {
            missing.push("Release Year");
        }
        if self.format.is_none() {
            missing.push("Format");
        }
        if self.stars.is_empty() {
            missing.push("Stars");
        }
        missing
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.release_year.is_some() && self.format.is_some() && !self.stars.is_empty()
    }
}

fn block_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r?\n\s*\r?\n").expect("Invalid regex pattern defined in code"))
}

/// Splits `content` into candidate records, in file order.
///
/// Records without a title are dropped. Everything else is yielded, complete
/// or not; deciding what to do with partial records is up to the caller.
pub fn parse_movie_file(content: &str) -> impl Iterator<Item = ParsedMovie> + '_ {
    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);

    block_separator()
        .split(content)
        .filter(|block| !block.trim().is_empty())
        .map(parse_block)
        .filter(|movie| !movie.title.is_empty())
}

fn parse_block(block: &str) -> ParsedMovie {
    let mut movie = ParsedMovie::default();

    for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(value) = strip_field(line, TITLE) {
            movie.title = value.trim().to_string();
        } else if let Some(value) = strip_field(line, RELEASE_YEAR) {
            movie.release_year = parse_year(value);
        } else if let Some(value) = strip_field(line, FORMAT) {
            let value = value.trim();
            movie.format = (!value.is_empty()).then(|| value.to_string());
        } else if let Some(value) = strip_field(line, STARS) {
            movie.stars = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    movie
}

/// Case-insensitive prefix match, returning the rest of the line.
fn strip_field<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

/// Leading digits only, so `1995 (remastered)` still yields 1995. Zero counts
/// as absent.
fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());

    value[..digits_end]
        .parse::<i32>()
        .ok()
        .filter(|year| *year != 0)
}
