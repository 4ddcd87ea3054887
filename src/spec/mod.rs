//! Thread specification strings.
//!
//! A spec names one board and a title pattern, plus selection/display
//! options:
//!
//! ```text
//! shitaraba://[host]/<category>/<board-id>/<pattern>[:opt,opt...]
//! nichan://<host>[/path...]/<board>/<pattern>[:opt,opt...]
//! ```
//!
//! For example `shitaraba:///game/1234/ABC*:postable,oldest` selects, on
//! board `game/1234`, the oldest thread titled `ABC...` that is not full yet.

pub mod glob;

use crate::error::SpecError;
pub use glob::GlobMatcher;

/// Host used when a shitaraba spec leaves the host segment empty.
pub const DEFAULT_SHITARABA_HOST: &str = "jbbs.shitaraba.net";

/// Path segments that belong to a board's URL conventions, not to the board
/// address itself (`.../test/read.cgi/board/thread`).
/// Path segments the read URLs put between the host and the board.
const NICHAN_READ_SEGMENT: &str = "read.cgi";
const NICHAN_TEST_SEGMENT: &str = "test";

/// Board dialect named by the spec scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// `shitaraba://`: fixed four-segment addresses, EUC-JP boards.
    Shitaraba,
    /// `nichan://`: variable-depth addresses, Shift_JIS boards.
    Nichan,
}

impl Protocol {
    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "shitaraba" => Some(Self::Shitaraba),
            "nichan" => Some(Self::Nichan),
            _ => None,
        }
    }
}

/// Option flags accepted after the trailing `:`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecOptions {
    /// Keep only the oldest matching thread.
    pub oldest: bool,
    /// Keep only threads below the post capacity.
    pub postable: bool,
    /// Render posts with a header line and an indented body.
    pub multilines: bool,
    /// Render inline posts with their time of day.
    pub showtime: bool,
    /// Treat an all-digit pattern as a thread id and look it up directly.
    pub thread_mode: bool,
    /// Skip all but the last posts when first catching up.
    pub last10: bool,
}

impl SpecOptions {
    /// Parse a comma-separated option list. Repeats are harmless.
    pub fn parse(list: &str) -> Result<Self, SpecError> {
        let mut options = Self::default();
        for token in list.split(',').map(str::trim) {
            let flag = match token {
                "" => continue,
                "oldest" | "o" => &mut options.oldest,
                "postable" | "p" => &mut options.postable,
                "multilines" | "m" => &mut options.multilines,
                "showtime" | "s" => &mut options.showtime,
                "thread" | "t" => &mut options.thread_mode,
                "last10" | "l" => &mut options.last10,
                other => return Err(SpecError::UnknownOption(other.to_string())),
            };
            *flag = true;
        }
        Ok(options)
    }
}

/// Parsed thread specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSpec {
    pub protocol: Protocol,
    /// Host, possibly followed by intermediate path segments (nichan).
    pub host: String,
    /// Board path relative to the host (`category/id` on shitaraba).
    pub board: String,
    /// Title glob, or an all-digit thread id.
    pub pattern: String,
    pub options: SpecOptions,
    matcher: GlobMatcher,
    thread_id: Option<u64>,
}

impl ThreadSpec {
    /// Parse a full `<protocol>://...` spec string.
    pub fn parse(text: &str) -> Result<Self, SpecError> {
        let Some((scheme, rest)) = text.split_once("://") else {
            return Err(SpecError::UnknownProtocol(text.to_string()));
        };
        let protocol = Protocol::from_scheme(scheme)
            .ok_or_else(|| SpecError::UnknownProtocol(scheme.to_string()))?;

        let (address, options) = split_options(rest);
        let options = match options {
            Some(list) => SpecOptions::parse(list)?,
            None => SpecOptions::default(),
        };

        let (host, board, pattern) = match protocol {
            Protocol::Shitaraba => split_shitaraba_address(address)?,
            Protocol::Nichan => split_nichan_address(address)?,
        };
        if pattern.is_empty() {
            return Err(SpecError::MissingSegment("pattern"));
        }

        let thread_id = numeric_thread_id(&pattern);
        Ok(Self {
            protocol,
            host,
            board,
            matcher: GlobMatcher::compile(&pattern),
            pattern,
            options,
            thread_id,
        })
    }

    /// Compiled title matcher for `pattern`.
    pub fn matcher(&self) -> &GlobMatcher {
        &self.matcher
    }

    /// Thread id when the pattern is purely numeric.
    pub fn thread_id(&self) -> Option<u64> {
        self.thread_id
    }
}

/// Split `address:opts` at the last `:`, unless that colon belongs to the
/// address (a `host:port` is followed by a `/`).
fn split_options(rest: &str) -> (&str, Option<&str>) {
    match rest.rsplit_once(':') {
        Some((address, options)) if !options.contains('/') => (address, Some(options)),
        _ => (rest, None),
    }
}

fn split_shitaraba_address(address: &str) -> Result<(String, String, String), SpecError> {
    let words: Vec<&str> = address.split('/').collect();
    if words.len() != 4 {
        return Err(SpecError::WrongSegmentCount {
            expected: 4,
            found: words.len(),
        });
    }
    let (host, category, board_id, pattern) = (words[0], words[1], words[2], words[3]);
    if category.is_empty() {
        return Err(SpecError::MissingSegment("category"));
    }
    if !is_all_digits(board_id) {
        return Err(SpecError::InvalidBoardId(board_id.to_string()));
    }
    let host = if host.is_empty() {
        DEFAULT_SHITARABA_HOST
    } else {
        host
    };
    Ok((
        host.to_string(),
        format!("{category}/{board_id}"),
        pattern.to_string(),
    ))
}

fn split_nichan_address(address: &str) -> Result<(String, String, String), SpecError> {
    let mut words: Vec<&str> = address.split('/').filter(|word| !word.is_empty()).collect();
    let pattern = words.pop().ok_or(SpecError::MissingSegment("pattern"))?;
    let board = words.pop().ok_or(SpecError::MissingSegment("board"))?;
    // Only the segments right before the board are URL convention.
    if words.last() == Some(&NICHAN_READ_SEGMENT) {
        words.pop();
    }
    if words.last() == Some(&NICHAN_TEST_SEGMENT) {
        words.pop();
    }
    if words.is_empty() {
        return Err(SpecError::MissingSegment("host"));
    }
    Ok((words.join("/"), board.to_string(), pattern.to_string()))
}

fn numeric_thread_id(pattern: &str) -> Option<u64> {
    if is_all_digits(pattern) {
        pattern.parse().ok()
    } else {
        None
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shitaraba_spec_with_default_host_and_options() {
        let spec = ThreadSpec::parse("shitaraba:///cat/1234/ABC*:postable,oldest").unwrap();
        assert_eq!(spec.protocol, Protocol::Shitaraba);
        assert_eq!(spec.host, DEFAULT_SHITARABA_HOST);
        assert_eq!(spec.board, "cat/1234");
        assert_eq!(spec.pattern, "ABC*");
        assert_eq!(
            spec.options,
            SpecOptions {
                postable: true,
                oldest: true,
                ..SpecOptions::default()
            }
        );
        assert_eq!(spec.thread_id(), None);
        assert!(spec.matcher().is_match("ABC12"));
    }

    #[test]
    fn shitaraba_spec_keeps_explicit_host() {
        let spec = ThreadSpec::parse("shitaraba://bbs.example.net/game/42/雑談*").unwrap();
        assert_eq!(spec.host, "bbs.example.net");
        assert_eq!(spec.board, "game/42");
        assert_eq!(spec.options, SpecOptions::default());
    }

    #[test]
    fn shitaraba_board_id_must_be_digits() {
        let err = ThreadSpec::parse("shitaraba:///game/abc/X").unwrap_err();
        assert_eq!(err, SpecError::InvalidBoardId("abc".into()));
    }

    #[test]
    fn shitaraba_requires_four_segments() {
        let err = ThreadSpec::parse("shitaraba:///game/1234").unwrap_err();
        assert_eq!(
            err,
            SpecError::WrongSegmentCount {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn aliases_and_duplicates_are_idempotent() {
        let a = ThreadSpec::parse("shitaraba:///c/1/X:p,postable,p,o").unwrap();
        let b = ThreadSpec::parse("shitaraba:///c/1/X:oldest,postable").unwrap();
        assert_eq!(a.options, b.options);
    }

    #[test]
    fn every_option_has_an_alias() {
        let long = SpecOptions::parse("oldest,postable,multilines,showtime,thread,last10").unwrap();
        let short = SpecOptions::parse("o,p,m,s,t,l").unwrap();
        assert_eq!(long, short);
        assert!(long.oldest && long.postable && long.multilines);
        assert!(long.showtime && long.thread_mode && long.last10);
    }

    #[test]
    fn blank_option_tokens_are_skipped() {
        let opts = SpecOptions::parse("postable,,").unwrap();
        assert!(opts.postable);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = ThreadSpec::parse("shitaraba:///c/1/X:newest").unwrap_err();
        assert_eq!(err, SpecError::UnknownOption("newest".into()));
    }

    #[test]
    fn numeric_pattern_records_thread_id() {
        let spec = ThreadSpec::parse("shitaraba:///c/1/1700000000:thread").unwrap();
        assert_eq!(spec.thread_id(), Some(1_700_000_000));
        assert!(spec.options.thread_mode);
    }

    #[test]
    fn unknown_protocol_is_rejected() {
        assert_eq!(
            ThreadSpec::parse("http://example.com/a/b").unwrap_err(),
            SpecError::UnknownProtocol("http".into())
        );
        assert!(matches!(
            ThreadSpec::parse("no-scheme").unwrap_err(),
            SpecError::UnknownProtocol(_)
        ));
    }

    #[test]
    fn nichan_spec_reads_segments_right_to_left() {
        let spec = ThreadSpec::parse("nichan://example.net/bbs/news/速報*:last10").unwrap();
        assert_eq!(spec.protocol, Protocol::Nichan);
        assert_eq!(spec.host, "example.net/bbs");
        assert_eq!(spec.board, "news");
        assert_eq!(spec.pattern, "速報*");
        assert!(spec.options.last10);
    }

    #[test]
    fn nichan_spec_strips_read_cgi_convention() {
        let spec = ThreadSpec::parse("nichan://example.net/test/read.cgi/news/1700000000/:t")
            .unwrap();
        assert_eq!(spec.host, "example.net");
        assert_eq!(spec.board, "news");
        assert_eq!(spec.thread_id(), Some(1_700_000_000));
    }

    #[test]
    fn nichan_spec_strips_bare_test_marker() {
        let spec = ThreadSpec::parse("nichan://example.net/test/news/X*").unwrap();
        assert_eq!(spec.host, "example.net");
        assert_eq!(spec.board, "news");
    }

    #[test]
    fn nichan_board_and_pattern_may_be_named_test() {
        let spec = ThreadSpec::parse("nichan://example.net/news/test").unwrap();
        assert_eq!(spec.host, "example.net");
        assert_eq!(spec.board, "news");
        assert_eq!(spec.pattern, "test");

        let spec = ThreadSpec::parse("nichan://example.net/test/ABC*").unwrap();
        assert_eq!(spec.host, "example.net");
        assert_eq!(spec.board, "test");
        assert_eq!(spec.pattern, "ABC*");

        let spec = ThreadSpec::parse("nichan://example.net/test/read.cgi/test/read.cgi").unwrap();
        assert_eq!(spec.board, "test");
        assert_eq!(spec.pattern, "read.cgi");
    }

    #[test]
    fn nichan_spec_keeps_host_port() {
        let spec = ThreadSpec::parse("nichan://localhost:8080/news/X*").unwrap();
        assert_eq!(spec.host, "localhost:8080");
        assert_eq!(spec.options, SpecOptions::default());
    }

    #[test]
    fn nichan_spec_needs_host_board_and_pattern() {
        assert_eq!(
            ThreadSpec::parse("nichan://news/X").unwrap_err(),
            SpecError::MissingSegment("host")
        );
        assert_eq!(
            ThreadSpec::parse("nichan://").unwrap_err(),
            SpecError::MissingSegment("pattern")
        );
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert_eq!(
            ThreadSpec::parse("shitaraba:///c/1/").unwrap_err(),
            SpecError::MissingSegment("pattern")
        );
    }
}
