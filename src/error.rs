//! Unified error types for thread resolution, board access, and sessions.

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// SpecError
// ---------------------------------------------------------------------------

/// Errors when parsing a thread specification string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// Scheme is missing or names no supported board dialect.
    UnknownProtocol(String),
    /// Dialect A needs exactly `host/category/board/pattern`.
    WrongSegmentCount { expected: usize, found: usize },
    /// Dialect A board ids are all-digit.
    InvalidBoardId(String),
    /// A required path segment (board, pattern, host) is absent or empty.
    MissingSegment(&'static str),
    /// An option token matched neither a long word nor an alias.
    UnknownOption(String),
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProtocol(scheme) => {
                write!(f, "unknown protocol `{scheme}` (expected shitaraba:// or nichan://)")
            }
            Self::WrongSegmentCount { expected, found } => write!(
                f,
                "invalid thread spec: expected {expected} path segments, found {found}"
            ),
            Self::InvalidBoardId(id) => write!(f, "invalid board id `{id}`: expected digits"),
            Self::MissingSegment(what) => write!(f, "invalid thread spec: missing {what}"),
            Self::UnknownOption(opt) => write!(f, "unknown option `{opt}`"),
        }
    }
}

impl std::error::Error for SpecError {}

// ---------------------------------------------------------------------------
// BoardError
// ---------------------------------------------------------------------------

/// Errors from listing or fetching on a board.
#[derive(Debug)]
pub enum BoardError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the board.
    Status(u16, String),
    /// The board answered with something we could not parse.
    Malformed(String),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for BoardError {}

impl From<reqwest::Error> for BoardError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// SubmitError
// ---------------------------------------------------------------------------

/// Errors from posting a message to a thread.
#[derive(Debug)]
pub enum SubmitError {
    /// The board asked us to wait before posting again.
    RateLimited { cooldown: Duration },
    /// The thread no longer accepts posts.
    ThreadStopped,
    /// The board refused the post; carries the server's diagnostic text.
    Rejected(String),
    /// Transport-level failure.
    Board(BoardError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited { cooldown } => {
                write!(f, "rate limited: retry in {}s", cooldown.as_secs())
            }
            Self::ThreadStopped => write!(f, "thread stopped"),
            Self::Rejected(msg) => write!(f, "post rejected: {msg}"),
            Self::Board(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<BoardError> for SubmitError {
    fn from(e: BoardError) -> Self {
        Self::Board(e)
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(e: reqwest::Error) -> Self {
        Self::Board(BoardError::Http(e))
    }
}

// ---------------------------------------------------------------------------
// ResolveError
// ---------------------------------------------------------------------------

/// Errors when resolving a specification to candidate threads.
#[derive(Debug)]
pub enum ResolveError {
    Spec(SpecError),
    Board(BoardError),
    /// No thread survived filtering.
    NotFound,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spec(e) => write!(f, "{e}"),
            Self::Board(e) => write!(f, "board: {e}"),
            Self::NotFound => write!(f, "no such thread"),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<SpecError> for ResolveError {
    fn from(e: SpecError) -> Self {
        Self::Spec(e)
    }
}

impl From<BoardError> for ResolveError {
    fn from(e: BoardError) -> Self {
        Self::Board(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// SessionError — top-level
// ---------------------------------------------------------------------------

/// Fatal errors that end an interactive session.
#[derive(Debug)]
pub enum SessionError {
    /// Rollover re-resolution failed.
    Resolve(ResolveError),
    /// The active thread refused a post because it was stopped.
    ThreadStopped,
    /// Terminal I/O failed.
    Io(std::io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve(e) => write!(f, "resolve: {e}"),
            Self::ThreadStopped => write!(f, "thread stopped while posting"),
            Self::Io(e) => write!(f, "terminal: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ResolveError> for SessionError {
    fn from(e: ResolveError) -> Self {
        Self::Resolve(e)
    }
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
