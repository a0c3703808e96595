use std::fmt;
use std::io;

/// Errors returned by graph engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// No vertex with this key exists.
    VertexNotFound(u32),
    /// No arc from `from` to `to` exists.
    ArcNotFound {
        /// Key of the source vertex.
        from: u32,
        /// Key of the destination vertex.
        to: u32,
    },
    /// A vertex with this key already exists.
    DuplicateKey(u32),
    /// An arc may not start and end at the same vertex.
    SameVertex(u32),
    /// The linked structure is inconsistent. The graph must not be used further.
    Corrupted(String),
}

impl GraphError {
    /// Returns true for the not-found class (`VertexNotFound`, `ArcNotFound`).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::VertexNotFound(_) | GraphError::ArcNotFound { .. }
        )
    }

    /// Returns true if the graph instance is no longer safe to traverse.
    pub fn is_corruption(&self) -> bool {
        matches!(self, GraphError::Corrupted(_))
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::VertexNotFound(key) => write!(f, "vertex {key} not found"),
            GraphError::ArcNotFound { from, to } => {
                write!(f, "arc {from} -> {to} not found")
            }
            GraphError::DuplicateKey(key) => write!(f, "vertex {key} already exists"),
            GraphError::SameVertex(key) => {
                write!(f, "arc endpoints must differ (both are {key})")
            }
            GraphError::Corrupted(msg) => write!(f, "graph structure corrupted: {msg}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Errors returned by the friendship log.
#[derive(Debug)]
pub enum LogError {
    /// An I/O error occurred while opening, seeking, reading or writing the log.
    Io(io::Error),
    /// The log contents are inconsistent.
    Corrupted(String),
    /// A value does not fit in the fixed record field width.
    FieldOverflow {
        /// The value that was too wide.
        value: u32,
        /// Field width in characters.
        width: usize,
    },
    /// The slot does not address a record in the log.
    SlotOutOfRange(u32),
    /// Replaying a record into the graph failed.
    Replay(GraphError),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::Io(e) => write!(f, "I/O error: {e}"),
            LogError::Corrupted(msg) => write!(f, "friendship log corrupted: {msg}"),
            LogError::FieldOverflow { value, width } => {
                write!(f, "value {value} does not fit in a {width}-character field")
            }
            LogError::SlotOutOfRange(slot) => write!(f, "log slot {slot} is out of range"),
            LogError::Replay(e) => write!(f, "log replay failed: {e}"),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogError::Io(e) => Some(e),
            LogError::Replay(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LogError {
    fn from(err: io::Error) -> Self {
        LogError::Io(err)
    }
}

/// Superset of all errors raised by this crate.
#[derive(Debug)]
pub enum Error {
    /// A graph engine error.
    Graph(GraphError),
    /// A friendship log error.
    Log(LogError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Graph(e) => e.fmt(f),
            Error::Log(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Graph(e) => Some(e),
            Error::Log(e) => Some(e),
        }
    }
}

impl From<GraphError> for Error {
    fn from(err: GraphError) -> Self {
        Error::Graph(err)
    }
}

impl From<LogError> for Error {
    fn from(err: LogError) -> Self {
        Error::Log(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Log(LogError::Io(err))
    }
}
