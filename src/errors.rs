use std::fmt;
use std::error::Error;

/// Represents errors that can occur during collision queries and parallel dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// A shape without vertices was handed to a query that needs a support point.
    DegenerateInput(&'static str),
    /// Shape data is internally inconsistent (bad indices, zero-area faces, ...).
    MalformedShape(String),
    /// A worker pool was requested with zero workers.
    InvalidWorkerCount,
    /// A tunable tolerance or limit is out of its valid range.
    InvalidParameter(String),
    /// The operating system refused to start a worker thread.
    ThreadSpawn(String),
}

impl fmt::Display for CollisionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CollisionError::DegenerateInput(what) => write!(f, "Degenerate input: {}", what),
            CollisionError::MalformedShape(msg) => write!(f, "Malformed shape: {}", msg),
            CollisionError::InvalidWorkerCount => write!(f, "Worker pool needs at least one worker"),
            CollisionError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            CollisionError::ThreadSpawn(msg) => write!(f, "Failed to spawn worker thread: {}", msg),
        }
    }
}

impl Error for CollisionError {}
