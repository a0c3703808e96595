//! Errors returned by the user directory.

use crate::status::FriendshipStatus;
use std::fmt;
use tether::{GraphError, LogError};

/// Errors that can occur when working with the user directory.
#[derive(Debug)]
pub enum DirectoryError {
    /// The graph engine reported an error (e.g. an unknown user).
    Graph(GraphError),
    /// The friendship log reported an error.
    Log(LogError),
    /// A user cannot befriend themselves.
    SelfFriendship(u32),
    /// `from` has already requested friendship with `to`.
    AlreadyRequested {
        /// The requesting user.
        from: u32,
        /// The requested user.
        to: u32,
    },
    /// The arc for a new request could not be created.
    CreateArcFailed(GraphError),
    /// There is no incoming request to confirm.
    NoPendingRequest {
        /// The user trying to confirm.
        session: u32,
        /// The other user.
        other: u32,
        /// The status observed instead of `PendingIncoming`.
        status: FriendshipStatus,
    },
    /// User id 0 was given but no session is active.
    NoSession,
    /// User id 0 is reserved for "the current session".
    ReservedUserId,
    /// A thread panicked while holding the shared directory.
    Poisoned,
}

impl DirectoryError {
    /// Returns true if the error leaves the directory unusable.
    pub fn is_fatal(&self) -> bool {
        match self {
            DirectoryError::Graph(e) | DirectoryError::CreateArcFailed(e) => e.is_corruption(),
            DirectoryError::Log(LogError::Corrupted(_)) | DirectoryError::Poisoned => true,
            DirectoryError::Log(LogError::Replay(e)) => e.is_corruption(),
            _ => false,
        }
    }
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::Graph(e) => write!(f, "graph error: {e}"),
            DirectoryError::Log(e) => write!(f, "friendship log error: {e}"),
            DirectoryError::SelfFriendship(id) => {
                write!(f, "user {id} cannot befriend themselves")
            }
            DirectoryError::AlreadyRequested { from, to } => {
                write!(f, "user {from} has already requested friendship with user {to}")
            }
            DirectoryError::CreateArcFailed(e) => {
                write!(f, "failed to create friendship request: {e}")
            }
            DirectoryError::NoPendingRequest {
                session,
                other,
                status,
            } => write!(
                f,
                "no pending request from user {other} to user {session} (status: {status})"
            ),
            DirectoryError::NoSession => write!(f, "no active session"),
            DirectoryError::ReservedUserId => {
                write!(f, "user id 0 is reserved for the current session")
            }
            DirectoryError::Poisoned => write!(f, "directory lock poisoned"),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryError::Graph(e) | DirectoryError::CreateArcFailed(e) => Some(e),
            DirectoryError::Log(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphError> for DirectoryError {
    fn from(err: GraphError) -> Self {
        DirectoryError::Graph(err)
    }
}

impl From<LogError> for DirectoryError {
    fn from(err: LogError) -> Self {
        DirectoryError::Log(err)
    }
}
