//! Serializable view of a directory.

use crate::status::FriendshipStatus;
use serde::{Deserialize, Serialize};
use tether::journal::LogRecord;

/// A point-in-time copy of a directory's users and live requests.
///
/// Produced by [`UserDirectory::snapshot`](crate::UserDirectory::snapshot) for
/// display layers that should not hold the directory itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    /// Name of the backing graph.
    pub graph_name: String,
    /// The current session user, if any.
    pub session: Option<u32>,
    /// User ids in registration order.
    pub users: Vec<u32>,
    /// Live friendship requests in slot order.
    pub requests: Vec<LogRecord>,
}

impl DirectorySnapshot {
    /// Returns the relationship between `a` and `b` as seen from `a`.
    pub fn status(&self, a: u32, b: u32) -> FriendshipStatus {
        let has = |from: u32, to: u32| {
            self.requests
                .iter()
                .any(|record| record.from == from && record.to == to)
        };
        FriendshipStatus::from_arcs(has(a, b), has(b, a))
    }

    /// Returns each confirmed friendship once, as `(earlier, later)` by slot.
    pub fn friendships(&self) -> Vec<(u32, u32)> {
        self.requests
            .iter()
            .filter(|record| self.status(record.from, record.to).is_friends())
            .filter(|record| {
                // Keep the pair on the side of the first request.
                self.requests
                    .iter()
                    .find(|other| other.from == record.to && other.to == record.from)
                    .is_some_and(|other| other.slot > record.slot)
            })
            .map(|record| (record.from, record.to))
            .collect()
    }
}
