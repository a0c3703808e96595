//! Relationship status derived from a pair of arcs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The relationship between two users, seen from the first user's side.
///
/// Never stored: it is computed from the presence of the arcs A→B and B→A.
///
/// | A→B | B→A | Status |
/// |-----|-----|--------|
/// | no  | no  | `None` |
/// | yes | no  | `PendingOutgoing` |
/// | no  | yes | `PendingIncoming` |
/// | yes | yes | `Friends` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    /// Neither user has requested the other.
    None,
    /// A has requested B; B has not answered.
    PendingOutgoing,
    /// B has requested A; A has not answered.
    PendingIncoming,
    /// Both users have requested each other.
    Friends,
}

impl FriendshipStatus {
    /// Derives the status from the arcs A→B (`outgoing`) and B→A (`incoming`).
    pub fn from_arcs(outgoing: bool, incoming: bool) -> Self {
        match (outgoing, incoming) {
            (true, true) => Self::Friends,
            (true, false) => Self::PendingOutgoing,
            (false, true) => Self::PendingIncoming,
            (false, false) => Self::None,
        }
    }

    /// Returns the same relationship seen from the other user's side.
    pub fn reversed(self) -> Self {
        match self {
            Self::PendingOutgoing => Self::PendingIncoming,
            Self::PendingIncoming => Self::PendingOutgoing,
            other => other,
        }
    }

    /// Returns true for a confirmed friendship.
    pub fn is_friends(self) -> bool {
        self == Self::Friends
    }

    /// Returns true if exactly one side has sent a request.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::PendingOutgoing | Self::PendingIncoming)
    }

    /// Returns a stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PendingOutgoing => "pending_outgoing",
            Self::PendingIncoming => "pending_incoming",
            Self::Friends => "friends",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_table() {
        assert_eq!(FriendshipStatus::from_arcs(false, false), FriendshipStatus::None);
        assert_eq!(
            FriendshipStatus::from_arcs(true, false),
            FriendshipStatus::PendingOutgoing
        );
        assert_eq!(
            FriendshipStatus::from_arcs(false, true),
            FriendshipStatus::PendingIncoming
        );
        assert_eq!(FriendshipStatus::from_arcs(true, true), FriendshipStatus::Friends);
    }

    #[test]
    fn test_reversed_swaps_pending_direction() {
        for (outgoing, incoming) in [(false, false), (true, false), (false, true), (true, true)] {
            assert_eq!(
                FriendshipStatus::from_arcs(outgoing, incoming).reversed(),
                FriendshipStatus::from_arcs(incoming, outgoing)
            );
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&FriendshipStatus::PendingIncoming).unwrap();
        assert_eq!(json, "\"pending_incoming\"");
        assert_eq!(FriendshipStatus::PendingIncoming.to_string(), "pending_incoming");
    }
}
