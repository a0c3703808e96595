use super::file::FriendshipLog;
use crate::error::LogError;
use crate::graph::Graph;

/// Counts reported by a completed replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Records replayed as arcs.
    pub live: usize,
    /// Tombstoned records skipped.
    pub tombstoned: usize,
}

/// Rebuilds graph arcs from a friendship log.
///
/// Every live record becomes an arc `from -> to` whose value is the record's
/// slot. Tombstones are skipped. The vertices must already exist: users are
/// registered before their friendships are replayed.
pub struct LogReplay<'a> {
    log: &'a FriendshipLog,
}

impl<'a> LogReplay<'a> {
    /// Creates a replay over `log`.
    pub fn new(log: &'a FriendshipLog) -> Self {
        Self { log }
    }

    /// Replays every record into `graph`.
    ///
    /// Fails with [`LogError::Corrupted`] when the log contradicts itself or
    /// the graph:
    /// - a live record's slot differs from its position
    /// - a tombstone has a nonzero endpoint
    /// - a record is a self-edge or names an unregistered user
    /// - the same ordered pair has two live records
    ///
    /// Nothing is repaired; arcs replayed before the failing record stay in
    /// the graph, which the caller should discard.
    pub fn replay_into<P>(&self, graph: &mut Graph<P>) -> Result<ReplayStats, LogError> {
        let records = self.log.read_all()?;
        let mut stats = ReplayStats::default();

        for (index, record) in records.into_iter().enumerate() {
            let position = index + 1;

            if record.is_tombstone() {
                if record.from != 0 || record.to != 0 {
                    return Err(LogError::Corrupted(format!(
                        "tombstone at slot {position} still names {} -> {}",
                        record.from, record.to
                    )));
                }
                stats.tombstoned += 1;
                continue;
            }

            if record.slot as usize != position {
                return Err(LogError::Corrupted(format!(
                    "record at slot {position} claims slot {}",
                    record.slot
                )));
            }
            if record.from == record.to {
                return Err(LogError::Corrupted(format!(
                    "slot {position} is a self-edge on user {}",
                    record.from
                )));
            }
            for user in [record.from, record.to] {
                if !graph.contains_vertex(user).map_err(LogError::Replay)? {
                    return Err(LogError::Corrupted(format!(
                        "slot {position} names unknown user {user}"
                    )));
                }
            }
            if graph
                .has_arc(record.from, record.to)
                .map_err(LogError::Replay)?
            {
                return Err(LogError::Corrupted(format!(
                    "slot {position} repeats live edge {} -> {}",
                    record.from, record.to
                )));
            }

            graph
                .add_arc(record.from, record.to)
                .map_err(LogError::Replay)?;
            graph
                .set_arc_value(record.from, record.to, record.slot)
                .map_err(LogError::Replay)?;
            stats.live += 1;
        }

        #[cfg(feature = "logging")]
        log::info!(
            "friendship log replay: {} live records, {} tombstones",
            stats.live,
            stats.tombstoned
        );

        Ok(stats)
    }
}
