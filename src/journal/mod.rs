//! Friendship log: append-only, fixed-width edge records.
//!
//! The log provides:
//! - One text record per edge request: `{slot}\t{from}\t{to}\n`
//! - O(1) removal by overwriting a record in place with a zero tombstone
//! - Stable record offsets: slot `n` lives at `record_size * (n - 1)`
//! - Replay of live records into a [`Graph`](crate::graph::Graph) on startup

mod config;
mod file;
mod record;
mod replay;

pub use self::config::{DEFAULT_FIELD_WIDTH, LogConfig};
pub use self::file::FriendshipLog;
pub use self::record::LogRecord;
pub use self::replay::{LogReplay, ReplayStats};
