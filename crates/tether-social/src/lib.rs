//! # tether-social
//!
//! Friendships between registered users, built on the Tether graph engine.
//!
//! Users are vertices keyed by a user id. A friendship request from A to B is
//! the arc A→B, backed by one record in the friendship log; a confirmed
//! friendship is a pair of opposite arcs. Relationship status is never stored,
//! only derived from which arcs exist.
//!
//! ## Features
//!
//! - **Durable requests**: every request and withdrawal is written to the
//!   friendship log before the call returns
//! - **Replay on open**: the log is replayed into the graph, so a reopened
//!   directory has the same requests and statuses
//! - **Session shorthand**: user id 0 stands for the logged-in user
//! - **Friend-of-friend suggestions**: deduplicated, excluding existing friends
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tether_social::{FriendshipStatus, UserDirectory};
//!
//! # fn main() -> Result<(), tether_social::DirectoryError> {
//! let mut dir = UserDirectory::open("friends.log", [(1, "alice"), (2, "bob"), (3, "carol")])?;
//!
//! dir.login(1)?;
//! dir.request_friendship(0, 2)?;
//! dir.confirm_friendship(2, 1)?;
//! dir.request_friendship(2, 3)?;
//! dir.confirm_friendship(3, 2)?;
//!
//! assert_eq!(dir.relationship_status(0, 2)?, FriendshipStatus::Friends);
//! assert_eq!(dir.list_friends_of_friends(0)?, vec![3]);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

mod builder;
mod directory;
mod error;
mod shared;
mod snapshot;
mod status;

pub use builder::DirectoryBuilder;
pub use directory::UserDirectory;
pub use error::DirectoryError;
pub use shared::SharedDirectory;
pub use snapshot::DirectorySnapshot;
pub use status::FriendshipStatus;
