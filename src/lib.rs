//! # tether
//!
//! An embedded directed-graph engine with an append-only edge log.
//!
//! The crate has two parts:
//!
//! - [`graph`]: an in-memory directed graph with ordered vertices, ordered
//!   outgoing arcs, linear search and cascading deletion. Vertices are keyed by
//!   `u32` and may carry a payload; arcs carry a `u32` value.
//! - [`journal`]: the friendship log, a fixed-width text file of edge records
//!   that can be appended to, tombstoned in place by slot, and replayed into a
//!   graph.
//!
//! Higher layers (see the `tether-social` crate) give vertices and arcs their
//! meaning.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tether::graph::Graph;
//! use tether::journal::{FriendshipLog, LogConfig, LogReplay};
//!
//! # fn main() -> Result<(), tether::Error> {
//! let mut graph: Graph = Graph::new("users");
//! graph.add_vertex(1)?;
//! graph.add_vertex(2)?;
//!
//! let log = FriendshipLog::open("friends.log", LogConfig::default())?;
//! LogReplay::new(&log).replay_into(&mut graph)?;
//!
//! for (dest, slot) in graph.arcs(1)? {
//!     println!("1 -> {dest} (slot {slot})");
//! }
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

mod error;
pub mod graph;
pub mod journal;

pub use error::{Error, GraphError, LogError};
pub use graph::{Graph, VertexRef};
