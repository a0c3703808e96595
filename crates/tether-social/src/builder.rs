//! Configuring and opening a directory.

use std::path::Path;

use crate::directory::{UserDirectory, check_user_id};
use crate::error::DirectoryError;
use tether::Graph;
use tether::journal::{FriendshipLog, LogConfig, LogReplay};

/// Default name of the graph backing a directory.
const DEFAULT_GRAPH_NAME: &str = "users";

/// Builder for configuring and opening a user directory.
///
/// # Example
///
/// ```ignore
/// use tether_social::UserDirectory;
///
/// let dir = UserDirectory::builder()
///     .sync_on_write(false)
///     .open("friends.log", [(1, "alice"), (2, "bob")])?;
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryBuilder {
    graph_name: String,
    log_config: LogConfig,
}

impl DirectoryBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            graph_name: DEFAULT_GRAPH_NAME.to_string(),
            log_config: LogConfig::default(),
        }
    }

    /// Sets the name of the backing graph.
    ///
    /// Default: "users"
    #[must_use]
    pub fn graph_name(mut self, name: impl Into<String>) -> Self {
        self.graph_name = name.into();
        self
    }

    /// Sets the width of each friendship log field.
    ///
    /// The width bounds the largest user id and slot the log can hold
    /// (9999 at the default width of 4). An existing log must be opened with
    /// the width it was written with.
    ///
    /// Default: 4
    #[must_use]
    pub fn field_width(mut self, width: usize) -> Self {
        self.log_config.field_width = width;
        self
    }

    /// Sets whether every log write is followed by `sync_data`.
    ///
    /// Default: true
    #[must_use]
    pub fn sync_on_write(mut self, enabled: bool) -> Self {
        self.log_config.sync_on_write = enabled;
        self
    }

    /// Replaces the whole log configuration.
    #[must_use]
    pub fn log_config(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    /// Opens the directory.
    ///
    /// Opens or creates the friendship log at `path`, registers `users` in
    /// order, then replays the log to rebuild their friendship requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be opened, a user id is 0, repeated
    /// or too wide for the log's fields, or the log contradicts itself or the
    /// user list.
    pub fn open<U>(
        self,
        path: impl AsRef<Path>,
        users: impl IntoIterator<Item = (u32, U)>,
    ) -> Result<UserDirectory<U>, DirectoryError> {
        let log = FriendshipLog::open(path, self.log_config)?;

        let mut graph = Graph::new(self.graph_name);
        for (id, record) in users {
            check_user_id(id, log.config())?;
            graph.add_vertex(id)?;
            graph.set_vertex_payload(id, record)?;
        }

        let stats = LogReplay::new(&log).replay_into(&mut graph)?;

        #[cfg(feature = "logging")]
        log::info!(
            "opened directory {} with {} users and {} live requests ({} tombstones)",
            graph.name(),
            graph.len(),
            stats.live,
            stats.tombstoned
        );
        #[cfg(not(feature = "logging"))]
        let _ = stats;

        Ok(UserDirectory {
            graph,
            log,
            session: None,
        })
    }
}

impl Default for DirectoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
