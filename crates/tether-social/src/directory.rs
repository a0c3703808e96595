//! The user directory and its friendship operations.

use crate::builder::DirectoryBuilder;
use crate::error::DirectoryError;
use crate::snapshot::DirectorySnapshot;
use crate::status::FriendshipStatus;
use std::collections::HashSet;
use std::path::Path;
use tether::journal::{FriendshipLog, LogConfig, LogRecord};
use tether::{Graph, GraphError, LogError};

/// A directory of users and the friendship requests between them.
///
/// Each registered user is a vertex keyed by user id, carrying the user record
/// `U` supplied by the registration layer. An arc A→B means "A has requested
/// friendship with B"; a confirmed friendship is a pair of opposite arcs. Every
/// arc is backed by one record in the friendship log, and the arc's value is
/// that record's slot.
///
/// User id 0 is reserved: wherever an operation takes a user id, 0 stands for
/// the user of the current session (see [`UserDirectory::login`]).
pub struct UserDirectory<U = ()> {
    pub(crate) graph: Graph<U>,
    pub(crate) log: FriendshipLog,
    pub(crate) session: Option<u32>,
}

impl UserDirectory {
    /// Returns a builder for configuring and opening a directory.
    ///
    /// The builder's `open` picks the user record type from its `users`
    /// argument, so this also works for directories with records.
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::new()
    }
}

impl<U> UserDirectory<U> {
    /// Opens a directory with default settings.
    ///
    /// Registers `users` in order, then replays the friendship log at `path`.
    pub fn open(
        path: impl AsRef<Path>,
        users: impl IntoIterator<Item = (u32, U)>,
    ) -> Result<Self, DirectoryError> {
        DirectoryBuilder::new().open(path, users)
    }

    /// Returns the path of the friendship log.
    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Makes `id` the current session user.
    pub fn login(&mut self, id: u32) -> Result<(), DirectoryError> {
        if id == 0 {
            return Err(DirectoryError::ReservedUserId);
        }
        self.require_user(id)?;
        self.session = Some(id);

        #[cfg(feature = "logging")]
        log::debug!("session started for user {id}");

        Ok(())
    }

    /// Ends the current session, returning its user.
    pub fn logout(&mut self) -> Option<u32> {
        self.session.take()
    }

    /// Returns the current session user, if any.
    pub fn session(&self) -> Option<u32> {
        self.session
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Adds a user with an id assigned by the registration layer.
    pub fn register_user(&mut self, id: u32, record: U) -> Result<(), DirectoryError> {
        check_user_id(id, self.log.config())?;
        self.graph.add_vertex(id)?;
        self.graph.set_vertex_payload(id, record)?;

        #[cfg(feature = "logging")]
        log::debug!("registered user {id}");

        Ok(())
    }

    /// Removes a user and every friendship request to or from them.
    ///
    /// Each affected log record is tombstoned before its arc is dropped. Ends
    /// the session if it belonged to this user. Returns the user record.
    pub fn remove_user(&mut self, id: u32) -> Result<Option<U>, DirectoryError> {
        let id = self.resolve(id)?;
        self.require_user(id)?;

        for other in self.graph.neighbors(id)? {
            self.cancel_request(id, other)?;
        }
        for other in self.graph.predecessors(id)? {
            self.cancel_request(other, id)?;
        }

        let record = self.graph.remove_vertex(id)?;
        if self.session == Some(id) {
            self.session = None;
        }

        #[cfg(feature = "logging")]
        log::info!("removed user {id}");

        Ok(record)
    }

    /// Returns true if `id` is a registered user.
    pub fn contains_user(&self, id: u32) -> Result<bool, DirectoryError> {
        Ok(self.graph.contains_vertex(self.resolve(id)?)?)
    }

    /// Returns all user ids in registration order.
    pub fn users(&self) -> Result<Vec<u32>, DirectoryError> {
        Ok(self.graph.keys()?)
    }

    /// Returns the number of registered users.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Returns true if no users are registered.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Returns the record of user `id`.
    pub fn user(&self, id: u32) -> Result<Option<&U>, DirectoryError> {
        Ok(self.graph.vertex_payload(self.resolve(id)?)?)
    }

    /// Returns the record of user `id` mutably.
    pub fn user_mut(&mut self, id: u32) -> Result<Option<&mut U>, DirectoryError> {
        let id = self.resolve(id)?;
        Ok(self.graph.vertex_payload_mut(id)?)
    }

    /// Replaces the record of user `id`, returning the previous one.
    pub fn set_user(&mut self, id: u32, record: U) -> Result<Option<U>, DirectoryError> {
        let id = self.resolve(id)?;
        Ok(self.graph.set_vertex_payload(id, record)?)
    }

    // ------------------------------------------------------------------
    // Friendship requests
    // ------------------------------------------------------------------

    /// Records that `from` requests friendship with `to`.
    ///
    /// If `to` has already requested `from`, this confirms the friendship.
    /// Returns the log slot of the new record. If the log write fails, the
    /// request is withdrawn from memory and the error returned.
    pub fn request_friendship(&mut self, from: u32, to: u32) -> Result<u32, DirectoryError> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        if from == to {
            return Err(DirectoryError::SelfFriendship(from));
        }
        if self.graph.has_arc(from, to)? {
            return Err(DirectoryError::AlreadyRequested { from, to });
        }

        self.graph
            .add_arc(from, to)
            .map_err(DirectoryError::CreateArcFailed)?;
        let slot = match self.log.append(from, to) {
            Ok(slot) => slot,
            Err(err) => {
                self.graph.remove_arc(from, to)?;
                return Err(err.into());
            }
        };
        self.graph.set_arc_value(from, to, slot)?;

        #[cfg(feature = "logging")]
        log::debug!("user {from} requested friendship with user {to} (slot {slot})");

        Ok(slot)
    }

    /// Accepts the pending request from `other` to `session`.
    ///
    /// Confirmation is the reciprocal request; afterwards the status is
    /// [`FriendshipStatus::Friends`].
    pub fn confirm_friendship(&mut self, session: u32, other: u32) -> Result<u32, DirectoryError> {
        let session = self.resolve(session)?;
        let other = self.resolve(other)?;
        match self.relationship_status(session, other)? {
            FriendshipStatus::PendingIncoming => self.request_friendship(session, other),
            status => Err(DirectoryError::NoPendingRequest {
                session,
                other,
                status,
            }),
        }
    }

    /// Cancels a request in either direction or dissolves a friendship.
    ///
    /// Removing where no request exists succeeds without doing anything.
    pub fn remove_friendship(&mut self, a: u32, b: u32) -> Result<(), DirectoryError> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        if a == b {
            return Err(DirectoryError::SelfFriendship(a));
        }
        self.require_user(a)?;
        self.require_user(b)?;

        self.cancel_request(a, b)?;
        self.cancel_request(b, a)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Returns the relationship between `session` and `other`, seen from
    /// `session`'s side.
    pub fn relationship_status(
        &self,
        session: u32,
        other: u32,
    ) -> Result<FriendshipStatus, DirectoryError> {
        let session = self.resolve(session)?;
        let other = self.resolve(other)?;
        if session == other {
            return Err(DirectoryError::SelfFriendship(session));
        }
        self.require_user(session)?;
        self.require_user(other)?;

        let outgoing = self.graph.has_arc(session, other)?;
        let incoming = self.graph.has_arc(other, session)?;
        Ok(FriendshipStatus::from_arcs(outgoing, incoming))
    }

    /// Returns the confirmed friends of `id`, in the order `id` requested or
    /// accepted them.
    pub fn list_friends(&self, id: u32) -> Result<Vec<u32>, DirectoryError> {
        let id = self.resolve(id)?;
        let mut friends = Vec::new();
        for other in self.graph.neighbors(id)? {
            if self.graph.has_arc(other, id)? {
                friends.push(other);
            }
        }
        Ok(friends)
    }

    /// Returns the users whose request to `id` is still unanswered, in
    /// registration order.
    ///
    /// Arcs are only stored on the requesting side, so this scans every user.
    pub fn list_pending_incoming(&self, id: u32) -> Result<Vec<u32>, DirectoryError> {
        let id = self.resolve(id)?;
        self.require_user(id)?;
        let mut pending = Vec::new();
        for other in self.graph.keys()? {
            if other != id && self.graph.has_arc(other, id)? && !self.graph.has_arc(id, other)? {
                pending.push(other);
            }
        }
        Ok(pending)
    }

    /// Returns the users `id` has requested who have not answered, in request
    /// order.
    pub fn list_pending_outgoing(&self, id: u32) -> Result<Vec<u32>, DirectoryError> {
        let id = self.resolve(id)?;
        let mut pending = Vec::new();
        for other in self.graph.neighbors(id)? {
            if !self.graph.has_arc(other, id)? {
                pending.push(other);
            }
        }
        Ok(pending)
    }

    /// Returns the friends of `id`'s friends, excluding `id` and `id`'s own
    /// friends, without duplicates, in first-seen order.
    pub fn list_friends_of_friends(&self, id: u32) -> Result<Vec<u32>, DirectoryError> {
        let id = self.resolve(id)?;
        let friends = self.list_friends(id)?;

        let mut seen: HashSet<u32> = friends.iter().copied().collect();
        seen.insert(id);

        let mut result = Vec::new();
        for friend in &friends {
            for candidate in self.list_friends(*friend)? {
                if seen.insert(candidate) {
                    result.push(candidate);
                }
            }
        }
        Ok(result)
    }

    // ------------------------------------------------------------------
    // Persistence and teardown
    // ------------------------------------------------------------------

    /// Returns a serializable view of users and live friendship requests.
    pub fn snapshot(&self) -> Result<DirectorySnapshot, DirectoryError> {
        let users = self.graph.keys()?;
        let mut requests = Vec::new();
        for &from in &users {
            for (to, slot) in self.graph.arcs(from)? {
                requests.push(LogRecord::new(slot, from, to));
            }
        }
        requests.sort_by_key(|record| record.slot);

        Ok(DirectorySnapshot {
            graph_name: self.graph.name().to_string(),
            session: self.session,
            users,
            requests,
        })
    }

    /// Verifies the in-memory structure.
    pub fn check_integrity(&self) -> Result<(), DirectoryError> {
        Ok(self.graph.check_integrity()?)
    }

    /// Flushes the friendship log to disk.
    pub fn sync(&self) -> Result<(), DirectoryError> {
        Ok(self.log.sync()?)
    }

    /// Flushes the log and releases every user, request and record.
    pub fn close(mut self) -> Result<(), DirectoryError> {
        self.log.sync()?;
        self.session = None;
        self.graph.destroy()?;

        #[cfg(feature = "logging")]
        log::info!("closed directory {}", self.graph.name());

        Ok(())
    }

    fn resolve(&self, id: u32) -> Result<u32, DirectoryError> {
        if id == 0 {
            self.session.ok_or(DirectoryError::NoSession)
        } else {
            Ok(id)
        }
    }

    fn require_user(&self, id: u32) -> Result<(), DirectoryError> {
        if self.graph.contains_vertex(id)? {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound(id).into())
        }
    }

    /// Tombstones and removes the arc `from -> to` if it exists.
    ///
    /// The log is written first, so a failed write leaves the arc in place.
    fn cancel_request(&mut self, from: u32, to: u32) -> Result<bool, DirectoryError> {
        if !self.graph.has_arc(from, to)? {
            return Ok(false);
        }
        let slot = self.graph.arc_value(from, to)?;
        self.log.tombstone(slot)?;
        self.graph.remove_arc(from, to)?;

        #[cfg(feature = "logging")]
        log::debug!("withdrew request {from} -> {to} (slot {slot})");

        Ok(true)
    }
}

/// Rejects ids that cannot be a user: the session alias 0, and ids too wide
/// for the log's fields.
pub(crate) fn check_user_id(id: u32, config: &LogConfig) -> Result<(), DirectoryError> {
    if id == 0 {
        return Err(DirectoryError::ReservedUserId);
    }
    if id > config.max_value() {
        return Err(LogError::FieldOverflow {
            value: id,
            width: config.field_width,
        }
        .into());
    }
    Ok(())
}
