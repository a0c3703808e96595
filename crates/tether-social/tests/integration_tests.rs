//! Integration tests for tether-social

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::io::Write;
use tempfile::NamedTempFile;
use tether::journal::{FriendshipLog, LogConfig};
use tether_social::{DirectoryError, FriendshipStatus, UserDirectory};

fn open(temp_file: &NamedTempFile, ids: impl IntoIterator<Item = u32>) -> UserDirectory {
    UserDirectory::builder()
        .sync_on_write(false)
        .open(temp_file.path(), ids.into_iter().map(|id| (id, ())))
        .unwrap()
}

#[test]
fn test_request_confirm_and_pending() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut dir = open(&temp_file, [1, 2, 3]);

    dir.request_friendship(1, 2).unwrap();
    assert_eq!(
        dir.relationship_status(1, 2).unwrap(),
        FriendshipStatus::PendingOutgoing
    );

    dir.request_friendship(2, 1).unwrap();
    assert_eq!(dir.relationship_status(1, 2).unwrap(), FriendshipStatus::Friends);
    assert_eq!(dir.list_friends(1).unwrap(), vec![2]);

    dir.request_friendship(1, 3).unwrap();
    assert_eq!(dir.list_pending_incoming(3).unwrap(), vec![1]);
    assert_eq!(dir.list_pending_outgoing(1).unwrap(), vec![3]);
    assert_eq!(dir.list_friends(1).unwrap(), vec![2]);
    assert!(dir.list_friends_of_friends(3).unwrap().is_empty());
}

#[test]
fn test_replay_after_tombstone() {
    let temp_file = NamedTempFile::new().unwrap();
    {
        let mut file = temp_file.reopen().unwrap();
        file.write_all(b"   1\t   1\t   2\n   2\t   2\t   1\n").unwrap();
    }
    {
        let mut log = FriendshipLog::open(temp_file.path(), LogConfig::default()).unwrap();
        log.tombstone(1).unwrap();
    }

    let dir = open(&temp_file, [1, 2]);
    assert_eq!(
        dir.relationship_status(1, 2).unwrap(),
        FriendshipStatus::PendingIncoming
    );
    assert_eq!(
        dir.relationship_status(2, 1).unwrap(),
        FriendshipStatus::PendingOutgoing
    );
}

#[test]
fn test_reopen_preserves_statuses() {
    let temp_file = NamedTempFile::new().unwrap();
    let before = {
        let mut dir = open(&temp_file, 1..=4);
        dir.request_friendship(1, 2).unwrap();
        dir.confirm_friendship(2, 1).unwrap();
        dir.request_friendship(3, 1).unwrap();
        dir.request_friendship(4, 3).unwrap();
        dir.remove_friendship(3, 4).unwrap();
        dir.request_friendship(2, 4).unwrap();
        let snapshot = dir.snapshot().unwrap();
        dir.close().unwrap();
        snapshot
    };

    let dir = open(&temp_file, 1..=4);
    assert_eq!(dir.snapshot().unwrap(), before);
    assert_eq!(before.friendships(), vec![(1, 2)]);
    assert_eq!(
        dir.relationship_status(1, 3).unwrap(),
        FriendshipStatus::PendingIncoming
    );
    assert_eq!(dir.relationship_status(3, 4).unwrap(), FriendshipStatus::None);
}

#[test]
fn test_status_is_symmetric() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut dir = open(&temp_file, 1..=6);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..40 {
        let from = rng.random_range(1..=6u32);
        let to = rng.random_range(1..=6u32);
        if from == to || dir.relationship_status(from, to).unwrap().is_friends() {
            continue;
        }
        match dir.request_friendship(from, to) {
            Ok(_) | Err(DirectoryError::AlreadyRequested { .. }) => {}
            Err(e) => panic!("Unexpected error: {e}"),
        }
    }

    for a in 1..=6u32 {
        for b in 1..=6u32 {
            if a == b {
                continue;
            }
            let forward = dir.relationship_status(a, b).unwrap();
            let backward = dir.relationship_status(b, a).unwrap();
            assert_eq!(forward.reversed(), backward, "{a} <-> {b}");
        }
    }
}

#[test]
fn test_remove_friendship_writes_tombstones() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut dir = open(&temp_file, [1, 2]);
    let first = dir.request_friendship(1, 2).unwrap();
    let second = dir.confirm_friendship(2, 1).unwrap();

    dir.remove_friendship(1, 2).unwrap();
    assert_eq!(dir.relationship_status(1, 2).unwrap(), FriendshipStatus::None);
    dir.sync().unwrap();

    let bytes = std::fs::read(temp_file.path()).unwrap();
    assert_eq!(bytes.len(), 30);
    for slot in [first, second] {
        let offset = (slot as usize - 1) * 15;
        assert_eq!(&bytes[offset..offset + 15], b"   0\t   0\t   0\n");
    }

    // A fresh request after removal takes a new slot
    assert_eq!(dir.request_friendship(2, 1).unwrap(), 3);
}

#[test]
fn test_cancel_outgoing_request() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut dir = open(&temp_file, [1, 2]);
    dir.request_friendship(1, 2).unwrap();

    dir.remove_friendship(1, 2).unwrap();
    assert!(dir.list_pending_incoming(2).unwrap().is_empty());
    assert!(dir.list_pending_outgoing(1).unwrap().is_empty());

    assert!(matches!(
        dir.remove_friendship(1, 1),
        Err(DirectoryError::SelfFriendship(1))
    ));
    assert!(matches!(
        dir.remove_friendship(1, 8),
        Err(DirectoryError::Graph(tether::GraphError::VertexNotFound(8)))
    ));
}

#[test]
fn test_pending_incoming_excludes_friends_and_outgoing() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut dir = open(&temp_file, 1..=5);

    dir.request_friendship(2, 1).unwrap();
    dir.request_friendship(3, 1).unwrap();
    dir.confirm_friendship(1, 3).unwrap();
    dir.request_friendship(1, 4).unwrap();
    dir.request_friendship(5, 1).unwrap();

    assert_eq!(dir.list_pending_incoming(1).unwrap(), vec![2, 5]);
    assert_eq!(dir.list_pending_outgoing(1).unwrap(), vec![4]);
    assert_eq!(dir.list_friends(1).unwrap(), vec![3]);
    assert_eq!(dir.list_pending_incoming(4).unwrap(), vec![1]);
}

#[test]
fn test_friends_of_friends_on_random_graphs() {
    for seed in 0..10 {
        let temp_file = NamedTempFile::new().unwrap();
        let mut dir = open(&temp_file, 1..=12);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..30 {
            let a = rng.random_range(1..=12u32);
            let b = rng.random_range(1..=12u32);
            if a != b && dir.relationship_status(a, b).unwrap() == FriendshipStatus::None {
                dir.request_friendship(a, b).unwrap();
                if rng.random_bool(0.7) {
                    dir.confirm_friendship(b, a).unwrap();
                }
            }
        }

        for id in 1..=12u32 {
            let friends: HashSet<u32> = dir.list_friends(id).unwrap().into_iter().collect();
            let suggestions = dir.list_friends_of_friends(id).unwrap();

            let unique: HashSet<u32> = suggestions.iter().copied().collect();
            assert_eq!(unique.len(), suggestions.len(), "duplicates for {id}");
            assert!(!unique.contains(&id));
            assert!(unique.is_disjoint(&friends));

            // Every suggestion is reachable through some friend
            for candidate in &suggestions {
                let via = friends.iter().any(|&friend| {
                    dir.relationship_status(friend, *candidate).unwrap().is_friends()
                });
                assert!(via, "{candidate} is not a friend of a friend of {id}");
            }
        }
        dir.check_integrity().unwrap();
    }
}

#[test]
fn test_open_rejects_log_for_unknown_user() {
    let temp_file = NamedTempFile::new().unwrap();
    {
        let mut dir = open(&temp_file, [1, 2, 3]);
        dir.request_friendship(1, 3).unwrap();
    }

    let result = UserDirectory::<()>::open(temp_file.path(), [(1, ()), (2, ())]);
    assert!(matches!(
        result,
        Err(DirectoryError::Log(tether::LogError::Corrupted(_)))
    ));
}

#[test]
fn test_wide_fields() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut dir = UserDirectory::builder()
        .field_width(6)
        .open(temp_file.path(), [(123_456, ()), (7, ())])
        .unwrap();

    dir.request_friendship(123_456, 7).unwrap();
    dir.sync().unwrap();
    let bytes = std::fs::read(temp_file.path()).unwrap();
    assert_eq!(bytes, b"     1\t123456\t     7\n");
}
