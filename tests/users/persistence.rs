use record_store::{StoreError, User, UserRepository};

use crate::{assert_same_user, init_tracing, seeded};

#[test]
fn create_assigns_fresh_id() {
    let (repo, saved) = seeded();
    assert_eq!(saved.version, 0);

    let created = repo.save(User::new("username-1", "email-1", "name")).unwrap();
    let id = created.id.clone().unwrap();
    assert!(!id.is_empty());
    assert_ne!(created.id, saved.id);
    assert_eq!(created.version, 0);

    let found = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(found, created);
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn create_without_username_or_email_fails() {
    let (repo, _) = seeded();

    let err = repo
        .save(User::new("", "emailB@email.com", "name"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));

    let err = repo.save(User::new("usernameB", "", "name")).unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));

    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn update_increments_version() {
    let (repo, mut saved) = seeded();

    saved.name = "name-update".into();
    let updated = repo.save(saved.clone()).unwrap();
    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.name, "name-update");
    assert_eq!(updated.version, 1);

    let mut next = updated;
    next.username = "username-update".into();
    let updated = repo.save(next).unwrap();
    assert_eq!(updated.username, "username-update");
    assert_eq!(updated.version, 2);

    assert_eq!(repo.count().unwrap(), 1);
    assert!(repo.exists_by_username("username-update").unwrap());
    assert!(!repo.exists_by_username("username").unwrap());
}

#[test]
fn delete_is_idempotent() {
    let (repo, saved) = seeded();
    let id = saved.id.clone().unwrap();

    repo.delete(&saved).unwrap();
    assert!(!repo.exists_by_id(&id).unwrap());

    repo.delete_by_id(&id).unwrap();
    repo.delete_by_id(&id).unwrap();
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn delete_of_unsaved_user_is_a_no_op() {
    let (repo, _) = seeded();
    repo.delete(&User::new("username", "email", "name")).unwrap();
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn find_by_username_and_email() {
    let (repo, saved) = seeded();

    let by_username = repo.find_by_username("username").unwrap().unwrap();
    assert_same_user(&saved, &by_username);

    let by_email = repo.find_by_email("email").unwrap().unwrap();
    assert_same_user(&saved, &by_email);

    assert!(repo.find_by_username("nobody").unwrap().is_none());
    assert!(repo.find_by_email("nobody").unwrap().is_none());
    assert!(repo.exists_by_email("email").unwrap());
    assert!(!repo.exists_by_email("nobody").unwrap());

    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn duplicate_username_or_email_is_rejected() {
    let (repo, mut saved) = seeded();

    let err = repo.save(User::new("username", "email-1", "name")).unwrap_err();
    assert_eq!(
        err,
        StoreError::DuplicateKey {
            collection: "users",
            field: "username",
            value: "username".into(),
        }
    );

    let err = repo.save(User::new("username-1", "email", "name")).unwrap_err();
    assert_eq!(
        err,
        StoreError::DuplicateKey {
            collection: "users",
            field: "email",
            value: "email".into(),
        }
    );

    let other = repo.save(User::new("username-2", "email-2", "name-2")).unwrap();
    assert_eq!(other.version, 0);
    assert_eq!(repo.count().unwrap(), 2);

    saved.username = "username-2".into();
    let err = repo.save(saved.clone()).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { field: "username", .. }));

    let found = repo.find_by_id(saved.id.as_deref().unwrap()).unwrap().unwrap();
    assert_eq!(found.username, "username");
    assert_eq!(found.version, 0);
}

#[test]
fn stale_version_is_rejected() {
    let (repo, saved) = seeded();
    let id = saved.id.clone().unwrap();

    let mut first = repo.find_by_id(&id).unwrap().unwrap();
    let mut second = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(first, second);

    first.name = "New Name Object1".into();
    let updated = repo.save(first).unwrap();
    assert_eq!(updated.version, 1);

    second.name = "New Name Object2".into();
    let err = repo.save(second).unwrap_err();
    assert!(matches!(
        err,
        StoreError::OptimisticLock {
            expected: 0,
            actual: 1,
            ..
        }
    ));

    let found = repo.get_by_id(&id).unwrap();
    assert_eq!(found.version, 1);
    assert_eq!(found.name, "New Name Object1");
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn retry_after_optimistic_lock_failure() {
    let (repo, saved) = seeded();
    let id = saved.id.clone().unwrap();

    let mut winner = saved.clone();
    winner.name = "winner".into();
    repo.save(winner).unwrap();

    let mut loser = saved;
    loser.name = "loser".into();
    assert!(repo.save(loser).is_err());

    let mut fresh = repo.get_by_id(&id).unwrap();
    fresh.name = "loser".into();
    let retried = repo.save(fresh).unwrap();
    assert_eq!(retried.version, 2);
    assert_eq!(retried.name, "loser");
}

#[test]
fn unknown_id_becomes_a_create() {
    let (repo, _) = seeded();

    let mut user = User::new("username-9", "email-9", "name");
    user.id = Some("lost-id".into());
    let saved = repo.save(user).unwrap();

    assert_ne!(saved.id.as_deref(), Some("lost-id"));
    assert_eq!(saved.version, 0);
    assert!(!repo.exists_by_id("lost-id").unwrap());
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn unknown_id_still_checks_uniqueness() {
    let (repo, _) = seeded();

    let mut user = User::new("username", "email-9", "name");
    user.id = Some("lost-id".into());
    let err = repo.save(user).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { .. }));
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn get_by_id_reports_not_found() {
    let (repo, _) = seeded();
    let err = repo.get_by_id("missing").unwrap_err();
    assert_eq!(
        err,
        StoreError::NotFound {
            collection: "users",
            id: "missing".into(),
        }
    );
}

#[test]
fn find_all_lists_every_user() {
    let (repo, _) = seeded();
    repo.save(User::new("username-1", "email-1", "name")).unwrap();
    repo.save(User::new("username-2", "email-2", "name")).unwrap();

    let mut usernames: Vec<String> = repo
        .find_all()
        .unwrap()
        .map(|u| u.unwrap().username)
        .collect();
    usernames.sort();
    assert_eq!(usernames, vec!["username", "username-1", "username-2"]);
}

#[test]
fn delete_all_on_empty_store() {
    init_tracing();
    let repo = UserRepository::in_memory();

    assert_eq!(repo.count().unwrap(), 0);
    repo.delete_all().unwrap();
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn scenario_duplicate_username_keeps_count() {
    init_tracing();
    let repo = UserRepository::in_memory();

    let first = repo.save(User::new("u1", "e1", "n1")).unwrap();
    assert_eq!(first.version, 0);

    let err = repo.save(User::new("u1", "e2", "n2")).unwrap_err();
    assert_eq!(err.kind(), "duplicate_key");
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn scenario_concurrent_readers_one_writer_wins() {
    init_tracing();
    let repo = UserRepository::in_memory();
    let r1 = repo.save(User::new("u1", "e1", "n1")).unwrap();
    let id = r1.id.clone().unwrap();

    let mut a = repo.get_by_id(&id).unwrap();
    let mut b = repo.get_by_id(&id).unwrap();
    assert_eq!(a.version, b.version);

    a.name = "x".into();
    assert_eq!(repo.save(a).unwrap().version, 1);

    b.name = "y".into();
    assert_eq!(repo.save(b).unwrap_err().kind(), "optimistic_lock");

    let current = repo.get_by_id(&id).unwrap();
    assert_eq!(current.name, "x");
    assert_eq!(current.version, 1);
}

#[test]
fn round_trip_through_find_by_id() {
    init_tracing();
    let repo = UserRepository::in_memory();
    let saved = repo.save(User::new("rt", "rt@example.com", "Round Trip")).unwrap();

    let found = repo.find_by_id(saved.id.as_deref().unwrap()).unwrap();
    assert_eq!(found, Some(saved));
}
