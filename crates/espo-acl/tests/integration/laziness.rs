//! Ownership lookups run only when a level needs them.

use std::sync::Arc;

use espo_acl::{Action, PermissionTable};
use espo_core::{InMemoryRelations, Record, User, UserType};
use serde_json::json;

use crate::common::{CountingRelations, TestHarness};

fn harness(relations: Arc<CountingRelations>) -> TestHarness {
    TestHarness::new()
        .with_table(
            "u1",
            PermissionTable::new()
                .with_scope("Account", json!({ "read": "team", "edit": "own", "delete": "all" })),
        )
        .with_relations(relations)
}

#[test]
fn test_unconditional_level_skips_store() {
    let relations = Arc::new(CountingRelations::new(InMemoryRelations::new()));
    let manager = harness(Arc::clone(&relations)).manager();
    let user = User::new("u1", UserType::Regular);

    let account = Record::new("Account", "a1");
    assert!(manager.check_entity_delete(&user, &account).unwrap());
    assert_eq!(relations.calls(), 0);
}

#[test]
fn test_own_decided_without_store() {
    let relations = Arc::new(CountingRelations::new(InMemoryRelations::new()));
    let manager = harness(Arc::clone(&relations)).manager();
    let user = User::new("u1", UserType::Regular);

    let mine = Record::new("Account", "a1").with("assignedUserId", "u1");
    let theirs = Record::new("Account", "a2").with("assignedUserId", "u2");

    assert!(manager.check_entity_edit(&user, &mine).unwrap());
    assert!(!manager.check_entity_edit(&user, &theirs).unwrap());
    assert_eq!(relations.calls(), 0);
}

#[test]
fn test_team_lookup_skipped_when_owned() {
    let relations = Arc::new(CountingRelations::new(
        InMemoryRelations::new().with("Account", "a2", "teams", ["t1"]),
    ));
    let manager = harness(Arc::clone(&relations)).manager();
    let user = User::new("u1", UserType::Regular).with_teams(["t1"]);

    let mine = Record::new("Account", "a1").with("assignedUserId", "u1");
    assert!(manager.check_entity_read(&user, &mine).unwrap());
    assert_eq!(relations.calls(), 0);

    let team = Record::new("Account", "a2").with("assignedUserId", "u2");
    assert!(manager.check_entity_read(&user, &team).unwrap());
    assert_eq!(relations.calls(), 1);
}

#[test]
fn test_store_failure_fails_closed() {
    let harness = TestHarness::new()
        .with_table(
            "u1",
            PermissionTable::new().with_scope("Account", json!({ "read": "team" })),
        )
        .with_relations(Arc::new(InMemoryRelations::unavailable()));
    let manager = harness.manager();
    let user = User::new("u1", UserType::Regular).with_teams(["t1"]);
    let account = Record::new("Account", "a1").with("assignedUserId", "u2");

    let err = manager.check_entity_read(&user, &account).unwrap_err();
    assert!(err.is_collaborator_failure());
    assert!(!manager.is_allowed(&user, &account, Action::Read).unwrap());
}
