//! Decisions for portal users.

use std::sync::Arc;

use espo_acl::PermissionTable;
use espo_core::{InMemoryRelations, Record, User, UserType};
use serde_json::json;

use crate::common::TestHarness;

fn portal_user() -> User {
    User::new("pu1", UserType::Portal)
        .with_accounts(["a1"])
        .with_contact("c1")
}

fn harness() -> TestHarness {
    TestHarness::new()
        .with_table(
            "pu1",
            PermissionTable::new()
                .with_scope("Case", json!({ "read": "account", "edit": "own", "delete": "no" }))
                .with_scope("Account", json!({ "read": "account" }))
                .with_scope("Contact", json!({ "read": "contact", "edit": "contact" }))
                .with_scope("Task", json!({ "read": "contact" }))
                .with_scope("Notification", json!({ "read": "own" })),
        )
        .with_relations(Arc::new(
            InMemoryRelations::new().with("Case", "k3", "accounts", ["a1", "a7"]),
        ))
}

#[test]
fn test_case_through_account() {
    let manager = harness().portal_manager();
    let user = portal_user();

    let by_account = Record::new("Case", "k1").with("accountId", "a1");
    let foreign = Record::new("Case", "k2").with("accountId", "a2");
    let linked = Record::new("Case", "k3");

    assert!(manager.check_entity_read(&user, &by_account).unwrap());
    assert!(!manager.check_entity_read(&user, &foreign).unwrap());
    assert!(manager.check_entity_read(&user, &linked).unwrap());
    assert!(!manager.check_entity_delete(&user, &by_account).unwrap());
}

#[test]
fn test_case_own_is_creator() {
    let manager = harness().portal_manager();
    let user = portal_user();

    let created = Record::new("Case", "k4").with("createdById", "pu1");
    let assigned = Record::new("Case", "k5").with("assignedUserId", "pu1");

    assert!(manager.check_entity_edit(&user, &created).unwrap());
    assert!(!manager.check_entity_edit(&user, &assigned).unwrap());
}

#[test]
fn test_account_and_contact_records() {
    let manager = harness().portal_manager();
    let user = portal_user();

    assert!(manager
        .check_entity_read(&user, &Record::new("Account", "a1"))
        .unwrap());
    assert!(!manager
        .check_entity_read(&user, &Record::new("Account", "a2"))
        .unwrap());
    assert!(manager
        .check_entity_edit(&user, &Record::new("Contact", "c1"))
        .unwrap());
    assert!(!manager
        .check_entity_read(&user, &Record::new("Contact", "c2"))
        .unwrap());
}

#[test]
fn test_task_through_contact_parent() {
    let manager = harness().portal_manager();
    let user = portal_user();

    let task = Record::new("Task", "t1")
        .with("parentType", "Contact")
        .with("parentId", "c1");
    let other = Record::new("Task", "t2")
        .with("parentType", "Contact")
        .with("parentId", "c9");

    assert!(manager.check_entity_read(&user, &task).unwrap());
    assert!(!manager.check_entity_read(&user, &other).unwrap());
}

#[test]
fn test_notification_addressed_to_user() {
    let manager = harness().portal_manager();
    let user = portal_user();

    let mine = Record::new("Notification", "n1").with("userId", "pu1");
    let theirs = Record::new("Notification", "n2")
        .with("userId", "u7")
        .with("createdById", "pu1");

    assert!(manager.check_entity_read(&user, &mine).unwrap());
    assert!(!manager.check_entity_read(&user, &theirs).unwrap());
}

#[test]
fn test_internal_realm_ignores_portal_overrides() {
    let manager = harness().manager();
    let user = portal_user();

    // Internal ownership of Account has no account axis
    assert!(!manager
        .check_entity_read(&user, &Record::new("Account", "a1"))
        .unwrap());
}
