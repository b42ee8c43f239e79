//! Decisions on `User` records.

use espo_acl::{Level, OwnershipChecker, Permission, PermissionTable, UserOwnershipChecker};
use espo_core::{Entity, User, UserType};
use serde_json::json;

use crate::common::{TestHarness, uniform};

/// Ownership checker that must never run.
struct Tripwire;

impl OwnershipChecker for Tripwire {
    fn name(&self) -> &'static str {
        "tripwire"
    }

    fn check_own(&self, _: &User, _: &dyn Entity) -> espo_acl::Result<bool> {
        panic!("ownership consulted");
    }

    fn check_team(&self, _: &User, _: &dyn Entity) -> espo_acl::Result<bool> {
        panic!("ownership consulted");
    }
}

#[test]
fn test_regular_user_edits_only_own_record() {
    let harness = TestHarness::new().with_table(
        "u1",
        PermissionTable::new().with_scope("User", json!({ "read": "all", "edit": "own" })),
    );
    let manager = harness.manager();
    let user = User::new("u1", UserType::Regular);

    let me = User::new("u1", UserType::Regular);
    let colleague = User::new("u2", UserType::Regular);

    assert!(manager.check_entity_edit(&user, &me).unwrap());
    assert!(!manager.check_entity_edit(&user, &colleague).unwrap());
    assert!(manager.check_entity_read(&user, &colleague).unwrap());
}

#[test]
fn test_admin_cannot_create_super_admin() {
    let harness = TestHarness::new()
        .with_table("a1", PermissionTable::new().with_scope("User", uniform("all")))
        .with_table("s1", PermissionTable::new().with_scope("User", true));
    let manager = harness.manager();
    let target = User::new("s9", UserType::SuperAdmin);

    let admin = User::new("a1", UserType::Admin);
    let super_admin = User::new("s1", UserType::SuperAdmin);

    assert!(!manager.check_entity_create(&admin, &target).unwrap());
    assert!(!manager.check_entity_edit(&admin, &target).unwrap());
    assert!(manager.check_entity_create(&super_admin, &target).unwrap());
}

#[test]
fn test_system_user_is_never_edited_or_deleted() {
    let harness = TestHarness::new()
        .with_table("s1", PermissionTable::new().with_scope("User", true))
        .with_table("a1", PermissionTable::new().with_scope("User", uniform("all")));
    let manager = harness.manager();
    let system = User::new("system", UserType::System);

    for actor in [
        User::new("s1", UserType::SuperAdmin),
        User::new("a1", UserType::Admin),
    ] {
        assert!(!manager.check_entity_edit(&actor, &system).unwrap());
        assert!(!manager.check_entity_delete(&actor, &system).unwrap());
    }
}

#[test]
fn test_portal_user_read_depends_only_on_portal_permission() {
    let mut harness = TestHarness::new()
        .with_table(
            "u1",
            PermissionTable::new()
                .with_scope("User", false)
                .with_permission(Permission::Portal, Level::Yes),
        )
        .with_table(
            "u2",
            PermissionTable::new()
                .with_scope("User", uniform("all"))
                .with_permission(Permission::Portal, Level::All),
        )
        .with_table("u3", PermissionTable::new().with_scope("User", true));
    harness
        .registry
        .register_ownership(UserOwnershipChecker::NAME, |_| Box::new(Tripwire));
    let manager = harness.manager();
    let portal_user = User::new("p1", UserType::Portal);

    assert!(manager
        .check_entity_read(&User::new("u1", UserType::Regular), &portal_user)
        .unwrap());
    assert!(!manager
        .check_entity_read(&User::new("u2", UserType::Regular), &portal_user)
        .unwrap());
    assert!(!manager
        .check_entity_read(&User::new("u3", UserType::Admin), &portal_user)
        .unwrap());
}

#[test]
fn test_stream_follows_user_permission() {
    let harness = TestHarness::new()
        .with_table(
            "u1",
            PermissionTable::new()
                .with_scope("User", false)
                .with_permission(Permission::User, Level::Yes),
        )
        .with_table("u2", PermissionTable::new().with_scope("User", true));
    let manager = harness.manager();
    let target = User::new("u9", UserType::Regular);

    let permitted = User::new("u1", UserType::Regular);
    let restricted = User::new("u2", UserType::Regular);

    assert!(manager.check_entity_stream(&permitted, &target).unwrap());
    assert!(!manager.check_entity_stream(&restricted, &target).unwrap());
    assert!(manager.check_entity_stream(&restricted, &restricted).unwrap());
}
