//! Checker resolution through metadata and the registry.

use espo_acl::{
    AccessCheckerFactory, Action, DefaultAccessChecker, Error, ImportAccessChecker,
    OwnershipCheckerFactory, PermissionTable, UserAccessChecker,
};
use espo_core::{Record, User, UserType};

use crate::common::TestHarness;

#[test]
fn test_default_checker_for_registered_scope() {
    let manager = TestHarness::new().manager();
    let checker = AccessCheckerFactory::new().create("Lead", &manager).unwrap();
    assert_eq!(checker.name(), DefaultAccessChecker::NAME);
}

#[test]
fn test_override_for_user_scope() {
    let manager = TestHarness::new().manager();
    let checker = AccessCheckerFactory::new().create("User", &manager).unwrap();
    assert_eq!(checker.name(), UserAccessChecker::NAME);
}

#[test]
fn test_unknown_scope_is_not_implemented() {
    let harness = TestHarness::new().with_table("u1", PermissionTable::new());
    let manager = harness.manager();
    let user = User::new("u1", UserType::Regular);

    let err = AccessCheckerFactory::new()
        .create("Widget", &manager)
        .err()
        .unwrap();
    assert!(err.is_not_implemented());

    let err = OwnershipCheckerFactory::new()
        .create("Widget", &manager)
        .err()
        .unwrap();
    assert!(err.is_not_implemented());

    let err = manager
        .is_allowed(&user, &Record::new("Widget", "w1"), Action::Read)
        .unwrap_err();
    assert!(err.is_not_implemented());
}

#[test]
fn test_custom_registration_resolved_from_metadata() {
    let mut harness = TestHarness::new().with_table(
        "u1",
        PermissionTable::new().with_scope("Lead", true),
    );
    harness
        .metadata
        .set(&["aclDefs", "Lead", "accessCheckerClassName"], "audit.lead".into());
    harness
        .registry
        .register_access("audit.lead", |_| Box::new(ImportAccessChecker));
    let manager = harness.manager();
    let user = User::new("u1", UserType::Regular);

    assert!(manager.check_scope(&user, "Lead", Some(Action::Read)).unwrap());
    assert!(!manager.check_scope(&user, "Lead", Some(Action::Edit)).unwrap());
}

#[test]
fn test_unregistered_override_is_configuration_error() {
    let mut harness = TestHarness::new().with_table("u1", PermissionTable::new());
    harness
        .metadata
        .set(&["aclDefs", "Lead", "accessCheckerClassName"], "missing".into());
    let manager = harness.manager();
    let user = User::new("u1", UserType::Regular);

    let err = manager.check_scope(&user, "Lead", None).unwrap_err();
    assert!(matches!(err, Error::UnknownImplementation { .. }));
    assert!(!err.is_not_implemented());
}
