use super::{DefaultOwnershipChecker, OwnershipChecker, PortalDefaultOwnershipChecker};
use crate::error::{Error, Result};
use crate::manager::{AclManager, Realm};

/// Resolves the ownership checker of a scope.
///
/// Resolution order: the `aclDefs.<scope>` override for the manager's realm,
/// then the realm default for any registered scope. Unknown scopes have no
/// implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipCheckerFactory;

impl OwnershipCheckerFactory {
    /// Create a factory.
    pub fn new() -> Self {
        Self
    }

    /// Build the checker for `scope`, bound to `manager`.
    pub fn create<'m>(
        &self,
        scope: &str,
        manager: &'m AclManager,
    ) -> Result<Box<dyn OwnershipChecker + 'm>> {
        let realm = manager.realm();

        if let Some(name) = manager
            .metadata()
            .acl_def(scope, realm.ownership_checker_key())
        {
            let ctor = manager.registry().ownership_checker(name).ok_or_else(|| {
                Error::UnknownImplementation {
                    scope: scope.to_string(),
                    name: name.to_string(),
                }
            })?;
            log::trace!("ownership checker '{name}' for scope '{scope}'");
            return Ok(ctor(manager));
        }

        if !manager.metadata().has_scope(scope) {
            return Err(Error::not_implemented(scope));
        }

        log::trace!("default ownership checker for scope '{scope}' ({realm})");
        Ok(match realm {
            Realm::Internal => Box::new(DefaultOwnershipChecker::new(manager)),
            Realm::Portal => Box::new(PortalDefaultOwnershipChecker::new(manager)),
        })
    }
}
