use super::{AccessChecker, DefaultAccessChecker};
use crate::error::{Error, Result};
use crate::manager::AclManager;

/// Resolves the access checker of a scope.
///
/// Resolution order: the `aclDefs.<scope>` override for the manager's realm,
/// then [`DefaultAccessChecker`] for any registered scope. Unknown scopes
/// have no implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessCheckerFactory;

impl AccessCheckerFactory {
    /// Create a factory.
    pub fn new() -> Self {
        Self
    }

    /// Build the checker for `scope`, bound to `manager`.
    pub fn create<'m>(
        &self,
        scope: &str,
        manager: &'m AclManager,
    ) -> Result<Box<dyn AccessChecker + 'm>> {
        let key = manager.realm().access_checker_key();

        if let Some(name) = manager.metadata().acl_def(scope, key) {
            let ctor = manager.registry().access_checker(name).ok_or_else(|| {
                Error::UnknownImplementation {
                    scope: scope.to_string(),
                    name: name.to_string(),
                }
            })?;
            log::trace!("access checker '{name}' for scope '{scope}'");
            return Ok(ctor(manager));
        }

        if !manager.metadata().has_scope(scope) {
            return Err(Error::not_implemented(scope));
        }

        log::trace!("default access checker for scope '{scope}'");
        Ok(Box::new(DefaultAccessChecker::new(manager)))
    }
}
