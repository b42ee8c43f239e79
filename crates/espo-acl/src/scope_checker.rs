//! Level-against-ownership evaluation.
//!
//! [`ScopeChecker`] turns a scope's level for an action into a decision,
//! consulting the ownership predicates of a [`ScopeCheckerData`] only when
//! the level requires them. Predicates backed by closures run at most once
//! and only when their branch is reached, since ownership checks may hit the
//! record store.

use std::cell::OnceCell;
use std::fmt;

use crate::error::Result;
use crate::scope_data::ScopeData;
use crate::table::{Action, Level};

type Check<'a> = Box<dyn Fn() -> Result<bool> + 'a>;

/// A boolean that is either known up front or computed on first use.
enum Predicate<'a> {
    Fixed(bool),
    Deferred { check: Check<'a>, cached: OnceCell<bool> },
}

impl<'a> Predicate<'a> {
    fn deferred(check: impl Fn() -> Result<bool> + 'a) -> Self {
        Predicate::Deferred {
            check: Box::new(check),
            cached: OnceCell::new(),
        }
    }

    fn eval(&self) -> Result<bool> {
        match self {
            Predicate::Fixed(value) => Ok(*value),
            Predicate::Deferred { check, cached } => {
                if let Some(value) = cached.get() {
                    return Ok(*value);
                }
                let value = check()?;
                let _ = cached.set(value);
                Ok(value)
            }
        }
    }
}

impl fmt::Debug for Predicate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Fixed(value) => write!(f, "Fixed({value})"),
            Predicate::Deferred { cached, .. } => match cached.get() {
                Some(value) => write!(f, "Deferred({value})"),
                None => write!(f, "Deferred(pending)"),
            },
        }
    }
}

/// Ownership facts about one (user, entity) pair.
///
/// Built with [`ScopeCheckerData::builder`]; unset predicates are `false`.
#[derive(Debug)]
pub struct ScopeCheckerData<'a> {
    is_own: Predicate<'a>,
    in_team: Predicate<'a>,
    in_account: Predicate<'a>,
    in_contact: Predicate<'a>,
    is_shared: Predicate<'a>,
}

impl<'a> ScopeCheckerData<'a> {
    /// Start building checker data.
    pub fn builder() -> ScopeCheckerDataBuilder<'a> {
        ScopeCheckerDataBuilder::default()
    }

    /// The user owns the entity.
    pub fn is_own(&self) -> Result<bool> {
        self.is_own.eval()
    }

    /// The entity belongs to one of the user's teams.
    pub fn in_team(&self) -> Result<bool> {
        self.in_team.eval()
    }

    /// The entity belongs to one of the portal user's accounts.
    pub fn in_account(&self) -> Result<bool> {
        self.in_account.eval()
    }

    /// The entity belongs to the portal user's contact.
    pub fn in_contact(&self) -> Result<bool> {
        self.in_contact.eval()
    }

    /// The entity is shared with the user.
    pub fn is_shared(&self) -> Result<bool> {
        self.is_shared.eval()
    }
}

/// Builder for [`ScopeCheckerData`].
#[derive(Debug)]
pub struct ScopeCheckerDataBuilder<'a> {
    is_own: Predicate<'a>,
    in_team: Predicate<'a>,
    in_account: Predicate<'a>,
    in_contact: Predicate<'a>,
    is_shared: Predicate<'a>,
}

impl Default for ScopeCheckerDataBuilder<'_> {
    fn default() -> Self {
        Self {
            is_own: Predicate::Fixed(false),
            in_team: Predicate::Fixed(false),
            in_account: Predicate::Fixed(false),
            in_contact: Predicate::Fixed(false),
            is_shared: Predicate::Fixed(false),
        }
    }
}

impl<'a> ScopeCheckerDataBuilder<'a> {
    /// Fix the own predicate.
    pub fn set_is_own(mut self, value: bool) -> Self {
        self.is_own = Predicate::Fixed(value);
        self
    }

    /// Defer the own predicate.
    pub fn set_is_own_checker(mut self, check: impl Fn() -> Result<bool> + 'a) -> Self {
        self.is_own = Predicate::deferred(check);
        self
    }

    /// Fix the team predicate.
    pub fn set_in_team(mut self, value: bool) -> Self {
        self.in_team = Predicate::Fixed(value);
        self
    }

    /// Defer the team predicate.
    pub fn set_in_team_checker(mut self, check: impl Fn() -> Result<bool> + 'a) -> Self {
        self.in_team = Predicate::deferred(check);
        self
    }

    /// Fix the account predicate.
    pub fn set_in_account(mut self, value: bool) -> Self {
        self.in_account = Predicate::Fixed(value);
        self
    }

    /// Defer the account predicate.
    pub fn set_in_account_checker(mut self, check: impl Fn() -> Result<bool> + 'a) -> Self {
        self.in_account = Predicate::deferred(check);
        self
    }

    /// Fix the contact predicate.
    pub fn set_in_contact(mut self, value: bool) -> Self {
        self.in_contact = Predicate::Fixed(value);
        self
    }

    /// Defer the contact predicate.
    pub fn set_in_contact_checker(mut self, check: impl Fn() -> Result<bool> + 'a) -> Self {
        self.in_contact = Predicate::deferred(check);
        self
    }

    /// Fix the shared predicate.
    pub fn set_is_shared(mut self, value: bool) -> Self {
        self.is_shared = Predicate::Fixed(value);
        self
    }

    /// Defer the shared predicate.
    pub fn set_is_shared_checker(mut self, check: impl Fn() -> Result<bool> + 'a) -> Self {
        self.is_shared = Predicate::deferred(check);
        self
    }

    /// Finish building.
    pub fn build(self) -> ScopeCheckerData<'a> {
        ScopeCheckerData {
            is_own: self.is_own,
            in_team: self.in_team,
            in_account: self.in_account,
            in_contact: self.in_contact,
            is_shared: self.is_shared,
        }
    }
}

/// Decides an action from scope data and ownership facts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeChecker;

impl ScopeChecker {
    /// Create a checker.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate.
    ///
    /// Boolean data decides outright. Without an action, a level table grants
    /// scope access. `all`/`yes` grant; without checker data nothing else
    /// does. Ownership levels nest: team includes own, contact includes own,
    /// account includes contact. Every other level denies.
    pub fn check(
        &self,
        data: &ScopeData,
        action: Option<Action>,
        checker_data: Option<&ScopeCheckerData<'_>>,
    ) -> Result<bool> {
        if data.is_false() {
            return Ok(false);
        }
        if data.is_true() {
            return Ok(true);
        }

        let Some(action) = action else {
            return Ok(true);
        };

        let level = data.level(action);

        if level.is_unconditional() {
            return Ok(true);
        }

        let Some(cd) = checker_data else {
            return Ok(false);
        };

        match level {
            Level::Own => Ok(cd.is_own()? || cd.is_shared()?),
            Level::Team => Ok(cd.is_own()? || cd.in_team()? || cd.is_shared()?),
            Level::Contact => Ok(cd.is_own()? || cd.in_contact()?),
            Level::Account => Ok(cd.is_own()? || cd.in_contact()? || cd.in_account()?),
            // none, no, and anything added later
            _ => Ok(false),
        }
    }
}
