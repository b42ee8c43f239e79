//! Permission data of a single scope.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::table::{Action, Level};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Known(Level),
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Raw {
    Boolean(bool),
    Levels(BTreeMap<Action, Entry>),
}

/// Immutable view of one scope's permissions.
///
/// Either a boolean (every action granted or denied outright) or a table of
/// action → level. Missing actions are not granted. Level tokens the
/// pipeline does not know are kept but read as [`Level::None`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeData {
    raw: Raw,
}

impl ScopeData {
    /// Scope data that grants everything.
    pub fn granted() -> Self {
        Self {
            raw: Raw::Boolean(true),
        }
    }

    /// Scope data that denies everything.
    pub fn denied() -> Self {
        Self {
            raw: Raw::Boolean(false),
        }
    }

    /// Build from typed levels.
    pub fn from_levels(levels: impl IntoIterator<Item = (Action, Level)>) -> Self {
        Self {
            raw: Raw::Levels(
                levels
                    .into_iter()
                    .map(|(action, level)| (action, Entry::Known(level)))
                    .collect(),
            ),
        }
    }

    /// Build from a raw table value: `true`, `false` or an object mapping
    /// action names to level tokens.
    ///
    /// Unknown action keys are skipped. Non-string level values and any other
    /// raw shape are rejected.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        match raw {
            Value::Bool(b) => Ok(Self {
                raw: Raw::Boolean(*b),
            }),
            Value::Object(map) => Self::from_map(map),
            other => Err(Error::InvalidScopeData(format!(
                "expected a boolean or an object, got {other}"
            ))),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let mut levels = BTreeMap::new();

        for (key, value) in map {
            let Ok(action) = key.parse::<Action>() else {
                log::trace!("ignoring unknown action '{key}' in scope data");
                continue;
            };

            let token = value.as_str().ok_or_else(|| {
                Error::InvalidScopeData(format!("level of '{key}' must be a string, got {value}"))
            })?;

            let entry = match token.parse::<Level>() {
                Ok(level) => Entry::Known(level),
                Err(_) => Entry::Unrecognized(token.to_string()),
            };
            levels.insert(action, entry);
        }

        Ok(Self {
            raw: Raw::Levels(levels),
        })
    }

    /// Whether the data grants every action outright.
    pub fn is_true(&self) -> bool {
        self.raw == Raw::Boolean(true)
    }

    /// Whether the data denies every action outright.
    pub fn is_false(&self) -> bool {
        self.raw == Raw::Boolean(false)
    }

    /// Whether the data is a plain boolean.
    pub fn is_boolean(&self) -> bool {
        matches!(self.raw, Raw::Boolean(_))
    }

    /// Level of an action.
    ///
    /// Boolean data reads as `Yes`/`No`. Missing actions and unrecognized
    /// tokens read as `None`.
    pub fn level(&self, action: Action) -> Level {
        match &self.raw {
            Raw::Boolean(true) => Level::Yes,
            Raw::Boolean(false) => Level::No,
            Raw::Levels(levels) => match levels.get(&action) {
                Some(Entry::Known(level)) => *level,
                Some(Entry::Unrecognized(token)) => {
                    log::debug!("unrecognized level '{token}' for '{action}' read as none");
                    Level::None
                }
                None => Level::None,
            },
        }
    }

    /// Whether an action is present with a level token the pipeline knows.
    pub fn has_recognized_level(&self, action: Action) -> bool {
        match &self.raw {
            Raw::Boolean(_) => true,
            Raw::Levels(levels) => matches!(levels.get(&action), Some(Entry::Known(_))),
        }
    }

    /// Actions present in the table, in table order.
    pub fn actions(&self) -> Vec<Action> {
        match &self.raw {
            Raw::Boolean(_) => Vec::new(),
            Raw::Levels(levels) => levels.keys().copied().collect(),
        }
    }
}
