use serde::{Deserialize, Serialize};

use super::state::{Flag, PlayerState};

/// A predicate over the player's flags, used by override branches and hints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    Always,
    Has(Flag),
    Lacks(Flag),
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn has(flag: impl Into<Flag>) -> Self {
        Self::Has(flag.into())
    }

    pub fn lacks(flag: impl Into<Flag>) -> Self {
        Self::Lacks(flag.into())
    }

    /// Evaluate against the flags as they are right now.
    pub fn holds(&self, state: &PlayerState) -> bool {
        match self {
            Self::Always => true,
            Self::Has(flag) => state.has(flag.as_str()),
            Self::Lacks(flag) => !state.has(flag.as_str()),
            Self::All(parts) => parts.iter().all(|c| c.holds(state)),
            Self::Any(parts) => parts.iter().any(|c| c.holds(state)),
            Self::Not(inner) => !inner.holds(state),
        }
    }

    /// Every flag this condition mentions, in depth-first order.
    pub fn flags(&self) -> Vec<&Flag> {
        let mut out = Vec::new();
        self.collect_flags(&mut out);
        out
    }

    fn collect_flags<'a>(&'a self, out: &mut Vec<&'a Flag>) {
        match self {
            Self::Always => {}
            Self::Has(flag) | Self::Lacks(flag) => out.push(flag),
            Self::All(parts) | Self::Any(parts) => {
                for part in parts {
                    part.collect_flags(out);
                }
            }
            Self::Not(inner) => inner.collect_flags(out),
        }
    }
}
