use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use super::state::Flag;

/// Newtype wrapper for scene identifiers. Scenes are keyed symbolically
/// ("armoury", "gate") so authored content stays readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for SceneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of ways a story can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndingTag {
    /// The lock gives and the player walks out the front.
    Unlock,
    /// The player is caught before getting out.
    Caught,
    /// The player gets over the wall the hard way.
    Escape,
}

impl EndingTag {
    pub const ALL: [EndingTag; 3] = [Self::Unlock, Self::Caught, Self::Escape];

    /// Stable upper-case code, e.g. "UNLOCK".
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unlock => "UNLOCK",
            Self::Caught => "CAUGHT",
            Self::Escape => "ESCAPE",
        }
    }

    /// The banner shown to the player when this ending is reached.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Unlock => "FREEDOM",
            Self::Caught => "TRAPPED",
            Self::Escape => "THE LONG WALK",
        }
    }
}

impl fmt::Display for EndingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A labeled outgoing edge of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub target: SceneId,
}

impl Choice {
    pub fn new(text: impl Into<String>, target: impl Into<SceneId>) -> Self {
        Self {
            text: text.into(),
            target: target.into(),
        }
    }
}

/// A flag granted simply by arriving in a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub flag: Flag,
    /// Shown only on the arrival that actually sets the flag.
    #[serde(default)]
    pub narration: Vec<String>,
}

/// A node of the story graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub title: String,
    pub body: Vec<String>,
    pub options: Vec<Choice>,
    #[serde(default)]
    pub pickups: Vec<Pickup>,
    #[serde(default)]
    pub ending: Option<EndingTag>,
}

impl Scene {
    pub fn new(id: impl Into<SceneId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: Vec::new(),
            options: Vec::new(),
            pickups: Vec::new(),
            ending: None,
        }
    }

    /// Shorthand for a terminal scene carrying `tag`.
    pub fn ending(id: impl Into<SceneId>, title: impl Into<String>, tag: EndingTag) -> Self {
        let mut scene = Self::new(id, title);
        scene.ending = Some(tag);
        scene
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn option(mut self, text: impl Into<String>, target: impl Into<SceneId>) -> Self {
        self.options.push(Choice::new(text, target));
        self
    }

    pub fn pickup(mut self, flag: impl Into<Flag>) -> Self {
        self.pickups.push(Pickup {
            flag: flag.into(),
            narration: Vec::new(),
        });
        self
    }

    /// A scene with no outgoing choices ends the session.
    pub fn is_terminal(&self) -> bool {
        self.options.is_empty()
    }

    /// Look up an option by its 0-based slot.
    pub fn choice(&self, slot: usize) -> Option<&Choice> {
        self.options.get(slot)
    }
}
