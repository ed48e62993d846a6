/// Advisory hints: context-sensitive lines a presenter may show alongside a
/// scene. They read the player's flags but never change them.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::graph::StoryGraph;
use crate::schema::condition::Condition;
use crate::schema::scene::SceneId;
use crate::schema::state::PlayerState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HintError {
    #[error("hint attached to unknown scene '{0}'")]
    UnknownScene(SceneId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub scene: SceneId,
    pub when: Condition,
    pub text: String,
}

impl Hint {
    pub fn new(scene: impl Into<SceneId>, when: Condition, text: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
            when,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HintTable {
    by_scene: FxHashMap<SceneId, Vec<Hint>>,
}

impl HintTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hint: Hint) {
        self.by_scene.entry(hint.scene.clone()).or_default().push(hint);
    }

    /// Hints for `scene` whose condition holds, in authored order.
    pub fn advice<'a>(&'a self, scene: &SceneId, state: &PlayerState) -> Vec<&'a str> {
        self.by_scene
            .get(scene)
            .into_iter()
            .flatten()
            .filter(|h| h.when.holds(state))
            .map(|h| h.text.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hint> {
        self.by_scene.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_scene.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_scene.is_empty()
    }

    pub fn validate(&self, graph: &StoryGraph) -> Result<(), HintError> {
        let mut scenes: Vec<&SceneId> = self.by_scene.keys().collect();
        scenes.sort();
        match scenes.into_iter().find(|id| !graph.contains(id.as_str())) {
            Some(id) => Err(HintError::UnknownScene(id.clone())),
            None => Ok(()),
        }
    }
}

impl FromIterator<Hint> for HintTable {
    fn from_iter<I: IntoIterator<Item = Hint>>(iter: I) -> Self {
        let mut table = Self::new();
        for hint in iter {
            table.insert(hint);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armoury_hints() -> HintTable {
        let safe = Condition::Any(vec![
            Condition::has("has_key"),
            Condition::has("found_hook"),
        ]);
        [
            Hint::new("armoury", safe.clone(), "You could get the item safely now."),
            Hint::new(
                "armoury",
                Condition::Not(Box::new(safe)),
                "Reaching in bare-handed looks risky.",
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn advice_follows_flags() {
        let hints = armoury_hints();
        let armoury = SceneId::from("armoury");
        assert_eq!(
            hints.advice(&armoury, &PlayerState::new()),
            vec!["Reaching in bare-handed looks risky."]
        );
        let equipped: PlayerState = ["found_hook"].into_iter().collect();
        assert_eq!(
            hints.advice(&armoury, &equipped),
            vec!["You could get the item safely now."]
        );
    }

    #[test]
    fn advice_is_repeatable() {
        let hints = armoury_hints();
        let armoury = SceneId::from("armoury");
        let state: PlayerState = ["has_key"].into_iter().collect();
        let before = state.clone();
        assert_eq!(hints.advice(&armoury, &state), hints.advice(&armoury, &state));
        assert_eq!(state, before);
    }

    #[test]
    fn scenes_without_hints_are_silent() {
        let hints = armoury_hints();
        assert!(hints.advice(&SceneId::from("gate"), &PlayerState::new()).is_empty());
        assert_eq!(hints.len(), 2);
    }
}
