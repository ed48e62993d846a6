/// Story: a validated bundle of graph, override rules, and hints, plus the
/// RON loader and builder used to author one.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::graph::{GraphError, StoryGraph};
use crate::core::hints::{Hint, HintError, HintTable};
use crate::core::rules::{Branch, OverrideRule, OverrideTable, RuleError};
use crate::schema::condition::Condition;
use crate::schema::scene::{Scene, SceneId};
use crate::schema::state::Flag;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("override error: {0}")]
    Rules(#[from] RuleError),
    #[error("hint error: {0}")]
    Hints(#[from] HintError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("story has no scenes")]
    Empty,
}

/// Everything a session needs, validated together. Read-only once built,
/// so one `Story` can back any number of sessions.
#[derive(Debug, Clone)]
pub struct Story {
    graph: StoryGraph,
    overrides: OverrideTable,
    hints: HintTable,
}

impl Story {
    pub fn builder() -> StoryBuilder {
        StoryBuilder {
            entry: None,
            scenes: Vec::new(),
            rules: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Combine parts that were built separately, checking that the rules
    /// and hints only refer to scenes and choices the graph has.
    pub fn new(
        graph: StoryGraph,
        overrides: OverrideTable,
        hints: HintTable,
    ) -> Result<Story, StoryError> {
        overrides.validate(&graph)?;
        hints.validate(&graph)?;
        debug!(
            scenes = graph.len(),
            overrides = overrides.len(),
            hints = hints.len(),
            "story validated"
        );
        Ok(Story {
            graph,
            overrides,
            hints,
        })
    }

    /// Load a story from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Story, StoryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a story from a RON string.
    pub fn parse_ron(input: &str) -> Result<Story, StoryError> {
        let raw: RonStory = ron::from_str(input)?;

        let mut builder = Story::builder().entry(raw.entry).scenes(raw.scenes);
        for rule in raw.overrides {
            let branches = rule
                .branches
                .into_iter()
                .map(|b| Branch {
                    when: b.when,
                    set: b.set,
                    clear: b.clear,
                    narration: b.narration,
                    goto: b.goto,
                    stay: b.stay,
                })
                .collect();
            builder = builder.rule(OverrideRule::new(rule.scene, rule.choice, branches)?);
        }
        for hint in raw.hints {
            builder = builder.hint(Hint::new(hint.scene, hint.when, hint.text));
        }

        builder.build()
    }

    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    pub fn hints(&self) -> &HintTable {
        &self.hints
    }

    pub fn entry(&self) -> &SceneId {
        self.graph.entry()
    }

    /// Scenes no static edge or override can lead to from the entry.
    pub fn unreachable_scenes(&self) -> Vec<&SceneId> {
        let reached = self
            .graph
            .reachable_from(self.graph.entry(), self.overrides.edges());
        self.graph
            .scenes()
            .iter()
            .map(|s| &s.id)
            .filter(|id| !reached.contains(id))
            .collect()
    }
}

/// Builder for constructing a `Story` in code.
pub struct StoryBuilder {
    entry: Option<SceneId>,
    scenes: Vec<Scene>,
    rules: Vec<OverrideRule>,
    hints: Vec<Hint>,
}

impl StoryBuilder {
    /// Entry scene. Defaults to the first scene added.
    pub fn entry(mut self, id: impl Into<SceneId>) -> Self {
        self.entry = Some(id.into());
        self
    }

    pub fn scene(mut self, scene: Scene) -> Self {
        self.scenes.push(scene);
        self
    }

    pub fn scenes(mut self, scenes: impl IntoIterator<Item = Scene>) -> Self {
        self.scenes.extend(scenes);
        self
    }

    pub fn rule(mut self, rule: OverrideRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn hint(mut self, hint: Hint) -> Self {
        self.hints.push(hint);
        self
    }

    pub fn build(self) -> Result<Story, StoryError> {
        let entry = match self.entry {
            Some(entry) => entry,
            None => self
                .scenes
                .first()
                .map(|s| s.id.clone())
                .ok_or(StoryError::Empty)?,
        };
        let graph = StoryGraph::new(entry, self.scenes)?;
        let overrides = OverrideTable::from_rules(self.rules)?;
        let hints = self.hints.into_iter().collect();
        Story::new(graph, overrides, hints)
    }
}

// The RON layout mirrors the builder; these shapes only exist for
// deserialization.

#[derive(Debug, Deserialize)]
#[serde(rename = "Story")]
struct RonStory {
    entry: SceneId,
    scenes: Vec<Scene>,
    #[serde(default)]
    overrides: Vec<RonRule>,
    #[serde(default)]
    hints: Vec<RonHint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "Rule")]
struct RonRule {
    scene: SceneId,
    /// 1-based, as displayed.
    choice: usize,
    branches: Vec<RonBranch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "Branch")]
struct RonBranch {
    #[serde(default)]
    when: Condition,
    #[serde(default)]
    set: Vec<Flag>,
    #[serde(default)]
    clear: Vec<Flag>,
    #[serde(default)]
    narration: Vec<String>,
    #[serde(default)]
    goto: Option<SceneId>,
    #[serde(default)]
    stay: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "Hint")]
struct RonHint {
    scene: SceneId,
    #[serde(default)]
    when: Condition,
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::scene::EndingTag;

    const MINI: &str = r#"
Story(
    entry: "hall",
    scenes: [
        Scene(
            id: "hall",
            title: "Hall",
            body: ["A hall."],
            options: [
                Choice(text: "Open the door", target: "door"),
                Choice(text: "Take the lamp", target: "hall"),
            ],
        ),
        Scene(
            id: "door",
            title: "Door",
            body: ["It opens."],
            options: [],
            ending: Some(Escape),
        ),
        Scene(
            id: "dark",
            title: "Dark",
            body: ["Pitch black."],
            options: [],
            ending: Some(Caught),
        ),
    ],
    overrides: [
        Rule(
            scene: "hall",
            choice: 1,
            branches: [
                Branch(when: Lacks("lamp"), narration: ["You trip."], goto: Some("dark")),
            ],
        ),
        Rule(
            scene: "hall",
            choice: 2,
            branches: [
                Branch(set: ["lamp"], stay: true),
            ],
        ),
    ],
    hints: [
        Hint(scene: "hall", when: Lacks("lamp"), text: "It is very dark."),
    ],
)
"#;

    #[test]
    fn parses_story_from_ron() {
        let story = Story::parse_ron(MINI).unwrap();
        assert_eq!(story.entry().as_str(), "hall");
        assert_eq!(story.graph().len(), 3);
        assert_eq!(story.overrides().len(), 2);
        assert_eq!(story.hints().len(), 1);

        let trip = story.overrides().get(&SceneId::from("hall"), 0).unwrap();
        assert_eq!(trip.branches[0].goto, Some(SceneId::from("dark")));
        let lamp = story.overrides().get(&SceneId::from("hall"), 1).unwrap();
        assert!(lamp.branches[0].stay);
        assert_eq!(lamp.branches[0].when, Condition::Always);
    }

    #[test]
    fn unreachable_counts_override_edges() {
        let story = Story::parse_ron(MINI).unwrap();
        assert!(story.unreachable_scenes().is_empty());
    }

    #[test]
    fn builder_defaults_entry_to_first_scene() {
        let story = Story::builder()
            .scene(Scene::new("a", "A").option("End", "b"))
            .scene(Scene::ending("b", "B", EndingTag::Unlock))
            .build()
            .unwrap();
        assert_eq!(story.entry().as_str(), "a");
    }

    #[test]
    fn builder_rejects_empty_story() {
        assert!(matches!(Story::builder().build(), Err(StoryError::Empty)));
    }

    #[test]
    fn builder_surfaces_duplicate_override() {
        let rule = || {
            OverrideRule::new("a", 1, vec![Branch::when(Condition::Always)]).unwrap()
        };
        let err = Story::builder()
            .scene(Scene::new("a", "A").option("End", "b"))
            .scene(Scene::ending("b", "B", EndingTag::Unlock))
            .rule(rule())
            .rule(rule())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            StoryError::Rules(RuleError::DuplicateOverride { choice: 1, .. })
        ));
    }

    #[test]
    fn builder_rejects_hint_on_unknown_scene() {
        let err = Story::builder()
            .scene(Scene::new("a", "A").option("End", "b"))
            .scene(Scene::ending("b", "B", EndingTag::Unlock))
            .hint(Hint::new("c", Condition::Always, "boo"))
            .build()
            .unwrap_err();
        assert!(matches!(err, StoryError::Hints(HintError::UnknownScene(_))));
    }

    #[test]
    fn zero_choice_in_ron_is_rejected() {
        let bad = MINI.replace("choice: 1", "choice: 0");
        assert!(matches!(
            Story::parse_ron(&bad),
            Err(StoryError::Rules(RuleError::ZeroChoice(_)))
        ));
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(matches!(
            Story::parse_ron("Story(entry: "),
            Err(StoryError::Ron(_))
        ));
    }
}
