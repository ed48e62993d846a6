/// Override rules: conditional transitions that supersede an authored edge
/// for one (scene, choice) pair.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::core::graph::StoryGraph;
use crate::schema::condition::Condition;
use crate::schema::scene::SceneId;
use crate::schema::state::{Flag, PlayerState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("more than one override for scene '{scene}' choice {choice}")]
    DuplicateOverride { scene: SceneId, choice: usize },
    #[error("override targets unknown scene '{0}'")]
    UnknownScene(SceneId),
    #[error("override for scene '{scene}' uses choice {choice}, but the scene has {count}")]
    ChoiceOutOfRange {
        scene: SceneId,
        choice: usize,
        count: usize,
    },
    #[error("override for scene '{scene}' choice {choice} has no branches")]
    NoBranches { scene: SceneId, choice: usize },
    #[error("override for scene '{scene}' choice {choice} sends the player to missing scene '{target}'")]
    DanglingTarget {
        scene: SceneId,
        choice: usize,
        target: SceneId,
    },
    #[error("choice numbers start at 1 (scene '{0}')")]
    ZeroChoice(SceneId),
}

/// One guarded outcome of an override rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Branch {
    pub when: Condition,
    pub set: Vec<Flag>,
    pub clear: Vec<Flag>,
    pub narration: Vec<String>,
    /// Destination; `None` keeps the authored edge.
    pub goto: Option<SceneId>,
    /// Re-render the destination without treating it as a fresh arrival.
    pub stay: bool,
}

impl Branch {
    pub fn when(when: Condition) -> Self {
        Self {
            when,
            ..Self::default()
        }
    }

    pub fn set(mut self, flag: impl Into<Flag>) -> Self {
        self.set.push(flag.into());
        self
    }

    pub fn clear(mut self, flag: impl Into<Flag>) -> Self {
        self.clear.push(flag.into());
        self
    }

    pub fn say(mut self, line: impl Into<String>) -> Self {
        self.narration.push(line.into());
        self
    }

    pub fn goto(mut self, target: impl Into<SceneId>) -> Self {
        self.goto = Some(target.into());
        self
    }

    pub fn stay(mut self) -> Self {
        self.stay = true;
        self
    }
}

/// The effect of a fired branch, as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub narration: Vec<String>,
    pub goto: Option<SceneId>,
    pub stay: bool,
}

/// Ordered branches for a single (scene, slot) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRule {
    pub scene: SceneId,
    /// 0-based option slot.
    pub slot: usize,
    pub branches: Vec<Branch>,
}

impl OverrideRule {
    /// Build a rule from the 1-based choice number the player sees.
    pub fn new(
        scene: impl Into<SceneId>,
        choice: usize,
        branches: Vec<Branch>,
    ) -> Result<OverrideRule, RuleError> {
        let scene = scene.into();
        if choice == 0 {
            return Err(RuleError::ZeroChoice(scene));
        }
        Ok(OverrideRule {
            scene,
            slot: choice - 1,
            branches,
        })
    }

    /// The 1-based choice number this rule is keyed on.
    pub fn choice(&self) -> usize {
        self.slot + 1
    }

    /// Fire the first branch whose condition holds against `state` as it is
    /// now, applying its flag changes. `None` means no branch matched and
    /// the authored edge should be taken.
    pub fn apply(&self, state: &mut PlayerState) -> Option<Resolution> {
        let branch = self.branches.iter().find(|b| b.when.holds(state))?;

        for flag in &branch.clear {
            state.clear(flag.as_str());
        }
        for flag in &branch.set {
            state.set(flag.clone());
        }

        debug!(
            scene = %self.scene,
            choice = self.choice(),
            goto = ?branch.goto,
            stay = branch.stay,
            "override fired"
        );

        Some(Resolution {
            narration: branch.narration.clone(),
            goto: branch.goto.clone(),
            stay: branch.stay,
        })
    }
}

/// All override rules of a story, keyed uniquely by (scene, slot).
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    rules: FxHashMap<(SceneId, usize), OverrideRule>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(
        rules: impl IntoIterator<Item = OverrideRule>,
    ) -> Result<OverrideTable, RuleError> {
        let mut table = Self::new();
        for rule in rules {
            table.insert(rule)?;
        }
        Ok(table)
    }

    /// Add a rule. A second rule for the same key is an authoring error.
    pub fn insert(&mut self, rule: OverrideRule) -> Result<(), RuleError> {
        let key = (rule.scene.clone(), rule.slot);
        if self.rules.contains_key(&key) {
            return Err(RuleError::DuplicateOverride {
                scene: rule.scene,
                choice: rule.slot + 1,
            });
        }
        self.rules.insert(key, rule);
        Ok(())
    }

    pub fn get(&self, scene: &SceneId, slot: usize) -> Option<&OverrideRule> {
        self.rules.get(&(scene.clone(), slot))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules sorted by scene then choice, for reporting.
    pub fn rules(&self) -> Vec<&OverrideRule> {
        let mut rules: Vec<&OverrideRule> = self.rules.values().collect();
        rules.sort_by(|a, b| (&a.scene, a.slot).cmp(&(&b.scene, b.slot)));
        rules
    }

    /// Every (from, to) edge an override can introduce.
    pub fn edges(&self) -> impl Iterator<Item = (&SceneId, &SceneId)> {
        self.rules.values().flat_map(|rule| {
            rule.branches
                .iter()
                .filter_map(move |b| b.goto.as_ref().map(|to| (&rule.scene, to)))
        })
    }

    /// Check every rule against the graph it will run on.
    pub fn validate(&self, graph: &StoryGraph) -> Result<(), RuleError> {
        for rule in self.rules() {
            let scene = graph
                .scene(rule.scene.as_str())
                .map_err(|_| RuleError::UnknownScene(rule.scene.clone()))?;

            if rule.slot >= scene.options.len() {
                return Err(RuleError::ChoiceOutOfRange {
                    scene: rule.scene.clone(),
                    choice: rule.choice(),
                    count: scene.options.len(),
                });
            }

            if rule.branches.is_empty() {
                return Err(RuleError::NoBranches {
                    scene: rule.scene.clone(),
                    choice: rule.choice(),
                });
            }

            for target in rule.branches.iter().filter_map(|b| b.goto.as_ref()) {
                if !graph.contains(target.as_str()) {
                    return Err(RuleError::DanglingTarget {
                        scene: rule.scene.clone(),
                        choice: rule.choice(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
