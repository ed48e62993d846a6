/// Story graph: the immutable scene collection and its static edges.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use thiserror::Error;

use crate::schema::scene::{Scene, SceneId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("unknown scene '{0}'")]
    UnknownScene(SceneId),
    #[error("scene '{0}' is defined more than once")]
    DuplicateScene(SceneId),
    #[error("entry scene '{0}' does not exist")]
    MissingEntry(SceneId),
    #[error("scene '{scene}' choice {choice} points at missing scene '{target}'")]
    DanglingEdge {
        scene: SceneId,
        choice: usize,
        target: SceneId,
    },
    #[error("terminal scene '{0}' has no ending tag")]
    MissingEndingTag(SceneId),
    #[error("scene '{0}' has choices but also an ending tag")]
    EndingOnNonTerminal(SceneId),
    #[error("no ending is reachable from entry scene '{0}'")]
    NoReachableEnding(SceneId),
}

/// A validated, read-only scene graph. Safe to share between sessions.
#[derive(Debug, Clone)]
pub struct StoryGraph {
    entry: SceneId,
    scenes: Vec<Scene>,
    index: FxHashMap<SceneId, usize>,
}

impl StoryGraph {
    /// Build and validate a graph. Fails on the first authoring error found.
    ///
    /// Checks, in order: unique ids, entry exists, every edge resolves,
    /// terminal scenes carry an ending tag and non-terminal scenes do not,
    /// and at least one ending is reachable from the entry.
    pub fn new(entry: SceneId, scenes: Vec<Scene>) -> Result<StoryGraph, GraphError> {
        let mut index = FxHashMap::default();
        for (i, scene) in scenes.iter().enumerate() {
            if index.insert(scene.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateScene(scene.id.clone()));
            }
        }

        if !index.contains_key(&entry) {
            return Err(GraphError::MissingEntry(entry));
        }

        for scene in &scenes {
            for (slot, choice) in scene.options.iter().enumerate() {
                if !index.contains_key(&choice.target) {
                    return Err(GraphError::DanglingEdge {
                        scene: scene.id.clone(),
                        choice: slot + 1,
                        target: choice.target.clone(),
                    });
                }
            }

            match (scene.is_terminal(), scene.ending) {
                (true, None) => return Err(GraphError::MissingEndingTag(scene.id.clone())),
                (false, Some(_)) => {
                    return Err(GraphError::EndingOnNonTerminal(scene.id.clone()))
                }
                _ => {}
            }
        }

        let graph = StoryGraph {
            entry,
            scenes,
            index,
        };

        let ending_reachable = {
            let reached = graph.reachable_from(&graph.entry, std::iter::empty());
            graph
                .scenes
                .iter()
                .any(|s| s.is_terminal() && reached.contains(&s.id))
        };
        if !ending_reachable {
            return Err(GraphError::NoReachableEnding(graph.entry.clone()));
        }

        Ok(graph)
    }

    pub fn entry(&self) -> &SceneId {
        &self.entry
    }

    pub fn scene(&self, id: &str) -> Result<&Scene, GraphError> {
        self.index
            .get(id)
            .map(|&i| &self.scenes[i])
            .ok_or_else(|| GraphError::UnknownScene(SceneId::from(id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Scenes in authored order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Breadth-first reachability over the static edges plus any `extra`
    /// (from, to) edges, such as override destinations.
    pub fn reachable_from<'a>(
        &'a self,
        start: &'a SceneId,
        extra: impl Iterator<Item = (&'a SceneId, &'a SceneId)>,
    ) -> FxHashSet<&'a SceneId> {
        let mut extra_edges: FxHashMap<&SceneId, Vec<&SceneId>> = FxHashMap::default();
        for (from, to) in extra {
            extra_edges.entry(from).or_default().push(to);
        }

        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            let Some(&i) = self.index.get(id) else {
                continue;
            };
            let statics = self.scenes[i].options.iter().map(|c| &c.target);
            let extras = extra_edges.get(id).into_iter().flatten().copied();
            for next in statics.chain(extras) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen
    }
}
