/// The narrative engine: Session state machine and the render → choose →
/// transition loop.
///
/// A `Session` owns everything mutable about one playthrough (current scene,
/// flags, trail) and borrows the `Story` on each call, so any number of
/// sessions can run over one shared story without touching each other.

use thiserror::Error;
use tracing::{debug, info};

use crate::core::story::Story;
use crate::schema::scene::{Choice, EndingTag, Scene, SceneId};
use crate::schema::state::PlayerState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A graph lookup missed during play. Validation should make this
    /// unreachable; it means the story data is inconsistent.
    #[error("engine fault: scene '{0}' is not in the story")]
    Fault(SceneId),
    #[error("choice {choice} is out of range for scene '{scene}' ({count} options)")]
    InvalidChoice {
        scene: SceneId,
        choice: usize,
        count: usize,
    },
    #[error("terminal scene '{0}' has no ending tag")]
    MissingEnding(SceneId),
    #[error("the session has already ended")]
    SessionOver,
    #[error("the session is still playing at scene '{0}'")]
    StillPlaying(SceneId),
}

/// What the input source hands back: a 1-based option number already
/// checked against the range, or end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceResult {
    Picked(usize),
    Cancelled,
}

/// Renders scenes and outcomes. Nothing it returns influences the engine.
pub trait Presenter {
    /// Show a scene's title, body, and options. `state` is read-only
    /// context for advisory output.
    fn render(&mut self, scene: &Scene, state: &PlayerState);

    /// Supplementary narration from pickups or override branches.
    fn narrate(&mut self, _lines: &[String]) {}

    /// Echo the option the player just picked.
    fn acknowledge(&mut self, _number: usize, _choice: &Choice) {}

    fn report_ending(&mut self, tag: EndingTag);

    fn report_aborted(&mut self);
}

/// Supplies the player's choices.
///
/// Implementations must only return `Picked(n)` with `1 <= n <= option_count`
/// and must deal with malformed input themselves.
pub trait InputSource {
    fn get_choice(&mut self, option_count: usize) -> ChoiceResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Terminated,
}

/// How a playthrough finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    Ended {
        tag: EndingTag,
        scene: SceneId,
        state: PlayerState,
        trail: Vec<SceneId>,
    },
    Aborted {
        scene: SceneId,
        state: PlayerState,
        trail: Vec<SceneId>,
    },
}

impl SessionResult {
    pub fn ending_tag(&self) -> Option<EndingTag> {
        match self {
            Self::Ended { tag, .. } => Some(*tag),
            Self::Aborted { .. } => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }

    pub fn final_state(&self) -> &PlayerState {
        match self {
            Self::Ended { state, .. } | Self::Aborted { state, .. } => state,
        }
    }

    /// Every scene rendered during the session, in order.
    pub fn trail(&self) -> &[SceneId] {
        match self {
            Self::Ended { trail, .. } | Self::Aborted { trail, .. } => trail,
        }
    }
}

/// The scene the player is in, as returned by `Session::enter`.
#[derive(Debug)]
pub struct Arrival<'s> {
    pub scene: &'s Scene,
    /// Narration from pickups that fired on this arrival.
    pub narration: Vec<String>,
}

/// The outcome of one choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: SceneId,
    pub narration: Vec<String>,
    /// An override rule decided this step.
    pub overridden: bool,
    /// The next render is a re-render, not an arrival.
    pub stay: bool,
}

/// One playthrough. Created at the story's entry scene with no flags set.
#[derive(Debug, Clone)]
pub struct Session {
    current: SceneId,
    state: PlayerState,
    phase: Phase,
    arriving: bool,
    trail: Vec<SceneId>,
}

impl Session {
    pub fn new(story: &Story) -> Self {
        Self {
            current: story.entry().clone(),
            state: PlayerState::new(),
            phase: Phase::Playing,
            arriving: true,
            trail: Vec::new(),
        }
    }

    pub fn current(&self) -> &SceneId {
        &self.current
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn trail(&self) -> &[SceneId] {
        &self.trail
    }

    /// Enter the current scene ahead of rendering it.
    ///
    /// On a genuine arrival the scene's pickups are applied; a pickup's
    /// narration is returned only when its flag was not already set. After
    /// a `stay` step this is a re-render and pickups are skipped. Entering
    /// a terminal scene moves the session to `Terminated`.
    pub fn enter<'s>(&mut self, story: &'s Story) -> Result<Arrival<'s>, EngineError> {
        let scene = lookup(story, &self.current)?;
        let mut narration = Vec::new();

        if self.arriving {
            for pickup in &scene.pickups {
                if self.state.set(pickup.flag.clone()) {
                    debug!(scene = %scene.id, flag = %pickup.flag, "picked up");
                    narration.extend(pickup.narration.iter().cloned());
                }
            }
            self.arriving = false;
        }

        self.trail.push(scene.id.clone());
        if scene.is_terminal() {
            self.phase = Phase::Terminated;
        }

        Ok(Arrival { scene, narration })
    }

    /// Resolve the player's 1-based `number` in the current scene.
    ///
    /// An override rule for (scene, choice) is evaluated against the flags
    /// as they are now; otherwise the authored edge is taken.
    pub fn choose(&mut self, story: &Story, number: usize) -> Result<Step, EngineError> {
        if self.phase == Phase::Terminated {
            return Err(EngineError::SessionOver);
        }

        let scene = lookup(story, &self.current)?;
        let count = scene.options.len();
        let slot = match number.checked_sub(1) {
            Some(slot) if slot < count => slot,
            _ => {
                return Err(EngineError::InvalidChoice {
                    scene: scene.id.clone(),
                    choice: number,
                    count,
                })
            }
        };
        let authored = &scene.options[slot].target;

        let step = match story
            .overrides()
            .get(&scene.id, slot)
            .and_then(|rule| rule.apply(&mut self.state))
        {
            Some(resolution) => Step {
                next: resolution.goto.unwrap_or_else(|| authored.clone()),
                narration: resolution.narration,
                overridden: true,
                stay: resolution.stay,
            },
            None => Step {
                next: authored.clone(),
                narration: Vec::new(),
                overridden: false,
                stay: false,
            },
        };

        lookup(story, &step.next)?;
        debug!(
            from = %scene.id,
            choice = number,
            to = %step.next,
            overridden = step.overridden,
            stay = step.stay,
            "transition"
        );

        self.current = step.next.clone();
        self.arriving = !step.stay;
        Ok(step)
    }

    /// Close a terminated session into its result. A session that is
    /// still playing must be closed with `abort` instead.
    pub fn finish(self, story: &Story) -> Result<SessionResult, EngineError> {
        if self.phase != Phase::Terminated {
            return Err(EngineError::StillPlaying(self.current));
        }
        let scene = lookup(story, &self.current)?;
        let tag = scene
            .ending
            .ok_or_else(|| EngineError::MissingEnding(scene.id.clone()))?;
        Ok(SessionResult::Ended {
            tag,
            scene: self.current,
            state: self.state,
            trail: self.trail,
        })
    }

    /// Close the session early, e.g. when input ran out.
    pub fn abort(self) -> SessionResult {
        SessionResult::Aborted {
            scene: self.current,
            state: self.state,
            trail: self.trail,
        }
    }
}

fn lookup<'s>(story: &'s Story, id: &SceneId) -> Result<&'s Scene, EngineError> {
    story
        .graph()
        .scene(id.as_str())
        .map_err(|_| EngineError::Fault(id.clone()))
}

/// Play one session to completion.
///
/// Each iteration enters the current scene, renders it, and either reports
/// the ending or asks for a choice and follows it. Cancellation from the
/// input source ends the session with `SessionResult::Aborted`.
pub fn run_session(
    story: &Story,
    presenter: &mut dyn Presenter,
    input: &mut dyn InputSource,
) -> Result<SessionResult, EngineError> {
    let mut session = Session::new(story);

    loop {
        let arrival = session.enter(story)?;
        if !arrival.narration.is_empty() {
            presenter.narrate(&arrival.narration);
        }
        let scene = arrival.scene;
        presenter.render(scene, session.state());

        if session.phase() == Phase::Terminated {
            let result = session.finish(story)?;
            if let Some(tag) = result.ending_tag() {
                info!(ending = %tag, scenes = result.trail().len(), "session ended");
                presenter.report_ending(tag);
            }
            return Ok(result);
        }

        let number = match input.get_choice(scene.options.len()) {
            ChoiceResult::Picked(number) => number,
            ChoiceResult::Cancelled => {
                info!(scene = %scene.id, "session aborted");
                presenter.report_aborted();
                return Ok(session.abort());
            }
        };

        if let Some(choice) = number.checked_sub(1).and_then(|slot| scene.choice(slot)) {
            presenter.acknowledge(number, choice);
        }

        let step = session.choose(story, number)?;
        if !step.narration.is_empty() {
            presenter.narrate(&step.narration);
        }
    }
}
