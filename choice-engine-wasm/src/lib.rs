//! WASM bindings for choice-engine: lets a web page play a story one
//! choice at a time.

use wasm_bindgen::prelude::*;

use choice_engine::content;
use choice_engine::core::engine::{Phase, Session};
use choice_engine::core::story::Story;
use choice_engine::schema::scene::Scene;
use choice_engine::schema::state::PlayerState;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(Debug, serde::Serialize)]
struct EndingInfo {
    code: &'static str,
    headline: &'static str,
}

/// Everything the page needs to draw the current scene.
#[derive(Debug, serde::Serialize)]
struct Frame {
    scene: String,
    title: String,
    body: Vec<String>,
    hints: Vec<String>,
    options: Vec<String>,
    /// Narration produced on the way here (override branches, pickups).
    narration: Vec<String>,
    ending: Option<EndingInfo>,
    flags: Vec<String>,
}

fn frame_for(story: &Story, scene: &Scene, state: &PlayerState, narration: Vec<String>) -> Frame {
    Frame {
        scene: scene.id.to_string(),
        title: scene.title.clone(),
        body: scene.body.clone(),
        hints: story
            .hints()
            .advice(&scene.id, state)
            .into_iter()
            .map(str::to_string)
            .collect(),
        options: scene.options.iter().map(|c| c.text.clone()).collect(),
        narration,
        ending: scene.ending.map(|tag| EndingInfo {
            code: tag.code(),
            headline: tag.headline(),
        }),
        flags: state.flags().into_iter().map(|f| f.to_string()).collect(),
    }
}

fn enter(story: &Story, session: &mut Session, mut narration: Vec<String>) -> Result<Frame, JsError> {
    let arrival = session
        .enter(story)
        .map_err(|e| JsError::new(&format!("Engine error: {e}")))?;
    narration.extend(arrival.narration);
    Ok(frame_for(story, arrival.scene, session.state(), narration))
}

// ---------------------------------------------------------------------------
// Playthrough: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct Playthrough {
    story: Story,
    session: Session,
    frame: Frame,
}

#[wasm_bindgen]
impl Playthrough {
    /// Start the bundled ESCAPE story.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Playthrough, JsError> {
        let story =
            content::escape().map_err(|e| JsError::new(&format!("Story load error: {e}")))?;
        Self::start(story)
    }

    /// Start a story supplied as RON source.
    pub fn from_ron(source: &str) -> Result<Playthrough, JsError> {
        let story =
            Story::parse_ron(source).map_err(|e| JsError::new(&format!("Story load error: {e}")))?;
        Self::start(story)
    }

    /// The current scene as JSON.
    pub fn frame(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.frame)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Pick the 1-based option `number` and return the next frame as JSON.
    pub fn choose(&mut self, number: usize) -> Result<String, JsError> {
        let step = self
            .session
            .choose(&self.story, number)
            .map_err(|e| JsError::new(&format!("Engine error: {e}")))?;
        self.frame = enter(&self.story, &mut self.session, step.narration)?;
        self.frame()
    }

    /// Throw away the current session and start over at the entry scene.
    pub fn reset(&mut self) -> Result<String, JsError> {
        let mut session = Session::new(&self.story);
        self.frame = enter(&self.story, &mut session, Vec::new())?;
        self.session = session;
        self.frame()
    }

    pub fn is_over(&self) -> bool {
        self.session.phase() == Phase::Terminated
    }
}

impl Playthrough {
    fn start(story: Story) -> Result<Playthrough, JsError> {
        let mut session = Session::new(&story);
        let frame = enter(&story, &mut session, Vec::new())?;
        Ok(Playthrough {
            story,
            session,
            frame,
        })
    }
}
