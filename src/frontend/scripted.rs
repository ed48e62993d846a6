/// Scripted doubles: canned choices in, a structured transcript out.

use std::collections::VecDeque;

use crate::core::engine::{ChoiceResult, InputSource, Presenter};
use crate::core::hints::HintTable;
use crate::schema::scene::{Choice, EndingTag, Scene, SceneId};
use crate::schema::state::PlayerState;

/// Replays a fixed list of 1-based choices, then cancels.
///
/// Numbers outside the offered range are skipped, the way a real input
/// source would re-prompt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<usize>,
    requests: Vec<usize>,
    rejected: usize,
}

impl ScriptedInput {
    pub fn new(choices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            queue: choices.into_iter().collect(),
            requests: Vec::new(),
            rejected: 0,
        }
    }

    /// The option count of every request made so far.
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }

    /// Choices still queued.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Scripted numbers dropped for being out of range.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl InputSource for ScriptedInput {
    fn get_choice(&mut self, option_count: usize) -> ChoiceResult {
        self.requests.push(option_count);
        while let Some(n) = self.queue.pop_front() {
            if (1..=option_count).contains(&n) {
                return ChoiceResult::Picked(n);
            }
            self.rejected += 1;
        }
        ChoiceResult::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Rendered {
        scene: SceneId,
        advice: Vec<String>,
    },
    Narrated(Vec<String>),
    Chose {
        number: usize,
        text: String,
    },
    Ended(EndingTag),
    Aborted,
}

/// Records everything the engine asks to have presented.
#[derive(Debug, Clone, Default)]
pub struct Transcript<'h> {
    hints: Option<&'h HintTable>,
    entries: Vec<TranscriptEntry>,
}

impl<'h> Transcript<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also record which hints each render would show.
    pub fn with_hints(hints: &'h HintTable) -> Self {
        Self {
            hints: Some(hints),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Scene ids in render order.
    pub fn scenes(&self) -> Vec<&SceneId> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                TranscriptEntry::Rendered { scene, .. } => Some(scene),
                _ => None,
            })
            .collect()
    }

    /// All narration lines, in order.
    pub fn narration(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                TranscriptEntry::Narrated(lines) => Some(lines),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// A plain-text rendering, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for entry in &self.entries {
            match entry {
                TranscriptEntry::Rendered { scene, advice } => {
                    out.push(format!("[{}]", scene));
                    out.extend(advice.iter().map(|a| format!("  hint: {}", a)));
                }
                TranscriptEntry::Narrated(lines) => {
                    out.extend(lines.iter().map(|l| format!("  {}", l)));
                }
                TranscriptEntry::Chose { number, text } => {
                    out.push(format!("  > ({}) {}", number, text));
                }
                TranscriptEntry::Ended(tag) => out.push(format!("ENDING: {}", tag)),
                TranscriptEntry::Aborted => out.push("ABORTED".to_string()),
            }
        }
        out
    }
}

impl Presenter for Transcript<'_> {
    fn render(&mut self, scene: &Scene, state: &PlayerState) {
        let advice: Vec<String> = self
            .hints
            .map(|h| {
                h.advice(&scene.id, state)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        self.entries.push(TranscriptEntry::Rendered {
            scene: scene.id.clone(),
            advice,
        });
    }

    fn narrate(&mut self, lines: &[String]) {
        self.entries.push(TranscriptEntry::Narrated(lines.to_vec()));
    }

    fn acknowledge(&mut self, number: usize, choice: &Choice) {
        self.entries.push(TranscriptEntry::Chose {
            number,
            text: choice.text.clone(),
        });
    }

    fn report_ending(&mut self, tag: EndingTag) {
        self.entries.push(TranscriptEntry::Ended(tag));
    }

    fn report_aborted(&mut self) {
        self.entries.push(TranscriptEntry::Aborted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_skips_out_of_range() {
        let mut input = ScriptedInput::new([5, 2, 1]);
        assert_eq!(input.get_choice(3), ChoiceResult::Picked(2));
        assert_eq!(input.get_choice(3), ChoiceResult::Picked(1));
        assert_eq!(input.get_choice(3), ChoiceResult::Cancelled);
        assert_eq!(input.requests(), &[3, 3, 3]);
        assert_eq!(input.rejected(), 1);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn transcript_lines() {
        let mut t = Transcript::new();
        t.render(&Scene::new("gate", "The Gate").option("Back", "gate"), &PlayerState::new());
        t.acknowledge(1, &Choice::new("Back", "gate"));
        t.narrate(&["You hesitate.".to_string()]);
        t.report_ending(EndingTag::Caught);
        assert_eq!(
            t.lines(),
            vec![
                "[gate]".to_string(),
                "  > (1) Back".to_string(),
                "  You hesitate.".to_string(),
                "ENDING: CAUGHT".to_string(),
            ]
        );
        assert_eq!(t.narration(), vec!["You hesitate."]);
    }
}
