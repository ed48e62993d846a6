/// Terminal presenter with cosmetic pacing.

use std::io::Write;
use std::thread;
use std::time::Duration;
use tracing::warn;

use crate::core::engine::Presenter;
use crate::core::hints::HintTable;
use crate::schema::scene::{Choice, EndingTag, Scene};
use crate::schema::state::PlayerState;

const RULE_WIDTH: usize = 60;

/// Display timing. Purely cosmetic: nothing in the engine waits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Delay between characters of a printed line.
    pub char_delay: Duration,
    /// Pause after each body line.
    pub line_pause: Duration,
    /// Pause after a scene body, before hints and options.
    pub body_pause: Duration,
    pub hint_pause: Duration,
    /// Pause after a block of pickup or override narration.
    pub narration_pause: Duration,
    /// Pause after the opening banner.
    pub banner_pause: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            char_delay: Duration::ZERO,
            line_pause: Duration::from_millis(400),
            body_pause: Duration::from_millis(300),
            hint_pause: Duration::from_millis(250),
            narration_pause: Duration::from_millis(400),
            banner_pause: Duration::from_millis(500),
        }
    }
}

impl Pacing {
    /// No pauses at all.
    pub fn instant() -> Self {
        Self {
            char_delay: Duration::ZERO,
            line_pause: Duration::ZERO,
            body_pause: Duration::ZERO,
            hint_pause: Duration::ZERO,
            narration_pause: Duration::ZERO,
            banner_pause: Duration::ZERO,
        }
    }

    fn pause(duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Writes scenes to any `Write`, with hints looked up from a `HintTable`.
///
/// Write failures are logged and otherwise ignored; losing the display
/// must not change how the story plays out.
pub struct ConsolePresenter<'h, W: Write> {
    out: W,
    hints: &'h HintTable,
    pacing: Pacing,
}

impl<'h, W: Write> ConsolePresenter<'h, W> {
    pub fn new(out: W, hints: &'h HintTable, pacing: Pacing) -> Self {
        Self { out, hints, pacing }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The opening title card.
    pub fn banner(&mut self, title: &str) {
        self.rule('=');
        self.line(title);
        self.rule('=');
        Pacing::pause(self.pacing.banner_pause);
    }

    fn line(&mut self, text: &str) {
        let result = if self.pacing.char_delay.is_zero() {
            writeln!(self.out, "{}", text)
        } else {
            self.typewrite(text)
        };
        if let Err(e) = result.and_then(|_| self.out.flush()) {
            warn!(error = %e, "failed to write to terminal");
        }
    }

    fn typewrite(&mut self, text: &str) -> std::io::Result<()> {
        let mut buf = [0u8; 4];
        for c in text.chars() {
            self.out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
            self.out.flush()?;
            Pacing::pause(self.pacing.char_delay);
        }
        writeln!(self.out)
    }

    fn rule(&mut self, ch: char) {
        let rule: String = std::iter::repeat(ch).take(RULE_WIDTH).collect();
        self.line(&rule);
    }
}

impl<W: Write> Presenter for ConsolePresenter<'_, W> {
    fn render(&mut self, scene: &Scene, state: &PlayerState) {
        self.rule('-');
        self.line(&format!("[{}]", scene.title));
        self.rule('-');

        for text in &scene.body {
            self.line(text);
            Pacing::pause(self.pacing.line_pause);
        }
        Pacing::pause(self.pacing.body_pause);

        let hints = self.hints;
        let advice = hints.advice(&scene.id, state);
        if !advice.is_empty() {
            self.line("");
            for text in advice {
                self.line(text);
            }
            Pacing::pause(self.pacing.hint_pause);
        }

        if scene.is_terminal() {
            return;
        }

        self.line("");
        for (i, choice) in scene.options.iter().enumerate() {
            self.line(&format!("  ({}) {}", i + 1, choice.text));
        }
    }

    fn narrate(&mut self, lines: &[String]) {
        for text in lines {
            self.line(text);
        }
        Pacing::pause(self.pacing.narration_pause);
    }

    fn acknowledge(&mut self, number: usize, choice: &Choice) {
        self.line(&format!("You chose: ({}) {}\n", number, choice.text));
    }

    fn report_ending(&mut self, tag: EndingTag) {
        self.rule('-');
        self.line(&format!("ENDING: {}", tag.headline()));
        self.rule('-');
        self.line("Thanks for playing!");
    }

    fn report_aborted(&mut self) {
        self.line("");
        self.line("The story stops here, unfinished.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hints::Hint;
    use crate::schema::condition::Condition;

    fn render_to_string(scene: &Scene, hints: &HintTable, state: &PlayerState) -> String {
        let mut presenter = ConsolePresenter::new(Vec::new(), hints, Pacing::instant());
        presenter.render(scene, state);
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn renders_title_body_and_numbered_options() {
        let scene = Scene::new("corridor", "The Corridor")
            .line("The corridor is dark.")
            .option("Go left", "armoury")
            .option("Go right", "courtyard");
        let out = render_to_string(&scene, &HintTable::new(), &PlayerState::new());
        assert!(out.contains("[The Corridor]"));
        assert!(out.contains("The corridor is dark."));
        assert!(out.contains("  (1) Go left\n"));
        assert!(out.contains("  (2) Go right\n"));
    }

    #[test]
    fn hints_depend_on_state() {
        let scene = Scene::new("armoury", "The Armoury").option("Leave", "corridor");
        let hints: HintTable = [Hint::new(
            "armoury",
            Condition::lacks("found_hook"),
            "Reaching in bare-handed looks risky.",
        )]
        .into_iter()
        .collect();

        let bare = render_to_string(&scene, &hints, &PlayerState::new());
        assert!(bare.contains("Reaching in bare-handed looks risky."));

        let hooked: PlayerState = ["found_hook"].into_iter().collect();
        let equipped = render_to_string(&scene, &hints, &hooked);
        assert!(!equipped.contains("risky"));
    }

    #[test]
    fn terminal_scene_has_no_option_list() {
        let scene = Scene::ending("road", "Forest Road", EndingTag::Unlock)
            .line("You disappear into the trees.");
        let out = render_to_string(&scene, &HintTable::new(), &PlayerState::new());
        assert!(!out.contains("(1)"));
    }

    #[test]
    fn ending_banner_uses_headline() {
        let hints = HintTable::new();
        let mut presenter = ConsolePresenter::new(Vec::new(), &hints, Pacing::instant());
        presenter.report_ending(EndingTag::Escape);
        let out = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(out.contains("ENDING: THE LONG WALK"));
        assert!(out.contains("Thanks for playing!"));
    }

    #[test]
    fn narration_has_its_own_pause() {
        assert_eq!(Pacing::instant().narration_pause, Duration::ZERO);
        assert!(!Pacing::default().narration_pause.is_zero());

        let hints = HintTable::new();
        let mut presenter = ConsolePresenter::new(Vec::new(), &hints, Pacing::instant());
        presenter.narrate(&["You light it.".to_string()]);
        let out = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(out.contains("You light it."));
    }

    #[test]
    fn typewriter_output_matches_plain_output() {
        let hints = HintTable::new();
        let pacing = Pacing {
            char_delay: Duration::from_nanos(1),
            ..Pacing::instant()
        };
        let mut presenter = ConsolePresenter::new(Vec::new(), &hints, pacing);
        presenter.banner("ESCAPE");
        let out = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "ESCAPE");
        assert_eq!(lines[0].len(), RULE_WIDTH);
    }
}
