/// ESCAPE: play the bundled text adventure in the terminal.
///
/// Usage: escape
///
/// Exits 0 when the story ends or input runs out, 1 on a story fault.

use choice_engine::content;
use choice_engine::core::engine::run_session;
use choice_engine::frontend::console::{ConsolePresenter, Pacing};
use choice_engine::frontend::input::LineInput;
use choice_engine::logging;
use std::io;
use std::process;
use tracing::error;

fn main() {
    logging::init("warn");

    let story = match content::escape() {
        Ok(story) => story,
        Err(e) => {
            error!(error = %e, "bundled story failed validation");
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut presenter = ConsolePresenter::new(stdout.lock(), story.hints(), Pacing::default());
    let mut input = LineInput::new(io::stdin().lock(), io::stdout());

    presenter.banner(content::ESCAPE_TITLE);

    if let Err(e) = run_session(&story, &mut presenter, &mut input) {
        error!(error = %e, "session failed");
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}
