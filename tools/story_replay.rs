/// Story Replay: play a story file with a fixed list of choices.
///
/// Usage: story_replay <story.ron> [choice ...] [--full]
///
/// Prints a compact transcript by default, or the full console rendering
/// with `--full`. Running out of choices aborts the session.

use choice_engine::core::engine::{run_session, SessionResult};
use choice_engine::core::story::Story;
use choice_engine::frontend::console::{ConsolePresenter, Pacing};
use choice_engine::frontend::scripted::{ScriptedInput, Transcript};
use choice_engine::logging;
use std::io;
use std::path::Path;
use std::process;

fn main() {
    logging::init("warn");

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut choices = Vec::new();
    let mut full = false;
    for arg in &args[2..] {
        if arg == "--full" {
            full = true;
            continue;
        }
        match arg.parse::<usize>() {
            Ok(n) => choices.push(n),
            Err(_) => {
                eprintln!("Not a choice number: {}", arg);
                print_usage();
                process::exit(1);
            }
        }
    }

    let story = match Story::load_from_ron(Path::new(&args[1])) {
        Ok(story) => story,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let mut input = ScriptedInput::new(choices);

    let outcome = if full {
        let mut presenter = ConsolePresenter::new(io::stdout(), story.hints(), Pacing::instant());
        run_session(&story, &mut presenter, &mut input)
    } else {
        let mut presenter = Transcript::with_hints(story.hints());
        let outcome = run_session(&story, &mut presenter, &mut input);
        for line in presenter.lines() {
            println!("{}", line);
        }
        outcome
    };

    match outcome {
        Ok(result) => print_summary(&result, &input),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    }
}

fn print_summary(result: &SessionResult, input: &ScriptedInput) {
    println!("\n--- Summary ---");
    match result.ending_tag() {
        Some(tag) => println!("Ending: {} ({})", tag.code(), tag.headline()),
        None => println!("Ending: none (aborted)"),
    }
    let path: Vec<&str> = result.trail().iter().map(|s| s.as_str()).collect();
    println!("Path: {}", path.join(" -> "));
    let flags: Vec<&str> = result.final_state().flags().into_iter().map(|f| f.as_str()).collect();
    println!("Flags: {}", if flags.is_empty() { "-".to_string() } else { flags.join(", ") });
    if input.rejected() > 0 {
        println!("Skipped {} out-of-range choices", input.rejected());
    }
    if input.remaining() > 0 {
        println!("{} choices left unused", input.remaining());
    }
}

fn print_usage() {
    println!("Usage: story_replay <story.ron> [choice ...] [--full]");
    println!();
    println!("Example: story_replay stories/escape.ron 2 1 2 1 1");
}
