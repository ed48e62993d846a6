/// ESCAPE walkthrough: replays one route to each ending of the bundled
/// story and prints compact transcripts.
///
/// Run with: cargo run --example escape_walkthrough

use choice_engine::content;
use choice_engine::core::engine::run_session;
use choice_engine::frontend::scripted::{ScriptedInput, Transcript};

fn main() {
    let story = content::escape().expect("Failed to load ESCAPE");

    let routes: [(&str, &[usize]); 4] = [
        ("Key first", &[2, 1, 2, 1, 1]),
        ("Straight to the gate", &[1, 2, 1, 1]),
        ("Cut hand, over the wall", &[1, 1, 1, 1, 1, 1, 2, 1]),
        ("Hook from the racks", &[1, 1, 2, 2, 1, 2, 1]),
    ];

    for (name, choices) in routes {
        println!("=== {} ===", name);

        let mut presenter = Transcript::with_hints(story.hints());
        let mut input = ScriptedInput::new(choices.iter().copied());
        let result = run_session(&story, &mut presenter, &mut input).expect("Session failed");

        for line in presenter.lines() {
            println!("{}", line);
        }
        let flags: Vec<String> = result
            .final_state()
            .flags()
            .into_iter()
            .map(|f| f.to_string())
            .collect();
        println!("flags: [{}]\n", flags.join(", "));
    }
}
