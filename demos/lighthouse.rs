/// Lighthouse example: authors a small story in code with the builder.
///
/// A keeper must light the lamp before the ship arrives. The oil flag
/// decides whether "Light the lamp" works, and the storeroom can be
/// searched repeatedly without counting as a new arrival.
///
/// Run with: cargo run --example lighthouse

use choice_engine::core::engine::run_session;
use choice_engine::core::hints::Hint;
use choice_engine::core::rules::{Branch, OverrideRule};
use choice_engine::core::story::Story;
use choice_engine::frontend::console::{ConsolePresenter, Pacing};
use choice_engine::frontend::scripted::ScriptedInput;
use choice_engine::schema::condition::Condition;
use choice_engine::schema::scene::{EndingTag, Scene};

fn main() {
    let story = Story::builder()
        .entry("stairs")
        .scene(
            Scene::new("stairs", "The Stairs")
                .line("Wind howls through the tower. A ship's light blinks offshore.")
                .option("Climb to the lamp room", "lamp_room")
                .option("Check the storeroom", "storeroom"),
        )
        .scene(
            Scene::new("storeroom", "The Storeroom")
                .line("Crates, rope, a smell of old paraffin.")
                .option("Rummage through the crates", "storeroom")
                .option("Back to the stairs", "stairs"),
        )
        .scene(
            Scene::new("lamp_room", "The Lamp Room")
                .line("The great lens sits dark and cold.")
                .option("Light the lamp", "guided_home")
                .option("Go back down", "stairs"),
        )
        .scene(
            Scene::ending("guided_home", "Guided Home", EndingTag::Unlock)
                .line("The beam sweeps the rocks. The ship turns in time."),
        )
        .scene(
            Scene::ending("wreck", "The Wreck", EndingTag::Caught)
                .line("The wick sputters dry. Out in the dark, timber splinters."),
        )
        .rule(
            OverrideRule::new(
                "storeroom",
                1,
                vec![
                    Branch::when(Condition::lacks("oil"))
                        .set("oil")
                        .say("Under a tarp: a full can of lamp oil.")
                        .stay(),
                    Branch::when(Condition::Always)
                        .say("Nothing else worth carrying.")
                        .stay(),
                ],
            )
            .expect("valid rule"),
        )
        .rule(
            OverrideRule::new(
                "lamp_room",
                1,
                vec![Branch::when(Condition::lacks("oil"))
                    .say("The reservoir is empty.")
                    .goto("wreck")],
            )
            .expect("valid rule"),
        )
        .hint(Hint::new(
            "lamp_room",
            Condition::lacks("oil"),
            "The oil gauge reads empty.",
        ))
        .build()
        .expect("Failed to build story");

    let mut presenter = ConsolePresenter::new(std::io::stdout(), story.hints(), Pacing::instant());
    presenter.banner("THE LIGHTHOUSE");

    // storeroom, rummage twice, back, climb, light
    let mut input = ScriptedInput::new([2, 1, 1, 2, 1, 1]);
    let result = run_session(&story, &mut presenter, &mut input).expect("Session failed");

    println!("\nResult: {:?}", result.ending_tag());
}
