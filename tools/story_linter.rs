/// Story Linter: validates a story file and reports on its structure.
///
/// Usage: story_linter <story.ron>
///
/// Hard authoring errors (dangling edges, duplicate overrides, missing
/// endings) fail the load and exit 1. Softer problems are warnings.

use choice_engine::core::story::Story;
use choice_engine::logging;
use choice_engine::schema::condition::Condition;
use choice_engine::schema::scene::EndingTag;
use choice_engine::schema::state::Flag;
use std::collections::BTreeSet;
use std::path::Path;
use std::process;

fn main() {
    logging::init("warn");

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: story_linter <story.ron>");
        process::exit(0);
    }

    let path = Path::new(&args[1]);
    let story = match Story::load_from_ron(path) {
        Ok(story) => story,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Loaded {}: {} scenes, {} overrides, {} hints",
        path.display(),
        story.graph().len(),
        story.overrides().len(),
        story.hints().len()
    );

    let warnings = lint_story(&story);

    println!("\n=== Story Lint Report ===\n");

    for tag in EndingTag::ALL {
        let scenes: Vec<&str> = story
            .graph()
            .scenes()
            .iter()
            .filter(|s| s.ending == Some(tag))
            .map(|s| s.id.as_str())
            .collect();
        println!("{:<8} {}", tag.code(), scenes.join(", "));
    }
    println!();

    if warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    println!("\nSummary: 0 errors, {} warnings", warnings.len());
}

fn lint_story(story: &Story) -> Vec<String> {
    let mut warnings = Vec::new();

    for id in story.unreachable_scenes() {
        warnings.push(format!("Scene '{}' can never be reached", id));
    }

    // Flags that something sets vs. flags that something reads
    let mut written: BTreeSet<&Flag> = BTreeSet::new();
    let mut read: BTreeSet<&Flag> = BTreeSet::new();

    for scene in story.graph().scenes() {
        written.extend(scene.pickups.iter().map(|p| &p.flag));
    }
    for rule in story.overrides().rules() {
        for branch in &rule.branches {
            written.extend(branch.set.iter());
            read.extend(branch.when.flags());
        }

        let shadowed = rule
            .branches
            .iter()
            .position(|b| b.when == Condition::Always)
            .filter(|&i| i + 1 < rule.branches.len());
        if let Some(i) = shadowed {
            warnings.push(format!(
                "Override for '{}' choice {} has branches after an unconditional branch {}",
                rule.scene,
                rule.choice(),
                i + 1
            ));
        }
    }
    for hint in story.hints().iter() {
        read.extend(hint.when.flags());
    }

    for flag in read.difference(&written) {
        warnings.push(format!("Flag '{}' is checked but never set", flag));
    }
    for flag in written.difference(&read) {
        warnings.push(format!("Flag '{}' is set but never checked", flag));
    }

    warnings
}
