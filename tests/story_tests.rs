/// Story loading and validation tests against the RON fixtures.

use choice_engine::core::engine::run_session;
use choice_engine::core::graph::GraphError;
use choice_engine::core::rules::RuleError;
use choice_engine::core::story::{Story, StoryError};
use choice_engine::frontend::scripted::{ScriptedInput, Transcript};
use choice_engine::schema::scene::{EndingTag, SceneId};
use std::path::Path;

fn load(name: &str) -> Result<Story, StoryError> {
    Story::load_from_ron(&Path::new("tests/fixtures").join(name))
}

#[test]
fn bundled_story_file_loads() {
    let story = Story::load_from_ron(Path::new("stories/escape.ron")).unwrap();
    assert_eq!(story.graph().len(), 10);
    for tag in EndingTag::ALL {
        assert!(
            story.graph().scenes().iter().any(|s| s.ending == Some(tag)),
            "no scene ends with {}",
            tag
        );
    }
}

#[test]
fn repeated_attempts_each_evaluate_the_override() {
    let story = load("trapped_chest.ron").unwrap();
    let mut presenter = Transcript::new();
    let mut input = ScriptedInput::new([1, 1]);
    let result = run_session(&story, &mut presenter, &mut input).unwrap();

    // first attempt cuts and stays, second sees the cut and collapses
    assert_eq!(result.ending_tag(), Some(EndingTag::Caught));
    assert_eq!(presenter.narration(), vec!["A blade nicks your wrist."]);
    assert_eq!(
        result.trail(),
        &[
            SceneId::from("vault"),
            SceneId::from("vault"),
            SceneId::from("collapse"),
        ]
    );
}

#[test]
fn flags_gained_between_attempts_change_the_branch() {
    let story = load("trapped_chest.ron").unwrap();
    let mut presenter = Transcript::new();
    let mut input = ScriptedInput::new([1, 2, 1]);
    let result = run_session(&story, &mut presenter, &mut input).unwrap();

    assert_eq!(result.ending_tag(), Some(EndingTag::Unlock));
    assert!(result.final_state().has("injured"));
    assert!(result.final_state().has("tongs"));
}

#[test]
fn dangling_edge_is_rejected() {
    let err = load("dangling_edge.ron").unwrap_err();
    assert!(matches!(
        err,
        StoryError::Graph(GraphError::DanglingEdge { choice: 2, ref target, .. })
            if target.as_str() == "well"
    ));
}

#[test]
fn duplicate_override_is_rejected() {
    let err = load("duplicate_override.ron").unwrap_err();
    assert!(matches!(
        err,
        StoryError::Rules(RuleError::DuplicateOverride { choice: 1, .. })
    ));
}

#[test]
fn terminal_without_ending_is_rejected() {
    let err = load("missing_ending.ron").unwrap_err();
    assert!(matches!(
        err,
        StoryError::Graph(GraphError::MissingEndingTag(ref id)) if id.as_str() == "limbo"
    ));
}

#[test]
fn story_without_reachable_ending_is_rejected() {
    let err = load("no_way_out.ron").unwrap_err();
    assert!(matches!(err, StoryError::Graph(GraphError::NoReachableEnding(_))));
}

#[test]
fn ending_tags_are_a_closed_set() {
    let err = load("unknown_ending.ron").unwrap_err();
    assert!(matches!(err, StoryError::Ron(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load("does_not_exist.ron").unwrap_err();
    assert!(matches!(err, StoryError::Io(_)));
}
