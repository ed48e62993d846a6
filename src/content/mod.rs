//! Stories compiled into the crate.

use crate::core::story::{Story, StoryError};

/// RON source of the bundled ESCAPE story.
pub const ESCAPE_RON: &str = include_str!("../../stories/escape.ron");

/// Title shown on the ESCAPE banner.
pub const ESCAPE_TITLE: &str = "ESCAPE";

/// Parse and validate the bundled ESCAPE story.
pub fn escape() -> Result<Story, StoryError> {
    Story::parse_ron(ESCAPE_RON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_story_is_valid() {
        let story = escape().unwrap();
        assert_eq!(story.entry().as_str(), "wake_up");
        assert_eq!(story.graph().len(), 10);
        assert_eq!(story.overrides().len(), 4);
        assert_eq!(story.hints().len(), 2);
        assert!(story.unreachable_scenes().is_empty());
    }
}
