//! Choice Engine: a scene-graph runtime for choice-driven text adventures.
//!
//! A story is a fixed graph of scenes joined by numbered choices. A small
//! set of player flags, accumulated during play, can override the authored
//! edges through an explicit table of rules keyed by scene and choice.

pub mod content;
pub mod core;
pub mod frontend;
pub mod logging;
pub mod schema;
