//! Presenters and input sources the engine is driven by: a paced terminal
//! front end for play, and scripted doubles for tests and replays.

pub mod console;
pub mod input;
pub mod scripted;
