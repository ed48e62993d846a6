pub mod engine;
pub mod graph;
pub mod hints;
pub mod rules;
pub mod story;
