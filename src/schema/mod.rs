pub mod condition;
pub mod scene;
pub mod state;
