//! State store: shared season state behind a closed set of commands

pub mod game_store;
pub mod state;

pub use game_store::GameStore;
pub use state::GameState;
