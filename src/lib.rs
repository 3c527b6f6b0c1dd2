pub mod constants;
pub mod engine;
pub mod ghost;
pub mod levels;
pub mod maze;
pub mod mover;
pub mod player;
pub mod rng;
pub mod score_store;
pub mod types;
