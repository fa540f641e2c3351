pub mod types;
pub mod config;
pub mod error;
pub mod rng;
pub mod map;
pub mod navigation;
pub mod combat;
pub mod reinforcement;
pub mod setup;
pub mod policy;
pub mod engine;
pub mod render;

#[cfg(test)]
mod tests;

pub use types::*;
pub use config::MatchConfig;
pub use error::{EngineError, IllegalMove, MapDefect};
pub use rng::MatchRng;
pub use policy::Policy;
pub use engine::Action;
