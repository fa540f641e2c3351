pub mod agent;
pub mod random;
pub mod heuristic;
pub mod scripted;

pub use agent::{make_policy, AgentConfig, AgentKind};
pub use random::RandomPolicy;
pub use heuristic::HeuristicPolicy;
pub use scripted::ScriptedPolicy;
