//! Routing: classify a message, dispatch it to one or more workers (or the
//! fallback), and merge parallel results.

mod decision;
mod orchestrator;
mod prompts;

pub use decision::RoutingDecision;
pub use orchestrator::{Orchestrator, RouteOutcome};

#[cfg(test)]
mod tests;
