//! Worker agents: a persona, a model and a declared tool set, driven through
//! a bounded tool-calling loop.

mod descriptor;
mod errors;
mod runner;

pub use descriptor::WorkerDescriptor;
pub use errors::WorkerError;
pub use runner::Worker;
