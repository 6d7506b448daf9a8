//! # Application Module
//!
//! Conversation handling for the travel assistant.
//!
//! ## Submodules
//!
//! - [`router`] - Classifies each message and dispatches it to workers
//! - [`worker`] - Specialised agents running a model/tool loop
//! - [`tooling`] - Flight, weather and social tools exposed to workers
//! - [`conversation`] - Per-sender history store
//! - [`stdio`] - Interactive chat on standard input/output

pub mod conversation;
pub mod router;
pub mod stdio;
pub(crate) mod text;
pub mod tooling;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;
