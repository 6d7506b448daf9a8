//! Tool adapters: typed wrappers around the flight, weather and social
//! providers that always answer with an [`Envelope`].

pub mod command;
mod envelope;
mod error;
pub mod flights;
pub mod social;
mod toolbox;
pub mod weather;

pub use command::{ToolCommand, ToolKind};
pub use envelope::Envelope;
pub use error::ToolError;
pub use toolbox::ToolBox;
