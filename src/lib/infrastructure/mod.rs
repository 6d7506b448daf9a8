//! Adapters to the outside world: model APIs, data providers and the HTTP API.

pub mod model;
pub mod providers;
pub mod server;
