use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::application::stdio::LOCAL_SENDER;

#[derive(Parser, Debug)]
#[command(
    name = "flub",
    version,
    about = "Travel assistant routing questions to weather, flight and social workers"
)]
pub struct Cli {
    /// Configuration file (defaults to config/flub.toml when present)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    #[arg(long, short, value_enum, default_value_t = RunMode::Serve)]
    pub mode: RunMode,
    /// Overrides `server.bind` from the configuration
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    /// Conversation id used by chat mode
    #[arg(long, default_value = LOCAL_SENDER)]
    pub sender: String,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RunMode {
    /// HTTP API server
    Serve,
    /// Interactive chat on the terminal
    Chat,
}
