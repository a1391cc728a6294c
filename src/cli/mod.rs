pub mod commands;
pub mod handlers;

pub use commands::{ArchiveFormatArg, CliArgs, Commands, ConfigArgs, GenerateArgs};
