use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Conversational project generation platform
#[derive(Parser, Debug)]
#[command(
    name = "intentforge",
    about = "Generate, build, and package software projects from a plain-text description",
    version,
    author,
    long_about = "intentforge turns a natural-language project description into a complete, \
                  buildable project: it extracts requirements, synthesizes an architecture, \
                  generates the source files, and optionally builds, tests, and archives the \
                  result. Providers are pluggable (a deterministic mock or any \
                  OpenAI-compatible endpoint)."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate a project from a description",
        long_about = "Runs the full pipeline for a single project: requirement extraction, \
                      architecture synthesis, file generation, and on-disk materialization.\n\n\
                      Examples:\n  \
                      intentforge generate --name todo --description \"A todo app with dark mode\"\n  \
                      intentforge generate -n todo -d \"A todo app\" --build\n  \
                      intentforge generate -n todo -d \"A todo app\" --archive zip"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Show the effective configuration",
        long_about = "Prints the configuration resolved from INTENTFORGE_* environment \
                      variables and defaults, after validation."
    )]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(short = 'n', long, value_name = "NAME", help = "Project name")]
    pub name: String,

    #[arg(
        short = 'd',
        long,
        value_name = "TEXT",
        help = "Natural-language description of the project to generate"
    )]
    pub description: String,

    #[arg(
        short = 'm',
        long,
        value_name = "TEXT",
        help = "Additional conversation messages refining the requirements"
    )]
    pub message: Vec<String>,

    #[arg(long, help = "Run npm install/build/test after generation")]
    pub build: bool,

    #[arg(
        long,
        value_enum,
        value_name = "FORMAT",
        help = "Export the generated files as an archive"
    )]
    pub archive: Option<ArchiveFormatArg>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Storage directory for materialized files (overrides INTENTFORGE_STORAGE_PATH)"
    )]
    pub storage: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long, help = "Emit the configuration as JSON")]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormatArg {
    Zip,
    #[value(name = "tar.gz", alias = "tgz")]
    TarGz,
}

impl From<ArchiveFormatArg> for crate::archive::ArchiveFormat {
    fn from(arg: ArchiveFormatArg) -> Self {
        match arg {
            ArchiveFormatArg::Zip => crate::archive::ArchiveFormat::Zip,
            ArchiveFormatArg::TarGz => crate::archive::ArchiveFormat::TarGz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_generate_minimal() {
        let args = CliArgs::parse_from([
            "intentforge",
            "generate",
            "--name",
            "todo",
            "--description",
            "A todo app",
        ]);
        match args.command {
            Commands::Generate(generate_args) => {
                assert_eq!(generate_args.name, "todo");
                assert_eq!(generate_args.description, "A todo app");
                assert!(generate_args.message.is_empty());
                assert!(!generate_args.build);
                assert!(generate_args.archive.is_none());
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_with_options() {
        let args = CliArgs::parse_from([
            "intentforge",
            "generate",
            "-n",
            "todo",
            "-d",
            "A todo app with charts",
            "-m",
            "use tailwind",
            "-m",
            "needs dark mode",
            "--build",
            "--archive",
            "tar.gz",
            "-o",
            "/tmp/out",
        ]);
        match args.command {
            Commands::Generate(generate_args) => {
                assert_eq!(generate_args.message.len(), 2);
                assert!(generate_args.build);
                assert_eq!(generate_args.archive, Some(ArchiveFormatArg::TarGz));
                assert_eq!(generate_args.storage, Some(PathBuf::from("/tmp/out")));
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_config_command() {
        let args = CliArgs::parse_from(["intentforge", "config", "--json"]);
        match args.command {
            Commands::Config(config_args) => assert!(config_args.json),
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from([
            "intentforge",
            "--log-level",
            "debug",
            "config",
        ]);
        assert_eq!(args.log_level, Some("debug".to_string()));
        assert!(!args.verbose);
        assert!(!args.quiet);
    }
}
