//! Command-line interface for the mpm project bookmark manager
//!
//! This crate provides the `mpm` binary: adding, removing and listing
//! bookmarked projects, printing `cd` directives for the shell wrapper and
//! running the interactive browser.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mpm_config::SettingsManager;
use mpm_shell::ShellType;
use mpm_store::ProjectStore;
use mpm_types::Settings;

pub mod commands;
pub mod output;

pub use output::OutputFormat;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "mpm")]
#[command(about = "My Project Manager - A CLI tool to manage your projects")]
#[command(
    long_about = "My Project Manager (mpm) is a CLI tool that helps you manage your projects \
by storing their locations on the filesystem and providing quick navigation."
)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file path
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Project file path (defaults to ~/.mpm/config.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Add a new project
    Add {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,

        /// Project path
        #[arg(short, long)]
        path: Option<String>,

        /// Project category (optional)
        #[arg(short, long, default_value = "")]
        category: String,

        /// Use current directory as project path and folder name as project name
        #[arg(short = 'w', long = "working-dir")]
        working_dir: bool,
    },

    /// Remove a project
    Remove {
        /// Project name
        name: String,
    },

    /// List all projects
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Navigate to a project
    Go {
        /// Project name
        name: String,
    },

    /// Start interactive mode
    I,

    /// Print the shell integration script
    Init {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellType,
    },
}

/// Main CLI runner
pub struct CliRunner {
    settings: Settings,
    store: ProjectStore,
}

impl CliRunner {
    /// Resolve settings and open the project store
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let mut settings = if let Some(settings_path) = &cli.settings {
            SettingsManager::load_from_path(settings_path)?
        } else {
            SettingsManager::load_settings()?
        };

        if let Some(store_path) = &cli.store {
            settings.store_path = Some(store_path.clone());
        }

        let store = ProjectStore::open_default(&settings)?;
        log::debug!("Using project file {}", store.path().display());

        Ok(Self { settings, store })
    }

    /// Runner over an already opened store
    pub fn with_store(store: ProjectStore, settings: Settings) -> Self {
        Self { settings, store }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Run the CLI command
    pub fn run(&self, command: &Commands) -> anyhow::Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match command {
            Commands::Add {
                name,
                path,
                category,
                working_dir,
            } => self.run_add(name.as_deref(), path.as_deref(), category, *working_dir, &mut out),
            Commands::Remove { name } => self.run_remove(name, &mut out),
            Commands::List { format } => self.run_list(format, &mut out),
            Commands::Go { name } => self.run_go(name, &mut out),
            Commands::I => self.run_interactive(&mut out),
            Commands::Init { shell } => self.run_init(*shell, &mut out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_command_factory() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "mpm", "add", "-n", "demo", "-p", "~/code/demo", "-c", "work",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                name,
                path,
                category,
                working_dir,
            } => {
                assert_eq!(name.as_deref(), Some("demo"));
                assert_eq!(path.as_deref(), Some("~/code/demo"));
                assert_eq!(category, "work");
                assert!(!working_dir);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_globals_and_list_format() {
        let cli = Cli::try_parse_from([
            "mpm", "-vv", "--store", "/tmp/p.json", "list", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/p.json")));
        assert!(matches!(
            cli.command,
            Commands::List {
                format: OutputFormat::Json
            }
        ));

        let cli = Cli::try_parse_from(["mpm", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                format: OutputFormat::Text
            }
        ));
    }

    #[test]
    fn test_parse_init_and_interactive() {
        let cli = Cli::try_parse_from(["mpm", "init", "zsh"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { shell: ShellType::Zsh }));

        let cli = Cli::try_parse_from(["mpm", "i"]).unwrap();
        assert!(matches!(cli.command, Commands::I));

        assert!(Cli::try_parse_from(["mpm", "init", "tcsh"]).is_err());
        assert!(Cli::try_parse_from(["mpm", "go"]).is_err());
    }
}
