//! Command-line interface for tt
//!
//! This module defines the CLI structure using clap derive macros.
//! Check commands live in `check`, the interactive loop in `shell`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::App;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;

mod account;
mod check;
mod init;
mod shell;

/// tt - Tick Tango
///
/// A role-based checklist: employees complete their checks, supervisors and
/// managers approve the work below them.
#[derive(Parser, Debug)]
#[command(name = "tt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Username to log in as
    #[arg(long, global = true, env = "TT_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(long, global = true, env = "TT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Path to a config file (defaults to ./.tt.toml when present)
    #[arg(long, global = true, env = "TT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .tt.toml (or the --config path)
    Init,

    /// Log in and print the current role
    Whoami,

    /// List the built-in accounts
    Users,

    /// Check management
    #[command(subcommand)]
    Check(CheckCommands),

    /// Completion and approval counts for the current view
    Stats {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Read commands from stdin against one live session
    Shell,
}

/// Check subcommands
#[derive(Subcommand, Debug)]
pub enum CheckCommands {
    /// List visible checks, one page at a time
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show one check
    Show {
        /// Check ID
        id: String,
    },

    /// Create a check (managers only)
    New(NewArgs),

    /// Toggle completion
    Complete {
        /// Check ID
        id: String,
    },

    /// Toggle approval
    Approve {
        /// Check ID
        id: String,
    },

    /// Delete a check (managers only)
    Delete {
        /// Check ID
        id: String,
    },
}

/// Filter, sort and search selection shared by listing and stats
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Filter: all, completed, uncompleted, approved, unapproved, employee,
    /// supervisor, manager, daily, weekly, monthly, low, medium, high
    #[arg(long)]
    pub filter: Option<String>,

    /// Sort: name, completed, approved, priority, none
    #[arg(long)]
    pub sort: Option<String>,

    /// Case-insensitive name search
    #[arg(long)]
    pub search: Option<String>,
}

/// Fields of a new check
#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Check name
    pub name: String,

    /// What needs doing
    #[arg(short, long)]
    pub description: String,

    /// Owner role: employee, supervisor, manager
    #[arg(long, default_value = "employee")]
    pub owner: String,

    /// Frequency: once, daily, weekly, monthly
    #[arg(long, default_value = "daily")]
    pub frequency: String,

    /// Priority: low, medium, high
    #[arg(long, default_value = "medium")]
    pub priority: String,

    /// Category: General, HR, Operations, Finance, Safety, Compliance
    #[arg(long, default_value = "General")]
    pub category: String,

    /// Due date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub due: Option<String>,

    /// Image URI
    #[arg(long)]
    pub image: Option<String>,
}

/// Flags every command shares
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub user: Option<String>,
    pub password: Option<String>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    /// Build an app from config and log in when `--user` was given.
    fn open_app(&self) -> Result<App> {
        let config = Config::resolve(self.config.as_ref())?;
        let mut app = App::new(config)?;
        if let Some(user) = self.user.as_deref() {
            app.login(user, self.password.as_deref().unwrap_or_default())?;
        }
        Ok(app)
    }

    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = GlobalOptions {
            user: self.user,
            password: self.password,
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };
        match self.command {
            Commands::Init => init::run(init::InitOptions { global }),
            Commands::Whoami => account::run_whoami(account::WhoamiOptions { global }),
            Commands::Users => account::run_users(account::UsersOptions { global }),
            Commands::Stats { view } => check::run_stats(check::StatsOptions { view, global }),
            Commands::Shell => shell::run(shell::ShellOptions { global }),
            Commands::Check(cmd) => match cmd {
                CheckCommands::List { view, page } => check::run_list(check::ListOptions {
                    view,
                    page,
                    global,
                }),
                CheckCommands::Show { id } => check::run_show(check::ShowOptions { id, global }),
                CheckCommands::New(args) => check::run_new(check::NewOptions { args, global }),
                CheckCommands::Complete { id } => check::run_complete(check::ToggleOptions {
                    id,
                    global,
                }),
                CheckCommands::Approve { id } => check::run_approve(check::ToggleOptions {
                    id,
                    global,
                }),
                CheckCommands::Delete { id } => {
                    check::run_delete(check::DeleteOptions { id, global })
                }
            },
        }
    }
}
