use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "frontline")]
#[command(about = "Offline-first sync core for the frontline point-of-sale")]
#[command(long_about = "frontline - offline action queue for the point-of-sale

Mutations that could not reach the backend are kept in a local queue and
replayed in order once the terminal is back online. This tool inspects and
drives that queue, the cached collections and the stored session.

QUICK START:
  frontline sync status          Show pending actions
  frontline sync list            List queued actions, oldest first
  frontline sync run             Replay the queue against the backend
  frontline reset --force        Wipe all local state

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

ENVIRONMENT:
  FRONTLINE_HOME     Data directory (default: ~/.frontline)
  RUST_LOG           Log filter, overrides general.log_filter")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and drive the offline action queue
    ///
    /// # Examples
    ///
    ///   frontline sync status
    ///   frontline sync list -n 5
    ///   frontline sync enqueue deleteCustomer --payload 42
    ///   frontline sync run
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },

    /// Inspect cached collections
    ///
    /// Collections are products, customers, bills and expenses. A successful
    /// sync invalidates all of them.
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Show or change the stored session
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Wipe all local state
    ///
    /// Removes the action queue, every cached collection and the stored
    /// session. Pending actions that were never synced are lost.
    Reset {
        /// Confirm the reset
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    ///
    /// Example: frontline completions zsh > ~/.zsh/completions/_frontline
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,

        /// Show installation instructions
        #[arg(long, short = 'i')]
        install: bool,
    },
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Show sync queue status
    ///
    /// Displays the pending count and the age of the oldest action.
    Status,

    /// List queued actions
    ///
    /// Actions are shown in replay order, oldest first.
    List {
        /// Maximum actions to show
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,
    },

    /// Add an action to the queue
    ///
    /// Payload is the entity as JSON for create/update types, or the bare
    /// id for delete types.
    Enqueue {
        /// Action type (createProduct, deleteCustomer, syncExpenses, ...)
        action_type: String,

        /// Payload as JSON
        #[arg(long, short = 'p')]
        payload: String,
    },

    /// Replay pending actions against the backend
    ///
    /// Stops at the first action the backend rejects; it stays at the head
    /// of the queue for the next run.
    Run,

    /// Remove one action from the queue without syncing it
    Drop {
        /// Queued action id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Print a cached collection and its age
    Show {
        /// Collection name (products, customers, bills, expenses)
        collection: String,
    },
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Show the stored session
    Show,

    /// Sign in with a role
    Login {
        /// Role (owner, salesman)
        role: String,
    },

    /// Sign out
    Logout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_enqueue() {
        let cli = Cli::parse_from([
            "frontline",
            "-o",
            "json",
            "sync",
            "enqueue",
            "deleteCustomer",
            "--payload",
            "42",
        ]);

        assert_eq!(cli.output, Some(OutputFormat::Json));
        match cli.command {
            Commands::Sync {
                command: SyncCommands::Enqueue {
                    action_type,
                    payload,
                },
            } => {
                assert_eq!(action_type, "deleteCustomer");
                assert_eq!(payload, "42");
            },
            _ => panic!("expected sync enqueue"),
        }
    }

    #[test]
    fn test_output_defaults_to_config() {
        let cli = Cli::parse_from(["frontline", "sync", "status"]);
        assert_eq!(cli.output, None);
    }
}
