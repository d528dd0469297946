use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pollbook",
    about = "Pollbook: create polls, vote once, see the results",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// State file holding polls, vote records, and the theme flag
    #[arg(long, global = true, env = "POLLBOOK_STORE")]
    pub store: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new poll
    Create(CreateArgs),
    /// List all polls
    List(ListArgs),
    /// Show a poll and its results
    Show(ShowArgs),
    /// Vote on a poll
    Vote(VoteArgs),
    /// Reset a poll's votes and allow voting again
    Reset(ResetArgs),
    /// Delete a poll
    Delete(DeleteArgs),
    /// Show or change the colour theme
    Theme(ThemeArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    pub question: String,
    /// Answer option (repeat for each option)
    #[arg(short = 'o', long = "option", required = true)]
    pub options: Vec<String>,
    /// Allow selecting more than one option
    #[arg(short, long)]
    pub multiple: bool,
    /// Maximum selections for a multiple-choice poll
    #[arg(long, default_value = "1", requires = "multiple")]
    pub max: usize,
}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct VoteArgs {
    pub id: String,
    /// Option numbers as listed by `show`, starting at 1
    #[arg(required = true)]
    pub choices: Vec<usize>,
}

#[derive(Args)]
pub struct ResetArgs {
    pub id: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ThemeArgs {
    pub action: Option<ThemeAction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeAction {
    Toggle,
    Dark,
    Light,
}
