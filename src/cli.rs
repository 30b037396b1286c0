use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "users")]
#[command(about = "A terminal console for a remote user-management API", version)]
#[command(after_help = "EXAMPLES:
    users login --email eve.holt@reqres.in    Log in (prompts for the password)
    users list --page 2                       Show the second page of users
    users list --format cards                 Show users as cards
    users edit 7 --first-name Mike            Rename a user
    users delete 7 --yes                      Delete a user without confirmation
    users console                             Start the interactive console")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Layout for user listings (table, cards, json)
    #[arg(long, short = 'o', global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show detailed error information and debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Explicitly requested format, considering --json flag
    pub fn requested_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and remember the session token
    #[command(after_help = "EXAMPLES:
    users login
    users login --email eve.holt@reqres.in --password cityslicka")]
    Login(LoginArgs),
    /// Forget the session token
    Logout,
    /// Show whether a session is active
    Status,
    /// List one page of users
    #[command(
        alias = "ls",
        after_help = "EXAMPLES:
    users list
    users list --page 2 --format cards"
    )]
    List(ListArgs),
    /// Edit a user's name or email
    #[command(after_help = "EXAMPLES:
    users edit 7 --first-name Mike
    users edit 9 --page 2 --email tobias@example.com
    users edit 3                     Prompt for every field")]
    Edit(EditArgs),
    /// Delete a user
    #[command(
        alias = "rm",
        after_help = "EXAMPLES:
    users delete 7
    users delete 9 --page 2 --yes"
    )]
    Delete(DeleteArgs),
    /// Start the interactive console
    #[command(after_help = "EXAMPLES:
    users console
    users console --format cards")]
    Console,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    users completions bash > ~/.bash_completion.d/users
    users completions zsh > ~/.zfunc/_users
    users completions fish > ~/.config/fish/completions/users.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short)]
    pub email: Option<String>,

    /// Account password (prompted if omitted)
    #[arg(long, short)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

#[derive(Args)]
pub struct EditArgs {
    /// User ID
    pub id: u64,

    /// Page the user is listed on, starting at 1
    #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// New first name
    #[arg(long)]
    pub first_name: Option<String>,

    /// New last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// New email
    #[arg(long)]
    pub email: Option<String>,
}

impl EditArgs {
    /// True when no field flag was given and the form should be prompted for.
    pub fn is_interactive(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

#[derive(Args)]
pub struct DeleteArgs {
    /// User ID
    pub id: u64,

    /// Page the user is listed on, starting at 1
    #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}
