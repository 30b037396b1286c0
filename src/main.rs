mod cli;
mod client;
mod commands;
mod config;
mod dialog;
mod error;
mod guard;
mod list;
mod output;
mod responses;
mod session;
#[cfg(test)]
mod testing;
mod types;

use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use client::ApiClient;
use commands::Context;
use config::Config;
use error::Result;
use session::{FileTokenStore, Session};
use std::error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = std::error::Error::source(cause);
            }
        }

        std::process::exit(1);
    }
}

/// Logs go to stderr; RUST_LOG overrides the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "users=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    output::set_quiet(cli.quiet);
    let requested_format = cli.requested_format();

    match cli.command {
        // Commands that don't require config/session
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "users", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run()?;
        }
        command => {
            let config = Config::load()?;
            output::set_format(config.resolve_view(requested_format));

            let base_url = config.base_url();
            let api = ApiClient::new(&base_url, config.api_key())?;
            let session = Session::open(Box::new(FileTokenStore::default_location()?));
            let mut ctx = Context::new(session, Box::new(api), base_url);

            match command {
                Commands::Login(args) => {
                    commands::auth::login(&mut ctx, args).await?;
                }
                Commands::Logout => {
                    commands::auth::logout(&mut ctx)?;
                }
                Commands::Status => {
                    commands::auth::status(&ctx)?;
                }
                Commands::List(args) => {
                    commands::users::list(&ctx, args).await?;
                }
                Commands::Edit(args) => {
                    commands::users::edit(&ctx, args).await?;
                }
                Commands::Delete(args) => {
                    commands::users::delete(&ctx, args).await?;
                }
                Commands::Console => {
                    commands::console::run(&mut ctx).await?;
                }
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
