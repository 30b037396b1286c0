//! Interactive console: a login screen and a home screen showing one page of users.

use colored::Colorize;

use super::users::{delete_in_view, edit_in_view, FormInput};
use super::{auth, prompt, Context};
use crate::error::{ConsoleError, Result};
use crate::guard::{self, Access, Route};
use crate::list::{ListView, LoadOutcome};
use crate::output::{self, OutputFormat};

const HELP: &str = "Commands:
  list | refresh        reload the current page
  next | n              next page
  prev | p              previous page
  page <N>              jump to page N (starting at 1)
  view table|cards|json switch layout
  edit <ID>             edit a user on this page
  delete <ID>           delete a user on this page
  logout                end the session
  help                  show this help
  quit | exit           leave the console";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Refresh,
    Next,
    Prev,
    /// Zero-based page index.
    Page(u32),
    View(OutputFormat),
    Edit(u64),
    Delete(u64),
    Logout,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> std::result::Result<ConsoleCommand, String> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default().to_lowercase();
    let argument = parts.next();

    if parts.next().is_some() {
        return Err(format!("Too many arguments for '{command}'"));
    }

    let id = |name: &str| -> std::result::Result<u64, String> {
        argument
            .ok_or_else(|| format!("Usage: {name} <ID>"))?
            .parse()
            .map_err(|_| format!("Invalid user ID for '{name}'"))
    };

    match command.as_str() {
        "list" | "refresh" | "ls" => Ok(ConsoleCommand::Refresh),
        "next" | "n" => Ok(ConsoleCommand::Next),
        "prev" | "p" => Ok(ConsoleCommand::Prev),
        "page" => {
            let number: u32 = argument
                .ok_or("Usage: page <N>")?
                .parse()
                .map_err(|_| "Page must be a positive number".to_string())?;
            if number == 0 {
                return Err("Page must be a positive number".to_string());
            }
            Ok(ConsoleCommand::Page(number - 1))
        }
        "view" => match argument.map(str::to_lowercase).as_deref() {
            Some("table") => Ok(ConsoleCommand::View(OutputFormat::Table)),
            Some("cards") => Ok(ConsoleCommand::View(OutputFormat::Cards)),
            Some("json") => Ok(ConsoleCommand::View(OutputFormat::Json)),
            _ => Err("Usage: view table|cards|json".to_string()),
        },
        "edit" => id("edit").map(ConsoleCommand::Edit),
        "delete" | "rm" => id("delete").map(ConsoleCommand::Delete),
        "logout" => Ok(ConsoleCommand::Logout),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
        "" => Err(String::new()),
        other => Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
    }
}

enum Screen {
    Next(Route),
    Exit,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
    let mut route = guard::entry_route(&ctx.session);

    loop {
        tracing::debug!(%route, "entering screen");
        let screen = match route {
            Route::Login => login_screen(ctx).await?,
            Route::Home => home_screen(ctx).await?,
        };

        match screen {
            Screen::Next(next) => route = next,
            Screen::Exit => return Ok(()),
        }
    }
}

async fn login_screen(ctx: &mut Context) -> Result<Screen> {
    if let Access::Redirect(route) = guard::public(&ctx.session) {
        return Ok(Screen::Next(route));
    }

    println!("{}", "Sign in to your account".bold());
    loop {
        let Some((email, password)) = auth::read_credentials(None, None)? else {
            return Ok(Screen::Exit);
        };

        match auth::attempt_login(ctx, &email, &password).await {
            Ok(()) => {
                output::print_success("Login successful!");
                return Ok(Screen::Next(Route::Home));
            }
            Err(ConsoleError::InvalidCredentials) => output::print_failure("Invalid credentials"),
            Err(e) => return Err(e),
        }
    }
}

async fn home_screen(ctx: &mut Context) -> Result<Screen> {
    if let Access::Redirect(route) = guard::protected(&ctx.session) {
        return Ok(Screen::Next(route));
    }

    let mut view = ListView::new();
    refresh(ctx, &mut view).await;

    loop {
        let Some(line) = prompt("> ")? else {
            return Ok(Screen::Exit);
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    output::print_failure(&message);
                }
                continue;
            }
        };

        match command {
            ConsoleCommand::Refresh => refresh(ctx, &mut view).await,
            ConsoleCommand::Next => {
                if view.next_page() {
                    refresh(ctx, &mut view).await;
                } else {
                    output::print_message("Already on the last page.");
                }
            }
            ConsoleCommand::Prev => {
                if view.prev_page() {
                    refresh(ctx, &mut view).await;
                } else {
                    output::print_message("Already on the first page.");
                }
            }
            ConsoleCommand::Page(index) => {
                if view.set_page(index) {
                    refresh(ctx, &mut view).await;
                } else {
                    output::print_page(&view);
                }
            }
            ConsoleCommand::View(format) => {
                output::set_format(format);
                output::print_page(&view);
            }
            ConsoleCommand::Edit(id) => {
                report(edit_in_view(ctx, &mut view, id, &FormInput::Prompt).await.map(|_| ()));
            }
            ConsoleCommand::Delete(id) => {
                report(delete_in_view(ctx, &mut view, id, false).await.map(|_| ()));
            }
            ConsoleCommand::Logout => {
                auth::logout(ctx)?;
                return Ok(Screen::Next(Route::Login));
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => return Ok(Screen::Exit),
        }
    }
}

async fn refresh(ctx: &Context, view: &mut ListView) {
    if view.load(ctx.api.as_ref(), &ctx.session).await == LoadOutcome::Loaded {
        output::print_page(view);
    }
}

/// Errors inside a screen are shown and the console carries on.
fn report(result: Result<()>) {
    if let Err(e) = result {
        output::print_failure(&e.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!(parse_command("next"), Ok(ConsoleCommand::Next));
        assert_eq!(parse_command("  P "), Ok(ConsoleCommand::Prev));
        assert_eq!(parse_command("refresh"), Ok(ConsoleCommand::Refresh));
        assert_eq!(parse_command("page 2"), Ok(ConsoleCommand::Page(1)));
    }

    #[test]
    fn test_parse_page_rejects_zero_and_garbage() {
        assert!(parse_command("page 0").is_err());
        assert!(parse_command("page two").is_err());
        assert_eq!(parse_command("page"), Err("Usage: page <N>".to_string()));
    }

    #[test]
    fn test_parse_mutations() {
        assert_eq!(parse_command("edit 7"), Ok(ConsoleCommand::Edit(7)));
        assert_eq!(parse_command("rm 3"), Ok(ConsoleCommand::Delete(3)));
        assert_eq!(parse_command("delete"), Err("Usage: delete <ID>".to_string()));
        assert!(parse_command("edit x").is_err());
        assert!(parse_command("edit 1 2").is_err());
    }

    #[test]
    fn test_parse_view_and_misc() {
        assert_eq!(
            parse_command("view Cards"),
            Ok(ConsoleCommand::View(OutputFormat::Cards))
        );
        assert!(parse_command("view grid").is_err());
        assert_eq!(parse_command("logout"), Ok(ConsoleCommand::Logout));
        assert_eq!(parse_command("exit"), Ok(ConsoleCommand::Quit));
        assert_eq!(parse_command(""), Err(String::new()));
        assert!(parse_command("frobnicate").unwrap_err().contains("Unknown command"));
    }
}
