pub mod auth;
pub mod console;
pub mod init;
pub mod users;

use std::io::{self, Write};

use crate::client::UserApi;
use crate::error::{ConsoleError, Result};
use crate::guard::{self, Access};
use crate::session::Session;

/// Everything a command needs, built once in `main`.
pub struct Context {
    pub session: Session,
    pub api: Box<dyn UserApi>,
    pub base_url: String,
}

impl Context {
    pub fn new(session: Session, api: Box<dyn UserApi>, base_url: String) -> Self {
        Self {
            session,
            api,
            base_url,
        }
    }

    /// Fail unless the protected guard lets us through.
    pub fn require_login(&self) -> Result<()> {
        match guard::protected(&self.session) {
            Access::Render => Ok(()),
            Access::Redirect(_) => Err(ConsoleError::NotLoggedIn),
        }
    }
}

/// Print `label` and read one trimmed line. `None` on end of input.
pub fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

/// Prompt with a pre-filled value kept when the answer is empty.
pub fn prompt_with_default(label: &str, current: &str) -> Result<String> {
    let answer = prompt(&format!("{label} [{current}]: "))?.unwrap_or_default();
    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer
    })
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N] "))?.unwrap_or_default();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
