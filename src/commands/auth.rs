use serde::Serialize;

use super::{prompt, users, Context};
use crate::cli::LoginArgs;
use crate::error::{ConsoleError, Result};
use crate::guard::{self, Access, Route};
use crate::output;

#[derive(Serialize)]
struct StatusReport<'a> {
    authenticated: bool,
    base_url: &'a str,
}

/// Try one set of credentials. Every rejection is reported as invalid credentials
/// and leaves the session untouched.
pub async fn attempt_login(ctx: &mut Context, email: &str, password: &str) -> Result<()> {
    if email.is_empty() || password.is_empty() {
        return Err(ConsoleError::InvalidCredentials);
    }

    let token = ctx.api.login(email, password).await.map_err(|e| {
        tracing::debug!(error = %e, "login rejected");
        ConsoleError::InvalidCredentials
    })?;

    if token.trim().is_empty() {
        tracing::debug!("login returned a blank token");
        return Err(ConsoleError::InvalidCredentials);
    }

    ctx.session.login(token)?;
    Ok(())
}

/// Read credentials, prompting for whatever was not given. `None` if input ended.
pub fn read_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<Option<(String, String)>> {
    let email = match email {
        Some(email) => email,
        None => match prompt("Email: ")? {
            Some(email) => email,
            None => return Ok(None),
        },
    };
    let password = match password {
        Some(password) => password,
        None => match prompt("Password: ")? {
            Some(password) => password,
            None => return Ok(None),
        },
    };
    Ok(Some((email.trim().to_string(), password)))
}

pub async fn login(ctx: &mut Context, args: LoginArgs) -> Result<()> {
    if let Access::Redirect(Route::Home) = guard::public(&ctx.session) {
        output::print_message("Already logged in.");
        return users::show_home(ctx).await;
    }

    let Some((email, password)) = read_credentials(args.email, args.password)? else {
        return Ok(());
    };

    attempt_login(ctx, &email, &password).await?;
    output::print_success("Login successful!");
    users::show_home(ctx).await
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    let was_authenticated = ctx.session.is_authenticated();
    ctx.session.logout()?;

    if was_authenticated {
        output::print_success("Logged out.");
    } else {
        output::print_message("Not logged in.");
    }
    Ok(())
}

pub fn status(ctx: &Context) -> Result<()> {
    let report = StatusReport {
        authenticated: ctx.session.is_authenticated(),
        base_url: &ctx.base_url,
    };

    output::print_item(&report, |r| {
        if r.authenticated {
            println!("Logged in to {}", r.base_url);
        } else {
            println!("Not logged in ({})", r.base_url);
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryTokenStore, Session};
    use crate::testing::FakeApi;

    fn context() -> Context {
        Context::new(
            Session::open(Box::<MemoryTokenStore>::default()),
            Box::new(FakeApi::with_pages(2)),
            "https://reqres.in/api".to_string(),
        )
    }

    #[tokio::test]
    async fn test_attempt_login_stores_token() {
        let mut ctx = context();
        attempt_login(&mut ctx, "eve.holt@reqres.in", "cityslicka")
            .await
            .unwrap();
        assert_eq!(ctx.session.token(), Some("QpwL5tke4Pnpja7X4"));
        assert!(ctx.require_login().is_ok());
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_session_empty() {
        let mut ctx = context();
        let err = attempt_login(&mut ctx, "nobody@reqres.in", "x").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidCredentials));
        assert!(!ctx.session.is_authenticated());
        assert!(matches!(ctx.require_login(), Err(ConsoleError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_missing_password_is_rejected_locally() {
        let mut ctx = context();
        let err = attempt_login(&mut ctx, "eve.holt@reqres.in", "").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_malformed_email_is_invalid_credentials() {
        let mut ctx = context();
        let err = attempt_login(&mut ctx, "eve.holt", "cityslicka").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidCredentials));
        assert!(!ctx.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_blank_token_from_api_is_rejected() {
        let mut ctx = context();
        let err = attempt_login(&mut ctx, "blank.token@reqres.in", "pw").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidCredentials));
        assert!(!ctx.session.is_authenticated());
    }

    #[test]
    fn test_read_credentials_uses_given_values() {
        let creds = read_credentials(Some(" eve.holt@reqres.in ".into()), Some("pw".into()))
            .unwrap()
            .unwrap();
        assert_eq!(creds, ("eve.holt@reqres.in".to_string(), "pw".to_string()));
    }

    #[test]
    fn test_logout_clears_session() {
        let mut ctx = context();
        ctx.session.login("t".to_string()).unwrap();
        logout(&mut ctx).unwrap();
        assert!(!ctx.session.is_authenticated());
    }
}
