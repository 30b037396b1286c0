//! Edit and delete dialogs. Each submit returns an outcome for the caller to apply.

use std::sync::OnceLock;

use regex::Regex;

use crate::client::UserApi;
use crate::types::{User, UserUpdate};

pub const UPDATE_FAILED: &str = "Failed to update user. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete user. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The record as it should now appear in the list.
    Updated(User),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(u64),
    Failed(String),
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Trim the form and check required fields.
pub fn validate(form: &UserUpdate) -> Result<UserUpdate, String> {
    let cleaned = UserUpdate {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
    };

    if cleaned.first_name.is_empty() {
        return Err("First name is required".to_string());
    }
    if cleaned.last_name.is_empty() {
        return Err("Last name is required".to_string());
    }
    if cleaned.email.is_empty() {
        return Err("Email is required".to_string());
    }
    if !is_valid_email(&cleaned.email) {
        return Err(format!("'{}' is not a valid email address", cleaned.email));
    }

    Ok(cleaned)
}

#[derive(Debug)]
pub struct EditDialog {
    user: User,
    form: UserUpdate,
    error: Option<String>,
    open: bool,
}

impl EditDialog {
    /// Open pre-filled from the selected record.
    pub fn open(user: &User) -> Self {
        Self {
            user: user.clone(),
            form: UserUpdate::from(user),
            error: None,
            open: true,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn form_mut(&mut self) -> &mut UserUpdate {
        &mut self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub async fn submit(&mut self, api: &dyn UserApi) -> EditOutcome {
        self.error = None;

        let update = match validate(&self.form) {
            Ok(update) => update,
            Err(message) => return self.fail(message),
        };

        match api.update_user(self.user.id, &update).await {
            Ok(response) => {
                tracing::debug!(id = self.user.id, updated_at = ?response.updated_at, "user updated");
                self.open = false;
                EditOutcome::Updated(self.user.with_update(&update))
            }
            Err(e) => {
                tracing::error!(id = self.user.id, error = %e, "update failed");
                self.fail(UPDATE_FAILED.to_string())
            }
        }
    }

    fn fail(&mut self, message: String) -> EditOutcome {
        self.error = Some(message.clone());
        EditOutcome::Failed(message)
    }
}

#[derive(Debug)]
pub struct DeleteDialog {
    user: User,
    error: Option<String>,
    open: bool,
}

impl DeleteDialog {
    pub fn open(user: &User) -> Self {
        Self {
            user: user.clone(),
            error: None,
            open: true,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub async fn confirm(&mut self, api: &dyn UserApi) -> DeleteOutcome {
        self.error = None;

        match api.delete_user(self.user.id).await {
            Ok(()) => {
                self.open = false;
                DeleteOutcome::Deleted(self.user.id)
            }
            Err(e) => {
                tracing::error!(id = self.user.id, error = %e, "delete failed");
                self.error = Some(DELETE_FAILED.to_string());
                DeleteOutcome::Failed(DELETE_FAILED.to_string())
            }
        }
    }
}
