//! In-memory stand-in for the remote API.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::UserApi;
use crate::error::{ConsoleError, Result};
use crate::list::PAGE_SIZE;
use crate::responses::UpdatedUser;
use crate::types::{User, UserUpdate, UsersPage};

pub fn user(id: u64) -> User {
    User {
        id,
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        email: format!("user{id}@reqres.in"),
        avatar: format!("https://reqres.in/img/faces/{id}-image.jpg")
            .parse()
            .unwrap(),
    }
}

/// Upstream page `page` (1-based) out of `total_pages`, full of consecutive ids.
pub fn page_of(page: u32, total_pages: u32) -> UsersPage {
    let data = if page >= 1 && page <= total_pages {
        let first = u64::from((page - 1) * PAGE_SIZE) + 1;
        (first..first + u64::from(PAGE_SIZE)).map(user).collect()
    } else {
        Vec::new()
    };

    UsersPage {
        page,
        per_page: PAGE_SIZE,
        total: total_pages * PAGE_SIZE,
        total_pages,
        data,
    }
}

fn unavailable() -> ConsoleError {
    ConsoleError::ApiError {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

#[derive(Default)]
pub struct FakeApi {
    total_pages: u32,
    fail_list: Mutex<bool>,
    fail_mutations: Mutex<bool>,
    pages: Mutex<Vec<u32>>,
    tokens: Mutex<Vec<String>>,
    updates: Mutex<Vec<(u64, UserUpdate)>>,
    deletes: Mutex<Vec<u64>>,
}

impl FakeApi {
    pub fn with_pages(total_pages: u32) -> Self {
        Self {
            total_pages,
            ..Self::default()
        }
    }

    pub fn fail_list(&self, fail: bool) {
        *self.fail_list.lock().unwrap() = fail;
    }

    pub fn fail_mutations(&self, fail: bool) {
        *self.fail_mutations.lock().unwrap() = fail;
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.pages.lock().unwrap().clone()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(u64, UserUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<u64> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserApi for FakeApi {
    async fn login(&self, email: &str, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(ConsoleError::ApiError {
                status: 400,
                message: "Missing password".to_string(),
            });
        }
        match email {
            "eve.holt@reqres.in" => Ok("QpwL5tke4Pnpja7X4".to_string()),
            "blank.token@reqres.in" => Ok(String::new()),
            _ => Err(ConsoleError::ApiError {
                status: 400,
                message: "user not found".to_string(),
            }),
        }
    }

    async fn list_users(&self, token: &str, page: u32) -> Result<UsersPage> {
        self.pages.lock().unwrap().push(page);
        self.tokens.lock().unwrap().push(token.to_string());
        if *self.fail_list.lock().unwrap() {
            return Err(unavailable());
        }
        Ok(page_of(page, self.total_pages))
    }

    async fn update_user(&self, id: u64, update: &UserUpdate) -> Result<UpdatedUser> {
        if *self.fail_mutations.lock().unwrap() {
            return Err(unavailable());
        }
        self.updates.lock().unwrap().push((id, update.clone()));
        Ok(UpdatedUser {
            first_name: Some(update.first_name.clone()),
            last_name: Some(update.last_name.clone()),
            email: Some(update.email.clone()),
            updated_at: Some("2026-10-17T09:00:00.000Z".to_string()),
        })
    }

    async fn delete_user(&self, id: u64) -> Result<()> {
        if *self.fail_mutations.lock().unwrap() {
            return Err(unavailable());
        }
        self.deletes.lock().unwrap().push(id);
        Ok(())
    }
}
