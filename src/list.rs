//! Paginated user list: the records of one page plus the pagination state around them.

use crate::client::UserApi;
use crate::error::Result;
use crate::session::Session;
use crate::types::{User, UsersPage};

/// Records per page; fixed by the remote API.
pub const PAGE_SIZE: u32 = 6;

/// Issued for every page request. Only the most recent ticket may update the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    page_index: u32,
}

impl Ticket {
    /// Upstream pages are 1-based.
    pub fn upstream_page(&self) -> u32 {
        self.page_index.saturating_add(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// No token, no request was made.
    Skipped,
    /// Request failed; previous contents are untouched.
    Failed,
    /// A newer request was issued while this one was in flight.
    Stale,
}

#[derive(Debug, Default)]
pub struct ListView {
    users: Vec<User>,
    page_index: u32,
    total_pages: u32,
    loaded: bool,
    issued: u64,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on a given zero-based page.
    pub fn at_page(page_index: u32) -> Self {
        Self {
            page_index,
            ..Self::default()
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Item count shown by the pager, derived from the page count.
    pub fn total_items(&self) -> u32 {
        self.total_pages * PAGE_SIZE
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Move to another page. Returns whether the index changed, i.e. whether a reload is due.
    pub fn set_page(&mut self, page_index: u32) -> bool {
        let target = if self.loaded && self.total_pages > 0 {
            page_index.min(self.total_pages - 1)
        } else {
            page_index
        };

        let changed = target != self.page_index;
        self.page_index = target;
        changed
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page_index.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.set_page(self.page_index.saturating_sub(1))
    }

    /// Issue a ticket for the current page.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        Ticket {
            seq: self.issued,
            page_index: self.page_index,
        }
    }

    /// Apply the result of the request made with `ticket`.
    pub fn finish(&mut self, ticket: Ticket, result: Result<UsersPage>) -> LoadOutcome {
        if ticket.seq != self.issued {
            tracing::debug!(
                page = ticket.upstream_page(),
                "discarding response for superseded request"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(page) => {
                self.users = page.data;
                self.total_pages = page.total_pages;
                self.loaded = true;
                LoadOutcome::Loaded
            }
            Err(e) => {
                tracing::warn!(page = ticket.upstream_page(), error = %e, "failed to fetch users");
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch the current page with the session's token.
    pub async fn load(&mut self, api: &dyn UserApi, session: &Session) -> LoadOutcome {
        let Some(token) = session.token() else {
            tracing::debug!("no session token, skipping user fetch");
            return LoadOutcome::Skipped;
        };

        let ticket = self.begin();
        let result = api.list_users(token, ticket.upstream_page()).await;
        self.finish(ticket, result)
    }

    pub fn find(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Replace the record with the same id. Returns false if it is not on this page.
    pub fn apply_update(&mut self, user: User) -> bool {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: u64) -> Option<User> {
        let position = self.users.iter().position(|u| u.id == id)?;
        Some(self.users.remove(position))
    }
}
