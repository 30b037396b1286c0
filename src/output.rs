use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tabled::{builder::Builder, settings::Style, Table, Tabled};

use crate::list::{ListView, PAGE_SIZE};
use crate::types::User;

/// Cards laid out per row.
const CARDS_PER_ROW: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Cards,
    Json,
}

impl OutputFormat {
    fn as_u8(self) -> u8 {
        match self {
            OutputFormat::Table => 0,
            OutputFormat::Cards => 1,
            OutputFormat::Json => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => OutputFormat::Cards,
            2 => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

static FORMAT: AtomicU8 = AtomicU8::new(0);
static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_format(format: OutputFormat) {
    FORMAT.store(format.as_u8(), Ordering::Relaxed);
}

pub fn format() -> OutputFormat {
    OutputFormat::from_u8(FORMAT.load(Ordering::Relaxed))
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn is_json_output() -> bool {
    format() == OutputFormat::Json
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Avatar")]
    avatar: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: truncate(&user.full_name(), 30),
            email: user.email.clone(),
            avatar: user.avatar.to_string(),
        }
    }
}

#[derive(Serialize)]
struct PageListing<'a> {
    page: u32,
    total_pages: u32,
    total_items: u32,
    users: &'a [User],
}

pub fn render_table(users: &[User]) -> String {
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_card(user: &User) -> String {
    let mut builder = Builder::default();
    builder.push_record([format!("#{}  {}", user.id, truncate(&user.full_name(), 28))]);
    builder.push_record([format!("Email: {}", user.email)]);
    builder.push_record([user.avatar.to_string()]);
    builder.build().with(Style::rounded()).to_string()
}

pub fn render_cards(users: &[User]) -> String {
    let mut grid = Builder::default();
    for chunk in users.chunks(CARDS_PER_ROW) {
        grid.push_record(chunk.iter().map(render_card));
    }
    grid.build().with(Style::blank()).to_string()
}

/// Pager caption, e.g. "1-6 of 12 (page 1/2)".
pub fn pagination_label(view: &ListView) -> String {
    let total = view.total_items();
    if total == 0 {
        return "0 users".to_string();
    }

    let page = format!("page {}/{}", view.page_index() + 1, view.total_pages());
    if view.users().is_empty() {
        return format!("0 of {total} ({page})");
    }

    let first = view.page_index() * PAGE_SIZE + 1;
    let last = first + view.users().len() as u32 - 1;
    format!("{first}-{last} of {total} ({page})")
}

/// Print the current page in the active layout.
pub fn print_page(view: &ListView) {
    match format() {
        OutputFormat::Json => {
            let listing = PageListing {
                page: view.page_index() + 1,
                total_pages: view.total_pages(),
                total_items: view.total_items(),
                users: view.users(),
            };
            println!("{}", serde_json::to_string_pretty(&listing).unwrap_or_default());
        }
        layout => {
            if !view.is_loaded() {
                println!("{}", "Users could not be loaded".bright_black());
                return;
            }
            if view.users().is_empty() {
                println!("{}", "No users on this page".bright_black());
            } else if layout == OutputFormat::Cards {
                println!("{}", render_cards(view.users()));
            } else {
                println!("{}", render_table(view.users()));
            }
            println!("{}", pagination_label(view).bright_black());
        }
    }
}

/// Print a single item or JSON depending on output mode
pub fn print_item<T: Serialize>(item: &T, display: impl FnOnce(&T)) {
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
    } else {
        display(item);
    }
}

/// Print a message (suppressed by --quiet, wrapped in an object in JSON mode)
pub fn print_message(message: &str) {
    if is_quiet() {
        return;
    }
    if is_json_output() {
        println!("{}", serde_json::json!({ "message": message }));
    } else {
        println!("{message}");
    }
}

/// Transient success notice
pub fn print_success(message: &str) {
    if is_json_output() {
        print_message(message);
    } else if !is_quiet() {
        println!("{}", message.green());
    }
}

/// Transient failure notice, always shown
pub fn print_failure(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_of, user};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer name", 10), "a much ...");
        assert_eq!(truncate("ééééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_render_table_has_headers_and_rows() {
        let table = render_table(&[user(1), user(2)]);
        assert!(table.contains("ID"));
        assert!(table.contains("Email"));
        assert!(table.contains("First1 Last1"));
        assert!(table.contains("user2@reqres.in"));
    }

    #[test]
    fn test_render_cards_contains_every_user() {
        let users: Vec<User> = (1..=4).map(user).collect();
        let cards = render_cards(&users);
        for u in &users {
            assert!(cards.contains(&u.email));
        }
        assert!(cards.contains("#4  First4 Last4"));
    }

    #[test]
    fn test_pagination_label() {
        let mut view = ListView::new();
        assert_eq!(pagination_label(&view), "0 users");

        let ticket = view.begin();
        view.finish(ticket, Ok(page_of(1, 2)));
        assert_eq!(pagination_label(&view), "1-6 of 12 (page 1/2)");

        view.remove(6);
        assert_eq!(pagination_label(&view), "1-5 of 12 (page 1/2)");

        for id in 1..=5 {
            view.remove(id);
        }
        assert_eq!(pagination_label(&view), "0 of 12 (page 1/2)");
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        let format: OutputFormat = serde_json::from_str("\"cards\"").unwrap();
        assert_eq!(format, OutputFormat::Cards);
        assert_eq!(OutputFormat::from_u8(OutputFormat::Json.as_u8()), OutputFormat::Json);
    }
}
