use clap::ValueEnum;

use super::{confirm, prompt};
use crate::config::{Config, DEFAULT_BASE_URL};
use crate::error::{ConsoleError, Result};
use crate::output::OutputFormat;

pub fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists()
        && !confirm(&format!(
            "Config file already exists at {}. Overwrite?",
            config_path.display()
        ))?
    {
        println!("Aborted.");
        return Ok(());
    }

    println!("User Console Configuration");
    println!("==========================\n");

    let base_url = prompt(&format!("API base URL [{DEFAULT_BASE_URL}]: "))?.unwrap_or_default();
    let api_key = prompt("API key sent as x-api-key [optional]: ")?.unwrap_or_default();
    let default_view = loop {
        let answer = prompt("Default layout (table, cards, json) [table]: ")?.unwrap_or_default();
        match parse_view(&answer) {
            Ok(view) => break view,
            Err(message) => println!("{message}"),
        }
    };

    let contents = render_config(&base_url, &api_key, default_view);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConsoleError::ConfigWrite {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, contents).map_err(|e| ConsoleError::ConfigWrite {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now run 'users login'.");

    Ok(())
}

/// An empty answer keeps the default layout.
fn parse_view(answer: &str) -> std::result::Result<Option<OutputFormat>, String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    OutputFormat::from_str(answer, true)
        .map(Some)
        .map_err(|_| format!("Unknown layout '{answer}'. Choose table, cards or json."))
}

/// Only non-empty answers are written; everything else falls back to defaults.
fn render_config(base_url: &str, api_key: &str, default_view: Option<OutputFormat>) -> String {
    let default_view = default_view
        .and_then(|view| view.to_possible_value())
        .map(|value| value.get_name().to_string())
        .unwrap_or_default();

    let mut contents = String::new();
    for (key, value) in [
        ("base_url", base_url),
        ("api_key", api_key),
        ("default_view", default_view.as_str()),
    ] {
        if !value.is_empty() {
            contents.push_str(&format!("{key} = {value:?}\n"));
        }
    }
    contents
}
