use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{ConsoleError, Result};
use crate::output::OutputFormat;

pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

const BASE_URL_ENV: &str = "USERS_API_URL";
const API_KEY_ENV: &str = "USERS_API_KEY";

#[derive(Deserialize, Default, Debug)]
pub struct Config {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub default_view: Option<OutputFormat>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| ConsoleError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| ConsoleError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn config_dir() -> Result<PathBuf> {
        ProjectDirs::from("", "", "user-console")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConsoleError::NoConfigDir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Base URL with env var taking precedence over config file
    pub fn base_url(&self) -> String {
        std::env::var(BASE_URL_ENV)
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Optional `x-api-key` value, env var first
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    /// Layout used when no `--format` flag is given
    pub fn resolve_view(&self, explicit: Option<OutputFormat>) -> OutputFormat {
        explicit.or(self.default_view).unwrap_or_default()
    }
}
