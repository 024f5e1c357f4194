use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::models::{SearchField, SortOrder};
use crate::layout::{Mode, WidthBounds};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
    #[serde(default)]
    pub sort_by: SortOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_left_width")]
    pub left_width_percent: f64,
    #[serde(default = "default_min_width")]
    pub min_width_percent: f64,
    #[serde(default = "default_max_width")]
    pub max_width_percent: f64,
    #[serde(default = "default_nudge")]
    pub nudge_columns: u16,
    #[serde(default)]
    pub default_mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_true")]
    pub persist: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_session_age")]
    pub max_age_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    10
}
fn default_fields() -> Vec<String> {
    vec!["title".into(), "abstract".into(), "claims".into()]
}
fn default_left_width() -> f64 {
    crate::layout::width::DEFAULT_LEFT_PERCENT
}
fn default_min_width() -> f64 {
    crate::layout::width::DEFAULT_MIN_PERCENT
}
fn default_max_width() -> f64 {
    crate::layout::width::DEFAULT_MAX_PERCENT
}
fn default_nudge() -> u16 {
    2
}
fn default_true() -> bool {
    true
}
fn default_session_age() -> u64 {
    86_400
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            fields: default_fields(),
            sort_by: SortOrder::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            left_width_percent: default_left_width(),
            min_width_percent: default_min_width(),
            max_width_percent: default_max_width(),
            nudge_columns: default_nudge(),
            default_mode: Mode::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persist: true,
            dir: None,
            max_age_secs: default_session_age(),
        }
    }
}

impl SearchConfig {
    /// Configured fields, ignoring unknown names; all fields when none remain.
    pub fn search_fields(&self) -> Vec<SearchField> {
        let fields: Vec<SearchField> = self
            .fields
            .iter()
            .filter_map(|f| SearchField::parse(f))
            .collect();
        if fields.is_empty() {
            SearchField::ALL.to_vec()
        } else {
            fields
        }
    }
}

impl LayoutConfig {
    pub fn bounds(&self) -> Result<WidthBounds> {
        WidthBounds::new(
            self.min_width_percent,
            self.max_width_percent,
            self.left_width_percent,
        )
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        let mut candidates = Vec::new();

        // ~/.config/veraclaim/config.toml first, then the platform config dir
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".config/veraclaim/config.toml"));
        }
        if let Some(proj_dirs) = ProjectDirs::from("", "", "veraclaim") {
            candidates.push(proj_dirs.config_dir().join("config.toml"));
        }

        for config_path in &candidates {
            if config_path.exists() {
                return Self::read(config_path);
            }
        }

        Ok(AppConfig::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;
        config
            .layout
            .bounds()
            .with_context(|| format!("Invalid [layout] section in {}", path.display()))?;
        Ok(config)
    }

    pub fn session_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.session.dir {
            return dir.clone();
        }
        if let Some(proj_dirs) = ProjectDirs::from("", "", "veraclaim") {
            return proj_dirs.data_dir().to_path_buf();
        }
        PathBuf::from(".local/share/veraclaim")
    }

    pub fn log_dir(&self) -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "veraclaim") {
            return proj_dirs.data_dir().join("logs");
        }
        PathBuf::from(".local/share/veraclaim/logs")
    }
}
