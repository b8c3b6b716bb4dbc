//! # Configuration
//!
//! Filter behavior is configured through [`confique`], which handles layered
//! loading from TOML files, environment variables and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `GRIDFILTER_TEXT_MATCH`, `GRIDFILTER_CASE_SENSITIVE`, etc.
//! 2. **Project Config**: `<dir>/gridfilter.toml`, when a directory is given.
//! 3. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `date_time_resolution` | `minute` | Resolution of date inputs for properties with a time component |
//! | `text_match` | `prefix` | `prefix` matches `value%`, `contains` matches `%value%` |
//! | `case_sensitive` | `false` | Whether text filters match case |
//! | `viewer_offset_minutes` | `0` | Viewer's UTC offset, applied to zoned properties |

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::interval::Resolution;

pub const CONFIG_FILENAME: &str = "gridfilter.toml";

/// How free text becomes a `LIKE` pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMatch {
    /// `value%`
    Prefix,
    /// `%value%`
    Contains,
}

impl TextMatch {
    pub fn pattern(&self, text: &str) -> String {
        match self {
            TextMatch::Prefix => format!("{}%", text),
            TextMatch::Contains => format!("%{}%", text),
        }
    }
}

/// Configuration for filter inputs, stored in `gridfilter.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Resolution of date inputs for properties that carry a time of day.
    /// Date-only properties always use day resolution.
    #[config(default = "minute", env = "GRIDFILTER_DATE_TIME_RESOLUTION")]
    pub date_time_resolution: Resolution,

    /// How free-text input is turned into a pattern
    #[config(default = "prefix", env = "GRIDFILTER_TEXT_MATCH")]
    pub text_match: TextMatch,

    #[config(default = false, env = "GRIDFILTER_CASE_SENSITIVE")]
    pub case_sensitive: bool,

    /// Viewer's offset from UTC in minutes (e.g. 120 for UTC+2)
    #[config(default = 0, env = "GRIDFILTER_VIEWER_OFFSET_MINUTES")]
    pub viewer_offset_minutes: i32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            date_time_resolution: Resolution::Minute,
            text_match: TextMatch::Prefix,
            case_sensitive: false,
            viewer_offset_minutes: 0,
        }
    }
}

impl FilterConfig {
    /// Load the full layered configuration.
    ///
    /// `project_dir` is searched for `gridfilter.toml` ahead of the global
    /// config directory. Missing files are skipped.
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = FilterConfig::builder().env();
        if let Some(dir) = project_dir {
            builder = builder.file(dir.join(CONFIG_FILENAME));
        }
        if let Some(global) = global_config_path() {
            builder = builder.file(global);
        }
        Ok(builder.load()?)
    }

    /// Load a single file over the compiled defaults, ignoring env and global config.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(FilterConfig::builder().file(path.as_ref()).load()?)
    }

    /// The viewer offset as a chrono offset.
    pub fn viewer_offset(&self) -> Result<FixedOffset> {
        self.viewer_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(FilterError::InvalidOffset(self.viewer_offset_minutes))
    }
}

/// Location of the global config file, if the platform has a config directory.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("io", "gridfilter", "gridfilter")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}
