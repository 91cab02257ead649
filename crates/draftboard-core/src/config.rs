// Configuration loading and parsing (board.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::board::selection::EscapeAction;
use crate::board::sort::{SortField, SortState};
use crate::board::window::{OffsetMode, RowGeometry};
use crate::board::BoardSettings;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub board: BoardSettings,
    pub data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub players: String,
    #[serde(default)]
    pub imported_ranks: Option<String>,
    /// Watchlist and notes JSON. Falls back to the platform data directory.
    #[serde(default)]
    pub store_path: Option<String>,
}

impl DataPaths {
    /// Resolve the store location, consulting the platform data directory
    /// when none is configured.
    pub fn resolved_store_path(&self) -> PathBuf {
        match &self.store_path {
            Some(path) => PathBuf::from(path),
            None => default_store_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// board.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire board.toml file.
#[derive(Debug, Clone, Deserialize)]
struct BoardFile {
    #[serde(default)]
    board: BoardSection,
    data: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct BoardSection {
    base_row_height: usize,
    expanded_row_height: usize,
    exact_row_offsets: bool,
    escape_action: String,
    default_sort_field: String,
    page_size: usize,
}

impl Default for BoardSection {
    fn default() -> Self {
        BoardSection {
            base_row_height: 1,
            expanded_row_height: 5,
            exact_row_offsets: false,
            escape_action: "clear_selection".into(),
            default_sort_field: "projected_points".into(),
            page_size: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load `config/board.toml` under `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let board_path = base_dir.join("config").join("board.toml");
    let text = read_file(&board_path)?;
    parse_config(&text, &board_path)
}

/// Parse and validate the contents of a board.toml file. `path` is only
/// used for error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: BoardFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate(&file)?;

    let section = file.board;
    let escape = parse_escape(&section.escape_action)?;
    let field = SortField::from_config_str(&section.default_sort_field).ok_or_else(|| {
        ConfigError::ValidationError {
            field: "board.default_sort_field".into(),
            message: format!("unknown sort field `{}`", section.default_sort_field),
        }
    })?;

    let board = BoardSettings {
        geometry: RowGeometry {
            base_row_height: section.base_row_height,
            expanded_row_height: section.expanded_row_height,
        },
        offset_mode: if section.exact_row_offsets {
            OffsetMode::Exact
        } else {
            OffsetMode::Uniform
        },
        escape,
        page_size: section.page_size,
        default_sort: SortState::new(field),
    };

    Ok(Config {
        board,
        data_paths: file.data,
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", path.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Loads config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

/// `<platform data dir>/store.json`, or `./store.json` when the platform
/// gives us no home directory.
pub fn default_store_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "draftboard")
        .map(|dirs| dirs.data_dir().join("store.json"))
        .unwrap_or_else(|| PathBuf::from("store.json"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn parse_escape(s: &str) -> Result<EscapeAction, ConfigError> {
    match s {
        "clear_selection" => Ok(EscapeAction::ClearSelection),
        "collapse" => Ok(EscapeAction::Collapse),
        other => Err(ConfigError::ValidationError {
            field: "board.escape_action".into(),
            message: format!("expected `clear_selection` or `collapse`, got `{other}`"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &BoardFile) -> Result<(), ConfigError> {
    let board = &file.board;

    if board.base_row_height == 0 {
        return Err(ConfigError::ValidationError {
            field: "board.base_row_height".into(),
            message: "must be greater than 0".into(),
        });
    }

    if board.expanded_row_height <= board.base_row_height {
        return Err(ConfigError::ValidationError {
            field: "board.expanded_row_height".into(),
            message: format!(
                "must be greater than base_row_height ({}), got {}",
                board.base_row_height, board.expanded_row_height
            ),
        });
    }

    if board.page_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "board.page_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    if file.data.players.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.players".into(),
            message: "must name a CSV file".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
