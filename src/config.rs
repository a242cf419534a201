//! User configuration (`config.toml`).
//!
//! Looked up in the platform config directory unless `--config` names a file.
//! Problems never stop the program: they become warnings and the affected
//! settings keep their defaults.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tallysheet_engine::engine::{MAX_COLS, MAX_ROWS};

pub const MIN_COLUMN_WIDTH: usize = 4;
pub const MAX_COLUMN_WIDTH: usize = 50;
const MAX_CONFIG_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Default display width of every column, in chars.
    pub column_width: usize,
    /// Rows the grid starts with.
    pub rows: usize,
    /// Columns the grid starts with.
    pub columns: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            column_width: 10,
            rows: 20,
            columns: 12,
        }
    }
}

impl Config {
    /// Clamp out-of-range values, reporting each adjustment.
    fn sanitize(mut self, warnings: &mut Vec<String>) -> Self {
        let clamped = self.column_width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        if clamped != self.column_width {
            warnings.push(format!(
                "column_width {} is outside {}..={}, using {}",
                self.column_width, MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH, clamped
            ));
            self.column_width = clamped;
        }
        let defaults = Config::default();
        if self.rows == 0 {
            warnings.push(format!("rows must be positive, using {}", defaults.rows));
            self.rows = defaults.rows;
        } else if self.rows > MAX_ROWS {
            warnings.push(format!("rows {} exceeds {}, using {}", self.rows, MAX_ROWS, MAX_ROWS));
            self.rows = MAX_ROWS;
        }
        if self.columns == 0 {
            warnings.push(format!("columns must be positive, using {}", defaults.columns));
            self.columns = defaults.columns;
        } else if self.columns > MAX_COLS {
            warnings.push(format!(
                "columns {} exceeds {}, using {}",
                self.columns, MAX_COLS, MAX_COLS
            ));
            self.columns = MAX_COLS;
        }
        self
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "tallysheet")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Parse config text. Errors are reported as warnings by the caller.
pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Load configuration from `config_file`, or from the user config dir.
/// Returns the config plus any warnings to show the user.
pub fn load_config(config_file: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_BYTES => {
            warnings.push(format!(
                "Ignoring {}: config file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_BYTES
            ));
            Config::default()
        }
        _ => match std::fs::read_to_string(&path) {
            Ok(content) => match parse_config(&content) {
                Ok(parsed) => parsed.sanitize(&mut warnings),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    Config::default()
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                Config::default()
            }
        },
    };

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    (config, warnings)
}
