/// Config file loading and creation for the waypick CLI.
///
/// Config lives at ~/.config/waypick/config.toml.
/// All fields are optional — CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct WaypickConfig {
    /// Directory holding one saved-session file per user.
    pub state_dir: Option<String>,
    /// Name the sessions are saved under when --user is not given.
    pub user: Option<String>,
    /// Fixed random seed, for reproducible sorting prompts and draws.
    pub seed: Option<u64>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# waypick configuration
# All values here can be overridden by CLI flags.

# Where saved decisions are kept (one JSON file per user)
# state_dir = \"~/.local/share/waypick\"

# Name your decisions are saved under
# user = \"me\"

# Fixed random seed. Leave unset for a fresh draw every time.
# seed = 42
";

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home)
}

/// Returns the default config path: ~/.config/waypick/config.toml
pub fn config_path() -> PathBuf {
    home_dir().join(".config").join("waypick").join("config.toml")
}

/// Returns the default state directory: ~/.local/share/waypick
pub fn default_state_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("waypick")
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> WaypickConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => WaypickConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

pub fn parse_config(content: &str) -> Result<WaypickConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
