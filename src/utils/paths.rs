use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".fluxo";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const DATA_FILE: &str = "expenses.json";
const HISTORY_FILE: &str = "history.txt";

pub const HOME_ENV: &str = "FLUXO_HOME";

/// Application data directory: `$FLUXO_HOME`, else `~/.fluxo`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Where the expense book lives unless the config names another file.
pub fn default_data_file_in(base: &Path) -> PathBuf {
    base.join(DATA_FILE)
}

/// Line editor history for the interactive shell.
pub fn history_file_in(base: &Path) -> PathBuf {
    base.join(HISTORY_FILE)
}
