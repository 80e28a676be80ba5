//! Locating the directory that holds config, logs and debug output

use std::env;
use std::path::{Path, PathBuf};

/// Directory for `config/`, `logs/` and `debug/`.
///
/// Next to the executable when a `config` folder sits beside it (packaged
/// install), otherwise the current working directory.
pub fn get_data_dir() -> PathBuf {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .filter(|dir| dir.join("config").is_dir());

    beside_exe.unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Resolve a configured path against the data directory; absolute paths pass through
pub fn resolve_data_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        get_data_dir().join(path)
    }
}
