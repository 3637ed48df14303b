//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "postlist";
const APPLICATION: &str = "postlist";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, where logs are written.
///
/// - Linux: `$XDG_CACHE_HOME/postlist` or `~/.cache/postlist`
/// - macOS: `~/Library/Caches/dev.postlist.postlist`
/// - Windows: `C:\Users\<User>\AppData\Local\postlist\postlist\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/postlist` or `~/.config/postlist`
/// - macOS: `~/Library/Application Support/dev.postlist.postlist`
/// - Windows: `C:\Users\<User>\AppData\Roaming\postlist\postlist\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the table config file.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Number of archived logs kept next to `latest.log`.
const KEPT_LOGS: usize = 10;

/// Prepares a fresh `latest.log` and returns its path.
///
/// Creates the cache dir, archives the previous log under a timestamped
/// name and prunes archives beyond [`KEPT_LOGS`].
pub fn prepare_log_file() -> Option<PathBuf> {
    let dir = cache_dir()?;
    fs::create_dir_all(&dir).ok()?;

    let latest = dir.join("latest.log");
    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, dir.join(format!("{}.log", stamp)));
    }
    prune_archived_logs(&dir);

    Some(latest)
}

fn prune_archived_logs(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut archived: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();
    if archived.len() <= KEPT_LOGS {
        return;
    }

    // Oldest first
    archived.sort_by_key(|entry| entry.metadata().and_then(|m| m.modified()).ok());
    let excess = archived.len() - KEPT_LOGS;
    for entry in &archived[..excess] {
        let _ = fs::remove_file(entry.path());
    }
}
