/// Per-user locations and window defaults for SimpleAI.
///
/// Saved window geometry lives in `windows.json` under the platform config
/// directory (e.g. `%APPDATA%/SimpleAI/` on Windows, `~/.config/SimpleAI/` on
/// Linux). Web content data (cookies, sessions, cache) lives in `webview/`
/// under the platform cache directory.
use crate::catalog::APP_NAME;
use crate::error::StoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Initial window size when no geometry was saved
pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 768;

/// Window origin when nothing was saved and the screen size is unknown
pub const DEFAULT_POSITION: (i32, i32) = (100, 100);

/// Smallest size the user may shrink a window to
pub const MIN_WIDTH: u32 = 160;
pub const MIN_HEIGHT: u32 = 50;

/// Picker background colour (RGB)
pub const BACKGROUND_RGB: (u8, u8, u8) = (27, 38, 54);

/// Environment variable holding the tracing filter
pub const LOG_ENV: &str = "SIMPLEAI_LOG";

const GEOMETRY_FILE: &str = "windows.json";
const WEBVIEW_DIR: &str = "webview";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Get the application's config directory, creating it if missing
pub fn get_config_directory() -> Result<PathBuf, StoreError> {
    let dirs = project_dirs().ok_or(StoreError::NoConfigDir)?;
    let dir = dirs.config_dir();

    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    Ok(dir.to_path_buf())
}

/// Path of the geometry store file
pub fn geometry_path() -> Result<PathBuf, StoreError> {
    Ok(get_config_directory()?.join(GEOMETRY_FILE))
}

/// Directory for web view data; falls back to the config directory
/// when no cache directory is available
pub fn webview_data_directory() -> Option<PathBuf> {
    let dirs = project_dirs()?;
    let dir = dirs.cache_dir().join(WEBVIEW_DIR);
    match fs::create_dir_all(&dir) {
        Ok(()) => Some(dir),
        Err(e) => {
            tracing::warn!("Failed to create web view data dir {:?}: {}", dir, e);
            let fallback = dirs.config_dir().join(WEBVIEW_DIR);
            fs::create_dir_all(&fallback).ok().map(|_| fallback)
        }
    }
}

/// Application version as baked in at build time
pub fn app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Shorten a semantic version to "major.minor" for display
pub fn short_version(version: &str) -> String {
    version.split('.').take(2).collect::<Vec<_>>().join(".")
}
