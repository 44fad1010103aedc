/// Window geometry persistence.
///
/// Geometry is stored per window identity in a single JSON object
/// (`windows.json`) mapping a window key to `{x, y, width, height}`. Every
/// save holds an advisory lock on `windows.json.lock` while it re-reads the
/// file and replaces it atomically, so records written by sibling instances
/// survive.
use crate::config::{DEFAULT_HEIGHT, DEFAULT_POSITION, DEFAULT_WIDTH};
use crate::error::StoreError;
use fd_lock::RwLock;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Pixels of a restored window that must stay on screen
pub const MIN_VISIBLE: i32 = 20;

const LAUNCHER_KEY: &str = "launcher";

/// Position and size of a window
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Zero-sized geometry is what a window reports while being destroyed
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Default placement: centered on a screen of known size, otherwise at
    /// `DEFAULT_POSITION`
    pub fn default_for_screen(screen: Option<(u32, u32)>) -> Self {
        let (width, height) = (DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let (x, y) = match screen {
            Some((screen_w, screen_h)) => (centered(screen_w, width), centered(screen_h, height)),
            None => DEFAULT_POSITION,
        };
        Self { x, y, width, height }
    }

    /// Geometry a new window is created with: the saved record kept on
    /// screen when the screen size is known, or the default placement
    pub fn initial(saved: Option<Self>, screen: Option<(u32, u32)>) -> Self {
        match (saved, screen) {
            (Some(saved), Some((screen_w, screen_h))) => saved.clamp_to_screen(screen_w, screen_h),
            (Some(saved), None) => saved,
            (None, screen) => Self::default_for_screen(screen),
        }
    }

    /// Move the window so at least `MIN_VISIBLE` pixels remain on a screen
    /// of the given size. Size is left untouched.
    pub fn clamp_to_screen(self, screen_width: u32, screen_height: u32) -> Self {
        let width = i32::try_from(self.width).unwrap_or(i32::MAX);
        let screen_w = i32::try_from(screen_width).unwrap_or(i32::MAX);
        let screen_h = i32::try_from(screen_height).unwrap_or(i32::MAX);

        let min_x = MIN_VISIBLE.saturating_sub(width);
        let max_x = screen_w.saturating_sub(MIN_VISIBLE).max(min_x);
        let max_y = screen_h.saturating_sub(MIN_VISIBLE).max(0);

        let corrected = Self {
            x: self.x.clamp(min_x, max_x),
            y: self.y.clamp(0, max_y),
            ..self
        };
        if corrected != self {
            tracing::debug!(
                "Position corrected from ({}, {}) to ({}, {}) to stay on screen",
                self.x,
                self.y,
                corrected.x,
                corrected.y
            );
        }
        corrected
    }
}

fn centered(screen: u32, window: u32) -> i32 {
    i32::try_from(screen.saturating_sub(window) / 2).unwrap_or(0)
}

/// Identity a geometry record is stored under
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct WindowKey(String);

impl WindowKey {
    /// The picker window
    pub fn launcher() -> Self {
        Self(LAUNCHER_KEY.to_string())
    }

    /// A window showing the given service
    pub fn service(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Load/save contract for window geometry
pub trait GeometryStore: Send + Sync {
    /// Saved geometry for `key`, or `None` on first run, corrupt state or
    /// read failure
    fn load(&self, key: &WindowKey) -> Option<WindowGeometry>;

    /// Record `geometry` for `key`; latest write wins
    fn save(&self, key: &WindowKey, geometry: WindowGeometry) -> Result<(), StoreError>;
}

type GeometryMap = BTreeMap<WindowKey, WindowGeometry>;

/// Geometry store backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonGeometryStore {
    path: PathBuf,
}

impl JsonGeometryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default per-user location
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(crate::config::geometry_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    /// Run `f` while holding the cross-process lock on the store
    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T, StoreError>) -> Result<T, StoreError> {
        let lock_path = self.lock_path();
        let io_err = |source| StoreError::Io {
            path: lock_path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_err)?;

        let mut lock = RwLock::new(file);
        let _guard = lock.write().map_err(io_err)?;
        f()
    }

    fn read_map(&self) -> Result<GeometryMap, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(GeometryMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(GeometryMap::new());
        }

        serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &GeometryMap) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(map).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension(format!("json.{}.tmp", std::process::id()));
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            io_err(source)
        })
    }
}

impl GeometryStore for JsonGeometryStore {
    fn load(&self, key: &WindowKey) -> Option<WindowGeometry> {
        match self.read_map() {
            Ok(map) => map.get(key).copied().filter(WindowGeometry::is_valid),
            Err(e) => {
                tracing::warn!("Failed to load window geometry: {}", e);
                None
            }
        }
    }

    fn save(&self, key: &WindowKey, geometry: WindowGeometry) -> Result<(), StoreError> {
        if !geometry.is_valid() {
            tracing::debug!("Skipping save of empty geometry for {}", key.as_str());
            return Ok(());
        }

        self.with_lock(|| {
            // A corrupt file is replaced rather than blocking every later save
            let mut map = self.read_map().unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable geometry file: {}", e);
                GeometryMap::new()
            });
            map.insert(key.clone(), geometry);
            self.write_map(&map)
        })?;

        tracing::debug!("Saved geometry for {}: {:?}", key.as_str(), geometry);
        Ok(())
    }
}

/// In-process geometry store
#[derive(Debug, Default)]
pub struct MemoryGeometryStore {
    records: Mutex<HashMap<WindowKey, WindowGeometry>>,
}

impl MemoryGeometryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GeometryStore for MemoryGeometryStore {
    fn load(&self, key: &WindowKey) -> Option<WindowGeometry> {
        self.records.lock().get(key).copied()
    }

    fn save(&self, key: &WindowKey, geometry: WindowGeometry) -> Result<(), StoreError> {
        if geometry.is_valid() {
            self.records.lock().insert(key.clone(), geometry);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonGeometryStore {
        JsonGeometryStore::new(dir.path().join("SimpleAI").join("windows.json"))
    }

    #[test]
    fn test_load_without_prior_write_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load(&WindowKey::launcher()), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let geometry = WindowGeometry::new(10, 20, 800, 600);

        store.save(&WindowKey::launcher(), geometry).unwrap();
        assert_eq!(store.load(&WindowKey::launcher()), Some(geometry));
    }

    #[test]
    fn test_latest_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let key = WindowKey::service("grok");

        store.save(&key, WindowGeometry::new(0, 0, 300, 200)).unwrap();
        store.save(&key, WindowGeometry::new(5, 6, 700, 500)).unwrap();
        assert_eq!(store.load(&key), Some(WindowGeometry::new(5, 6, 700, 500)));
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let first = store_in(&dir);
        let second = store_in(&dir);

        first.save(&WindowKey::service("gemini"), WindowGeometry::new(1, 2, 640, 480)).unwrap();
        second.save(&WindowKey::service("claude"), WindowGeometry::new(3, 4, 900, 700)).unwrap();

        assert_eq!(
            first.load(&WindowKey::service("gemini")),
            Some(WindowGeometry::new(1, 2, 640, 480))
        );
        assert_eq!(
            first.load(&WindowKey::service("claude")),
            Some(WindowGeometry::new(3, 4, 900, 700))
        );
        assert_eq!(first.load(&WindowKey::launcher()), None);
    }

    #[test]
    fn test_concurrent_handles_keep_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("windows.json");

        let handles: Vec<_> = (0..4)
            .map(|writer| {
                let store = JsonGeometryStore::new(&path);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let key = WindowKey::service(&format!("w{}-{}", writer, i));
                        store.save(&key, WindowGeometry::new(i, writer, 800, 600)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = JsonGeometryStore::new(&path);
        for writer in 0..4 {
            for i in 0..25 {
                let key = WindowKey::service(&format!("w{}-{}", writer, i));
                assert_eq!(store.load(&key), Some(WindowGeometry::new(i, writer, 800, 600)));
            }
        }
        assert!(path.with_extension("json.lock").exists());
    }

    #[test]
    fn test_corrupt_file_is_absent_and_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.load(&WindowKey::launcher()), None);

        let geometry = WindowGeometry::new(10, 20, 800, 600);
        store.save(&WindowKey::launcher(), geometry).unwrap();
        assert_eq!(store.load(&WindowKey::launcher()), Some(geometry));
    }

    #[test]
    fn test_zero_size_is_never_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&WindowKey::launcher(), WindowGeometry::new(10, 10, 0, 0)).unwrap();
        assert_eq!(store.load(&WindowKey::launcher()), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&WindowKey::service("meta"), WindowGeometry::new(10, 20, 800, 600)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "meta": { "x": 10, "y": 20, "width": 800, "height": 600 } })
        );
    }

    #[test]
    fn test_clamp_to_screen() {
        let on_screen = WindowGeometry::new(100, 100, 800, 600);
        assert_eq!(on_screen.clamp_to_screen(1920, 1080), on_screen);

        let far_left = WindowGeometry::new(-5000, 100, 800, 600);
        assert_eq!(far_left.clamp_to_screen(1920, 1080).x, -780);

        let far_right = WindowGeometry::new(5000, 5000, 800, 600);
        let clamped = far_right.clamp_to_screen(1920, 1080);
        assert_eq!((clamped.x, clamped.y), (1900, 1060));

        let above = WindowGeometry::new(0, -40, 800, 600);
        assert_eq!(above.clamp_to_screen(1920, 1080).y, 0);
    }

    #[test]
    fn test_initial_geometry() {
        assert_eq!(
            WindowGeometry::initial(None, Some((1920, 1080))),
            WindowGeometry::new(448, 156, 1024, 768)
        );
        assert_eq!(
            WindowGeometry::initial(None, None),
            WindowGeometry::new(100, 100, 1024, 768)
        );

        let saved = WindowGeometry::new(5000, -40, 800, 600);
        assert_eq!(WindowGeometry::initial(Some(saved), None), saved);
        assert_eq!(
            WindowGeometry::initial(Some(saved), Some((1920, 1080))),
            WindowGeometry::new(1900, 0, 800, 600)
        );
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryGeometryStore::new();
        let key = WindowKey::launcher();
        assert_eq!(store.load(&key), None);
        store.save(&key, WindowGeometry::new(10, 20, 800, 600)).unwrap();
        assert_eq!(store.load(&key), Some(WindowGeometry::new(10, 20, 800, 600)));
    }
}
