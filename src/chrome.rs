/// Window chrome controller.
///
/// Wires titlebar controls to the host's window primitives and window-change
/// notifications to the persistence scheduler. Both resize and move restart
/// the debounce countdown; a close request writes the latest geometry
/// immediately before the window goes away.
use crate::debounce::PersistenceScheduler;
use crate::geometry::{GeometryStore, WindowGeometry, WindowKey};
use crate::host::{GeometrySource, WindowControls};
use parking_lot::Mutex;
use std::sync::Arc;

/// Titlebar interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeAction {
    Drag,
    Minimize,
    Close,
}

/// Window-change notifications from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowChange {
    Resized { width: u32, height: u32 },
    Moved { x: i32, y: i32 },
    CloseRequested,
}

/// Latest geometry reported by the host, shared with the scheduler worker.
///
/// Always holds a complete record: it starts from the geometry the window
/// was created with, so a resize alone is enough to persist.
#[derive(Debug, Clone)]
pub struct GeometryCell {
    inner: Arc<Mutex<WindowGeometry>>,
}

impl GeometryCell {
    pub fn new(initial: WindowGeometry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    pub fn set(&self, geometry: WindowGeometry) {
        *self.inner.lock() = geometry;
    }

    pub fn set_position(&self, x: i32, y: i32) {
        let mut geometry = self.inner.lock();
        geometry.x = x;
        geometry.y = y;
    }

    pub fn set_size(&self, width: u32, height: u32) {
        let mut geometry = self.inner.lock();
        geometry.width = width;
        geometry.height = height;
    }
}

impl GeometrySource for GeometryCell {
    fn current_geometry(&self) -> Option<WindowGeometry> {
        Some(*self.inner.lock()).filter(WindowGeometry::is_valid)
    }
}

/// Controller attached to one window for its whole lifetime
pub struct ChromeController {
    geometry: GeometryCell,
    scheduler: PersistenceScheduler,
}

impl ChromeController {
    /// Attach to a window created with `initial` geometry
    pub fn attach(store: Arc<dyn GeometryStore>, key: WindowKey, initial: WindowGeometry) -> Self {
        let geometry = GeometryCell::new(initial);
        let scheduler = PersistenceScheduler::new(store, key, geometry.clone());
        Self::with_scheduler(geometry, scheduler)
    }

    pub fn with_scheduler(geometry: GeometryCell, scheduler: PersistenceScheduler) -> Self {
        Self {
            geometry,
            scheduler,
        }
    }

    pub fn geometry(&self) -> &GeometryCell {
        &self.geometry
    }

    /// Titlebar control activated
    pub fn on_action(&self, action: ChromeAction, controls: &mut impl WindowControls) {
        match action {
            ChromeAction::Drag => controls.begin_drag(),
            ChromeAction::Minimize => controls.minimize_window(),
            ChromeAction::Close => self.close(controls),
        }
    }

    /// Host reported a window change
    pub fn on_window_change(&self, change: WindowChange, controls: &mut impl WindowControls) {
        match change {
            WindowChange::Resized { width, height } => {
                // Minimizing reports a zero size on some platforms
                if width == 0 || height == 0 {
                    return;
                }
                self.geometry.set_size(width, height);
                self.scheduler.notify();
            }
            WindowChange::Moved { x, y } => {
                self.geometry.set_position(x, y);
                self.scheduler.notify();
            }
            WindowChange::CloseRequested => self.close(controls),
        }
    }

    fn close(&self, controls: &mut impl WindowControls) {
        tracing::info!("Window closing, saving geometry");
        self.scheduler.flush_now();
        controls.quit_window();
    }
}
