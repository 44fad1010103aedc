/// Seams to the native host runtime.
///
/// The launch and persistence logic only talks to windows and processes
/// through these traits; the iced picker, the tao/wry service window and the
/// process spawner implement them, tests use recording fakes.
use crate::catalog::ServiceDescriptor;
use crate::error::SpawnError;
use crate::geometry::WindowGeometry;

/// Window-side primitives of one instance
pub trait WindowShell {
    fn set_window_title(&mut self, title: &str);
    /// Point the window's web content at `url`
    fn navigate(&mut self, url: &str);
    /// Show the picker with the given entries, in order
    fn render_picker(&mut self, entries: &[ServiceDescriptor]);
}

/// Window-control primitives wired to the titlebar
pub trait WindowControls {
    /// Hand the pointer to the native window-move affordance
    fn begin_drag(&mut self);
    fn minimize_window(&mut self);
    fn quit_window(&mut self);
}

/// Reads the window's current position and size
pub trait GeometrySource: Send + 'static {
    fn current_geometry(&self) -> Option<WindowGeometry>;
}

/// Creates new, independent instances
pub trait InstanceSpawner {
    fn open_new_instance(&self, service_id: &str) -> Result<(), SpawnError>;
}
