//! Service window: a native window hosting a web view of one chat service.
//!
//! The window keeps native decorations; the remote page cannot carry a
//! custom titlebar. Resize, move and close still flow through the chrome
//! controller so the window's geometry is persisted like the picker's.

use crate::catalog::ServiceDescriptor;
use crate::chrome::{ChromeController, WindowChange};
use crate::config::{self, MIN_HEIGHT, MIN_WIDTH};
use crate::error::HostError;
use crate::geometry::{GeometryStore, WindowGeometry};
use crate::host::{WindowControls, WindowShell};
use crate::router::Route;
use anyhow::{Context, Result};
use std::sync::Arc;
use tao::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop};
use tao::window::{Window, WindowBuilder};
use wry::{WebContext, WebView, WebViewBuilder};

struct ServiceShell<'a> {
    window: &'a Window,
    webview: &'a WebView,
}

impl WindowShell for ServiceShell<'_> {
    fn set_window_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn navigate(&mut self, url: &str) {
        if let Err(e) = self.webview.load_url(url) {
            tracing::error!("Failed to navigate to {}: {}", url, e);
        }
    }

    fn render_picker(&mut self, _entries: &[ServiceDescriptor]) {
        tracing::warn!("Service window cannot show the picker");
    }
}

struct TaoControls<'a> {
    window: &'a Window,
    control_flow: &'a mut ControlFlow,
}

impl WindowControls for TaoControls<'_> {
    fn begin_drag(&mut self) {
        if let Err(e) = self.window.drag_window() {
            tracing::debug!("Window drag unavailable: {}", e);
        }
    }

    fn minimize_window(&mut self) {
        self.window.set_minimized(true);
    }

    fn quit_window(&mut self) {
        *self.control_flow = ControlFlow::Exit;
    }
}

fn current_geometry(window: &Window) -> Option<WindowGeometry> {
    let position = window.outer_position().ok()?;
    let size = window.inner_size();
    Some(WindowGeometry::new(position.x, position.y, size.width, size.height))
}

fn build_webview(window: &Window, web_context: &mut WebContext) -> Result<WebView, HostError> {
    let builder = WebViewBuilder::with_web_context(web_context);

    #[cfg(any(target_os = "windows", target_os = "macos", target_os = "ios", target_os = "android"))]
    let webview = builder.build(window);

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "ios", target_os = "android")))]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window
            .default_vbox()
            .ok_or_else(|| HostError::WebView("window has no GTK container".into()))?;
        builder.build_gtk(vbox)
    };

    webview.map_err(|e| HostError::WebView(e.to_string()))
}

/// Open the service window and run its event loop until it closes
pub fn run(route: Route, store: Arc<dyn GeometryStore>) -> Result<()> {
    let key = route.window_key();
    let event_loop = EventLoop::new();

    let mut builder = WindowBuilder::new()
        .with_title(route.window_title())
        .with_min_inner_size(LogicalSize::new(MIN_WIDTH, MIN_HEIGHT));

    let saved = store.load(&key);
    let screen = event_loop.primary_monitor().map(|monitor| {
        let size = monitor.size();
        (size.width, size.height)
    });
    let initial = WindowGeometry::initial(saved, screen);
    match saved {
        Some(_) => tracing::info!("Restoring geometry for {}: {:?}", key.as_str(), initial),
        None => tracing::info!("No saved geometry for {}, using default {:?}", key.as_str(), initial),
    }

    builder = builder
        .with_position(PhysicalPosition::new(initial.x, initial.y))
        .with_inner_size(PhysicalSize::new(initial.width, initial.height));

    let window = builder
        .build(&event_loop)
        .map_err(|e| HostError::Window(e.to_string()))
        .context("Failed to create service window")?;

    let mut web_context = WebContext::new(config::webview_data_directory());
    let webview = build_webview(&window, &mut web_context).context("Failed to create web view")?;

    route.apply(&mut ServiceShell {
        window: &window,
        webview: &webview,
    });

    // The window manager may have placed the window elsewhere
    let chrome = ChromeController::attach(store, key, current_geometry(&window).unwrap_or(initial));

    event_loop.run(move |event, _target, control_flow| {
        *control_flow = ControlFlow::Wait;
        // The web view and its data context live as long as the loop
        let _ = (&webview, &web_context);

        if let Event::WindowEvent {
            event, window_id, ..
        } = event
        {
            if window_id != window.id() {
                return;
            }

            let change = match event {
                WindowEvent::Resized(size) => Some(WindowChange::Resized {
                    width: size.width,
                    height: size.height,
                }),
                WindowEvent::Moved(position) => Some(WindowChange::Moved {
                    x: position.x,
                    y: position.y,
                }),
                WindowEvent::CloseRequested => Some(WindowChange::CloseRequested),
                _ => None,
            };

            if let Some(change) = change {
                let mut controls = TaoControls {
                    window: &window,
                    control_flow,
                };
                chrome.on_window_change(change, &mut controls);
            }
        }
    })
}
