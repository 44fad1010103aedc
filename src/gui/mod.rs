/// ICED picker window
///
/// Architecture:
/// - Shown when a process starts without a resolvable service id
/// - Frameless window with its own titlebar (drag region, minimize, close)
/// - Each service button asks the launcher for a new, independent instance
/// - Resize/move/close events go through the chrome controller, which
///   persists the window geometry
pub mod styles;

use crate::catalog::{ServiceDescriptor, APP_NAME};
use crate::chrome::{ChromeAction, ChromeController, WindowChange};
use crate::config::{self, MIN_HEIGHT, MIN_WIDTH};
use crate::geometry::{GeometryStore, WindowGeometry};
use crate::host::{InstanceSpawner, WindowControls, WindowShell};
use crate::launcher::{Launcher, ProcessSpawner};
use crate::router::Route;
use iced::{
    executor,
    widget::{mouse_area, Button, Column, Container, Row, Scrollable, Space, Text},
    window, Alignment, Application, Command, Element, Length, Point, Settings, Size,
    Subscription, Theme,
};
use std::sync::Arc;

/// Height of the custom titlebar
const TITLEBAR_HEIGHT: f32 = 30.0;

const MINIMIZE_GLYPH: &str = "-";
const CLOSE_GLYPH: &str = "✕";

#[derive(Debug, Clone)]
pub enum Message {
    /// Service button clicked
    Launch(&'static str),
    /// Launch request handed to the host
    Launched(&'static str),
    /// Info toggle for the entry at this index
    ShowInfo(usize),
    CloseInfo,
    Chrome(ChromeAction),
    Window(WindowChange),
}

/// Startup data for the picker process
pub struct PickerFlags<S> {
    pub route: Route,
    pub store: Arc<dyn GeometryStore>,
    /// Geometry the window is created with
    pub initial: WindowGeometry,
    pub spawner: S,
}

pub struct Picker<S> {
    title: String,
    entries: Vec<ServiceDescriptor>,
    info: Option<usize>,
    version_label: String,
    launcher: Launcher<S>,
    chrome: ChromeController,
}

impl<S> Picker<S> {
    pub fn entries(&self) -> &[ServiceDescriptor] {
        &self.entries
    }

    pub fn info(&self) -> Option<&ServiceDescriptor> {
        self.info.and_then(|i| self.entries.get(i))
    }
}

impl<S> WindowShell for Picker<S> {
    fn set_window_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn navigate(&mut self, url: &str) {
        tracing::warn!("Picker window cannot navigate to {}", url);
    }

    fn render_picker(&mut self, entries: &[ServiceDescriptor]) {
        self.entries = entries.to_vec();
        self.info = None;
    }
}

/// Collects window commands requested by the chrome controller
#[derive(Default)]
struct IcedControls {
    commands: Vec<Command<Message>>,
}

impl IcedControls {
    fn into_command(self) -> Command<Message> {
        Command::batch(self.commands)
    }
}

impl WindowControls for IcedControls {
    fn begin_drag(&mut self) {
        self.commands.push(window::drag(window::Id::MAIN));
    }

    fn minimize_window(&mut self) {
        self.commands.push(window::minimize(window::Id::MAIN, true));
    }

    fn quit_window(&mut self) {
        self.commands.push(window::close(window::Id::MAIN));
    }
}

impl<S> Application for Picker<S>
where
    S: InstanceSpawner + Clone + Send + Sync + 'static,
{
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = PickerFlags<S>;

    fn new(flags: PickerFlags<S>) -> (Self, Command<Message>) {
        let key = flags.route.window_key();
        let mut app = Picker {
            title: APP_NAME.to_string(),
            entries: Vec::new(),
            info: None,
            version_label: format!("{} {}", APP_NAME, config::short_version(config::app_version())),
            launcher: Launcher::new(flags.spawner),
            chrome: ChromeController::attach(flags.store, key, flags.initial),
        };
        flags.route.apply(&mut app);

        tracing::info!("Picker initialized with {} services", app.entries.len());
        (app, Command::none())
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(|event, _status| match event {
            iced::Event::Window(_, window::Event::Resized { width, height }) => {
                Some(Message::Window(WindowChange::Resized { width, height }))
            }
            iced::Event::Window(_, window::Event::Moved { x, y }) => {
                Some(Message::Window(WindowChange::Moved { x, y }))
            }
            iced::Event::Window(_, window::Event::CloseRequested) => {
                Some(Message::Window(WindowChange::CloseRequested))
            }
            _ => None,
        })
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Launch(service_id) => {
                let launcher = self.launcher.clone();
                Command::perform(async move { request_launch(&launcher, service_id) }, Message::Launched)
            }

            Message::Launched(service_id) => {
                tracing::debug!("Launch request for '{}' completed", service_id);
                Command::none()
            }

            Message::ShowInfo(index) => {
                if index < self.entries.len() {
                    self.info = Some(index);
                }
                Command::none()
            }

            Message::CloseInfo => {
                self.info = None;
                Command::none()
            }

            Message::Chrome(action) => {
                let mut controls = IcedControls::default();
                self.chrome.on_action(action, &mut controls);
                controls.into_command()
            }

            Message::Window(change) => {
                let mut controls = IcedControls::default();
                self.chrome.on_window_change(change, &mut controls);
                controls.into_command()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let body: Element<Message> = match self.info() {
            Some(service) => self.view_info(service),
            None => self.view_entries(),
        };

        Container::new(Column::new().push(self.view_titlebar()).push(body))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(styles::Surface)))
            .into()
    }
}

impl<S> Picker<S> {
    fn view_titlebar(&self) -> Element<Message> {
        let drag_region = mouse_area(
            Container::new(Text::new(&self.version_label).size(13))
                .width(Length::Fill)
                .height(Length::Fill)
                .padding([0, 10])
                .center_y(),
        )
        .on_press(Message::Chrome(ChromeAction::Drag));

        Row::new()
            .push(drag_region)
            .push(chrome_button(MINIMIZE_GLYPH, ChromeAction::Minimize))
            .push(chrome_button(CLOSE_GLYPH, ChromeAction::Close))
            .height(Length::Fixed(TITLEBAR_HEIGHT))
            .align_items(Alignment::Center)
            .into()
    }

    fn view_entries(&self) -> Element<Message> {
        let list = self
            .entries
            .iter()
            .enumerate()
            .fold(Column::new().spacing(8).padding(10), |column, (index, service)| {
                column.push(
                    Row::new()
                        .push(
                            Button::new(Text::new(service.label).size(16))
                                .width(Length::Fill)
                                .padding([6, 12])
                                .style(iced::theme::Button::Custom(Box::new(styles::ServiceButton)))
                                .on_press(Message::Launch(service.id)),
                        )
                        .push(Space::with_width(Length::Fixed(6.0)))
                        .push(
                            Button::new(Text::new("ⓘ").size(16))
                                .style(iced::theme::Button::Custom(Box::new(styles::ChromeButton)))
                                .on_press(Message::ShowInfo(index)),
                        )
                        .align_items(Alignment::Center),
                )
            });

        Scrollable::new(list).height(Length::Fill).into()
    }

    fn view_info(&self, service: &ServiceDescriptor) -> Element<Message> {
        let content = Column::new()
            .push(Text::new(service.label).size(16))
            .push(Text::new(service.plain_description()).size(12))
            .push(
                Button::new(Text::new("Close").size(16))
                    .padding([5, 10])
                    .style(iced::theme::Button::Custom(Box::new(styles::ServiceButton)))
                    .on_press(Message::CloseInfo),
            )
            .spacing(10)
            .max_width(600)
            .align_items(Alignment::Center);

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(10)
            .center_x()
            .center_y()
            .style(iced::theme::Container::Custom(Box::new(styles::InfoPanel)))
            .into()
    }
}

/// Body of the command issued for `Message::Launch`
fn request_launch<S: InstanceSpawner>(launcher: &Launcher<S>, service_id: &'static str) -> &'static str {
    launcher.launch(service_id);
    service_id
}

fn chrome_button(label: &'static str, action: ChromeAction) -> Element<'static, Message> {
    Button::new(Text::new(label).size(14))
        .padding([4, 12])
        .style(iced::theme::Button::Custom(Box::new(styles::ChromeButton)))
        .on_press(Message::Chrome(action))
        .into()
}

/// Window settings for the picker at the given geometry
fn window_settings(initial: WindowGeometry) -> window::Settings {
    window::Settings {
        size: Size::new(initial.width as f32, initial.height as f32),
        position: window::Position::Specific(Point::new(initial.x as f32, initial.y as f32)),
        min_size: Some(Size::new(MIN_WIDTH as f32, MIN_HEIGHT as f32)),
        decorations: false,
        exit_on_close_request: false,
        ..Default::default()
    }
}

/// Run the picker until its window closes
pub fn run(route: Route, store: Arc<dyn GeometryStore>) -> iced::Result {
    let saved = store.load(&route.window_key());
    // iced offers no monitor query before its window exists, so a saved
    // position is used as-is here
    let initial = WindowGeometry::initial(saved, None);
    match saved {
        Some(_) => tracing::info!("Restoring picker geometry: {:?}", initial),
        None => tracing::info!("No saved picker geometry, using default {:?}", initial),
    }

    Picker::run(Settings {
        window: window_settings(initial),
        ..Settings::with_flags(PickerFlags {
            route,
            store,
            initial,
            spawner: ProcessSpawner::new(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SERVICES;
    use crate::error::SpawnError;
    use crate::geometry::MemoryGeometryStore;
    use parking_lot::Mutex;

    /// Spawner that records each request and then fails it
    #[derive(Clone, Default)]
    struct FailingSpawner {
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl InstanceSpawner for FailingSpawner {
        fn open_new_instance(&self, service_id: &str) -> Result<(), SpawnError> {
            self.requests.lock().push(service_id.to_string());
            Err(SpawnError::Spawn {
                service_id: service_id.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "host refused"),
            })
        }
    }

    fn picker_with(spawner: FailingSpawner) -> Picker<FailingSpawner> {
        let (app, _) = Picker::new(PickerFlags {
            route: Route::Picker,
            store: Arc::new(MemoryGeometryStore::new()),
            initial: WindowGeometry::initial(None, None),
            spawner,
        });
        app
    }

    fn picker() -> Picker<FailingSpawner> {
        picker_with(FailingSpawner::default())
    }

    #[test]
    fn test_picker_lists_catalog() {
        let app = picker();
        assert_eq!(app.title(), "SimpleAI");
        assert_eq!(app.entries(), SERVICES);
        assert!(app.info().is_none());
    }

    #[test]
    fn test_spawn_failure_leaves_picker_unchanged() {
        let spawner = FailingSpawner::default();
        let mut app = picker_with(spawner.clone());
        let _ = app.update(Message::ShowInfo(2));
        let before: Vec<_> = app.entries().to_vec();

        let _ = app.update(Message::Launch("gemini"));
        let launched = request_launch(&app.launcher, "gemini");
        let _ = app.update(Message::Launched(launched));

        assert_eq!(launched, "gemini");
        assert_eq!(*spawner.requests.lock(), vec!["gemini".to_string()]);
        assert_eq!(app.entries(), before.as_slice());
        assert_eq!(app.info().map(|s| s.id), Some("copilot"));

        // Still usable for further launches
        let _ = app.update(Message::CloseInfo);
        let _ = app.update(Message::Launch("grok"));
        let _ = request_launch(&app.launcher, "grok");
        assert!(app.info().is_none());
        assert_eq!(spawner.requests.lock().len(), 2);
    }

    #[test]
    fn test_info_index_out_of_range_ignored() {
        let mut app = picker();
        let _ = app.update(Message::ShowInfo(SERVICES.len()));
        assert!(app.info().is_none());
    }

    #[test]
    fn test_window_settings_restore() {
        let settings = window_settings(WindowGeometry::new(10, 20, 800, 600));
        assert_eq!(settings.size, Size::new(800.0, 600.0));
        assert!(matches!(
            settings.position,
            window::Position::Specific(p) if p == Point::new(10.0, 20.0)
        ));
        assert!(!settings.decorations);
        assert!(!settings.exit_on_close_request);
    }

    #[test]
    fn test_first_run_window_has_explicit_position() {
        let settings = window_settings(WindowGeometry::initial(None, None));
        assert_eq!(settings.size, Size::new(1024.0, 768.0));
        assert!(matches!(
            settings.position,
            window::Position::Specific(p) if p == Point::new(100.0, 100.0)
        ));
    }

    #[test]
    fn test_first_run_resize_then_close_is_saved() {
        let store = Arc::new(MemoryGeometryStore::new());
        let (mut app, _) = Picker::new(PickerFlags {
            route: Route::Picker,
            store: store.clone(),
            initial: WindowGeometry::initial(None, None),
            spawner: FailingSpawner::default(),
        });

        let _ = app.update(Message::Window(WindowChange::Resized { width: 640, height: 480 }));
        let _ = app.update(Message::Window(WindowChange::CloseRequested));

        assert_eq!(
            store.load(&crate::geometry::WindowKey::launcher()),
            Some(WindowGeometry::new(100, 100, 640, 480))
        );
    }

    #[test]
    fn test_minimize_glyph_is_ascii_hyphen() {
        assert_eq!(MINIMIZE_GLYPH, "-");
        assert!(MINIMIZE_GLYPH.is_ascii());
    }
}
