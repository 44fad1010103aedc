/// Startup routing: open a service directly or show the picker
use crate::catalog::{find_service, ServiceDescriptor, APP_NAME, SERVICES};
use crate::error::HostError;
use crate::geometry::WindowKey;
use crate::host::WindowShell;
use crate::launch::LaunchContext;

/// Where a freshly started process goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Service(&'static ServiceDescriptor),
    Picker,
}

impl Route {
    /// Decide the route from the launch context.
    ///
    /// A failed query is treated like an absent service id.
    pub fn resolve(context: Result<LaunchContext, HostError>) -> Self {
        let context = match context {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!("Startup service unavailable, showing picker: {}", e);
                return Route::Picker;
            }
        };

        match context.requested_service_id.as_deref() {
            Some(id) => match find_service(id) {
                Some(service) => Route::Service(service),
                None => {
                    tracing::info!("Unknown service '{}', showing picker", id);
                    Route::Picker
                }
            },
            None => Route::Picker,
        }
    }

    pub fn window_title(&self) -> String {
        match self {
            Route::Service(service) => service.window_title(),
            Route::Picker => APP_NAME.to_string(),
        }
    }

    /// Key under which this window's geometry is stored
    pub fn window_key(&self) -> WindowKey {
        match self {
            Route::Service(service) => WindowKey::service(service.id),
            Route::Picker => WindowKey::launcher(),
        }
    }

    /// Drive the shell into the routed state
    pub fn apply(&self, shell: &mut impl WindowShell) {
        match self {
            Route::Service(service) => {
                tracing::info!("Routing directly to {} ({})", service.label, service.url);
                shell.set_window_title(&self.window_title());
                shell.navigate(service.url);
            }
            Route::Picker => {
                tracing::info!("Showing service picker");
                shell.render_picker(SERVICES);
                shell.set_window_title(&self.window_title());
            }
        }
    }
}

/// Resolve the launch context and apply the resulting route
pub fn route(context: Result<LaunchContext, HostError>, shell: &mut impl WindowShell) -> Route {
    let route = Route::resolve(context);
    route.apply(shell);
    route
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        titles: Vec<String>,
        navigations: Vec<String>,
        pickers: Vec<Vec<&'static str>>,
    }

    impl WindowShell for Recorder {
        fn set_window_title(&mut self, title: &str) {
            self.titles.push(title.to_string());
        }

        fn navigate(&mut self, url: &str) {
            self.navigations.push(url.to_string());
        }

        fn render_picker(&mut self, entries: &[ServiceDescriptor]) {
            self.pickers.push(entries.iter().map(|s| s.id).collect());
        }
    }

    #[test]
    fn test_every_known_service_routes_directly() {
        for service in SERVICES {
            let mut shell = Recorder::default();
            let route = route(Ok(LaunchContext::for_service(service.id)), &mut shell);

            assert_eq!(route, Route::Service(service));
            assert_eq!(shell.navigations, vec![service.url.to_string()]);
            assert_eq!(shell.titles, vec![format!("SimpleAI - {}", service.label)]);
            assert!(shell.pickers.is_empty());
        }
    }

    #[test]
    fn test_unknown_or_absent_shows_picker() {
        let all: Vec<_> = SERVICES.iter().map(|s| s.id).collect();
        for context in [LaunchContext::default(), LaunchContext::for_service("bard")] {
            let mut shell = Recorder::default();
            assert_eq!(route(Ok(context), &mut shell), Route::Picker);
            assert_eq!(shell.pickers, vec![all.clone()]);
            assert_eq!(shell.titles, vec!["SimpleAI".to_string()]);
            assert!(shell.navigations.is_empty());
        }
    }

    #[test]
    fn test_query_failure_fails_open() {
        let mut shell = Recorder::default();
        let err = HostError::StartupQuery("boom".into());
        assert_eq!(route(Err(err), &mut shell), Route::Picker);
        assert_eq!(shell.pickers.len(), 1);
    }

    #[test]
    fn test_window_keys() {
        let gemini = find_service("gemini").unwrap();
        assert_eq!(Route::Service(gemini).window_key(), WindowKey::service("gemini"));
        assert_eq!(Route::Picker.window_key(), WindowKey::launcher());
    }
}
