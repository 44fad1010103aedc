/// Instance launcher: opens a service in a new, independent process
use crate::catalog::find_service;
use crate::error::SpawnError;
use crate::host::InstanceSpawner;
use crate::launch::LaunchContext;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Starts a copy of the running executable with a service argument
#[derive(Debug, Clone, Default)]
pub struct ProcessSpawner {
    /// Executable to start; the current one when `None`
    executable: Option<PathBuf>,
}

impl ProcessSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            executable: Some(path.into()),
        }
    }

    fn executable(&self) -> Result<PathBuf, SpawnError> {
        match &self.executable {
            Some(path) => Ok(path.clone()),
            None => std::env::current_exe().map_err(SpawnError::Executable),
        }
    }
}

impl InstanceSpawner for ProcessSpawner {
    fn open_new_instance(&self, service_id: &str) -> Result<(), SpawnError> {
        let exe = self.executable()?;

        let mut child = Command::new(&exe)
            .args(LaunchContext::to_args(service_id))
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| SpawnError::Spawn {
                service_id: service_id.to_string(),
                source,
            })?;

        tracing::info!("Instance for '{}' spawned with PID {}", service_id, child.id());

        // Reap the child when it exits; instances are otherwise independent
        let _ = std::thread::Builder::new()
            .name("instance-reaper".into())
            .spawn(move || {
                let _ = child.wait();
            });

        Ok(())
    }
}

/// Handles picker clicks by requesting new instances
#[derive(Debug, Clone)]
pub struct Launcher<S> {
    spawner: S,
}

impl<S: InstanceSpawner> Launcher<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    /// Request a new instance showing `service_id`.
    ///
    /// Failures are logged and absorbed; the caller stays usable and may
    /// launch again, including the same service.
    pub fn launch(&self, service_id: &str) {
        debug_assert!(
            find_service(service_id).is_some(),
            "picker offered unknown service id {service_id}"
        );

        tracing::info!("Launching new instance for '{}'", service_id);
        if let Err(e) = self.spawner.open_new_instance(service_id) {
            tracing::error!("Failed to open new instance: {}", e);
        }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }
}
