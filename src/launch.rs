/// Launch context: which service, if any, this process should open directly
use crate::error::HostError;

/// Flag form of the service argument (`--service gemini`, `--service=gemini`)
pub const SERVICE_FLAG: &str = "--service";

/// Startup intent of one process, resolved once and never mutated
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LaunchContext {
    pub requested_service_id: Option<String>,
}

impl LaunchContext {
    pub fn for_service(id: impl Into<String>) -> Self {
        Self {
            requested_service_id: Some(id.into()),
        }
    }

    /// Parse process arguments (without the program name).
    ///
    /// The first positional argument names the service; `--service` takes
    /// precedence. Values are lowercased, empty values count as absent and
    /// unknown flags are ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flagged: Option<String> = None;
        let mut positional: Option<String> = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            if arg == SERVICE_FLAG {
                if let Some(value) = args.next() {
                    flagged = normalize(value.as_ref());
                }
            } else if let Some(value) = arg.strip_prefix("--service=") {
                flagged = normalize(value);
            } else if arg.starts_with('-') {
                tracing::debug!("Ignoring unknown argument: {}", arg);
            } else if positional.is_none() {
                positional = normalize(arg);
            }
        }

        Self {
            requested_service_id: flagged.or(positional),
        }
    }

    /// Resolve from the current process arguments
    pub fn from_env() -> Result<Self, HostError> {
        let args: Vec<String> = std::env::args_os()
            .skip(1)
            .map(|a| {
                a.into_string().map_err(|raw| {
                    HostError::StartupQuery(format!("non UTF-8 argument: {:?}", raw))
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self::from_args(args))
    }

    /// Arguments that make a new process resolve to `service_id`
    pub fn to_args(service_id: &str) -> Vec<String> {
        vec![service_id.to_string()]
    }
}

fn normalize(value: &str) -> Option<String> {
    let value = value.trim().to_lowercase();
    (!value.is_empty()).then_some(value)
}
