//! Probing dependencies through a child Python interpreter.
//!
//! Each check runs a fresh interpreter, so a dependency that crashes or
//! hangs on import cannot take this process down with it. The child reports
//! back through its exit status:
//!
//! | exit | meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | found; stdout's last line is JSON metadata           |
//! | 3    | the module itself is not installed                   |
//! | 4    | importing raised (stderr holds the exception)        |
//!
//! A `ModuleNotFoundError` naming a *different* module means a transitive
//! dependency is missing, which is reported as broken rather than missing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::environment::search_path::PYTHONPATH;
use crate::environment::{Interpreter, SearchPath};
use crate::error::Result;
use crate::process::{self, CommandOptions};

use super::probe::{DependencyMetadata, DependencyProbe, ProbeOutcome};

const EXIT_NOT_FOUND: i32 = 3;
const EXIT_BROKEN: i32 = 4;

/// Invoked as `python -c PROBE_SCRIPT <module> <import|locate>`.
const PROBE_SCRIPT: &str = r#"
import importlib, importlib.util, json, sys

name, mode = sys.argv[1], sys.argv[2]

def fail(exc):
    print("%s: %s" % (type(exc).__name__, exc), file=sys.stderr)
    sys.exit(4)

try:
    spec = importlib.util.find_spec(name)
except ModuleNotFoundError:
    sys.exit(3)
except Exception as exc:
    fail(exc)
if spec is None:
    sys.exit(3)

version = None
location = spec.origin
if mode == "import":
    try:
        module = importlib.import_module(name)
    except ModuleNotFoundError as exc:
        if exc.name == name:
            sys.exit(3)
        fail(exc)
    except BaseException as exc:
        fail(exc)
    version = getattr(module, "__version__", None)
    location = getattr(module, "__file__", None) or location

if version is None:
    try:
        from importlib import metadata
        version = metadata.version(name.split(".")[0])
    except Exception:
        pass

print(json.dumps({"version": None if version is None else str(version), "location": location}))
"#;

/// How far the child goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Import the module, running its initialization.
    Import,
    /// Only resolve where the module would load from.
    Locate,
}

impl ImportMode {
    fn as_arg(self) -> &'static str {
        match self {
            ImportMode::Import => "import",
            ImportMode::Locate => "locate",
        }
    }
}

/// Probes dependencies by running a child interpreter.
#[derive(Debug, Clone)]
pub struct ImportProbe {
    interpreter: Interpreter,
    mode: ImportMode,
    search_path: SearchPath,
    timeout: Option<Duration>,
    cwd: Option<PathBuf>,
}

impl ImportProbe {
    /// Create a probe that imports modules with `interpreter`.
    pub fn new(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            mode: ImportMode::Import,
            search_path: SearchPath::new(),
            timeout: None,
            cwd: None,
        }
    }

    /// Set how far the child goes.
    pub fn with_mode(mut self, mode: ImportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Use `search_path` as the child's `PYTHONPATH`.
    pub fn with_search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = search_path;
        self
    }

    /// Kill a check that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the child in `dir`.
    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// The interpreter this probe runs.
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    fn options(&self) -> Result<CommandOptions> {
        let mut env = HashMap::new();
        if let Some(value) = self.search_path.to_env_value()? {
            env.insert(PYTHONPATH.to_string(), value);
        }
        Ok(CommandOptions {
            cwd: self.cwd.clone(),
            env,
            timeout: self.timeout,
        })
    }
}

impl DependencyProbe for ImportProbe {
    fn ensure_ready(&self) -> Result<()> {
        process::run(&self.interpreter.path, &["--version"], &CommandOptions::default())?;
        Ok(())
    }

    fn probe(&self, name: &str) -> Result<ProbeOutcome> {
        let options = self.options()?;
        let output = process::run(
            &self.interpreter.path,
            &["-c", PROBE_SCRIPT, name, self.mode.as_arg()],
            &options,
        )?;

        if output.timed_out {
            tracing::debug!("{} timed out after {:?}", name, output.duration);
            return Ok(ProbeOutcome::TimedOut {
                after: self.timeout.unwrap_or(output.duration),
            });
        }

        let outcome = match output.exit_code {
            Some(0) => match parse_metadata(&output.stdout) {
                Some(meta) => ProbeOutcome::Found(meta),
                None => ProbeOutcome::Broken {
                    detail: "probe produced no readable output".to_string(),
                },
            },
            Some(EXIT_NOT_FOUND) => ProbeOutcome::NotFound,
            Some(EXIT_BROKEN) => ProbeOutcome::Broken {
                detail: last_line(&output.stderr)
                    .unwrap_or("import failed")
                    .to_string(),
            },
            code => ProbeOutcome::Broken {
                detail: match (code, last_line(&output.stderr)) {
                    (Some(c), Some(line)) => format!("interpreter exited with {}: {}", c, line),
                    (Some(c), None) => format!("interpreter exited with {}", c),
                    (None, Some(line)) => format!("interpreter killed: {}", line),
                    (None, None) => "interpreter killed by signal".to_string(),
                },
            },
        };

        tracing::debug!("Probed {}: {:?}", name, outcome);
        Ok(outcome)
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rfind(|l| !l.is_empty())
}

fn parse_metadata(stdout: &str) -> Option<DependencyMetadata> {
    serde_json::from_str(last_line(stdout)?).ok()
}
