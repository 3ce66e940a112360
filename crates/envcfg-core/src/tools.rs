//! External tool availability checks

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Reports whether a named program can be executed
pub trait ToolChecker: Send + Sync {
    fn is_available(&self, tool: &str) -> bool;
}

/// Looks tools up on a search path, like a shell would
#[derive(Debug, Clone, Default)]
pub struct PathToolChecker {
    search_path: Option<OsString>,
}

impl PathToolChecker {
    /// Search the current process's `PATH`.
    pub fn from_env() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Search an explicit `PATH`-style list of directories.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ToolChecker for PathToolChecker {
    fn is_available(&self, tool: &str) -> bool {
        if tool.is_empty() {
            return false;
        }
        if tool.contains(std::path::MAIN_SEPARATOR) || tool.contains('/') {
            return is_executable(Path::new(tool));
        }
        let Some(search_path) = &self.search_path else {
            return false;
        };
        std::env::split_paths(search_path).any(|dir| is_executable(&dir.join(tool)))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Fail with [`Error::DependencyMissing`] naming every unavailable tool.
pub fn check_tools<S: AsRef<str>>(checker: &dyn ToolChecker, tools: &[S]) -> Result<()> {
    let mut missing = BTreeSet::new();
    for tool in tools {
        let tool: &str = tool.as_ref();
        if !checker.is_available(tool) {
            missing.insert(tool.to_string());
        }
    }

    if missing.is_empty() {
        debug!(count = tools.len(), "All required tools available");
        Ok(())
    } else {
        Err(Error::DependencyMissing {
            tools: missing.into_iter().collect(),
        })
    }
}
