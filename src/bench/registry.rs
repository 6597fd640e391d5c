//! Candidate discovery
//!
//! Narrows a declared set of candidates down to those installed on the
//! host. Each candidate's command is tried against an ordered chain of
//! resolvers; the first hit wins and becomes the candidate's command.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::Candidate;

/// One strategy for locating an executable by name
pub trait Resolver: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Full path of `command`, if this strategy can find it
    fn resolve(&self, command: &Path) -> Option<PathBuf>;
}

/// Looks the command up on a `PATH`-style search list
#[derive(Debug, Clone)]
pub struct SearchPath {
    path: OsString,
}

impl SearchPath {
    pub fn new(path: impl Into<OsString>) -> Self {
        Self { path: path.into() }
    }

    /// Use the process `PATH`
    pub fn from_env() -> Self {
        Self::new(env::var_os("PATH").unwrap_or_default())
    }

    fn lookup(&self, command: &Path) -> Option<PathBuf> {
        // Commands with a directory part are checked directly
        if command.components().count() > 1 {
            return is_executable(command).then(|| command.to_path_buf());
        }
        env::split_paths(&self.path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(command))
            .find(|candidate| is_executable(candidate))
    }
}

impl Resolver for SearchPath {
    fn name(&self) -> &'static str {
        "search path"
    }

    fn resolve(&self, command: &Path) -> Option<PathBuf> {
        self.lookup(command)
    }
}

/// Looks the command up on the search path with an executable suffix
#[derive(Debug, Clone)]
pub struct SuffixedSearchPath {
    inner: SearchPath,
    suffix: String,
}

impl SuffixedSearchPath {
    pub fn new(inner: SearchPath, suffix: impl Into<String>) -> Self {
        Self {
            inner,
            suffix: suffix.into(),
        }
    }
}

impl Resolver for SuffixedSearchPath {
    fn name(&self) -> &'static str {
        "search path with suffix"
    }

    fn resolve(&self, command: &Path) -> Option<PathBuf> {
        self.inner.lookup(&with_suffix(command, &self.suffix))
    }
}

/// Probes conventional per-user `bin` directories for the literal and
/// suffixed command name
#[derive(Debug, Clone)]
pub struct BinDirectories {
    dirs: Vec<PathBuf>,
    suffix: String,
}

impl BinDirectories {
    pub fn new(dirs: Vec<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dirs,
            suffix: suffix.into(),
        }
    }

    /// `$GOPATH/bin`, `~/go/bin`, `~/.cargo/bin` and `~/.local/bin`
    pub fn conventional() -> Self {
        let mut found = Vec::new();
        if let Some(gopath) = env::var_os("GOPATH").filter(|p| !p.is_empty()) {
            found.push(PathBuf::from(gopath).join("bin"));
        }
        if let Some(home) = dirs::home_dir() {
            found.push(home.join("go").join("bin"));
            found.push(home.join(".cargo").join("bin"));
            found.push(home.join(".local").join("bin"));
        }
        Self::new(found, platform_suffix())
    }
}

impl Resolver for BinDirectories {
    fn name(&self) -> &'static str {
        "bin directories"
    }

    fn resolve(&self, command: &Path) -> Option<PathBuf> {
        if command.components().count() > 1 {
            return None;
        }
        let suffixed = with_suffix(command, &self.suffix);
        self.dirs.iter().find_map(|dir| {
            [dir.join(command), dir.join(&suffixed)]
                .into_iter()
                .find(|p| is_executable(p))
        })
    }
}

/// Ordered resolver chain used to filter declared candidates
pub struct Registry {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl Registry {
    /// Registry with an explicit resolver chain
    pub fn new(resolvers: Vec<Box<dyn Resolver>>) -> Self {
        Self { resolvers }
    }

    /// Search path, then search path with the platform suffix, then the
    /// conventional bin directories
    pub fn from_env() -> Self {
        let path = SearchPath::from_env();
        let mut resolvers: Vec<Box<dyn Resolver>> = vec![Box::new(path.clone())];
        let suffix = platform_suffix();
        if !suffix.is_empty() {
            resolvers.push(Box::new(SuffixedSearchPath::new(path, suffix)));
        }
        resolvers.push(Box::new(BinDirectories::conventional()));
        Self::new(resolvers)
    }

    /// Resolve a single command through the chain
    pub fn resolve(&self, command: &Path) -> Option<PathBuf> {
        self.resolvers.iter().find_map(|resolver| {
            let found = resolver.resolve(command);
            if let Some(ref path) = found {
                debug!(
                    command = %command.display(),
                    via = resolver.name(),
                    path = %path.display(),
                    "resolved"
                );
            }
            found
        })
    }

    /// Candidates that resolve on this host, in declared order, with their
    /// command rewritten to the resolved path. Missing ones are dropped.
    pub fn filter_available(&self, declared: &[Candidate]) -> Vec<Candidate> {
        declared
            .iter()
            .filter_map(|candidate| match self.resolve(&candidate.command) {
                Some(path) => Some(candidate.resolved(path)),
                None => {
                    warn!(awk = %candidate.name, "not installed, skipping");
                    None
                }
            })
            .collect()
    }
}

fn platform_suffix() -> String {
    env::consts::EXE_SUFFIX.to_string()
}

fn with_suffix(command: &Path, suffix: &str) -> PathBuf {
    let mut name = command.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
