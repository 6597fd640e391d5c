//! Candidate AWK implementations
//!
//! A candidate is one external engine under test: a display name, the
//! command used to invoke it and extra arguments placed before the
//! program and input.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One benchmarkable AWK implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display name, unique within a session (e.g. "uawk", "gawk")
    pub name: String,
    /// Executable name, or the fully resolved path once filtered
    pub command: PathBuf,
    /// Extra arguments placed ahead of the program and input
    #[serde(default)]
    pub args: Vec<String>,
}

impl Candidate {
    /// Create a candidate without extra arguments
    pub fn new(name: impl Into<String>, command: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
        }
    }

    /// Set the extra arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Copy of this candidate pointing at a resolved executable
    pub fn resolved(&self, path: PathBuf) -> Self {
        Self {
            command: path,
            ..self.clone()
        }
    }

    /// The standard set of implementations, including parallel uawk
    /// variants sized for `cpus` workers.
    pub fn defaults(cpus: usize) -> Vec<Candidate> {
        // frawk is left out: its Cranelift backend crashes and LLVM needs a heavy toolchain
        let mut candidates = vec![
            Candidate::new("uawk", "uawk"),
            Candidate::new("uawk-fast", "uawk").with_args(["--no-posix"]),
            Candidate::new("uawk-j4", "uawk").with_args(["-j", "4"]),
        ];
        if cpus != 4 {
            candidates.push(
                Candidate::new(format!("uawk-j{}", cpus), "uawk")
                    .with_args(["-j".to_string(), cpus.to_string()]),
            );
        }
        candidates.extend([
            Candidate::new("goawk", "goawk"),
            Candidate::new("gawk", "gawk").with_args(["-b"]), // -b disables multibyte
            Candidate::new("mawk", "mawk"),
        ]);
        candidates
    }

    /// Keep only the candidates named in `names`, in declared order.
    /// An empty filter keeps everything.
    pub fn select(declared: &[Candidate], names: &[String]) -> Vec<Candidate> {
        if names.is_empty() {
            return declared.to_vec();
        }
        declared
            .iter()
            .filter(|c| names.iter().any(|n| n.trim() == c.name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_include_parallel_variant() {
        let defaults = Candidate::defaults(16);
        assert_eq!(defaults.len(), 7);
        let parallel = defaults.iter().find(|c| c.name == "uawk-j16").unwrap();
        assert_eq!(parallel.args, vec!["-j", "16"]);
        let gawk = defaults.iter().find(|c| c.name == "gawk").unwrap();
        assert_eq!(gawk.args, vec!["-b"]);
    }

    #[test]
    fn test_defaults_names_are_unique_with_four_cpus() {
        let defaults = Candidate::defaults(4);
        assert_eq!(defaults.len(), 6);
        assert_eq!(defaults.iter().filter(|c| c.name == "uawk-j4").count(), 1);
    }

    #[test]
    fn test_select_preserves_declared_order() {
        let defaults = Candidate::defaults(4);
        let names = vec!["mawk".to_string(), " goawk ".to_string(), "nawk".to_string()];
        let selected = Candidate::select(&defaults, &names);
        let selected: Vec<&str> = selected.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(selected, vec!["goawk", "mawk"]);
    }

    #[test]
    fn test_select_empty_keeps_all() {
        let defaults = Candidate::defaults(2);
        assert_eq!(Candidate::select(&defaults, &[]), defaults);
    }

    #[test]
    fn test_resolved_keeps_name_and_args() {
        let gawk = Candidate::new("gawk", "gawk").with_args(["-b"]);
        let resolved = gawk.resolved(PathBuf::from("/usr/bin/gawk"));
        assert_eq!(resolved.name, "gawk");
        assert_eq!(resolved.args, vec!["-b"]);
        assert_eq!(resolved.command, PathBuf::from("/usr/bin/gawk"));
    }
}
