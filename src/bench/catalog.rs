//! Benchmark program discovery

use std::fs;
use std::path::{Path, PathBuf};

use crate::bench::executor::Program;
use crate::dataset::DatasetKind;
use crate::{AwkBenchError, Result, PROGRAM_EXTENSION};

/// Ordered set of `.awk` program files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramCatalog {
    programs: Vec<PathBuf>,
}

impl ProgramCatalog {
    /// Collect every `*.awk` file in `dir`, sorted by path.
    pub fn discover(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| {
            AwkBenchError::Config(format!("Cannot read program directory {}: {}", dir.display(), e))
        })?;

        let mut programs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_awk = path
                .extension()
                .map(|ext| ext == PROGRAM_EXTENSION)
                .unwrap_or(false);
            if is_awk && path.is_file() {
                programs.push(path);
            }
        }

        if programs.is_empty() {
            return Err(AwkBenchError::NoPrograms(dir.to_path_buf()));
        }
        programs.sort();
        Ok(Self { programs })
    }

    pub fn from_paths(mut programs: Vec<PathBuf>) -> Self {
        programs.sort();
        Self { programs }
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Programs paired with the dataset each one reads
    pub fn entries(&self) -> impl Iterator<Item = (Program, DatasetKind)> + '_ {
        self.programs.iter().map(|path| {
            let program = Program::File(path.clone());
            let kind = dataset_for(&program.id());
            (program, kind)
        })
    }
}

/// Dataset a program is run against, keyed by its file name.
/// Unknown programs read the numeric dataset.
pub fn dataset_for(file_name: &str) -> DatasetKind {
    match file_name {
        "sum.awk" | "filter.awk" | "select.awk" => DatasetKind::Numeric,
        "count.awk" | "wordcount.awk" | "regex.awk" | "email.awk" | "charclass.awk" => {
            DatasetKind::Text
        }
        "groupby.awk" => DatasetKind::KeyValue,
        "csv.awk" => DatasetKind::Csv,
        "ipaddr.awk" | "alternation.awk" | "suffix.awk" | "version.awk" | "inner.awk"
        | "anchored.awk" => DatasetKind::Log,
        _ => DatasetKind::Numeric,
    }
}
