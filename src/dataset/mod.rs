//! Synthetic input datasets
//!
//! Generates reproducible input files for each dataset category at one
//! of a few preset sizes.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::{AwkBenchError, Result};

/// Dataset size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SizePreset {
    /// 1 MiB
    Small,
    /// 10 MiB
    Medium,
    /// 100 MiB
    Large,
    /// 500 MiB
    XLarge,
}

impl SizePreset {
    pub const ALL: [SizePreset; 4] = [
        SizePreset::Small,
        SizePreset::Medium,
        SizePreset::Large,
        SizePreset::XLarge,
    ];

    /// Target size in bytes
    pub fn bytes(&self) -> u64 {
        match self {
            SizePreset::Small => 1 << 20,
            SizePreset::Medium => 10 << 20,
            SizePreset::Large => 100 << 20,
            SizePreset::XLarge => 500 << 20,
        }
    }

    /// Short label used on the command line and in file names
    pub fn label(&self) -> &'static str {
        match self {
            SizePreset::Small => "1MB",
            SizePreset::Medium => "10MB",
            SizePreset::Large => "100MB",
            SizePreset::XLarge => "500MB",
        }
    }
}

impl Default for SizePreset {
    fn default() -> Self {
        SizePreset::Medium
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizePreset {
    type Err = AwkBenchError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_uppercase();
        SizePreset::ALL
            .into_iter()
            .find(|preset| preset.label() == wanted)
            .ok_or_else(|| {
                AwkBenchError::Config(format!(
                    "invalid size: {} (use 1MB, 10MB, 100MB, 500MB)",
                    s
                ))
            })
    }
}

impl TryFrom<String> for SizePreset {
    type Error = AwkBenchError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SizePreset> for String {
    fn from(value: SizePreset) -> Self {
        value.label().to_string()
    }
}

/// Category of generated input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// `int float int float int` per line
    Numeric,
    /// Lines of 5 to 15 words
    Text,
    /// CSV with an `id,name,value,category,score` header
    Csv,
    /// `keyNNN value` with 100 distinct keys
    KeyValue,
    /// Timestamped log lines with an IP address and a level
    Log,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::Numeric,
        DatasetKind::Text,
        DatasetKind::Csv,
        DatasetKind::KeyValue,
        DatasetKind::Log,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Numeric => "numeric",
            DatasetKind::Text => "text",
            DatasetKind::Csv => "csv",
            DatasetKind::KeyValue => "keyvalue",
            DatasetKind::Log => "log",
        }
    }

    /// File name for this kind at `size`
    pub fn file_name(&self, size: SizePreset) -> String {
        match self {
            DatasetKind::Csv => format!("data_{}.csv", size),
            other => format!("{}_{}.txt", other.name(), size),
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog",
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing",
    "data", "processing", "benchmark", "performance", "test123", "value42",
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta",
];

const NAMES: &[&str] = &["alice", "bob", "charlie", "david", "eve", "frank", "grace", "henry"];
const CATEGORIES: &[&str] = &["A", "B", "C", "D"];

const LEVELS: &[&str] = &[
    "ERROR", "WARN", "INFO", "DEBUG", "TRACE", "FATAL", "CRITICAL", "NOTICE", "ALERT", "EMERGENCY",
];

const MESSAGES: &[&str] = &[
    "Processing request from client",
    "Connection established successfully",
    "Database query completed",
    "Cache miss for key",
    "Authentication failed for user",
    "File uploaded successfully",
    "Memory usage threshold exceeded",
    "Service health check passed",
    "Rate limit exceeded",
    "Session expired",
];

const KEY_COUNT: usize = 100;

/// Deterministic dataset generator
pub struct DatasetGenerator {
    seed: u64,
    rng: SmallRng,
}

impl DatasetGenerator {
    /// Create a generator; equal seeds produce identical files
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Write one dataset of at least `size` bytes into `dir`.
    ///
    /// The data goes to a `.partial` file that is renamed into place once
    /// complete, so an interrupted run never leaves a short dataset behind.
    pub fn generate(&mut self, dir: &Path, kind: DatasetKind, size: SizePreset) -> Result<PathBuf> {
        let path = dir.join(kind.file_name(size));
        let partial = dir.join(format!("{}.partial", kind.file_name(size)));
        let file = File::create(&partial).map_err(|e| {
            AwkBenchError::Dataset(format!("Failed to create {}: {}", partial.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        let target = size.bytes();
        let mut written = 0u64;
        let mut line = String::with_capacity(128);

        if kind == DatasetKind::Csv {
            line.push_str("id,name,value,category,score\n");
            written += self.emit(&mut writer, &mut line, &partial)?;
        }

        let mut id = 1u64;
        while written < target {
            self.next_line(kind, id, &mut line);
            written += self.emit(&mut writer, &mut line, &partial)?;
            id += 1;
        }

        writer.flush().map_err(|e| {
            AwkBenchError::Dataset(format!("Failed to flush {}: {}", partial.display(), e))
        })?;
        drop(writer);
        fs::rename(&partial, &path).map_err(|e| {
            AwkBenchError::Dataset(format!("Failed to move {} into place: {}", path.display(), e))
        })?;
        Ok(path)
    }

    /// Generate every dataset kind at `size`, creating `dir` if needed
    pub fn generate_all(&mut self, dir: &Path, size: SizePreset) -> Result<Datasets> {
        fs::create_dir_all(dir).map_err(|e| {
            AwkBenchError::Dataset(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        // Invalidate first so a half-finished regeneration is never reused
        let manifest = manifest_path(dir, size);
        if manifest.exists() {
            fs::remove_file(&manifest).map_err(|e| {
                AwkBenchError::Dataset(format!("Failed to remove {}: {}", manifest.display(), e))
            })?;
        }

        let mut files = BTreeMap::new();
        for kind in DatasetKind::ALL {
            let path = self.generate(dir, kind, size)?;
            info!(dataset = %kind, path = %path.display(), "generated");
            files.insert(kind, path);
        }

        let content = serde_json::to_string_pretty(&Manifest { seed: self.seed, size })
            .map_err(|e| AwkBenchError::Dataset(format!("Failed to encode manifest: {}", e)))?;
        fs::write(&manifest, content).map_err(|e| {
            AwkBenchError::Dataset(format!("Failed to write {}: {}", manifest.display(), e))
        })?;
        Ok(Datasets { files })
    }

    fn emit(&self, writer: &mut BufWriter<File>, line: &mut String, path: &Path) -> Result<u64> {
        writer.write_all(line.as_bytes()).map_err(|e| {
            AwkBenchError::Dataset(format!("Failed to write {}: {}", path.display(), e))
        })?;
        let n = line.len() as u64;
        line.clear();
        Ok(n)
    }

    fn next_line(&mut self, kind: DatasetKind, id: u64, line: &mut String) {
        use std::fmt::Write as _;
        let rng = &mut self.rng;
        // Writing into a String cannot fail
        let _ = match kind {
            DatasetKind::Numeric => writeln!(
                line,
                "{} {:.6} {} {:.6} {}",
                rng.gen_range(0..1000),
                rng.gen::<f64>() * 1000.0,
                rng.gen_range(0..1000),
                rng.gen::<f64>() * 1000.0,
                rng.gen_range(0..1000),
            ),
            DatasetKind::Text => {
                let count = rng.gen_range(5..=15);
                let words: Vec<&str> = (0..count)
                    .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
                    .collect();
                writeln!(line, "{}", words.join(" "))
            }
            DatasetKind::Csv => writeln!(
                line,
                "{},{},{:.2},{},{}",
                id,
                NAMES[rng.gen_range(0..NAMES.len())],
                rng.gen::<f64>() * 1000.0,
                CATEGORIES[rng.gen_range(0..CATEGORIES.len())],
                rng.gen_range(0..100),
            ),
            DatasetKind::KeyValue => writeln!(
                line,
                "key{:03} {}",
                rng.gen_range(0..KEY_COUNT),
                rng.gen_range(0..1000),
            ),
            DatasetKind::Log => writeln!(
                line,
                "2024-01-05 {:02}:{:02}:{:02} {}.{}.{}.{} {} {}",
                rng.gen_range(0..24),
                rng.gen_range(0..60),
                rng.gen_range(0..60),
                rng.gen_range(0..=255u8),
                rng.gen_range(0..=255u8),
                rng.gen_range(0..=255u8),
                rng.gen_range(0..=255u8),
                LEVELS[rng.gen_range(0..LEVELS.len())],
                MESSAGES[rng.gen_range(0..MESSAGES.len())],
            ),
        };
    }
}

/// Written after a complete `generate_all`
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    seed: u64,
    size: SizePreset,
}

fn manifest_path(dir: &Path, size: SizePreset) -> PathBuf {
    dir.join(format!("manifest_{}.json", size))
}

/// Generated dataset files keyed by kind
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    files: BTreeMap<DatasetKind, PathBuf>,
}

impl Datasets {
    /// Use existing files
    pub fn from_paths(files: impl IntoIterator<Item = (DatasetKind, PathBuf)>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    /// Previously generated files in `dir`, reusable only when a complete
    /// generation with the same `seed` left every kind at full size.
    pub fn existing(dir: &Path, size: SizePreset, seed: u64) -> Option<Self> {
        let manifest: Manifest = fs::read_to_string(manifest_path(dir, size))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())?;
        if manifest.seed != seed || manifest.size != size {
            debug!(recorded = manifest.seed, requested = seed, "dataset seed changed");
            return None;
        }

        let mut files = BTreeMap::new();
        for kind in DatasetKind::ALL {
            let path = dir.join(kind.file_name(size));
            let len = fs::metadata(&path).ok().filter(|m| m.is_file())?.len();
            if len < size.bytes() {
                debug!(path = %path.display(), len, "dataset shorter than its preset");
                return None;
            }
            files.insert(kind, path);
        }
        Some(Self { files })
    }

    pub fn path(&self, kind: DatasetKind) -> Option<&Path> {
        self.files.get(&kind).map(PathBuf::as_path)
    }

    /// Size of the dataset file in bytes
    pub fn input_size(&self, kind: DatasetKind) -> Result<u64> {
        let path = self.path(kind).ok_or_else(|| {
            AwkBenchError::Dataset(format!("No {} dataset available", kind))
        })?;
        let meta = fs::metadata(path).map_err(|e| {
            AwkBenchError::Dataset(format!("Failed to stat {}: {}", path.display(), e))
        })?;
        Ok(meta.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (DatasetKind, &Path)> {
        self.files.iter().map(|(k, p)| (*k, p.as_path()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_size_preset_parsing() {
        assert_eq!("1MB".parse::<SizePreset>().unwrap(), SizePreset::Small);
        assert_eq!(" 10mb ".parse::<SizePreset>().unwrap(), SizePreset::Medium);
        assert_eq!("100MB".parse::<SizePreset>().unwrap(), SizePreset::Large);
        assert_eq!("500MB".parse::<SizePreset>().unwrap(), SizePreset::XLarge);
        assert!("2GB".parse::<SizePreset>().is_err());
        assert_eq!(SizePreset::Large.bytes(), 100 * 1024 * 1024);
        assert_eq!(SizePreset::Small.to_string(), "1MB");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(DatasetKind::Numeric.file_name(SizePreset::Small), "numeric_1MB.txt");
        assert_eq!(DatasetKind::Csv.file_name(SizePreset::Medium), "data_10MB.csv");
        assert_eq!(DatasetKind::KeyValue.file_name(SizePreset::Small), "keyvalue_1MB.txt");
    }

    #[test]
    fn test_generate_all_reaches_target_size() {
        let dir = TempDir::new().unwrap();
        let mut generator = DatasetGenerator::new(42);
        let datasets = generator.generate_all(&dir.path().join("data"), SizePreset::Small).unwrap();

        assert_eq!(datasets.len(), 5);
        for kind in DatasetKind::ALL {
            let size = datasets.input_size(kind).unwrap();
            assert!(size >= SizePreset::Small.bytes(), "{} too small", kind);
            assert!(size < SizePreset::Small.bytes() + 256, "{} overshoots", kind);
        }
    }

    #[test]
    fn test_line_formats() {
        let dir = TempDir::new().unwrap();
        let mut generator = DatasetGenerator::new(7);
        let datasets = generator.generate_all(dir.path(), SizePreset::Small).unwrap();

        let csv = fs::read_to_string(datasets.path(DatasetKind::Csv).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("id,name,value,category,score"));
        assert!(lines.next().unwrap().starts_with("1,"));

        let kv = fs::read_to_string(datasets.path(DatasetKind::KeyValue).unwrap()).unwrap();
        let first: Vec<&str> = kv.lines().next().unwrap().split(' ').collect();
        assert_eq!(first.len(), 2);
        assert!(first[0].starts_with("key") && first[0].len() == 6);

        let numeric = fs::read_to_string(datasets.path(DatasetKind::Numeric).unwrap()).unwrap();
        assert_eq!(numeric.lines().next().unwrap().split(' ').count(), 5);

        let log = fs::read_to_string(datasets.path(DatasetKind::Log).unwrap()).unwrap();
        assert!(log.lines().all(|l| l.starts_with("2024-01-05 ")));

        let text = fs::read_to_string(datasets.path(DatasetKind::Text).unwrap()).unwrap();
        assert!(text.lines().all(|l| (5..=15).contains(&l.split(' ').count())));
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let pa = DatasetGenerator::new(42)
            .generate(a.path(), DatasetKind::Log, SizePreset::Small)
            .unwrap();
        let pb = DatasetGenerator::new(42)
            .generate(b.path(), DatasetKind::Log, SizePreset::Small)
            .unwrap();
        assert_eq!(fs::read(pa).unwrap(), fs::read(pb).unwrap());
    }

    #[test]
    fn test_existing_requires_every_kind() {
        let dir = TempDir::new().unwrap();
        assert!(Datasets::existing(dir.path(), SizePreset::Small, 1).is_none());

        DatasetGenerator::new(1).generate_all(dir.path(), SizePreset::Small).unwrap();
        assert_eq!(Datasets::existing(dir.path(), SizePreset::Small, 1).unwrap().len(), 5);
        assert!(Datasets::existing(dir.path(), SizePreset::Medium, 1).is_none());

        fs::remove_file(dir.path().join("log_1MB.txt")).unwrap();
        assert!(Datasets::existing(dir.path(), SizePreset::Small, 1).is_none());
    }

    #[test]
    fn test_truncated_dataset_is_not_reused() {
        let dir = TempDir::new().unwrap();
        DatasetGenerator::new(42).generate_all(dir.path(), SizePreset::Small).unwrap();

        let log = dir.path().join("log_1MB.txt");
        let file = fs::OpenOptions::new().write(true).open(&log).unwrap();
        file.set_len(200).unwrap();
        drop(file);

        assert!(Datasets::existing(dir.path(), SizePreset::Small, 42).is_none());
    }

    #[test]
    fn test_different_seed_is_not_reused() {
        let dir = TempDir::new().unwrap();
        DatasetGenerator::new(42).generate_all(dir.path(), SizePreset::Small).unwrap();
        let before = fs::read(dir.path().join("numeric_1MB.txt")).unwrap();

        assert!(Datasets::existing(dir.path(), SizePreset::Small, 42).is_some());
        assert!(Datasets::existing(dir.path(), SizePreset::Small, 7).is_none());

        DatasetGenerator::new(7).generate_all(dir.path(), SizePreset::Small).unwrap();
        assert!(Datasets::existing(dir.path(), SizePreset::Small, 7).is_some());
        assert!(Datasets::existing(dir.path(), SizePreset::Small, 42).is_none());
        assert_ne!(fs::read(dir.path().join("numeric_1MB.txt")).unwrap(), before);
    }

    #[test]
    fn test_generation_leaves_no_partial_files() {
        let dir = TempDir::new().unwrap();
        DatasetGenerator::new(3).generate_all(dir.path(), SizePreset::Small).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_missing_manifest_is_not_reused() {
        let dir = TempDir::new().unwrap();
        DatasetGenerator::new(42).generate_all(dir.path(), SizePreset::Small).unwrap();
        fs::remove_file(dir.path().join("manifest_1MB.json")).unwrap();
        assert!(Datasets::existing(dir.path(), SizePreset::Small, 42).is_none());
    }

    #[test]
    fn test_missing_dataset_is_an_error() {
        let datasets = Datasets::default();
        assert!(datasets.input_size(DatasetKind::Log).is_err());
    }
}
