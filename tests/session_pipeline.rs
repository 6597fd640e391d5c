//! End-to-end session: datasets, discovery, resolution, benchmarking
//! and report files.

#![cfg(unix)]

use awkbench::bench::registry::SearchPath;
use awkbench::bench::{
    BenchmarkRunner, ProcessExecutor, ProgramCatalog, Registry, RunnerSettings, Session,
};
use awkbench::config::ReportFormat;
use awkbench::dataset::{DatasetGenerator, SizePreset};
use awkbench::models::Candidate;
use awkbench::report::write_all;
use awkbench::{CSV_FILE, JSON_FILE, MARKDOWN_FILE};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn sh_candidate(name: &str, dir: &Path, body: &str) -> Candidate {
    let script = dir.join(format!("{}.sh", name));
    fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
    Candidate::new(name, "/bin/sh").with_args([script.to_string_lossy().into_owned()])
}

#[tokio::test]
async fn test_full_session_writes_reports() {
    let root = TempDir::new().unwrap();
    let programs = root.path().join("programs");
    let scripts = root.path().join("scripts");
    fs::create_dir_all(&programs).unwrap();
    fs::create_dir_all(&scripts).unwrap();
    fs::write(programs.join("sum.awk"), "{ s += $1 } END { print s }\n").unwrap();
    fs::write(programs.join("regex.awk"), "/fox/ { n++ } END { print n }\n").unwrap();

    let datasets = DatasetGenerator::new(42)
        .generate_all(&root.path().join("testdata"), SizePreset::Small)
        .unwrap();
    let catalog = ProgramCatalog::discover(&programs).unwrap();
    assert_eq!(catalog.len(), 2);

    let declared = vec![
        sh_candidate("reader", &scripts, r#"cat "$3" > /dev/null"#),
        Candidate::new("ghost", "/nonexistent/bin/ghost-awk"),
        sh_candidate("broken", &scripts, "echo 'unsupported feature' >&2; exit 2"),
    ];
    let registry = Registry::new(vec![Box::new(SearchPath::new(""))]);
    let candidates = registry.filter_available(&declared);
    let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["reader", "broken"]);

    let settings = RunnerSettings {
        timeout: Duration::from_secs(30),
        warmup: 1,
        runs: 2,
    };
    let session = Session::new(BenchmarkRunner::new(ProcessExecutor::new(), settings));
    let report = session.run(&candidates, &catalog, &datasets).await.unwrap();

    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.awk == "reader" && r.runs == 2));
    assert!(report.results.iter().all(|r| r.throughput_mbps > 0.0));
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().all(|f| f.reason.contains("unsupported feature")));
    assert_eq!(report.ranking.len(), 1);
    assert_eq!(report.ranking[0].score, 1.0);
    assert_eq!(report.ranking[0].programs, 2);

    let out = root.path().join("results");
    let written = write_all(&out, &report, &ReportFormat::ALL).unwrap();
    assert_eq!(written.len(), 3);

    let md = fs::read_to_string(out.join(MARKDOWN_FILE)).unwrap();
    assert!(md.contains("## regex.awk"));
    assert!(md.contains("## sum.awk"));
    assert!(md.contains("## Failures"));
    assert!(md.contains("| broken | sum.awk |"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(JSON_FILE)).unwrap()).unwrap();
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert_eq!(json["failures"].as_array().unwrap().len(), 2);

    let csv = fs::read_to_string(out.join(CSV_FILE)).unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[tokio::test]
async fn test_all_candidates_failing_still_completes() {
    let root = TempDir::new().unwrap();
    let programs = root.path().join("programs");
    fs::create_dir_all(&programs).unwrap();
    fs::write(programs.join("groupby.awk"), "{ c[$1]++ }\n").unwrap();

    let datasets = DatasetGenerator::new(3)
        .generate_all(&root.path().join("data"), SizePreset::Small)
        .unwrap();
    let catalog = ProgramCatalog::discover(&programs).unwrap();
    let candidates = vec![sh_candidate("nope", root.path(), "exit 1")];

    let session = Session::new(BenchmarkRunner::new(
        ProcessExecutor::new(),
        RunnerSettings::default(),
    ));
    let report = session.run(&candidates, &catalog, &datasets).await.unwrap();

    assert!(report.results.is_empty());
    assert!(report.ranking.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].program, "groupby.awk");
}
