//! Markdown report rendering

use std::collections::BTreeMap;
use std::io::Write;

use crate::bench::SessionReport;
use crate::models::{AggregatedResult, BenchFailure, RankingEntry, SystemInfo};
use crate::util::units::{format_duration, format_throughput};
use crate::Result;

const BAR_WIDTH: f64 = 10.0;

/// Write the full Markdown report
pub fn write_markdown<W: Write>(w: &mut W, report: &SessionReport) -> Result<()> {
    writeln!(w, "# AWK Benchmark Results")?;
    writeln!(w)?;
    writeln!(w, "Generated: {}", report.generated.to_rfc3339())?;
    writeln!(w)?;

    write_summary(w, &report.ranking)?;
    write_programs(w, &report.results)?;
    write_failures(w, &report.failures)?;
    write_system(w, &report.system)?;
    Ok(())
}

/// Relative speed table, one row per ranked candidate
pub fn write_summary<W: Write>(w: &mut W, ranking: &[RankingEntry]) -> Result<()> {
    if ranking.is_empty() {
        return Ok(());
    }

    writeln!(w, "## Summary (Geometric Mean)")?;
    writeln!(w)?;
    writeln!(w, "| Rank | AWK | Relative Speed |")?;
    writeln!(w, "|------|-----|----------------|")?;
    for (i, entry) in ranking.iter().enumerate() {
        writeln!(
            w,
            "| {} | {} | {:.2}x {} |",
            i + 1,
            entry.awk,
            entry.score,
            speed_bar(entry.score)
        )?;
    }
    writeln!(w)?;
    Ok(())
}

fn write_programs<W: Write>(w: &mut W, results: &[AggregatedResult]) -> Result<()> {
    let mut by_program: BTreeMap<&str, Vec<&AggregatedResult>> = BTreeMap::new();
    for result in results {
        by_program.entry(result.program.as_str()).or_default().push(result);
    }

    for (program, mut rows) in by_program {
        rows.sort_by(|a, b| a.mean.cmp(&b.mean).then_with(|| a.awk.cmp(&b.awk)));
        let baseline = rows[0].mean;

        writeln!(w, "## {}", program)?;
        writeln!(w)?;
        writeln!(w, "| AWK | Mean | Min | Max | StdDev | Throughput |")?;
        writeln!(w, "|-----|------|-----|-----|--------|------------|")?;
        for row in rows {
            let ratio = if row.mean == baseline {
                String::new()
            } else {
                format!(" ({:.2}x)", row.ratio_to(baseline))
            };
            writeln!(
                w,
                "| {} | {}{} | {} | {} | {} | {} |",
                row.awk,
                format_duration(row.mean),
                ratio,
                format_duration(row.min),
                format_duration(row.max),
                format_duration(row.std_dev),
                format_throughput(row.throughput_mbps),
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn write_failures<W: Write>(w: &mut W, failures: &[BenchFailure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    writeln!(w, "## Failures")?;
    writeln!(w)?;
    writeln!(w, "| AWK | Program | Reason |")?;
    writeln!(w, "|-----|---------|--------|")?;
    for failure in failures {
        writeln!(
            w,
            "| {} | {} | {} |",
            failure.awk,
            failure.program,
            table_cell(&failure.reason)
        )?;
    }
    writeln!(w)?;
    Ok(())
}

fn write_system<W: Write>(w: &mut W, system: &SystemInfo) -> Result<()> {
    writeln!(w, "## System")?;
    writeln!(w)?;
    writeln!(w, "- OS: {}", system.os)?;
    writeln!(w, "- Arch: {}", system.arch)?;
    writeln!(w, "- CPUs: {}", system.cpus)?;
    writeln!(w, "- awkbench: {}", system.version)?;
    Ok(())
}

/// `floor(10 / score)` blocks, so the fastest candidate gets ten
fn speed_bar(score: f64) -> String {
    if !score.is_finite() || score <= 0.0 {
        return String::new();
    }
    let blocks = (BAR_WIDTH / score).floor() as usize;
    "█".repeat(blocks)
}

// stderr may contain pipes and newlines
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_bar() {
        assert_eq!(speed_bar(1.0).chars().count(), 10);
        assert_eq!(speed_bar(1.5).chars().count(), 6);
        assert_eq!(speed_bar(3.0).chars().count(), 3);
        assert_eq!(speed_bar(20.0), "");
        assert_eq!(speed_bar(0.0), "");
    }

    #[test]
    fn test_table_cell_escapes() {
        assert_eq!(table_cell("a|b\nc"), "a\\|b c");
    }
}
