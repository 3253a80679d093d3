//! Verbose end-of-run summary.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use rpqbench_engine::{BenchConfig, RunReport};

/// Create a styled table with consistent formatting.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table
}

/// Format bytes as human-readable string.
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// Rows of the run summary, in display order.
pub fn summary_rows(config: &BenchConfig, report: &RunReport) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Dataset", config.dataset_dir.display().to_string()),
        (
            "Labels loaded",
            format!("{} / {}", report.labels_loaded, config.label_count),
        ),
        (
            "Queries loaded",
            format!("{} / {}", report.queries_loaded, config.query_count),
        ),
        ("Runs", config.runs.to_string()),
        ("Warm-up", yes_no(config.warmup)),
        ("Transpose cache", yes_no(config.cache_transposed)),
    ];

    // Memory totals are only tracked when labels were preloaded.
    if let Some(preload) = report.preload {
        rows.push(("Preloaded memory", format_bytes(preload.memory_bytes)));
        rows.push(("Label memory", format_bytes(report.memory_bytes)));
    }
    rows.extend([
        ("Trials", report.summary.trials.to_string()),
        ("Solver calls", report.summary.dispatched.to_string()),
        ("Skipped (absent)", report.summary.skipped_absent.to_string()),
        (
            "Skipped (unsupported)",
            report.summary.skipped_unsupported.to_string(),
        ),
        ("Results", config.results_dir.display().to_string()),
    ]);
    rows
}

/// Print the run summary to stderr; stdout carries only result lines.
pub fn print_run_summary(config: &BenchConfig, report: &RunReport) {
    let mut table = create_table();
    table.set_header(vec![
        Cell::new("Property").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);
    for (key, value) in summary_rows(config, report) {
        table.add_row(vec![Cell::new(key).fg(Color::Green), Cell::new(value)]);
    }
    eprintln!("{table}");
}
