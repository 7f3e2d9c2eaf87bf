use std::io::{self, Write};
use std::path::Path;

use physchem::dispatch::{DispatchConfig, Summary};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_summary(input: &Path, output: &Path, config: &DispatchConfig, summary: &Summary) {
    let mut stderr = io::stderr().lock();

    let rows = summary_rows(input, output, config, summary);
    let _ = writeln!(stderr);
    print_kv_table(&mut stderr, "Batch Summary", &rows);
}

fn summary_rows(
    input: &Path,
    output: &Path,
    config: &DispatchConfig,
    summary: &Summary,
) -> Vec<(&'static str, String)> {
    vec![
        ("Input", display_path(input)),
        ("Output", display_path(output)),
        ("Workers", config.pool.workers.to_string()),
        ("Chunk size", config.pool.chunk_size.to_string()),
        ("Processed", summary.processed.to_string()),
        ("Rows written", summary.written.to_string()),
        ("Unparsable", format_share(summary.unparsable, summary.processed)),
    ]
}

fn display_path(path: &Path) -> String {
    match path.to_str() {
        Some("-") => "<stdio>".to_string(),
        _ => path.display().to_string(),
    }
}

fn format_share(count: usize, total: usize) -> String {
    if total == 0 {
        return count.to_string();
    }
    let pct = count as f64 / total as f64 * 100.0;
    format!("{count} ({pct:.1}%)")
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);
    let k_line = "─".repeat(key_w + 2);
    let v_line = "─".repeat(val_w + 2);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{INDENT}┌{k_line}┬{v_line}┐");
    let _ = writeln!(out, "{INDENT}│ {:<key_w$} │ {:>val_w$} │", "Metric", "Value");
    let _ = writeln!(out, "{INDENT}├{k_line}┼{v_line}┤");

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(out, "{INDENT}└{k_line}┴{v_line}┘");
}
