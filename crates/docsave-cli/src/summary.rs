use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use docsave_core::SaverConfig;
use docsave_model::SaveSummary;

use crate::commands::Resolution;

pub fn print_save_summary(summary: &SaveSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Target"),
        header_cell("Kind"),
        header_cell("Bytes"),
        header_cell("Status"),
        header_cell("Time"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let status = if summary.created {
        Cell::new("created").fg(Color::Green)
    } else {
        Cell::new("replaced").fg(Color::Cyan)
    };
    table.add_row(vec![
        Cell::new(summary.target.display_path()).add_attribute(Attribute::Bold),
        Cell::new(summary.target.kind()),
        Cell::new(summary.bytes_written),
        status,
        Cell::new(format!("{} ms", summary.elapsed_ms)),
    ]);
    println!("{table}");
}

pub fn print_resolution(resolution: &Resolution) {
    let rows = vec![
        ("Input", resolution.input.clone()),
        ("Origin", resolution.origin.label().to_string()),
        ("Path", display_or_dash(resolution.path.as_deref())),
        ("Project folder", display_or_dash(resolution.project_folder.as_deref())),
        (
            "Document",
            resolution
                .document_bytes
                .map_or_else(|| "not readable".to_string(), |bytes| format!("{bytes} bytes")),
        ),
    ];
    println!("{}", key_value_table(&rows));
}

pub fn print_info(config: &SaverConfig, source: Option<&Path>) {
    println!("{}", key_value_table(&info_rows(config, source)));
}

/// Setting names and values shown by `docsave info`.
pub fn info_rows(config: &SaverConfig, source: Option<&Path>) -> Vec<(&'static str, String)> {
    vec![
        (
            "Config file",
            source.map_or_else(|| "(defaults)".to_string(), |path| path.display().to_string()),
        ),
        ("Buffer size", format!("{} bytes", config.buffer_size)),
        ("Local strategy", config.local_strategy.label().to_string()),
        ("Keep history", yes_no(config.keep_history)),
        ("Silent I/O errors", yes_no(config.silent_io_errors)),
        ("Poll interval", format!("{} ms", config.poll_interval_ms)),
    ]
}

fn key_value_table(rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Setting"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    table
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn display_or_dash(path: Option<&Path>) -> String {
    path.map_or_else(|| "-".to_string(), |path| path.display().to_string())
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
