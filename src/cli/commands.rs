use crate::core::{
    build_graph, extract_references, resolve_dependencies, DependencyGraph, RuleAnnotator,
};
use crate::error::{RangeGraphError, RangeGraphResult};
use crate::excel::TableExporter;
use crate::types::{References, TranslationResult};
use crate::workbook::XlsxWorkbook;
use clap::ValueEnum;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Output format for the references listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamesFormat {
    Json,
    Yaml,
}

/// Output format for the dependency graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Dot,
    Json,
}

/// Output format for the documentation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocsFormat {
    Table,
    Json,
}

/// Widest a table cell gets before it is cut with an ellipsis
const MAX_CELL_WIDTH: usize = 48;

fn load_references(file: &Path) -> RangeGraphResult<References> {
    let workbook = XlsxWorkbook::open(file)?;
    Ok(extract_references(&workbook))
}

/// Execute the names command
pub fn names(file: PathBuf, format: NamesFormat) -> RangeGraphResult<()> {
    let references = load_references(&file)?;
    println!("{}", render_names(&references, format)?);
    Ok(())
}

/// Execute the graph command
pub fn graph(file: PathBuf, format: GraphFormat, output: Option<PathBuf>) -> RangeGraphResult<()> {
    let references = load_references(&file)?;
    let graph = build_graph(&resolve_dependencies(&references));
    let rendered = render_graph(&graph, format)?;

    match output {
        Some(path) => {
            fs::write(&path, rendered)?;
            eprintln!(
                "{} {} nodes, {} edges → {}",
                "✅".green(),
                graph.node_count(),
                graph.edge_count(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Execute the docs command
pub fn docs(file: PathBuf, format: DocsFormat, output: Option<PathBuf>) -> RangeGraphResult<()> {
    let references = load_references(&file)?;
    let rows = RuleAnnotator::new()?.annotate(&references);

    if let Some(path) = output {
        let edges = build_graph(&resolve_dependencies(&references)).describe().edges;
        TableExporter::new(&rows).with_edges(&edges).export(&path)?;
        println!("{}", "✅ Documentation exported".bold().green());
        println!("   Rows:       {}", rows.len());
        println!("   Excel file: {}", path.display());
        return Ok(());
    }

    match format {
        DocsFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        DocsFormat::Table => {
            println!("{}", "📚 RangeGraph - Named Reference Documentation".bold().green());
            println!("   File: {}\n", file.display());
            print!("{}", render_table(&rows));
        }
    }
    Ok(())
}

/// Execute the audit command
pub fn audit(file: PathBuf, name: String) -> RangeGraphResult<()> {
    println!("{}", "🔍 RangeGraph - Audit Trail".bold().green());
    println!("   File: {}", file.display());
    println!("   Name: {}\n", name.bright_blue().bold());

    let references = load_references(&file)?;
    let reference = references.get(&name).ok_or_else(|| unknown_name(&name, &references))?;
    let graph = build_graph(&resolve_dependencies(&references));
    let annotator = RuleAnnotator::new()?;
    let row = annotator.annotate_formula(&name, reference.formula.as_deref());

    println!("{}", "📋 Reference:".bold().cyan());
    println!("   Sheet: {}", reference.sheet);
    println!("   Range: {}", reference.reference);
    match reference.formula_text() {
        Some(formula) => {
            println!("   Formula: {}", formula.bright_yellow());
            println!("   Python:  {}", row.translated_expression.yellow());
        }
        None => println!("   Formula: {}", "(none)".dimmed()),
    }
    println!("   {}\n", row.documentation);

    print_names("⬅️  Uses directly:", &graph.direct_dependencies(&name)?);
    print_names("🌳 All precedents:", &graph.precedents(&name)?);
    print_names("➡️  Used directly by:", &graph.direct_dependents(&name)?);
    print_names("🌲 All dependents:", &graph.dependents(&name)?);

    println!("{}", "✅ Audit complete".bold().green());
    Ok(())
}

fn unknown_name(name: &str, references: &References) -> RangeGraphError {
    let available: Vec<&str> = references.keys().map(String::as_str).collect();
    RangeGraphError::UnknownReference(format!(
        "'{}' is not a named reference. Available: {}",
        name,
        if available.is_empty() {
            "(none)".to_string()
        } else {
            available.join(", ")
        }
    ))
}

fn print_names(title: &str, names: &[&str]) {
    println!("{}", title.bold().cyan());
    if names.is_empty() {
        println!("   {}", "(none)".dimmed());
    }
    for name in names {
        println!("   └─ {}", name.bright_blue());
    }
    println!();
}

/// Serialize the references mapping
pub fn render_names(references: &References, format: NamesFormat) -> RangeGraphResult<String> {
    Ok(match format {
        NamesFormat::Json => serde_json::to_string_pretty(references)?,
        NamesFormat::Yaml => serde_yaml::to_string(references)?,
    })
}

/// Serialize the dependency graph
pub fn render_graph(graph: &DependencyGraph, format: GraphFormat) -> RangeGraphResult<String> {
    Ok(match format {
        GraphFormat::Dot => graph.to_dot(),
        GraphFormat::Json => {
            let description = graph.describe();
            let value = serde_json::json!({
                "nodes": description.nodes,
                "edges": description.edges,
            });
            format!("{}\n", serde_json::to_string_pretty(&value)?)
        }
    })
}

/// Plain-text table, one line per row, long cells truncated
pub fn render_table(rows: &[TranslationResult]) -> String {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| row.cells().map(|cell| truncate(cell, MAX_CELL_WIDTH)))
        .collect();

    let mut widths = TranslationResult::HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = TranslationResult::HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w))
        .collect();
    out.push_str(&format!("{}\n", header.join(" │ ").bold()));

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("─┼─")));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect();
        out.push_str(&format!("{}\n", line.join(" │ ")));
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
