use clap::{Parser, Subcommand};
use rangegraph::cli::{self, DocsFormat, GraphFormat, NamesFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rangegraph")]
#[command(about = "Named range dependency viewer for Excel workbooks")]
#[command(long_about = "RangeGraph - Named range dependency viewer for Excel workbooks

Reads the defined names of an .xlsx file, captures the formulas they point at,
infers which names use which, and renders a dependency graph plus a
documentation table with Python translations of each formula.

COMMANDS:
  names   - List named references (sheet, range, formula)
  graph   - Dependency graph as Graphviz DOT or JSON
  docs    - Documentation table (terminal, JSON, or Excel export)
  audit   - Precedents and dependents of one named reference

EXAMPLES:
  rangegraph names model.xlsx
  rangegraph graph model.xlsx | dot -Tsvg > deps.svg
  rangegraph docs model.xlsx -o documentation.xlsx
  rangegraph audit model.xlsx Revenue

Dependencies are found by case-insensitive text search: a name counts as a
dependency when it appears anywhere in another name's formula.")]
#[command(version)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List named references found in a workbook
    Names {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: NamesFormat,
    },

    #[command(long_about = "Render the dependency graph between named references.

Each named reference is a node. An edge A -> B means B's formula mentions A.
Cycles are shown as-is; they are not resolved or reported.

EXAMPLES:
  rangegraph graph model.xlsx                   # DOT on stdout
  rangegraph graph model.xlsx -f json           # nodes + edges as JSON
  rangegraph graph model.xlsx -o deps.dot       # write to file")]
    /// Render the dependency graph between named references
    Graph {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "dot")]
        format: GraphFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    #[command(long_about = "Document every named reference.

For each reference shows a one-line description of its formula, the formula
itself and a best-effort Python expression (SUM, IF, ^ and & are rewritten;
everything else is passed through).

EXAMPLES:
  rangegraph docs model.xlsx                    # terminal table
  rangegraph docs model.xlsx -f json            # JSON rows
  rangegraph docs model.xlsx -o docs.xlsx       # Excel export")]
    /// Document formulas and translate them to Python
    Docs {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: DocsFormat,

        /// Export the table to this .xlsx file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show precedents and dependents of one named reference
    Audit {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Named reference to audit
        name: String,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "rangegraph=debug"
    } else {
        "rangegraph=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Names { file, format } => cli::names(file, format),

        Commands::Graph {
            file,
            format,
            output,
        } => cli::graph(file, format, output),

        Commands::Docs {
            file,
            format,
            output,
        } => cli::docs(file, format, output),

        Commands::Audit { file, name } => cli::audit(file, name),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("⚠️  {}", e);
            ExitCode::FAILURE
        }
    }
}
