use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Inspect enriched lead datasets", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub roots: RootArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List discoverable datasets, newest first
    List(ListArgs),
    /// Show the rows of a dataset
    Show(ShowArgs),
    /// Summarize how well each integration populated its columns
    Workflow(WorkflowArgs),
    /// Replace a dataset's contents from a JSON or CSV file
    Save(SaveArgs),
    /// Write a dataset out as a CSV file
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct RootArgs {
    /// Project directory holding `lead-list/` and `leads/`
    #[arg(long, global = true, env = "LEAD_INSPECTOR_ROOT", default_value = ".")]
    pub root: PathBuf,
    /// Directory of CSV datasets (defaults to <root>/lead-list)
    #[arg(long = "lead-list-dir", global = true, env = "LEAD_LIST_DIR")]
    pub lead_list_dir: Option<PathBuf>,
    /// Directory of SQLite dataset folders (defaults to <root>/leads)
    #[arg(long = "leads-dir", global = true, env = "LEADS_DIR")]
    pub leads_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Logical dataset name such as `lead-list/batch.csv`
    pub name: String,
    /// Maximum number of rows to print (0 means all)
    #[arg(short = 'n', long, default_value_t = 20)]
    pub rows: usize,
    /// Keep rows where any cell contains this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,
    /// Sort directive of the form `column[:asc|desc]`
    #[arg(long)]
    pub sort: Option<String>,
    /// Emit JSON rows instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct WorkflowArgs {
    /// Logical dataset name
    pub name: String,
    /// YAML file listing integration signatures (defaults to the built-in table)
    #[arg(long)]
    pub signatures: Option<PathBuf>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Logical dataset name to overwrite
    pub name: String,
    /// Rows to store: a JSON array of objects or a CSV file
    #[arg(short, long)]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Logical dataset name
    pub name: String,
    /// Destination CSV file
    #[arg(short, long)]
    pub output: PathBuf,
}
