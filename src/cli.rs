use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::edges::BinScale;

#[derive(Debug, Parser)]
#[command(author, version, about = "Bin and one-hot expand tabular data for modeling", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discretize a numeric column into a labeled categorical column
    Bin(BinArgs),
    /// Discretize a numeric column straight into one-hot bin indicator columns
    BinExpand(BinExpandArgs),
    /// One-hot expand one or more text/categorical columns
    Expand(ExpandArgs),
    /// Print the bin edges that would be used for a numeric column
    Edges(EdgesArgs),
    /// Fill missing values and uppercase text columns
    Clean(CleanArgs),
    /// Preview the first few rows of a file with inferred column types
    Preview(PreviewArgs),
    /// Run a named job from a JSON environment configuration
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Omit the header row from the output
    #[arg(long = "no-header")]
    pub no_header: bool,
}

#[derive(Debug, Args)]
pub struct LabelArgs {
    /// Comma-separated bin labels, lowest bin first
    #[arg(short = 'l', long = "labels", value_delimiter = ',', conflicts_with = "bins")]
    pub labels: Vec<String>,
    /// Number of bins, labeled A..Z then a..z
    #[arg(short = 'n', long = "bins")]
    pub bins: Option<usize>,
    /// Explicit comma-separated bin edges (one more than the label count)
    #[arg(long = "edges", value_delimiter = ',', allow_negative_numbers = true)]
    pub edges: Vec<f64>,
    /// Edge scaling when edges are computed
    #[arg(long = "scale", value_enum, default_value = "linear")]
    pub scale: BinScale,
}

#[derive(Debug, Args)]
pub struct BinArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Numeric column to bin
    #[arg(short = 's', long = "source")]
    pub source: String,
    /// Name of the binned column (defaults to `<source>_bin`)
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,
    #[command(flatten)]
    pub labels: LabelArgs,
    /// Remove the source column after binning
    #[arg(long = "drop-source")]
    pub drop_source: bool,
}

#[derive(Debug, Args)]
pub struct BinExpandArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Numeric column to bin and expand
    #[arg(short = 's', long = "source")]
    pub source: String,
    #[command(flatten)]
    pub labels: LabelArgs,
    /// Keep the source and intermediate `<source>_bin` columns
    #[arg(long = "keep-source")]
    pub keep_source: bool,
}

#[derive(Debug, Args)]
pub struct ExpandArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Columns to expand, in order
    #[arg(short = 'C', long = "columns", value_delimiter = ',', required = true)]
    pub columns: Vec<String>,
    /// Keep the expanded source columns
    #[arg(long = "keep-source")]
    pub keep_source: bool,
    /// Order indicator columns by sorted category instead of first appearance
    #[arg(long = "sort-labels")]
    pub sort_labels: bool,
    /// Explicit comma-separated value order for indicator columns
    #[arg(long = "order", value_delimiter = ',')]
    pub order: Vec<String>,
}

#[derive(Debug, Args)]
pub struct EdgesArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Numeric column to measure
    #[arg(short = 's', long = "source")]
    pub source: String,
    #[command(flatten)]
    pub labels: LabelArgs,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub output: OutputArgs,
    /// Columns to clean
    #[arg(short = 'C', long = "columns", value_delimiter = ',', required = true)]
    pub columns: Vec<String>,
    /// Replacement for missing values (must match each column's type)
    #[arg(long = "fill")]
    pub fill: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON environment configuration containing a `jobconfig` section
    #[arg(short = 'c', long = "config")]
    pub config: PathBuf,
    /// Job name under `jobconfig`
    #[arg(short = 'j', long = "job")]
    pub job: String,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
