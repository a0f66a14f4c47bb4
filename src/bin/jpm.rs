//! jpm - JSON Path Merge CLI tool
//!
//! Reads, updates, removes and merges values in JSON/YAML documents.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use json_path_merge::value::{self, Value};
use json_path_merge::{ArrayMerge, Editor};

/// Output encoding for printed values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "jpm", version, about = "Path-addressed edits and merges for JSON/YAML documents")]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json, global = true)]
    format: Format,

    /// Indent JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// How lists on both sides of a merge are combined
    #[arg(long, value_enum, default_value_t = ArrayMerge::Replace, global = true)]
    array_merge: ArrayMerge,

    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-", global = true)]
    output: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the value at PATH, or null if nothing is found
    Get { file: PathBuf, path: String },
    /// Replace the existing value at PATH with VALUE (parsed as JSON, else taken as a string)
    Set {
        file: PathBuf,
        path: String,
        value: String,
    },
    /// Remove the existing value at PATH
    Remove { file: PathBuf, path: String },
    /// Merge SOURCE into TARGET, optionally at a path inside TARGET
    Merge {
        target: PathBuf,
        source: PathBuf,
        /// Destination path inside TARGET (root when omitted)
        #[arg(long)]
        at: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // a global subscriber may already be set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let editor = Editor::builder().array_merge(cli.array_merge).build();

    let result = match cli.command {
        Command::Get { file, path } => {
            let document = read_document(&file)?;
            editor.get_value_by_path(&document, &path)?.unwrap_or(Value::Null)
        }
        Command::Set { file, path, value } => {
            let mut document = read_document(&file)?;
            editor.update_by_path(&mut document, &path, parse_literal(&value))?;
            document
        }
        Command::Remove { file, path } => {
            let mut document = read_document(&file)?;
            editor.remove_by_path(&mut document, &path)?;
            document
        }
        Command::Merge { target, source, at } => {
            let target = read_document(&target)?;
            let source = read_document(&source)?;
            editor.merge_objects(&target, &source, at.as_deref())?
        }
    };

    let rendered = render(&result, cli.format, cli.pretty)?;
    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };
    write!(output, "{}", rendered)?;
    if !rendered.ends_with('\n') {
        writeln!(output)?;
    }

    Ok(())
}

/// Reads a JSON or YAML document from a file, or stdin for `-`.
fn read_document(file: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(file).map_err(|e| format!("Failed to read file {:?}: {}", file, e))?
    };

    let is_yaml = matches!(
        file.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        return Ok(value::from_yaml(&content)
            .map_err(|e| format!("Failed to parse {:?}: {}", file, e))?);
    }

    match value::from_json(&content) {
        Ok(v) => Ok(v),
        Err(json_err) => {
            debug!(error = %json_err, "not JSON, trying YAML");
            Ok(value::from_yaml(&content)
                .map_err(|e| format!("Failed to parse {:?}: {}", file, e))?)
        }
    }
}

fn parse_literal(raw: &str) -> Value {
    value::from_json(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn render(v: &Value, format: Format, pretty: bool) -> Result<String, Box<dyn std::error::Error>> {
    let out = match (format, pretty) {
        (Format::Json, true) => value::to_json_pretty(v)?,
        (Format::Json, false) => value::to_json(v)?,
        (Format::Yaml, _) => value::to_yaml(v)?,
    };
    Ok(out)
}
