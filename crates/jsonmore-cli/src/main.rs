//! `jsonmore` CLI: read, query and search streams of concatenated JSON values.
//!
//! ## Usage
//!
//! ```sh
//! # Re-emit every value in a log, one per line
//! jsonmore cat -i events.jsonl
//!
//! # Pretty-print values from stdin to a file
//! cat events.jsonl | jsonmore cat --pretty -o events.pretty.json
//!
//! # Count values without building trees
//! jsonmore count -i events.jsonl
//!
//! # Pull a fixed-length double array out of every value
//! jsonmore get pose --as doubles --len 3 --fill 0 -i events.jsonl
//!
//! # Print the object owning a key, wherever it is nested
//! jsonmore find serial -i events.jsonl
//!
//! # Diagnostics go to stderr; raise verbosity with RUST_LOG
//! RUST_LOG=debug jsonmore count -i events.jsonl
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonmore_core::checker::DEFAULT_MAX_DEPTH;
use jsonmore_core::stream::{self, ReadLimits, DEFAULT_MAX_BYTES};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsonmore",
    version,
    about = "Read, query and search streams of JSON values"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Largest single value accepted, in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_BYTES)]
    max_bytes: usize,

    /// Deepest container nesting accepted
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every value in the stream, one per line
    Cat {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print each value
        #[arg(long)]
        pretty: bool,
    },
    /// Count the values in the stream without parsing them into trees
    Count {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Read a typed field from every value
    Get {
        /// Field name to look up on each top-level object
        key: String,
        /// How to read the field
        #[arg(long = "as", value_enum)]
        kind: FieldKind,
        /// Number of elements for array kinds
        #[arg(long, default_value_t = 1)]
        len: usize,
        /// Value written for null or mistyped array elements
        /// (default: null for doubles, 0 for ints)
        #[arg(long)]
        fill: Option<f64>,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the object that directly contains a key, for every value
    Find {
        /// Key to search for
        name: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldKind {
    Int,
    Double,
    Doubles,
    Ints,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let limits = ReadLimits::default()
        .with_max_bytes(cli.max_bytes)
        .with_max_depth(cli.max_depth);

    match cli.command {
        Commands::Cat {
            input,
            output,
            pretty,
        } => {
            let reader = open_input(input.as_deref())?;
            let mut out = open_output(output.as_deref())?;
            for value in stream::values(reader, limits) {
                let value = match value {
                    Ok(value) => value,
                    Err(err) => {
                        out.flush().context("Failed to write output")?;
                        return Err(err).context("Failed to read JSON value");
                    }
                };
                if pretty {
                    serde_json::to_writer_pretty(&mut out, &value)?;
                } else {
                    serde_json::to_writer(&mut out, &value)?;
                }
                writeln!(out).context("Failed to write output")?;
            }
            out.flush().context("Failed to write output")?;
        }
        Commands::Count { input } => {
            let mut reader = open_input(input.as_deref())?;
            let mut count = 0usize;
            loop {
                stream::skip_whitespace(&mut reader).context("Failed to read input")?;
                match stream::skip_with(&mut reader, &limits).context("Failed to skip JSON value")? {
                    Some(_) => count += 1,
                    None => break,
                }
            }
            println!("{}", count);
        }
        Commands::Get {
            key,
            kind,
            len,
            fill,
            input,
        } => {
            let reader = open_input(input.as_deref())?;
            let mut failures = 0usize;
            for value in stream::values(reader, limits) {
                let value = value.context("Failed to read JSON value")?;
                match get_field(&value, &key, kind, len, fill) {
                    Some(field) => println!("{}", field),
                    None => {
                        failures += 1;
                        println!("null");
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("Field '{}' could not be read from {} value(s)", key, failures);
            }
        }
        Commands::Find { name, input } => {
            let reader = open_input(input.as_deref())?;
            for value in stream::values(reader, limits) {
                let value = value.context("Failed to read JSON value")?;
                match jsonmore_core::find_object_with_name(&value, &name) {
                    Some(owner) => println!("{}", owner),
                    None => println!("null"),
                }
            }
        }
    }

    Ok(())
}

/// Apply the accessor selected by `kind` and render the result as JSON.
///
/// Absent fields render as `null`. Returns `None` when the accessor
/// reports a failure; the library has already logged the reason.
fn get_field(value: &Value, key: &str, kind: FieldKind, len: usize, fill: Option<f64>) -> Option<Value> {
    match kind {
        FieldKind::Int => match jsonmore_core::read_int(value, key) {
            Ok(v) => Some(v.map_or(Value::Null, Value::from)),
            Err(_) => None,
        },
        FieldKind::Double => Some(
            jsonmore_core::read_double(value, key).map_or(Value::Null, jsonmore_core::double_or_null),
        ),
        FieldKind::Doubles => {
            let mut out = vec![f64::NAN; len];
            match jsonmore_core::read_double_array(value, key, &mut out, fill.unwrap_or(f64::NAN)) {
                Ok(true) => Some(jsonmore_core::new_double_array(&out)),
                Ok(false) => Some(Value::Null),
                Err(_) => None,
            }
        }
        FieldKind::Ints => {
            let mut out = vec![0i64; len];
            let fill = fill.map_or(0, |f| f as i64);
            match jsonmore_core::read_int_array(value, key, &mut out, fill) {
                Ok(true) => Some(jsonmore_core::new_int_array(&out)),
                Ok(false) => Some(Value::Null),
                Err(_) => None,
            }
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn open_input(path: Option<&str>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to read file: {}", path))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Failed to write file: {}", path))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
