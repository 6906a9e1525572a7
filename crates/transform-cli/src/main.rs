//! `transform` CLI — convert between JSON, XML, YAML and CSV from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # CSV to JSON (stdin → stdout)
//! printf 'id,name\n1,Alice\n' | transform convert --from csv --to json
//!
//! # JSON file to XML file with a custom root element
//! transform convert --from json --to xml -i data.json -o data.xml --root-name data
//!
//! # Compact JSON output
//! transform convert --from yaml --to json --indentation 0 -i config.yaml
//!
//! # Detect the input format, then convert
//! transform auto --to yaml -i unknown.txt
//!
//! # Just print the detected format
//! transform detect -i unknown.txt
//! ```
//!
//! `-v` logs conversions at info level, `-vv` at debug; `RUST_LOG` overrides both.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::info;
use std::io::{self, Read};
use transform_core::options::{DEFAULT_INDENTATION, DEFAULT_MAX_DEPTH, DEFAULT_ROOT_NAME};
use transform_core::{ConvertOptions, Format};

#[derive(Parser)]
#[command(
    name = "transform",
    version,
    about = "Convert data between JSON, XML, YAML and CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert from a known source format to a target format
    Convert {
        /// Source format: json, xml, yaml or csv
        #[arg(long)]
        from: Format,
        /// Target format: json, xml, yaml or csv
        #[arg(long)]
        to: Format,
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Detect the input format, then convert to the target format
    Auto {
        /// Target format: json, xml, yaml or csv
        #[arg(long)]
        to: Format,
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Print the detected format of the input
    Detect {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args)]
struct OptionArgs {
    /// Spaces per level for JSON and XML output (0 = compact)
    #[arg(long, default_value_t = DEFAULT_INDENTATION)]
    indentation: usize,
    /// Root element name for XML output
    #[arg(long, default_value = DEFAULT_ROOT_NAME)]
    root_name: String,
    /// Deepest nesting accepted while parsing
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl OptionArgs {
    fn to_options(&self) -> ConvertOptions {
        ConvertOptions::default()
            .with_indentation(self.indentation)
            .with_root_name(self.root_name.clone())
            .with_max_depth(self.max_depth)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            from,
            to,
            io,
            options,
        } => {
            let input = read_input(io.input.as_deref())?;
            let converted = transform_core::convert(from, to, &input, &options.to_options())
                .with_context(|| format!("Failed to convert {from} to {to}"))?;
            info!("converted {from} to {to}: {} -> {} bytes", input.len(), converted.len());
            write_output(io.output.as_deref(), &converted)?;
        }
        Commands::Auto { to, io, options } => {
            let input = read_input(io.input.as_deref())?;
            let converted = transform_core::auto_convert(&input, to, &options.to_options())
                .with_context(|| format!("Failed to auto-convert to {to}"))?;
            info!("auto-converted to {to}: {} -> {} bytes", input.len(), converted.len());
            write_output(io.output.as_deref(), &converted)?;
        }
        Commands::Detect { input } => {
            let input = read_input(input.as_deref())?;
            let format =
                transform_core::detect_format(&input).context("Failed to detect input format")?;
            println!("{}", format.as_str());
        }
    }

    Ok(())
}

/// Default level `warn`; each `-v` steps up once. `RUST_LOG` wins when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
