//! Schema Coerce CLI
//!
//! Command-line interface for checking JSON payloads against schema descriptors.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use schema_coerce::{coerce_to, explain, load_json_auto, load_schema_auto, Schema, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-coerce")]
#[command(about = "Check JSON payloads against schema descriptors")]
#[command(version)]
struct Cli {
    /// Log engine decisions to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Coerce a payload, stopping at the first error
    Coerce {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Payload source: file path or URL
        payload: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Report errors as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Explain every reason a payload does not conform
    Explain {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Payload source: file path or URL
        payload: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output the full explanation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the normalized descriptor of a schema
    Describe {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Coerce {
            schema,
            payload,
            output,
            pretty,
            json,
        } => run_coerce(&schema, &payload, output, pretty, json),

        Commands::Explain {
            schema,
            payload,
            pretty,
            json,
        } => run_explain(&schema, &payload, pretty, json),

        Commands::Describe { schema, pretty } => run_describe(&schema, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_inputs(schema_source: &str, payload_source: &str, json_output: bool) -> Result<(Schema, Value), u8> {
    let schema = load_schema_auto(schema_source).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    let payload = load_json_auto(payload_source).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    Ok((schema, Value::from(payload)))
}

fn run_coerce(
    schema_source: &str,
    payload_source: &str,
    output: Option<PathBuf>,
    pretty: bool,
    json_output: bool,
) -> Result<(), u8> {
    let (schema, payload) = load_inputs(schema_source, payload_source, json_output)?;

    let coerced = match coerce_to(&schema, &payload) {
        Ok(coerced) => coerced,
        Err(error) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "error": error
                });
                println!("{}", output);
            } else {
                eprintln!("Coercion failed: {}", error);
            }
            return Err(1);
        }
    };

    let rendered = to_json(&coerced, pretty)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &rendered).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", rendered);
        }
    }

    Ok(())
}

fn run_explain(
    schema_source: &str,
    payload_source: &str,
    pretty: bool,
    json_output: bool,
) -> Result<(), u8> {
    let (schema, payload) = load_inputs(schema_source, payload_source, json_output)?;

    let Some(why) = explain(&schema, &payload) else {
        if json_output {
            println!(r#"{{"valid":true}}"#);
        } else {
            println!("Valid");
        }
        return Ok(());
    };

    if json_output {
        println!("{}", to_json(&why, pretty)?);
    } else {
        eprintln!("Value does not conform ({} cause(s)):", why.cause.len());
        for cause in &why.cause {
            eprintln!("  {}", cause);
        }
    }
    Err(1)
}

fn run_describe(schema_source: &str, pretty: bool) -> Result<(), u8> {
    let schema = load_schema_auto(schema_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    println!("{}", to_json(&schema, pretty)?);
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
