//! Binary to generate Pydantic models and FastAPI endpoints from JSON files.
//!
//! Usage:
//!
//! - `jsonschemapy model schema.json --out-dir .` writes `./generated_model.py`
//! - `jsonschemapy rest rest.json --out-dir .` writes `./generated_rest.py`
//!
//! Pass `--stdout` to print instead of writing a file. Logs go to stderr and
//! are filtered with `RUST_LOG` (default `warn`).

use std::io::stdout;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use json_schema_pydantic::{
    Draft, GenError, GenerateSettings, RestConfig, generate_model_file, generate_rest_file,
    generate_to_writer, render_rest,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jsonschemapy", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a Pydantic model from a JSON Schema file.
    Model(ModelArgs),
    /// Generate FastAPI CRUD endpoints from a REST configuration file.
    Rest(RestArgs),
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Path to the JSON Schema document.
    schema: PathBuf,

    /// Directory that receives `generated_model.py`.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Model class name; overrides the schema's `name` key.
    #[arg(long)]
    name: Option<String>,

    /// JSON file with `GenerateSettings` overrides.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Meta-schema dialect for the schema gate; overrides the settings file.
    #[arg(long, value_enum)]
    draft: Option<Draft>,

    /// Print the model to stdout instead of writing a file.
    #[arg(long)]
    stdout: bool,
}

#[derive(Args, Debug)]
struct RestArgs {
    /// Path to the REST configuration document.
    config: PathBuf,

    /// Directory that receives `generated_rest.py`.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the endpoints to stdout instead of writing a file.
    #[arg(long)]
    stdout: bool,
}

fn load_settings(path: Option<&Path>) -> Result<GenerateSettings, GenError> {
    let Some(path) = path else {
        return Ok(GenerateSettings::default());
    };
    let settings_json: String = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&settings_json)?)
}

fn run_model(args: &ModelArgs) -> Result<(), GenError> {
    let mut settings: GenerateSettings = load_settings(args.settings.as_deref())?;
    if let Some(draft) = args.draft {
        settings.draft = draft;
    }

    if args.stdout {
        let schema_json: String = std::fs::read_to_string(&args.schema)?;
        generate_to_writer(&schema_json, args.name.as_deref(), &mut stdout(), &settings)
    } else {
        let written: PathBuf =
            generate_model_file(&args.schema, &args.out_dir, args.name.as_deref(), &settings)?;
        eprintln!("Wrote {}", written.display());
        Ok(())
    }
}

fn run_rest(args: &RestArgs) -> Result<(), GenError> {
    if args.stdout {
        let config_json: String = std::fs::read_to_string(&args.config)?;
        let config: RestConfig = serde_json::from_str(&config_json)?;
        config.check()?;
        print!("{}", render_rest(&config));
        Ok(())
    } else {
        let written: PathBuf = generate_rest_file(&args.config, &args.out_dir)?;
        eprintln!("Wrote {}", written.display());
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli: Cli = Cli::parse();
    let result: Result<(), GenError> = match &cli.command {
        Command::Model(args) => run_model(args),
        Command::Rest(args) => run_rest(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
