use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use workflo_gen::compiler::SequentialIds;
use workflo_gen::import::{IntoWorkflow, TabularWorkflow, structured};
use workflo_gen::{Compiler, DocumentError, GeneratorError, InputError};

/// Compiles declarative workflow steps into a procedure definition document
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Where to write the document (`-` for stdout)
    #[arg(short, long, global = true, default_value = "workflow.xml")]
    output: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,

    /// Use sequential identifiers instead of random UUIDs
    #[arg(long, global = true)]
    sequential_ids: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a step table (CSV with a header row)
    Csv {
        /// Path to the CSV file (`-` for stdin)
        path: String,
        /// Workflow title
        #[arg(long)]
        title: Option<String>,
        /// Workflow description
        #[arg(long)]
        description: Option<String>,
    },
    /// Compile a structured JSON workflow definition
    Json {
        /// Path to the JSON file (`-` for stdin)
        path: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Xml,
    Json,
}

/// Log level comes from `--debug`, then `RUST_LOG`, then defaults to info.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("workflo_gen=debug,workflo_cli=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("workflo_gen=info,workflo_cli=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    tracing::debug!("workflo-cli starting with args: {:?}", cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_client_error() => {
            eprintln!("\nRejected input: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("\nError: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), GeneratorError> {
    let total_start = Instant::now();

    let workflow = match cli.command {
        Command::Csv {
            path,
            title,
            description,
        } => {
            let table = open_input(&path)?;
            TabularWorkflow::from_reader(table, title.as_deref(), description.as_deref())?
                .into_workflow()?
        }
        Command::Json { path } => structured::from_reader(open_input(&path)?)?,
    };

    let mut builder = Compiler::builder(workflow);
    if cli.sequential_ids {
        builder = builder.with_id_allocator(Box::new(SequentialIds::default()));
    }
    let document = builder.build().compile()?;

    let rendered = match cli.format {
        OutputFormat::Xml => document.to_xml()?,
        OutputFormat::Json => document.to_json()?,
    };
    write_output(&cli.output, &rendered)?;

    tracing::info!(
        output = %cli.output,
        steps = document.step_ids().len(),
        elapsed = ?total_start.elapsed(),
        "wrote workflow document"
    );
    Ok(())
}

fn open_input(path: &str) -> Result<Box<dyn io::Read>, InputError> {
    if path == "-" {
        return Ok(Box::new(io::stdin()));
    }
    let file = fs::File::open(path).map_err(|e| InputError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    Ok(Box::new(io::BufReader::new(file)))
}

fn write_output(path: &str, content: &str) -> Result<(), DocumentError> {
    let result = if path == "-" {
        io::stdout().write_all(content.as_bytes())
    } else {
        fs::write(path, content)
    };
    result.map_err(|e| DocumentError::Write(format!("'{}': {}", path, e)))
}
