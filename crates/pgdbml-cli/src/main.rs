mod config;
mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use config::{ConfigError, Overrides, parse_type_mapping};
use logging::{LogFormat, init_logging};
use pgdbml_core::{Error as CoreError, Schema, redact_connection_string, validate_schema};
use pgdbml_generate::generate_bytes;
use pgdbml_introspect::{PostgresCatalog, introspect};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("failed to encode schema as JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to write to stdout")]
    Stdout(#[source] io::Error),
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Dbml,
    /// The introspected model as pretty-printed JSON.
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "pgdbml",
    version,
    about = "Generate DBML from a PostgreSQL database schema"
)]
struct Cli {
    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, value_name = "URL")]
    url: String,
    /// Output file (default: stdout).
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Schema(s) to include; repeatable or comma separated (default: public).
    #[arg(
        short = 's',
        long = "schema",
        alias = "schemas",
        value_name = "SCHEMA",
        value_delimiter = ',',
        env = "DBML_SCHEMAS"
    )]
    schemas: Vec<String>,
    /// Include every non-system schema.
    #[arg(short = 'a', long, env = "DBML_ALL_SCHEMAS")]
    all_schemas: bool,
    /// Table name(s) to leave out, in any schema.
    #[arg(
        short = 'x',
        long = "exclude-table",
        alias = "exclude-tables",
        value_name = "TABLE",
        value_delimiter = ',',
        env = "DBML_EXCLUDE_TABLES"
    )]
    exclude_tables: Vec<String>,
    /// Override the DBML type for a PostgreSQL type.
    #[arg(long = "type-mapping", value_name = "NAME=TYPE", value_parser = parse_type_mapping)]
    type_mappings: Vec<(String, String)>,
    /// Config file (default: ./pgdbml.toml when present).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Dbml)]
    format: OutputFormat,
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_format, cli.quiet) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let report = error_chain(&err);
            tracing::error!(event = "run_failed", error = %report);
            eprintln!("error: {report}");
            ExitCode::FAILURE
        }
    }
}

/// `err` followed by each of its causes, joined with `: `.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut report = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        report.push_str(": ");
        report.push_str(&cause.to_string());
        source = cause.source();
    }
    report
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let timer = Instant::now();

    let file_config = config::load(cli.config.as_deref())?;
    let options = config::resolve(
        file_config,
        Overrides {
            schemas: cli.schemas,
            all_schemas: cli.all_schemas,
            exclude_tables: cli.exclude_tables,
            type_mappings: cli.type_mappings,
        },
    )?;

    let connection = redact_connection_string(&cli.url);
    tracing::info!(
        event = "run_started",
        connection = %connection.redacted,
        schemas = ?options.schemas,
        format = ?cli.format
    );

    let catalog = PostgresCatalog::connect(&cli.url).await?;
    tracing::info!(
        event = "connected",
        host = connection.host.as_deref().unwrap_or("localhost"),
        database = connection.database.as_deref().unwrap_or_default()
    );

    let introspected = introspect(&catalog, &options).await;
    catalog.pool().close().await;
    let schema = introspected?;
    validate_schema(&schema)?;

    let rendered = render(&schema, cli.format)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!(
                event = "dbml_written",
                path = %path.display(),
                bytes = rendered.len()
            );
        }
        None => write_stdout(&rendered)?,
    }

    tracing::info!(
        event = "run_finished",
        status = "success",
        tables = schema.tables.len(),
        duration_ms = timer.elapsed().as_millis()
    );

    Ok(())
}

fn render(schema: &Schema, format: OutputFormat) -> Result<Vec<u8>, CliError> {
    match format {
        OutputFormat::Dbml => Ok(generate_bytes(schema)),
        OutputFormat::Json => {
            let mut encoded = serde_json::to_vec_pretty(schema)?;
            encoded.push(b'\n');
            Ok(encoded)
        }
    }
}

fn write_stdout(bytes: &[u8]) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    match stdout.write_all(bytes).and_then(|()| stdout.flush()) {
        // The reader went away (`pgdbml | head`).
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result.map_err(CliError::Stdout),
    }
}
