//! Command-line access to the meetbot logger, for scripts and one-off jobs.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use meetbot_telemetry::{
    ErrorRecord, FileSink, LogContext, LogLevel, LogSink, Logger, LoggerConfig, StdoutSink,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "meetbot")]
#[command(about = "Structured logging for meetbot scripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit one log entry
    Emit(EmitArgs),
    /// Print the configuration resolved from the environment
    Config {
        /// Fail on an invalid LOG_LEVEL instead of falling back
        #[arg(long, default_value = "false")]
        strict: bool,
    },
}

#[derive(Args)]
struct EmitArgs {
    /// Level: debug, info, warn or error
    level: LogLevel,

    /// Message text
    message: String,

    /// Namespace segment; repeat to nest (`-n calendar -n disconnect`)
    #[arg(short, long = "namespace")]
    namespaces: Vec<String>,

    /// Context entry as KEY=VALUE; VALUE is parsed as JSON, else kept as a string
    #[arg(short, long = "context", value_parser = parse_context_pair)]
    context: Vec<(String, Value)>,

    /// Error kind name
    #[arg(long, requires = "error_message")]
    error_name: Option<String>,

    /// Error message
    #[arg(long, requires = "error_name")]
    error_message: Option<String>,

    /// Error stack trace text
    #[arg(long, requires = "error_name")]
    error_stack: Option<String>,

    /// Append to this file instead of stdout
    #[arg(long)]
    output: Option<String>,
}

fn parse_context_pair(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Write one entry described by `args`, configured through `lookup`.
fn emit<F>(args: EmitArgs, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let sink: Arc<dyn LogSink> = match args.output.as_deref() {
        Some(path) => Arc::new(FileSink::open(path)?),
        None => Arc::new(StdoutSink),
    };
    let root = Logger::from_lookup(lookup, sink);

    let logger = args.namespaces.iter().fold(root, |logger, ns| logger.child(ns));
    let context: LogContext = args.context.into_iter().collect();
    let error = match (args.error_name, args.error_message) {
        (Some(name), Some(msg)) => Some(ErrorRecord::new(name, msg, args.error_stack)),
        _ => None,
    };

    logger.log(args.level, &args.message, Some(&context), error.as_ref());
    Ok(())
}

/// Resolve the configuration. Without `strict`, an ignored `LOG_LEVEL` is
/// reported through a logger writing to `sink`.
fn resolve_config<F>(strict: bool, lookup: F, sink: Arc<dyn LogSink>) -> anyhow::Result<LoggerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if strict {
        return Ok(LoggerConfig::try_from_lookup(lookup)?);
    }
    Ok(Logger::from_lookup(lookup, sink).config().clone())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Emit(args) => emit(args, env_var)?,
        Commands::Config { strict } => {
            let config = resolve_config(strict, env_var, Arc::new(StdoutSink))?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
