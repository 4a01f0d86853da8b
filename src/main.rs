//! revns-study — study query backend entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Load config
//!   4. Resolve effective log level (CLI `-v` flags > env > config)
//!   5. Init logger once
//!   6. Run the requested command

use std::io::Read;

#[cfg(feature = "http-api")]
use tokio_util::sync::CancellationToken;
use tracing::info;

#[cfg(feature = "http-api")]
use revns_study::api::{self, ApiState};
use revns_study::{
    classifier, config,
    error::AppError,
    llm::providers,
    logger,
    query::{self, QueryRequest, ScoredChunk},
    structured,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args()?;

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some())?;

    info!(
        service = %config.service_name,
        provider = %config.llm.provider,
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        "config loaded"
    );

    match args.command {
        Command::Classify(question) => {
            let profile = classifier::classify(&question);
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Ask(question) => {
            let provider = providers::build(&config.llm, config.llm_api_key.clone())?;
            let hits = read_hits_from_stdin()?;
            let request = QueryRequest::new(question);
            let answer = query::answer_query(&provider, &request, &hits, &config.retrieval).await?;

            if let Some(kind) = answer.prompt_type.filter(|k| k.is_structured()) {
                match structured::parse_generated(kind, &answer.answer) {
                    Ok(parsed) => println!("{}", serde_json::to_string_pretty(&parsed)?),
                    Err(e) => {
                        tracing::warn!("structured output did not parse: {e}");
                        println!("{}", serde_json::to_string_pretty(&answer)?);
                    }
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            }
        }
        #[cfg(feature = "http-api")]
        Command::Serve => {
            let provider = providers::build(&config.llm, config.llm_api_key.clone())?;
            let state = ApiState::new(provider, config.retrieval.clone());

            // Ctrl-C handler — cancels the token so the server drains and exits.
            let shutdown = CancellationToken::new();
            let ctrlc_token = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("ctrl-c received — initiating shutdown");
                    ctrlc_token.cancel();
                }
            });

            api::serve(&config.bind, state, shutdown).await?;
        }
        #[cfg(not(feature = "http-api"))]
        Command::Serve => {
            return Err(AppError::Usage("serve requires the `http-api` feature".into()));
        }
    }

    Ok(())
}

/// Scored hits as a JSON array on stdin. Empty input means no hits.
fn read_hits_from_stdin() -> Result<Vec<ScoredChunk>, AppError> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&raw)?)
}

// ── CLI arg parsing ───────────────────────────────────────────────────────────

enum Command {
    Classify(String),
    Ask(String),
    Serve,
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    command: Command,
}

fn print_help() {
    println!("Usage: revns-study [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  classify <query...>        Print the response profile selected for a query");
    println!("  ask <query...>             Answer a query from scored hits (JSON array on stdin)");
    println!("  serve                      Run the HTTP API");
    println!();
    println!("Options:");
    println!("  -h, --help                 Print help");
    println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
    println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
}

fn parse_cli_args() -> Result<CliArgs, AppError> {
    let mut verbosity = 0u8;
    let mut config_path = None;
    let mut positional = Vec::new();

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-f" | "--config" => match iter.next() {
                Some(path) => config_path = Some(path),
                None => return Err(AppError::Usage("-f/--config requires a path argument".into())),
            },
            "--verbose" => verbosity = verbosity.saturating_add(1),
            "--" => {
                positional.extend(iter.by_ref());
                break;
            }
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => positional.push(arg),
        }
    }

    // Each -v raises verbosity one tier:
    //   -v → warn, -vv → info, -vvv → debug, -vvvv+ → trace
    let log_level = match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    };

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        Some("classify") => Command::Classify(positional.collect::<Vec<_>>().join(" ")),
        Some("ask") => {
            let question = positional.collect::<Vec<_>>().join(" ");
            if question.is_empty() {
                return Err(AppError::Usage("ask requires a query".into()));
            }
            Command::Ask(question)
        }
        Some("serve") => Command::Serve,
        Some(other) => return Err(AppError::Usage(format!("unknown command '{other}' (try --help)"))),
        None => return Err(AppError::Usage("missing command (try --help)".into())),
    };

    Ok(CliArgs { log_level, config_path, command })
}
