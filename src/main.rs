use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use emergency_router::catalog::InMemoryCatalog;
use emergency_router::config::RouterConfig;
use emergency_router::logging::init_tracing;
use emergency_router::response::{ResponseStatus, render_text};
use emergency_router::{RequestCoordinator, RoutingEngine, RoutingRequest, RoutingResponse};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rank routes to the nearest emergency facilities")]
struct Cli {
    /// Router configuration (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank candidate facilities for one request.
    Route {
        /// Facility catalog: JSON array of facilities.
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// cardiac, trauma, general, or any other tag.
        #[arg(long = "emergency-type")]
        emergency_type: Option<String>,
        /// Print the response as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the default configuration.
    PrintConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing("info", cli.log_json) {
        eprintln!("failed to initialize logging: {}", err);
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::PrintConfig => {
            println!("{}", RouterConfig::default().to_json_pretty()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Route {
            catalog,
            lat,
            lng,
            address,
            emergency_type,
            json,
        } => {
            let request =
                RoutingRequest::from_text(lat.as_deref(), lng.as_deref(), address, emergency_type);
            handle_route(cli.config.as_deref(), &catalog, &request, json)
        }
    }
}

fn handle_route(
    config_path: Option<&Path>,
    catalog_path: &Path,
    request: &RoutingRequest,
    json: bool,
) -> Result<ExitCode> {
    let config = match config_path {
        Some(path) => RouterConfig::from_path(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => RouterConfig::default(),
    };
    let catalog = InMemoryCatalog::from_path(catalog_path).with_context(|| {
        format!(
            "failed to load facility catalog from {}",
            catalog_path.display()
        )
    })?;

    let provider = config.build_provider().context("failed to build metrics provider")?;
    let engine = RoutingEngine::new(provider, config.engine.clone())
        .context("failed to start routing engine")?;
    let coordinator = RequestCoordinator::new(catalog, engine);

    let outcome = coordinator.submit(request);
    let response = RoutingResponse::from(&outcome);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_text(&response));
    }

    Ok(match response.status {
        ResponseStatus::Success => ExitCode::SUCCESS,
        ResponseStatus::Empty => ExitCode::from(2),
        ResponseStatus::Failed => ExitCode::FAILURE,
    })
}
