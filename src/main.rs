//! Gating PoC entry point: mock service and vulnerability fetcher.

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gating_poc::api::{create_router, SERVICE_NAME, SERVICE_VERSION};
use gating_poc::config::Config;
use gating_poc::fetcher::fetcher_router_from_config;
use gating_poc::metrics;
use gating_poc::utils::serve;

/// Mock microservice with intentionally vulnerable dependencies.
#[derive(Parser, Debug)]
#[command(name = "gating-poc")]
#[command(about = "Mock microservice and Snyk data fetcher for CI/CD gating tests")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP port for the server being started (overrides PORT or FETCHER_PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Serve the mock service endpoints (default).
    Serve,

    /// Serve the Snyk vulnerability fetcher.
    Fetcher,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("gating_poc=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if args.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    match args.command {
        Some(Command::Serve) | None => cmd_serve(args.port).await,
        Some(Command::Fetcher) => cmd_fetcher(args.port).await,
        Some(Command::CheckConfig) => cmd_check_config(),
    }
}

/// Load and validate configuration, logging failures.
fn load_config() -> gating_poc::Result<Config> {
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    config.validate().map_err(|e| {
        error!("{}", e);
        e
    })?;

    Ok(config)
}

/// Install the Prometheus recorder, continuing without `/metrics` on failure.
fn install_metrics() -> Option<PrometheusHandle> {
    match metrics::install_prometheus() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            None
        }
    }
}

/// Serve the mock service.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    let config = load_config()?;
    let port = port_override.unwrap_or(config.port);

    info!("Starting {} v{}", SERVICE_NAME, SERVICE_VERSION);
    let router = create_router(install_metrics());

    serve(router, port).await?;
    info!("Server stopped");
    Ok(())
}

/// Serve the vulnerability fetcher.
async fn cmd_fetcher(port_override: Option<u16>) -> anyhow::Result<()> {
    let config = load_config()?;
    let port = port_override.unwrap_or(config.fetcher_port);

    if !config.has_snyk_credentials() {
        warn!("SNYK_TOKEN or SNYK_ORG_ID not set; /snyk will answer 500");
    }

    info!(
        "Starting Snyk data fetcher against {}",
        config.snyk_api_base_trimmed()
    );
    let router = fetcher_router_from_config(&config, install_metrics())?;

    serve(router, port).await?;
    info!("Fetcher stopped");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("GATING POC - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Service Port: {}", config.port);
    println!("  Fetcher Port: {}", config.fetcher_port);
    println!("  Snyk API: {}", config.snyk_api_base);
    println!(
        "  Snyk Credentials: {}",
        if config.has_snyk_credentials() { "present" } else { "MISSING (mock data only)" }
    );
    match &config.snyk_project_id {
        Some(id) => println!("  Snyk Project: {}", id),
        None => println!("  Snyk Project: auto-discover"),
    }
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!(
        "  Log Filter: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info (default)".to_string())
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}
