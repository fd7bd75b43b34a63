use anyhow::{anyhow, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use teachers::{TeachersConfig, TeachersModule};
use tokio_util::sync::CancellationToken;
use url::Url;

mod shutdown;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const TEACHERS_SECTION: &str = "teachers";
const INGRESS_SECTION: &str = "api_ingress";

/// Teachers Server - REST service for the teacher registry
#[derive(Parser)]
#[command(name = "teachers-server")]
#[command(about = "Teachers Server - REST service for the teacher registry")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Ignore the configured database and keep teachers in memory
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Teachers Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Only SQLite is compiled into the storage layer.
fn check_dsn(cfg: &DatabaseConfig) -> Result<()> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if is_memory_dsn(raw) {
        return Ok(());
    }
    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" => Ok(()),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

fn is_memory_dsn(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// Keeps in-memory DSNs as-is.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if create_dirs {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    // Without mode=rwc sqlx refuses to create a missing database file.
    match query {
        Some(q) => {
            out.push('?');
            out.push_str(q);
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

async fn build_module(config: &AppConfig, teachers_cfg: &TeachersConfig) -> Result<TeachersModule> {
    match &config.database {
        Some(db) => {
            check_dsn(db)?;
            let dsn = absolutize_sqlite_dsn(db.url.trim(), Path::new(&config.server.home_dir), true)?;
            tracing::info!("Connecting to database: {}", dsn);
            TeachersModule::with_database(&dsn, db.max_conns, teachers_cfg).await
        }
        None => {
            tracing::warn!("No database configuration found, keeping teachers in memory");
            Ok(TeachersModule::in_memory(teachers_cfg))
        }
    }
}

async fn resolve_bind_addr(host: &str, port: u16) -> Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("Failed to resolve {host}:{port}"))?
        .next()
        .ok_or_else(|| anyhow!("No address for {host}:{port}"))
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let teachers_cfg: TeachersConfig = config.module_config(TEACHERS_SECTION)?;
    let ingress_cfg: ApiIngressConfig = config.module_config(INGRESS_SECTION)?;

    let module = build_module(&config, &teachers_cfg).await?;
    let ingress = ApiIngress::new(ingress_cfg).with_openapi(&module.openapi())?;

    let cancel = CancellationToken::new();
    let c = cancel.clone();
    tokio::spawn(async move {
        match shutdown::wait_for_shutdown().await {
            Ok(()) => tracing::info!("shutdown: signal received"),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "shutdown: primary waiter failed; falling back to ctrl_c()"
                );
                let _ = tokio::signal::ctrl_c().await;
            }
        }
        c.cancel();
    });

    let addr = resolve_bind_addr(&config.server.host, config.server.port).await?;
    ingress.serve(module.router(Router::new()), addr, cancel).await?;

    tracing::info!("Teachers Server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let teachers_cfg: TeachersConfig = config.module_config(TEACHERS_SECTION)?;
    let _: ApiIngressConfig = config.module_config(INGRESS_SECTION)?;
    if teachers_cfg.max_name_length == 0 {
        return Err(anyhow!("teachers.max_name_length must be positive"));
    }
    if let Some(db) = &config.database {
        check_dsn(db)?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
